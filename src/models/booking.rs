use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::clock::hhmm;
use crate::models::technician::GeoPoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    TechnicianAssigned,
    EnRoute,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Unresolved bookings occupy a slot in the technician's day.
    pub fn is_active(self) -> bool {
        !matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

/// What the engine needs to know about a booking to pick a technician.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service_id: Uuid,
    pub scheduled_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub scheduled_time: NaiveTime,
    pub customer_location: GeoPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub service_id: Uuid,
    pub scheduled_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub scheduled_time: NaiveTime,
    pub customer_location: GeoPoint,
    pub status: BookingStatus,
    pub technician_id: Option<Uuid>,
    pub technician_rating: Option<f64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn request(&self) -> BookingRequest {
        BookingRequest {
            service_id: self.service_id,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
            customer_location: self.customer_location,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::BookingStatus;

    #[test]
    fn only_unresolved_statuses_are_active() {
        let active = [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::TechnicianAssigned,
            BookingStatus::EnRoute,
            BookingStatus::InProgress,
        ];
        assert!(active.iter().all(|status| status.is_active()));
        assert!(!BookingStatus::Completed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }
}
