use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::config::AssignmentConfig;
use crate::directory::{
    AssignmentLogStore, BookingDirectory, ServiceDirectory, TechnicianDirectory,
};
use crate::engine::ranker::CandidateRanker;
use crate::error::StoreError;
use crate::models::assignment::{AssignmentLog, NewAssignmentLog};
use crate::models::booking::{Booking, BookingStatus, Service};
use crate::models::technician::Technician;
use crate::observability::metrics::Metrics;

/// In-memory stand-in for the relational store the engine reads from.
pub struct AppState {
    pub technicians: DashMap<Uuid, Technician>,
    pub bookings: DashMap<Uuid, Booking>,
    pub services: DashMap<Uuid, Service>,
    pub assignment_logs: DashMap<Uuid, AssignmentLog>,
    pub ranker: CandidateRanker,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: AssignmentConfig) -> Self {
        let metrics = Metrics::new();

        Self {
            technicians: DashMap::new(),
            bookings: DashMap::new(),
            services: DashMap::new(),
            assignment_logs: DashMap::new(),
            ranker: CandidateRanker::new(config, metrics.clone()),
            metrics,
        }
    }

    /// Audit rows, oldest first.
    pub fn logs_in_order(&self) -> Vec<AssignmentLog> {
        let mut logs: Vec<AssignmentLog> = self
            .assignment_logs
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        logs.sort_by_key(|log| log.created_at);
        logs
    }
}

impl TechnicianDirectory for AppState {
    async fn active_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        Ok(self
            .technicians
            .iter()
            .filter(|entry| entry.value().active)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn technician(&self, id: Uuid) -> Result<Option<Technician>, StoreError> {
        Ok(self.technicians.get(&id).map(|entry| entry.value().clone()))
    }
}

impl BookingDirectory for AppState {
    async fn bookings_on(
        &self,
        technician_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .iter()
            .filter(|entry| {
                let booking = entry.value();
                booking.technician_id == Some(technician_id) && booking.scheduled_date == date
            })
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn recent_ratings(
        &self,
        technician_id: Uuid,
        limit: usize,
    ) -> Result<Vec<f64>, StoreError> {
        let mut rated: Vec<(chrono::DateTime<Utc>, f64)> = self
            .bookings
            .iter()
            .filter_map(|entry| {
                let booking = entry.value();
                if booking.technician_id != Some(technician_id)
                    || booking.status != BookingStatus::Completed
                {
                    return None;
                }
                let rating = booking.technician_rating?;
                Some((booking.completed_at.unwrap_or(booking.created_at), rating))
            })
            .collect();

        rated.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(rated
            .into_iter()
            .take(limit)
            .map(|(_, rating)| rating)
            .collect())
    }
}

impl ServiceDirectory for AppState {
    async fn service_category(&self, service_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        Ok(self
            .services
            .get(&service_id)
            .map(|entry| entry.value().category_id))
    }
}

impl AssignmentLogStore for AppState {
    async fn append(&self, row: NewAssignmentLog) -> Result<AssignmentLog, StoreError> {
        let log = AssignmentLog::from_new(Uuid::new_v4(), row, Utc::now());
        self.assignment_logs.insert(log.id, log.clone());
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::AppState;
    use crate::config::AssignmentConfig;
    use crate::directory::{BookingDirectory, TechnicianDirectory};
    use crate::engine::test_support::{CUSTOMER, at, monday, technician};
    use crate::models::booking::{Booking, BookingStatus};

    fn booking(technician_id: Uuid, status: BookingStatus, rating: Option<f64>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            service_id: Uuid::nil(),
            scheduled_date: monday(),
            scheduled_time: at(10, 0),
            customer_location: CUSTOMER,
            status,
            technician_id: Some(technician_id),
            technician_rating: rating,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn pool_excludes_inactive_accounts() {
        let state = AppState::new(AssignmentConfig::default());
        let active = technician(1);
        let mut inactive = technician(2);
        inactive.active = false;
        state.technicians.insert(active.id, active.clone());
        state.technicians.insert(inactive.id, inactive);

        let pool = state.active_technicians().await.unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, active.id);
    }

    #[tokio::test]
    async fn day_lookup_is_scoped_to_technician_and_date() {
        let state = AppState::new(AssignmentConfig::default());
        let tech = Uuid::from_u128(1);

        let same_day = booking(tech, BookingStatus::Confirmed, None);
        let mut next_day = booking(tech, BookingStatus::Confirmed, None);
        next_day.scheduled_date = monday().succ_opt().unwrap();
        let someone_else = booking(Uuid::from_u128(2), BookingStatus::Confirmed, None);

        for b in [same_day.clone(), next_day, someone_else] {
            state.bookings.insert(b.id, b);
        }

        let day = state.bookings_on(tech, monday()).await.unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].id, same_day.id);
    }

    #[tokio::test]
    async fn ratings_are_newest_first_and_limited() {
        let state = AppState::new(AssignmentConfig::default());
        let tech = Uuid::from_u128(1);
        let now = Utc::now();

        for (age_hours, rating) in [(3, 3.0), (1, 5.0), (2, 4.0)] {
            let mut b = booking(tech, BookingStatus::Completed, Some(rating));
            b.completed_at = Some(now - Duration::hours(age_hours));
            state.bookings.insert(b.id, b);
        }
        let unrated = booking(tech, BookingStatus::Completed, None);
        state.bookings.insert(unrated.id, unrated);
        let cancelled = booking(tech, BookingStatus::Cancelled, Some(1.0));
        state.bookings.insert(cancelled.id, cancelled);

        let ratings = state.recent_ratings(tech, 2).await.unwrap();
        assert_eq!(ratings, vec![5.0, 4.0]);
    }
}
