use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::models::booking::BookingRequest;
use crate::models::technician::{DutyStatus, GeoPoint, Technician};

pub const CUSTOMER: GeoPoint = GeoPoint {
    lat: 52.52,
    lng: 13.405,
};

/// Available generalist living next to the customer, nothing booked.
pub fn technician(seed: u128) -> Technician {
    Technician {
        id: Uuid::from_u128(seed),
        name: format!("tech-{seed}"),
        active: true,
        duty_status: DutyStatus::Available,
        home_location: Some(CUSTOMER),
        service_radius_km: 50.0,
        working_hours: HashMap::new(),
        days_off: BTreeSet::new(),
        max_daily_bookings: 8,
        specializations: BTreeSet::new(),
        has_certifications: false,
        updated_at: Utc::now(),
    }
}

/// Monday 2026-10-19 at 10:00.
pub fn request(service_id: Uuid) -> BookingRequest {
    BookingRequest {
        service_id,
        scheduled_date: monday(),
        scheduled_time: at(10, 0),
        customer_location: CUSTOMER,
    }
}

pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// A point roughly `km` kilometres due north of the customer.
pub fn north_of_customer(km: f64) -> GeoPoint {
    GeoPoint {
        lat: CUSTOMER.lat + km / 111.195,
        lng: CUSTOMER.lng,
    }
}
