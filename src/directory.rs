//! Read and write contracts the engine expects from the surrounding system.
//!
//! The engine never caches what these return; every call observes current
//! state, so two concurrent decisions can read the same workload.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::assignment::{AssignmentLog, NewAssignmentLog};
use crate::models::booking::Booking;
use crate::models::technician::Technician;

pub trait TechnicianDirectory: Send + Sync {
    /// Technicians whose account is active. Duty status is not filtered.
    fn active_technicians(
        &self,
    ) -> impl Future<Output = Result<Vec<Technician>, StoreError>> + Send;

    fn technician(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Technician>, StoreError>> + Send;
}

pub trait BookingDirectory: Send + Sync {
    /// Every booking of the technician scheduled on `date`, whatever its status.
    fn bookings_on(
        &self,
        technician_id: Uuid,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Booking>, StoreError>> + Send;

    /// Ratings (1-5) of the most recent completed bookings, newest first.
    fn recent_ratings(
        &self,
        technician_id: Uuid,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<f64>, StoreError>> + Send;
}

pub trait ServiceDirectory: Send + Sync {
    /// Parent category of a service, `None` when the service is unknown.
    fn service_category(
        &self,
        service_id: Uuid,
    ) -> impl Future<Output = Result<Option<Uuid>, StoreError>> + Send;
}

pub trait AssignmentLogStore: Send + Sync {
    fn append(
        &self,
        row: NewAssignmentLog,
    ) -> impl Future<Output = Result<AssignmentLog, StoreError>> + Send;
}
