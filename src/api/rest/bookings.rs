use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::rest::technicians::validate_location;
use crate::directory::TechnicianDirectory;
use crate::engine::ranker::AssignmentDecision;
use crate::error::AppError;
use crate::models::assignment::AssignmentLog;
use crate::models::booking::{Booking, BookingStatus, Service};
use crate::models::clock::hhmm;
use crate::models::technician::{DutyStatus, GeoPoint};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/services", post(create_service))
        .route("/bookings", post(create_booking))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/complete", post(complete_booking))
        .route("/bookings/:id/manual-assignment", post(assign_manually))
        .route("/assignment-logs", get(list_assignment_logs))
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub category_id: Uuid,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: Uuid,
    pub scheduled_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub scheduled_time: NaiveTime,
    pub customer_location: GeoPoint,
}

#[derive(Serialize)]
pub struct BookingCreated {
    pub booking: Booking,
    pub decision: AssignmentDecision,
}

#[derive(Deserialize)]
pub struct CompleteBookingRequest {
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Deserialize)]
pub struct ManualAssignmentRequest {
    pub technician_id: Uuid,
    pub admin_id: Uuid,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct ManualAssignmentResponse {
    pub booking: Booking,
    pub log: AssignmentLog,
}

async fn create_service(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let service = Service {
        id: Uuid::new_v4(),
        name: payload.name,
        category_id: payload.category_id,
    };

    state.services.insert(service.id, service.clone());
    Ok(Json(service))
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<BookingCreated>, AppError> {
    validate_location(&payload.customer_location)?;

    let mut booking = Booking {
        id: Uuid::new_v4(),
        service_id: payload.service_id,
        scheduled_date: payload.scheduled_date,
        scheduled_time: payload.scheduled_time,
        customer_location: payload.customer_location,
        status: BookingStatus::Pending,
        technician_id: None,
        technician_rating: None,
        completed_at: None,
        created_at: Utc::now(),
    };
    state.bookings.insert(booking.id, booking.clone());

    let decision = state
        .ranker
        .find_best_technician(state.as_ref(), &booking.request(), booking.id)
        .await?;

    if let Some(technician_id) = decision.technician_id {
        booking.technician_id = Some(technician_id);
        booking.status = BookingStatus::TechnicianAssigned;
        state.bookings.insert(booking.id, booking.clone());
    }

    Ok(Json(BookingCreated { booking, decision }))
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .bookings
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("booking {id} not found")))?;

    Ok(Json(booking.value().clone()))
}

async fn complete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    if let Some(rating) = payload.rating {
        if !(1.0..=5.0).contains(&rating) {
            return Err(AppError::BadRequest("rating must be between 1 and 5".to_string()));
        }
    }

    let mut booking = state
        .bookings
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("booking {id} not found")))?;

    if booking.technician_id.is_none() {
        return Err(AppError::Conflict(format!("booking {id} has no technician")));
    }
    if !booking.status.is_active() {
        return Err(AppError::Conflict(format!("booking {id} is already closed")));
    }

    booking.status = BookingStatus::Completed;
    booking.technician_rating = payload.rating;
    booking.completed_at = Some(Utc::now());

    Ok(Json(booking.clone()))
}

async fn assign_manually(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ManualAssignmentRequest>,
) -> Result<Json<ManualAssignmentResponse>, AppError> {
    let booking_active = state
        .bookings
        .get(&id)
        .map(|entry| entry.value().status.is_active())
        .ok_or_else(|| AppError::NotFound(format!("booking {id} not found")))?;
    if !booking_active {
        return Err(AppError::Conflict(format!("booking {id} is already closed")));
    }

    let technician = state
        .technician(payload.technician_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("technician {} not found", payload.technician_id))
        })?;
    if !technician.active || technician.duty_status == DutyStatus::Suspended {
        return Err(AppError::Conflict(format!(
            "technician {} cannot take bookings",
            technician.id
        )));
    }

    let log = state
        .ranker
        .log_manual_assignment(
            state.as_ref(),
            id,
            technician.id,
            payload.admin_id,
            payload.notes,
        )
        .await?;

    let mut booking = state
        .bookings
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("booking {id} not found")))?;
    booking.technician_id = Some(technician.id);
    booking.status = BookingStatus::TechnicianAssigned;

    info!(booking_id = %id, technician_id = %technician.id, "booking reassigned manually");

    Ok(Json(ManualAssignmentResponse {
        booking: booking.clone(),
        log,
    }))
}

async fn list_assignment_logs(State(state): State<Arc<AppState>>) -> Json<Vec<AssignmentLog>> {
    Json(state.logs_in_order())
}
