use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use chrono::{NaiveDate, Utc, Weekday};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::technician::{
    DEFAULT_MAX_DAILY_BOOKINGS, DEFAULT_SERVICE_RADIUS_KM, DutyStatus, GeoPoint, Technician,
    WorkingWindow,
};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/technicians", post(create_technician).get(list_technicians))
        .route("/technicians/:id", get(get_technician))
        .route("/technicians/:id/status", patch(update_duty_status))
        .route("/technicians/:id/location", patch(update_home_location))
}

#[derive(Deserialize)]
pub struct CreateTechnicianRequest {
    pub name: String,
    #[serde(default)]
    pub home_location: Option<GeoPoint>,
    #[serde(default)]
    pub service_radius_km: Option<f64>,
    #[serde(default)]
    pub max_daily_bookings: Option<u32>,
    #[serde(default)]
    pub working_hours: HashMap<Weekday, WorkingWindow>,
    #[serde(default)]
    pub days_off: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub specializations: BTreeSet<Uuid>,
    #[serde(default)]
    pub has_certifications: bool,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub duty_status: DutyStatus,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub home_location: Option<GeoPoint>,
}

async fn create_technician(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTechnicianRequest>,
) -> Result<Json<Technician>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let service_radius_km = payload.service_radius_km.unwrap_or(DEFAULT_SERVICE_RADIUS_KM);
    if service_radius_km.is_nan() || service_radius_km < 0.0 {
        return Err(AppError::BadRequest(
            "service_radius_km must be >= 0".to_string(),
        ));
    }

    if let Some(location) = &payload.home_location {
        validate_location(location)?;
    }

    if let Some((day, _)) = payload
        .working_hours
        .iter()
        .find(|(_, window)| window.start > window.end)
    {
        return Err(AppError::BadRequest(format!(
            "working hours for {day} end before they start"
        )));
    }

    let technician = Technician {
        id: Uuid::new_v4(),
        name: payload.name,
        active: true,
        duty_status: DutyStatus::Available,
        home_location: payload.home_location,
        service_radius_km,
        working_hours: payload.working_hours,
        days_off: payload.days_off,
        max_daily_bookings: payload
            .max_daily_bookings
            .unwrap_or(DEFAULT_MAX_DAILY_BOOKINGS),
        specializations: payload.specializations,
        has_certifications: payload.has_certifications,
        updated_at: Utc::now(),
    };

    state.technicians.insert(technician.id, technician.clone());
    Ok(Json(technician))
}

async fn list_technicians(State(state): State<Arc<AppState>>) -> Json<Vec<Technician>> {
    let technicians = state
        .technicians
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(technicians)
}

async fn get_technician(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Technician>, AppError> {
    let technician = state
        .technicians
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("technician {id} not found")))?;

    Ok(Json(technician.value().clone()))
}

async fn update_duty_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Technician>, AppError> {
    let mut technician = state
        .technicians
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("technician {id} not found")))?;

    technician.duty_status = payload.duty_status;
    technician.updated_at = Utc::now();

    Ok(Json(technician.clone()))
}

async fn update_home_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Technician>, AppError> {
    if let Some(location) = &payload.home_location {
        validate_location(location)?;
    }

    let mut technician = state
        .technicians
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("technician {id} not found")))?;

    technician.home_location = payload.home_location;
    technician.updated_at = Utc::now();

    Ok(Json(technician.clone()))
}

pub(crate) fn validate_location(location: &GeoPoint) -> Result<(), AppError> {
    let lat_ok = (-90.0..=90.0).contains(&location.lat);
    let lng_ok = (-180.0..=180.0).contains(&location.lng);
    if lat_ok && lng_ok {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "coordinates out of range: {}, {}",
            location.lat, location.lng
        )))
    }
}
