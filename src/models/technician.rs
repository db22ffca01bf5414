use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::clock::hhmm;

pub const DEFAULT_SERVICE_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_MAX_DAILY_BOOKINGS: u32 = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    Available,
    Busy,
    OnJob,
    OffDuty,
    Suspended,
}

/// One weekday's shift. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorkingWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub id: Uuid,
    pub name: String,
    /// Account-level flag; only active accounts enter the candidate pool.
    pub active: bool,
    pub duty_status: DutyStatus,
    pub home_location: Option<GeoPoint>,
    pub service_radius_km: f64,
    #[serde(default)]
    pub working_hours: HashMap<Weekday, WorkingWindow>,
    #[serde(default)]
    pub days_off: BTreeSet<chrono::NaiveDate>,
    pub max_daily_bookings: u32,
    /// Category ids. Empty means generalist.
    #[serde(default)]
    pub specializations: BTreeSet<Uuid>,
    pub has_certifications: bool,
    pub updated_at: DateTime<Utc>,
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
