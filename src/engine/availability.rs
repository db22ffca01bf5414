use chrono::Datelike;

use crate::engine::scoring::{Finding, SubScore};
use crate::models::booking::BookingRequest;
use crate::models::clock::minutes_since_midnight;
use crate::models::technician::{DutyStatus, Technician, weekday_name};

pub const OUTSIDE_HOURS_SCORE: f64 = 20.0;
pub const BUSY_SCORE: f64 = 50.0;
pub const ON_JOB_SCORE: f64 = 30.0;

/// Evaluates the availability table top to bottom; the first rule that
/// matches decides. Off duty, suspended, day off and a disabled weekday
/// disqualify; the remaining rules only penalise.
pub fn score_availability(technician: &Technician, request: &BookingRequest) -> SubScore {
    match technician.duty_status {
        DutyStatus::OffDuty => return SubScore::with(0.0, reject("off duty")),
        DutyStatus::Suspended => return SubScore::with(0.0, reject("suspended")),
        _ => {}
    }

    let date = request.scheduled_date;
    if technician.days_off.contains(&date) {
        return SubScore::with(0.0, reject(&format!("day off on {date}")));
    }

    let weekday = date.weekday();
    if let Some(window) = technician.working_hours.get(&weekday) {
        if !window.enabled {
            return SubScore::with(
                0.0,
                reject(&format!("does not work on {}", weekday_name(weekday))),
            );
        }

        let at = minutes_since_midnight(request.scheduled_time);
        let start = minutes_since_midnight(window.start);
        let end = minutes_since_midnight(window.end);
        if at < start || at > end {
            return SubScore::with(
                OUTSIDE_HOURS_SCORE,
                Finding::Penalty(format!(
                    "outside working hours {}-{}",
                    window.start.format("%H:%M"),
                    window.end.format("%H:%M")
                )),
            );
        }
    }

    match technician.duty_status {
        DutyStatus::Busy => {
            SubScore::with(BUSY_SCORE, Finding::Penalty("currently busy".to_string()))
        }
        DutyStatus::OnJob => {
            SubScore::with(ON_JOB_SCORE, Finding::Penalty("on another job".to_string()))
        }
        _ => SubScore::clean(100.0),
    }
}

fn reject(reason: &str) -> Finding {
    Finding::Reject(reason.to_string())
}
