use chrono::NaiveDate;

use crate::directory::BookingDirectory;
use crate::engine::scoring::clamp_score;
use crate::error::{AssignmentError, StoreError};
use crate::models::technician::Technician;

/// Capacity score from the number of unresolved bookings on `date`.
///
/// The count is a plain read at decision time. Nothing reserves the slot, so
/// concurrent decisions may each see the same count and overbook the day.
pub async fn score_workload<B>(
    bookings: &B,
    technician: &Technician,
    date: NaiveDate,
) -> Result<f64, AssignmentError>
where
    B: BookingDirectory,
{
    let active = active_count(bookings, technician, date)
        .await
        .map_err(AssignmentError::lookup("load same-day bookings"))?;

    Ok(workload_score(active, technician.max_daily_bookings))
}

async fn active_count<B>(
    bookings: &B,
    technician: &Technician,
    date: NaiveDate,
) -> Result<u32, StoreError>
where
    B: BookingDirectory,
{
    let day = bookings.bookings_on(technician.id, date).await?;
    Ok(day.iter().filter(|booking| booking.status.is_active()).count() as u32)
}

pub fn workload_score(active: u32, cap: u32) -> f64 {
    if active >= cap {
        return 0.0;
    }

    clamp_score(100.0 * (1.0 - active as f64 / cap as f64))
}
