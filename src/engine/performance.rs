use uuid::Uuid;

use crate::directory::BookingDirectory;
use crate::engine::scoring::clamp_score;
use crate::error::AssignmentError;

/// Technicians without rated jobs yet.
pub const NO_HISTORY_SCORE: f64 = 70.0;
const MAX_RATING: f64 = 5.0;

pub async fn score_performance<B>(
    bookings: &B,
    technician_id: Uuid,
    history_limit: usize,
) -> Result<f64, AssignmentError>
where
    B: BookingDirectory,
{
    let ratings = bookings
        .recent_ratings(technician_id, history_limit)
        .await
        .map_err(AssignmentError::lookup("load rating history"))?;

    let window = ratings.len().min(history_limit);
    Ok(performance_score(&ratings[..window]))
}

pub fn performance_score(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return NO_HISTORY_SCORE;
    }

    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
    clamp_score(average / MAX_RATING * 100.0)
}
