use std::env;

use crate::engine::scoring::ScoringWeights;
use crate::error::AppError;

/// Tuning knobs of the ranker. Built once and injected, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentConfig {
    pub weights: ScoringWeights,
    /// Candidates farther than this are rejected regardless of their radius.
    pub max_distance_km: f64,
    /// Totals strictly below this are rejected even without a reason.
    pub rejection_threshold: u32,
    pub rating_history_limit: usize,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            max_distance_km: 100.0,
            rejection_threshold: 30,
            rating_history_limit: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub assignment: AssignmentConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let defaults = AssignmentConfig::default();
        let weights = ScoringWeights {
            distance: parse_or_default("WEIGHT_DISTANCE", defaults.weights.distance)?,
            workload: parse_or_default("WEIGHT_WORKLOAD", defaults.weights.workload)?,
            availability: parse_or_default("WEIGHT_AVAILABILITY", defaults.weights.availability)?,
            skill: parse_or_default("WEIGHT_SKILL", defaults.weights.skill)?,
            performance: parse_or_default("WEIGHT_PERFORMANCE", defaults.weights.performance)?,
        };
        weights.validate().map_err(AppError::Config)?;

        let max_distance_km = parse_or_default("MAX_DISTANCE_KM", defaults.max_distance_km)?;
        if max_distance_km.is_nan() || max_distance_km <= 0.0 {
            return Err(AppError::Config("MAX_DISTANCE_KM must be > 0".to_string()));
        }

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            assignment: AssignmentConfig {
                weights,
                max_distance_km,
                rejection_threshold: parse_or_default(
                    "REJECTION_THRESHOLD",
                    defaults.rejection_threshold,
                )?,
                rating_history_limit: parse_or_default(
                    "RATING_HISTORY_LIMIT",
                    defaults.rating_history_limit,
                )?,
            },
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| AppError::Config(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
