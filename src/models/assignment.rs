use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The five sub-scores of one candidate, each in [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub distance_score: f64,
    pub workload_score: f64,
    pub availability_score: f64,
    pub skill_score: f64,
    pub performance_score: f64,
}

/// A technician scored against one booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentCandidate {
    pub technician_id: Uuid,
    pub distance_km: f64,
    pub breakdown: ScoreBreakdown,
    pub total_score: u32,
    pub rejection_reason: Option<String>,
    /// Soft penalties and notes that lowered the score without rejecting.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub penalties: Vec<String>,
}

impl AssignmentCandidate {
    pub fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMethod {
    Auto,
    Manual,
}

/// Row handed to the audit store; the store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignmentLog {
    pub booking_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub attempted_technician_id: Option<Uuid>,
    pub method: AssignmentMethod,
    pub distance_km: Option<f64>,
    pub breakdown: Option<ScoreBreakdown>,
    pub total_score: Option<u32>,
    pub rejection_reason: Option<String>,
    pub penalties: Option<String>,
    pub admin_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl NewAssignmentLog {
    /// Describes an automatic decision. A rejected candidate is recorded as
    /// the attempt but never as the assigned technician.
    pub fn auto(booking_id: Uuid, candidate: &AssignmentCandidate) -> Self {
        let technician_id = if candidate.is_rejected() {
            None
        } else {
            Some(candidate.technician_id)
        };

        Self {
            booking_id,
            technician_id,
            attempted_technician_id: Some(candidate.technician_id),
            method: AssignmentMethod::Auto,
            distance_km: Some(candidate.distance_km),
            breakdown: Some(candidate.breakdown),
            total_score: Some(candidate.total_score),
            rejection_reason: candidate.rejection_reason.clone(),
            penalties: (!candidate.penalties.is_empty()).then(|| candidate.penalties.join("; ")),
            admin_id: None,
            notes: None,
        }
    }

    pub fn manual(
        booking_id: Uuid,
        technician_id: Uuid,
        admin_id: Uuid,
        notes: Option<String>,
    ) -> Self {
        Self {
            booking_id,
            technician_id: Some(technician_id),
            attempted_technician_id: Some(technician_id),
            method: AssignmentMethod::Manual,
            distance_km: None,
            breakdown: None,
            total_score: None,
            rejection_reason: None,
            penalties: None,
            admin_id: Some(admin_id),
            notes,
        }
    }
}

/// Persisted, append-only audit record of one assignment decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentLog {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub technician_id: Option<Uuid>,
    /// Technician whose scores this row carries, even when nobody was assigned.
    pub attempted_technician_id: Option<Uuid>,
    pub method: AssignmentMethod,
    pub distance_km: Option<f64>,
    pub breakdown: Option<ScoreBreakdown>,
    pub total_score: Option<u32>,
    pub rejection_reason: Option<String>,
    pub penalties: Option<String>,
    pub admin_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AssignmentLog {
    pub fn from_new(id: Uuid, row: NewAssignmentLog, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            booking_id: row.booking_id,
            technician_id: row.technician_id,
            attempted_technician_id: row.attempted_technician_id,
            method: row.method,
            distance_km: row.distance_km,
            breakdown: row.breakdown,
            total_score: row.total_score,
            rejection_reason: row.rejection_reason,
            penalties: row.penalties,
            admin_id: row.admin_id,
            notes: row.notes,
            created_at,
        }
    }
}
