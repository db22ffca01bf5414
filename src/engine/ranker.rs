use std::time::Instant;

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AssignmentConfig;
use crate::directory::{
    AssignmentLogStore, BookingDirectory, ServiceDirectory, TechnicianDirectory,
};
use crate::engine::availability::score_availability;
use crate::engine::distance::score_distance;
use crate::engine::performance::score_performance;
use crate::engine::scoring::{LOW_SCORE_REASON, verdict, weighted_total};
use crate::engine::skill::score_skill;
use crate::engine::workload::score_workload;
use crate::error::AssignmentError;
use crate::models::assignment::{
    AssignmentCandidate, AssignmentLog, NewAssignmentLog, ScoreBreakdown,
};
use crate::models::booking::BookingRequest;
use crate::models::technician::Technician;
use crate::observability::metrics::Metrics;

/// Everything the ranker reads from and writes to.
pub trait AssignmentDirectory:
    TechnicianDirectory + BookingDirectory + ServiceDirectory + AssignmentLogStore
{
}

impl<T> AssignmentDirectory for T where
    T: TechnicianDirectory + BookingDirectory + ServiceDirectory + AssignmentLogStore
{
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentDecision {
    /// Assigned technician. `None` when the pool was empty or every
    /// candidate was rejected.
    pub technician_id: Option<Uuid>,
    /// Audit row for this decision; absent only for an empty pool.
    pub log: Option<AssignmentLog>,
    /// All candidates, best first.
    pub candidates: Vec<AssignmentCandidate>,
}

#[derive(Clone)]
pub struct CandidateRanker {
    config: AssignmentConfig,
    metrics: Metrics,
}

impl CandidateRanker {
    pub fn new(config: AssignmentConfig, metrics: Metrics) -> Self {
        Self { config, metrics }
    }

    /// Scores every active technician against `request` and records the
    /// outcome. Storage failures propagate; an empty result does not fail.
    pub async fn find_best_technician<S>(
        &self,
        store: &S,
        request: &BookingRequest,
        booking_id: Uuid,
    ) -> Result<AssignmentDecision, AssignmentError>
    where
        S: AssignmentDirectory,
    {
        let start = Instant::now();
        let result = self.decide(store, request, booking_id).await;

        let outcome = match &result {
            Ok(decision) if decision.technician_id.is_some() => "assigned",
            Ok(decision) if decision.log.is_none() => "empty_pool",
            Ok(_) => "unassigned",
            Err(_) => "error",
        };
        self.metrics
            .assignment_latency_seconds
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());
        self.metrics
            .assignment_decisions_total
            .with_label_values(&[outcome])
            .inc();

        result
    }

    /// Records an assignment chosen by an administrator. No scoring happens
    /// and the technician is not checked; callers vet eligibility first.
    pub async fn log_manual_assignment<S>(
        &self,
        store: &S,
        booking_id: Uuid,
        technician_id: Uuid,
        admin_id: Uuid,
        notes: Option<String>,
    ) -> Result<AssignmentLog, AssignmentError>
    where
        S: AssignmentLogStore,
    {
        let log = store
            .append(NewAssignmentLog::manual(
                booking_id,
                technician_id,
                admin_id,
                notes,
            ))
            .await
            .map_err(|source| AssignmentError::Persist { source })?;

        self.metrics.manual_assignments_total.inc();
        info!(
            booking_id = %booking_id,
            technician_id = %technician_id,
            admin_id = %admin_id,
            "manual assignment recorded"
        );

        Ok(log)
    }

    async fn decide<S>(
        &self,
        store: &S,
        request: &BookingRequest,
        booking_id: Uuid,
    ) -> Result<AssignmentDecision, AssignmentError>
    where
        S: AssignmentDirectory,
    {
        let pool = store
            .active_technicians()
            .await
            .map_err(AssignmentError::lookup("load technician pool"))?;

        let scored = try_join_all(
            pool.iter()
                .map(|technician| self.evaluate(store, technician, request)),
        )
        .await?;
        let ranked = rank(scored);

        for candidate in ranked.iter().filter(|c| c.is_rejected()) {
            let kind = match candidate.rejection_reason.as_deref() {
                Some(LOW_SCORE_REASON) => "low_score",
                _ => "rejected",
            };
            self.metrics
                .candidate_rejections_total
                .with_label_values(&[kind])
                .inc();
        }

        // Only an empty pool leaves nothing to select, and it writes no log.
        let Some(chosen) = select(&ranked) else {
            warn!(booking_id = %booking_id, "no active technicians; nothing to rank");
            return Ok(AssignmentDecision {
                technician_id: None,
                log: None,
                candidates: Vec::new(),
            });
        };

        let log = store
            .append(NewAssignmentLog::auto(booking_id, chosen))
            .await
            .map_err(|source| AssignmentError::Persist { source })?;

        let technician_id = log.technician_id;
        match technician_id {
            Some(id) => info!(
                booking_id = %booking_id,
                technician_id = %id,
                score = chosen.total_score,
                candidates = ranked.len(),
                "technician selected"
            ),
            None => warn!(
                booking_id = %booking_id,
                best_attempt = %chosen.technician_id,
                score = chosen.total_score,
                reason = chosen.rejection_reason.as_deref().unwrap_or_default(),
                candidates = ranked.len(),
                "every candidate rejected"
            ),
        }

        Ok(AssignmentDecision {
            technician_id,
            log: Some(log),
            candidates: ranked,
        })
    }

    async fn evaluate<S>(
        &self,
        store: &S,
        technician: &Technician,
        request: &BookingRequest,
    ) -> Result<AssignmentCandidate, AssignmentError>
    where
        S: AssignmentDirectory,
    {
        let distance = score_distance(
            technician,
            &request.customer_location,
            self.config.max_distance_km,
        );
        let availability = score_availability(technician, request);

        let (workload, skill, performance) = tokio::try_join!(
            score_workload(store, technician, request.scheduled_date),
            score_skill(store, technician, request.service_id),
            score_performance(store, technician.id, self.config.rating_history_limit),
        )?;

        let breakdown = ScoreBreakdown {
            distance_score: distance.sub.score,
            workload_score: workload,
            availability_score: availability.score,
            skill_score: skill.score,
            performance_score: performance,
        };
        let total_score = weighted_total(&breakdown, &self.config.weights);

        let findings = [&distance.sub.finding, &availability.finding, &skill.finding];
        let verdict = verdict(
            findings.into_iter().flatten(),
            total_score,
            self.config.rejection_threshold,
        );

        debug!(
            technician_id = %technician.id,
            distance_km = distance.distance_km,
            total_score,
            rejected = verdict.rejection_reason.is_some(),
            "candidate scored"
        );

        Ok(AssignmentCandidate {
            technician_id: technician.id,
            distance_km: distance.distance_km,
            breakdown,
            total_score,
            rejection_reason: verdict.rejection_reason,
            penalties: verdict.penalties,
        })
    }
}

/// Best total first; equal totals fall back to technician id ascending so the
/// order never depends on how the directory enumerated the pool.
pub fn rank(mut candidates: Vec<AssignmentCandidate>) -> Vec<AssignmentCandidate> {
    candidates.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.technician_id.cmp(&b.technician_id))
    });
    candidates
}

/// First unrejected candidate, otherwise the best rejected one as the
/// attempt to record.
pub fn select(ranked: &[AssignmentCandidate]) -> Option<&AssignmentCandidate> {
    ranked
        .iter()
        .find(|candidate| !candidate.is_rejected())
        .or_else(|| ranked.first())
}
