use crate::models::assignment::ScoreBreakdown;

pub const MAX_SCORE: f64 = 100.0;

/// Used when none of the disqualifying checks fired but the total is too low.
pub const LOW_SCORE_REASON: &str = "Low total score";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub distance: f64,
    pub workload: f64,
    pub availability: f64,
    pub skill: f64,
    pub performance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            distance: 0.30,
            workload: 0.25,
            availability: 0.20,
            skill: 0.15,
            performance: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.distance + self.workload + self.availability + self.skill + self.performance
    }

    pub fn validate(&self) -> Result<(), String> {
        let all = [
            self.distance,
            self.workload,
            self.availability,
            self.skill,
            self.performance,
        ];
        if all.iter().any(|weight| weight.is_nan() || *weight < 0.0) {
            return Err("scoring weights must be non-negative numbers".to_string());
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(format!("scoring weights must sum to 1.0, got {sum}"));
        }

        Ok(())
    }
}

/// Why a sub-score came out the way it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// Disqualifies the candidate outright.
    Reject(String),
    /// Lowers the score but keeps the candidate selectable.
    Penalty(String),
    Note(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubScore {
    pub score: f64,
    pub finding: Option<Finding>,
}

impl SubScore {
    pub fn clean(score: f64) -> Self {
        Self {
            score: clamp_score(score),
            finding: None,
        }
    }

    pub fn with(score: f64, finding: Finding) -> Self {
        Self {
            score: clamp_score(score),
            finding: Some(finding),
        }
    }
}

pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, MAX_SCORE)
}

pub fn weighted_total(breakdown: &ScoreBreakdown, weights: &ScoringWeights) -> u32 {
    let total = breakdown.distance_score * weights.distance
        + breakdown.workload_score * weights.workload
        + breakdown.availability_score * weights.availability
        + breakdown.skill_score * weights.skill
        + breakdown.performance_score * weights.performance;

    clamp_score(total).round() as u32
}

/// Separates the candidate's findings into a rejection reason and the soft
/// penalties that stay on record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub rejection_reason: Option<String>,
    pub penalties: Vec<String>,
}

pub fn verdict<'a>(
    findings: impl IntoIterator<Item = &'a Finding>,
    total_score: u32,
    rejection_threshold: u32,
) -> Verdict {
    let mut reasons = Vec::new();
    let mut penalties = Vec::new();

    for finding in findings {
        match finding {
            Finding::Reject(msg) => reasons.push(msg.clone()),
            Finding::Penalty(msg) | Finding::Note(msg) => penalties.push(msg.clone()),
        }
    }

    let rejection_reason = if !reasons.is_empty() {
        Some(reasons.join("; "))
    } else if total_score < rejection_threshold {
        Some(LOW_SCORE_REASON.to_string())
    } else {
        None
    };

    Verdict {
        rejection_reason,
        penalties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(d: f64, w: f64, a: f64, s: f64, p: f64) -> ScoreBreakdown {
        ScoreBreakdown {
            distance_score: d,
            workload_score: w,
            availability_score: a,
            skill_score: s,
            performance_score: p,
        }
    }

    #[test]
    fn default_weights_sum_to_one() {
        let weights = ScoringWeights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-9);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_sums_and_negatives() {
        let too_heavy = ScoringWeights {
            distance: 0.5,
            ..ScoringWeights::default()
        };
        assert!(too_heavy.validate().is_err());

        let negative = ScoringWeights {
            distance: 0.5,
            workload: -0.05,
            ..ScoringWeights::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn weighted_total_rounds_to_nearest() {
        let total = weighted_total(
            &breakdown(80.0, 60.0, 100.0, 85.0, 70.0),
            &ScoringWeights::default(),
        );
        assert_eq!(total, 79);
    }

    #[test]
    fn perfect_and_empty_breakdowns_hit_the_bounds() {
        let weights = ScoringWeights::default();
        assert_eq!(
            weighted_total(&breakdown(100.0, 100.0, 100.0, 100.0, 100.0), &weights),
            100
        );
        assert_eq!(weighted_total(&breakdown(0.0, 0.0, 0.0, 0.0, 0.0), &weights), 0);
    }

    #[test]
    fn sub_scores_are_clamped() {
        assert_eq!(SubScore::clean(140.0).score, 100.0);
        assert_eq!(SubScore::clean(-3.0).score, 0.0);
        assert_eq!(SubScore::clean(f64::NAN).score, 0.0);
    }

    #[test]
    fn rejections_are_joined_and_penalties_kept_apart() {
        let findings = [
            Finding::Reject("off duty".to_string()),
            Finding::Penalty("outside service radius".to_string()),
            Finding::Reject("missing specialization".to_string()),
        ];

        let verdict = verdict(&findings, 90, 30);
        assert_eq!(
            verdict.rejection_reason.as_deref(),
            Some("off duty; missing specialization")
        );
        assert_eq!(verdict.penalties, vec!["outside service radius".to_string()]);
    }

    #[test]
    fn low_total_without_reasons_is_rejected() {
        let findings = [Finding::Penalty("currently busy".to_string())];
        let low = verdict(&findings, 29, 30);
        assert_eq!(low.rejection_reason.as_deref(), Some(LOW_SCORE_REASON));

        let at_threshold = verdict(&findings, 30, 30);
        assert!(at_threshold.rejection_reason.is_none());
    }

    #[test]
    fn explicit_reason_wins_over_low_score_label() {
        let findings = [Finding::Reject("suspended".to_string())];
        let verdict = verdict(&findings, 5, 30);
        assert_eq!(verdict.rejection_reason.as_deref(), Some("suspended"));
    }
}
