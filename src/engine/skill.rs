use std::collections::BTreeSet;

use uuid::Uuid;

use crate::directory::ServiceDirectory;
use crate::engine::scoring::{Finding, SubScore};
use crate::error::AssignmentError;
use crate::models::technician::Technician;

/// Unknown service or generalist technician.
pub const NEUTRAL_SKILL_SCORE: f64 = 60.0;
pub const UNCERTIFIED_SPECIALIST_SCORE: f64 = 85.0;

pub async fn score_skill<S>(
    services: &S,
    technician: &Technician,
    service_id: Uuid,
) -> Result<SubScore, AssignmentError>
where
    S: ServiceDirectory,
{
    let category = services
        .service_category(service_id)
        .await
        .map_err(AssignmentError::lookup("resolve service category"))?;

    Ok(skill_score(
        &technician.specializations,
        category,
        technician.has_certifications,
    ))
}

/// A specialist outside their specialization is a hard reject.
pub fn skill_score(
    specializations: &BTreeSet<Uuid>,
    category: Option<Uuid>,
    certified: bool,
) -> SubScore {
    let Some(category) = category else {
        return SubScore::clean(NEUTRAL_SKILL_SCORE);
    };

    if specializations.is_empty() {
        return SubScore::clean(NEUTRAL_SKILL_SCORE);
    }

    if !specializations.contains(&category) {
        return SubScore::with(
            0.0,
            Finding::Reject(format!("not specialized in category {category}")),
        );
    }

    if certified {
        SubScore::clean(100.0)
    } else {
        SubScore::clean(UNCERTIFIED_SPECIALIST_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(seed: u128) -> Uuid {
        Uuid::from_u128(seed)
    }

    fn specializing_in(seeds: &[u128]) -> BTreeSet<Uuid> {
        seeds.iter().copied().map(category).collect()
    }

    #[test]
    fn unresolved_category_fails_open() {
        let result = skill_score(&specializing_in(&[1]), None, true);
        assert_eq!(result, SubScore::clean(60.0));
    }

    #[test]
    fn generalist_is_neutral() {
        let result = skill_score(&BTreeSet::new(), Some(category(7)), true);
        assert_eq!(result, SubScore::clean(60.0));
    }

    #[test]
    fn mismatched_specialist_is_rejected() {
        let result = skill_score(&specializing_in(&[1, 2]), Some(category(7)), true);
        assert_eq!(result.score, 0.0);
        match result.finding {
            Some(Finding::Reject(reason)) => assert!(reason.contains(&category(7).to_string())),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn certification_lifts_matching_specialist() {
        let specs = specializing_in(&[7]);
        assert_eq!(skill_score(&specs, Some(category(7)), true).score, 100.0);
        assert_eq!(skill_score(&specs, Some(category(7)), false).score, 85.0);
    }
}
