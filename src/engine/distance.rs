use crate::engine::scoring::{Finding, SubScore};
use crate::geo::haversine_km;
use crate::models::technician::{GeoPoint, Technician};

/// Score for technicians whose home location is unknown.
pub const UNKNOWN_LOCATION_SCORE: f64 = 50.0;
/// Score for technicians beyond their own radius but inside the global cutoff.
pub const OUTSIDE_RADIUS_SCORE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceScore {
    pub distance_km: f64,
    pub sub: SubScore,
}

pub fn score_distance(
    technician: &Technician,
    customer: &GeoPoint,
    max_distance_km: f64,
) -> DistanceScore {
    let Some(home) = technician.home_location else {
        return DistanceScore {
            distance_km: 0.0,
            sub: SubScore::with(
                UNKNOWN_LOCATION_SCORE,
                Finding::Note("no home location set".to_string()),
            ),
        };
    };

    let distance_km = haversine_km(&home, customer);
    let radius = technician.service_radius_km;

    let sub = if distance_km > max_distance_km {
        SubScore::with(
            0.0,
            Finding::Reject(format!(
                "{distance_km:.1} km away exceeds the {max_distance_km:.0} km limit"
            )),
        )
    } else if distance_km > radius {
        SubScore::with(
            OUTSIDE_RADIUS_SCORE,
            Finding::Penalty(format!(
                "{distance_km:.1} km away is outside the {radius:.0} km service radius"
            )),
        )
    } else if radius > 0.0 {
        SubScore::clean(100.0 - (distance_km / radius) * 100.0)
    } else {
        // Zero radius and standing on the customer's doorstep.
        SubScore::clean(100.0)
    };

    DistanceScore { distance_km, sub }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{CUSTOMER, north_of_customer, technician};

    fn customer() -> GeoPoint {
        CUSTOMER
    }

    #[test]
    fn missing_home_location_is_neutral_everywhere() {
        let mut tech = technician(1);
        tech.home_location = None;

        for target in [customer(), GeoPoint { lat: -45.0, lng: 170.0 }] {
            let result = score_distance(&tech, &target, 100.0);
            assert_eq!(result.sub.score, 50.0);
            assert_eq!(result.distance_km, 0.0);
            assert!(matches!(result.sub.finding, Some(Finding::Note(_))));
        }
    }

    #[test]
    fn same_location_scores_full_marks() {
        let mut tech = technician(1);
        tech.home_location = Some(customer());

        let result = score_distance(&tech, &customer(), 100.0);
        assert_eq!(result.sub.score, 100.0);
        assert!(result.sub.finding.is_none());
    }

    #[test]
    fn score_decays_linearly_inside_radius() {
        let mut tech = technician(1);
        tech.service_radius_km = 50.0;
        tech.home_location = Some(north_of_customer(10.0));

        let result = score_distance(&tech, &customer(), 100.0);
        assert!((result.distance_km - 10.0).abs() < 0.1);
        assert!((result.sub.score - 80.0).abs() < 0.5, "got {}", result.sub.score);
    }

    #[test]
    fn outside_radius_is_a_soft_penalty() {
        let mut tech = technician(1);
        tech.service_radius_km = 20.0;
        tech.home_location = Some(north_of_customer(30.0));

        let result = score_distance(&tech, &customer(), 100.0);
        assert_eq!(result.sub.score, 20.0);
        assert!(matches!(result.sub.finding, Some(Finding::Penalty(_))));
    }

    #[test]
    fn beyond_global_limit_is_rejected() {
        let mut tech = technician(1);
        tech.service_radius_km = 500.0;
        tech.home_location = Some(north_of_customer(120.0));

        let result = score_distance(&tech, &customer(), 100.0);
        assert_eq!(result.sub.score, 0.0);
        match result.sub.finding {
            Some(Finding::Reject(reason)) => assert!(reason.contains("100 km limit")),
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
