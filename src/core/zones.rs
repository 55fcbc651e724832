use crate::core::{
    distance::{distance_between, round_km},
    filters::{check_zone, matches_state},
};
use crate::models::{DeliveryMatch, DeliveryQuery, DeliveryZone, ZoneCoverage};

/// Evaluate a single delivery zone against a query
///
/// Inactive zones never match. State zones compare the query state
/// case-insensitively; radius zones match when the query location lies
/// within the radius, boundary included. Malformed zones and unknown types
/// are skipped rather than reported.
pub fn match_zone(zone: &DeliveryZone, query: &DeliveryQuery) -> Option<DeliveryMatch> {
    if !zone.is_active {
        return None;
    }

    if let Err(e) = check_zone(zone) {
        tracing::debug!("Skipping zone {}: {}", zone.id, e);
        return None;
    }

    match &zone.coverage {
        ZoneCoverage::State { states } => {
            let state = query.state()?;
            matches_state(states, state).then(|| DeliveryMatch {
                zone: zone.clone(),
                distance_km: None,
            })
        }
        ZoneCoverage::Radius { location, radius } => {
            let (Some(center), Some(radius)) = (*location, *radius) else {
                return None;
            };
            let target = query.location.filter(|l| l.is_valid())?;

            let distance_km = distance_between(&target, &center);
            (distance_km <= radius).then(|| DeliveryMatch {
                zone: zone.clone(),
                distance_km: Some(round_km(distance_km)),
            })
        }
        ZoneCoverage::Unknown => None,
    }
}
