use crate::core::zones::match_zone;
use crate::models::{DeliveryMatch, DeliveryQuery, DeliveryResolution, DeliveryZone};

/// Delivery-zone resolution orchestrator
///
/// # Pipeline Stages
/// 1. Drop inactive zones
/// 2. Match each remaining zone against the query
/// 3. Rank matches by cost, keeping input order for equal costs
/// 4. Pick the cheapest
///
/// A query with neither location nor state, or an empty zone set, resolves
/// to "not available" rather than an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneResolver;

impl ZoneResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve which of a store's zones deliver to `query`
    ///
    /// # Arguments
    /// * `zones` - The store's zone set, read-only
    /// * `query` - Delivery location and/or state
    ///
    /// # Returns
    /// All matching zones sorted by cost, plus the cheapest
    pub fn resolve(&self, zones: &[DeliveryZone], query: &DeliveryQuery) -> DeliveryResolution {
        let mut matches: Vec<DeliveryMatch> = zones
            .iter()
            // Stage 1: activity
            .filter(|zone| zone.is_active)
            // Stage 2: type-specific match
            .filter_map(|zone| match_zone(zone, query))
            .collect();

        // Stage 3: `sort_by` is stable, so equal costs keep zone order
        matches.sort_by(|a, b| a.zone.cost.total_cmp(&b.zone.cost));

        tracing::trace!(
            "Resolved {} of {} zones (location: {}, state: {})",
            matches.len(),
            zones.len(),
            query.location.is_some(),
            query.state().is_some()
        );

        // Stage 4: cheapest
        let cheapest = matches.first().cloned();

        DeliveryResolution {
            available: !matches.is_empty(),
            zones: matches,
            cheapest,
        }
    }
}
