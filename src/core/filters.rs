use std::collections::HashSet;

use crate::core::error::DeliveryError;
use crate::models::{DeliveryQuery, DeliveryZone, Product, ProductFilters, ZoneCoverage};

/// Check that a zone's type-specific fields can be matched against.
///
/// Activity is not considered here; an inactive zone can be well formed.
pub fn check_zone(zone: &DeliveryZone) -> Result<(), DeliveryError> {
    match &zone.coverage {
        ZoneCoverage::State { states } => {
            if states.iter().all(|s| s.trim().is_empty()) {
                return Err(DeliveryError::invalid(format!(
                    "zone '{}' has no states",
                    zone.id
                )));
            }
        }
        ZoneCoverage::Radius { location, radius } => {
            let location = location.ok_or_else(|| {
                DeliveryError::invalid(format!("zone '{}' is missing a location", zone.id))
            })?;
            if !location.is_valid() {
                return Err(DeliveryError::invalid(format!(
                    "zone '{}' has an out-of-range location",
                    zone.id
                )));
            }
            match radius {
                Some(r) if r.is_finite() && *r > 0.0 => {}
                Some(r) => {
                    return Err(DeliveryError::invalid(format!(
                        "zone '{}' has a non-positive radius {}",
                        zone.id, r
                    )))
                }
                None => {
                    return Err(DeliveryError::invalid(format!(
                        "zone '{}' is missing a radius",
                        zone.id
                    )))
                }
            }
        }
        ZoneCoverage::Unknown => {
            return Err(DeliveryError::invalid(format!(
                "zone '{}' has an unsupported delivery type",
                zone.id
            )));
        }
    }

    Ok(())
}

/// Validate a full zone set before it is stored
///
/// Ids must be non-empty and unique within the set, names non-empty and
/// costs finite and non-negative, on top of the per-type checks.
pub fn validate_zone_set(zones: &[DeliveryZone]) -> Result<(), DeliveryError> {
    let mut seen = HashSet::with_capacity(zones.len());

    for zone in zones {
        if zone.id.trim().is_empty() {
            return Err(DeliveryError::invalid("zone id must not be empty"));
        }
        if !seen.insert(zone.id.as_str()) {
            return Err(DeliveryError::invalid(format!("duplicate zone id '{}'", zone.id)));
        }
        if zone.name.trim().is_empty() {
            return Err(DeliveryError::invalid(format!("zone '{}' has no name", zone.id)));
        }
        if !zone.cost.is_finite() || zone.cost < 0.0 {
            return Err(DeliveryError::invalid(format!(
                "zone '{}' has an invalid cost {}",
                zone.id, zone.cost
            )));
        }
        check_zone(zone)?;
    }

    Ok(())
}

/// Case-insensitive state name comparison, ignoring surrounding whitespace
#[inline]
pub fn matches_state(states: &[String], state: &str) -> bool {
    let state = state.trim().to_lowercase();
    !state.is_empty() && states.iter().any(|s| s.trim().to_lowercase() == state)
}

impl DeliveryQuery {
    /// Reject out-of-range coordinates.
    ///
    /// A query with neither location nor state is valid; it just matches
    /// nothing.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        match self.location {
            Some(location) if !location.is_valid() => Err(DeliveryError::invalid(format!(
                "location ({}, {}) is out of range",
                location.latitude, location.longitude
            ))),
            _ => Ok(()),
        }
    }

    /// Trimmed, non-empty state
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

impl ProductFilters {
    /// In-memory equivalent of the catalog query's filter clause
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }

        if let Some(min_price) = self.min_price {
            if product.price < min_price {
                return false;
            }
        }

        if let Some(max_price) = self.max_price {
            if product.price > max_price {
                return false;
            }
        }

        if let Some(min_rating) = self.min_rating {
            if product.rating < min_rating {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&needle);
            let in_description = product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_name && !in_description {
                return false;
            }
        }

        true
    }
}
