//! Training venues (spec.md §3 "Venue").

use crate::error::CoreError;

/// A physical or virtual training venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    /// Company the venue belongs to.
    pub company: String,
    /// Unique (per company) venue name.
    pub name: String,
    /// Maximum simultaneous occupancy, after `buffer_capacity` has been
    /// added by the caller.
    pub capacity: u32,
    /// Virtual venues are dis-preferred by the scheduling objective (§4.5).
    pub is_virtual: bool,
}

impl Venue {
    /// Builds a venue, rejecting a non-positive capacity per spec.md §3's
    /// invariant ("Capacity is a positive integer").
    pub fn new(company: impl Into<String>, name: impl Into<String>, capacity: i64, is_virtual: bool) -> Result<Self, CoreError> {
        let name = name.into();
        if capacity <= 0 {
            return Err(CoreError::NonPositiveCapacity { name, capacity });
        }
        Ok(Self { company: company.into(), name, capacity: capacity as u32, is_virtual })
    }
}

/// Validates that no two venues of the same company share a name, per
/// spec.md §3 ("`name` unique").
pub fn validate_unique_venue_names(venues: &[Venue]) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::new();
    for venue in venues {
        let key = (venue.company.as_str(), venue.name.as_str());
        if !seen.insert(key) {
            return Err(CoreError::DuplicateVenueName { company: venue.company.clone(), name: venue.name.clone() });
        }
    }
    Ok(())
}
