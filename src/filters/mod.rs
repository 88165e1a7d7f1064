//! Client-side narrowing of a property list.
//!
//! All active clauses are AND-combined. Pure logic: no I/O, safe to re-run on
//! every criteria change.

pub mod debounce;

pub use debounce::{debouncer, DebounceHandle, Debouncer};

use crate::models::Property;
use std::collections::HashSet;

/// User-selected constraints on the displayed listings
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Allowed property types (empty = all)
    pub property_types: HashSet<String>,
    /// Inclusive (min, max) monthly rent
    pub price_range: (f64, f64),
    /// Minimum bedrooms (0 = no restriction)
    pub bedrooms: u32,
    /// Minimum bathrooms (0 = no restriction)
    pub bathrooms: u32,
    /// Amenities that must all be present (empty = no restriction)
    pub amenities: HashSet<String>,
    /// Allowed place types (empty = all)
    pub place_types: HashSet<String>,
    /// Case-insensitive substring matched against title and location
    pub search_text: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            property_types: HashSet::new(),
            price_range: (0.0, f64::INFINITY),
            bedrooms: 0,
            bathrooms: 0,
            amenities: HashSet::new(),
            place_types: HashSet::new(),
            search_text: String::new(),
        }
    }
}

impl FilterCriteria {
    /// Returns true if no clause restricts the list.
    pub fn is_default(&self) -> bool {
        let default = Self::default();
        self.property_types.is_empty()
            && self.price_range == default.price_range
            && self.bedrooms == 0
            && self.bathrooms == 0
            && self.amenities.is_empty()
            && self.place_types.is_empty()
            && self.search_text.is_empty()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = (min, max);
        self
    }

    pub fn with_min_bedrooms(mut self, bedrooms: u32) -> Self {
        self.bedrooms = bedrooms;
        self
    }

    pub fn with_min_bathrooms(mut self, bathrooms: u32) -> Self {
        self.bathrooms = bathrooms;
        self
    }

    pub fn with_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_types.insert(property_type.into());
        self
    }

    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenities.insert(amenity.into());
        self
    }

    pub fn with_place_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_types.insert(place_type.into());
        self
    }
}

/// Properties satisfying every active clause, in input order.
pub fn apply(properties: &[Property], criteria: &FilterCriteria) -> Vec<Property> {
    apply_indices(properties, criteria)
        .into_iter()
        .map(|idx| properties[idx].clone())
        .collect()
}

/// Indices into `properties` of the entries that pass, in ascending order.
pub fn apply_indices(properties: &[Property], criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_default() {
        return (0..properties.len()).collect();
    }

    let search_lower = criteria.search_text.to_lowercase();

    properties
        .iter()
        .enumerate()
        .filter(|(_, property)| matches_all(property, criteria, &search_lower))
        .map(|(idx, _)| idx)
        .collect()
}

/// Number of matches, for the "Show N properties" button
pub fn count(properties: &[Property], criteria: &FilterCriteria) -> usize {
    if criteria.is_default() {
        return properties.len();
    }

    let search_lower = criteria.search_text.to_lowercase();
    properties
        .iter()
        .filter(|property| matches_all(property, criteria, &search_lower))
        .count()
}

fn matches_all(property: &Property, criteria: &FilterCriteria, search_lower: &str) -> bool {
    // Free-text search
    if !search_lower.is_empty()
        && !property.title.to_lowercase().contains(search_lower)
        && !property.location.to_lowercase().contains(search_lower)
    {
        return false;
    }

    // Property type
    if !criteria.property_types.is_empty()
        && !criteria.property_types.contains(&property.property_type)
    {
        return false;
    }

    // Price range (inclusive; min > max and NaN prices match nothing)
    let (min_price, max_price) = criteria.price_range;
    if !(min_price..=max_price).contains(&property.price) {
        return false;
    }

    if criteria.bedrooms > 0 && property.bedrooms < criteria.bedrooms {
        return false;
    }

    if criteria.bathrooms > 0 && property.bathrooms < criteria.bathrooms {
        return false;
    }

    // Amenities: every requested one must be listed
    if !criteria.amenities.is_empty()
        && !criteria
            .amenities
            .iter()
            .all(|wanted| property.amenities.iter().any(|have| have == wanted))
    {
        return false;
    }

    // Place type only narrows listings that declare one
    if !criteria.place_types.is_empty() {
        if let Some(place_type) = &property.place_type {
            if !criteria.place_types.contains(place_type) {
                return false;
            }
        }
    }

    true
}
