//! Map and activity-feed derivations for the overview screens.

use tapwatch_store::Activity;

use crate::views::{MapMarker, SchoolWithLocation};

/// Map markers for every school with usable coordinates.
///
/// A latitude or longitude of exactly zero marks an ungeocoded location, so
/// such schools are left off the map. Input order is preserved.
#[must_use]
pub fn map_markers(schools: &[SchoolWithLocation]) -> Vec<MapMarker> {
    schools
        .iter()
        .filter(|row| row.location.latitude != 0.0 && row.location.longitude != 0.0)
        .map(|row| MapMarker {
            school_id: row.school.id.clone(),
            name: row.school.name.clone(),
            latitude: row.location.latitude,
            longitude: row.location.longitude,
            tap_connection_status: row.school.tap_connection_status,
        })
        .collect()
}

/// The first `limit` activities in store order.
#[must_use]
pub fn recent_activities(activities: &[Activity], limit: usize) -> Vec<&Activity> {
    activities.iter().take(limit).collect()
}
