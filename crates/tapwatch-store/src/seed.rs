//! One-time seeding of an empty store.
//!
//! Seeding is external setup: the dashboard never writes. A seed file carries
//! all seven collections under their camelCase collection names.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::types::{
    Activity, Collection, Feedback, InfrastructureProject, Location, Record, Registration, School,
    TapConnection,
};
use crate::RecordStore;

/// A full set of collections used to populate a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    /// Location records.
    #[serde(default)]
    pub locations: Vec<Location>,
    /// School records.
    #[serde(default)]
    pub schools: Vec<School>,
    /// Tap connection records.
    #[serde(default)]
    pub tap_connections: Vec<TapConnection>,
    /// Infrastructure project records.
    #[serde(default)]
    pub infrastructure_projects: Vec<InfrastructureProject>,
    /// Registration records.
    #[serde(default)]
    pub registrations: Vec<Registration>,
    /// Feedback records.
    #[serde(default)]
    pub feedbacks: Vec<Feedback>,
    /// Activity log entries.
    #[serde(default, alias = "activities")]
    pub recent_activities: Vec<Activity>,
}

impl SeedData {
    /// Parse seed data from JSON.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the JSON is malformed or a record
    /// fails to deserialize.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Total number of records across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
            + self.schools.len()
            + self.tap_connections.len()
            + self.infrastructure_projects.len()
            + self.registrations.len()
            + self.feedbacks.len()
            + self.recent_activities.len()
    }

    /// Whether the seed carries no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn put_all<S: RecordStore, R: Record>(store: &S, records: &[R]) -> Result<()> {
    for record in records {
        store.put(record)?;
    }
    tracing::debug!(collection = %R::COLLECTION, count = records.len(), "Seeded collection");
    Ok(())
}

/// Populate `store` from `seed` if its schools collection is empty.
///
/// Referenced collections are written before the collections that reference
/// them. Returns `true` if the store was seeded, `false` if it already held
/// schools and was left untouched.
///
/// # Errors
///
/// Returns an error if any write fails. Records written before the failure
/// are not rolled back.
pub fn seed_if_empty<S: RecordStore>(store: &S, seed: &SeedData) -> Result<bool> {
    if !store.is_empty(Collection::Schools)? {
        tracing::info!("Store already contains schools, skipping seed");
        return Ok(false);
    }

    tracing::info!(records = seed.len(), "Seeding empty store");
    put_all(store, &seed.locations)?;
    put_all(store, &seed.schools)?;
    put_all(store, &seed.tap_connections)?;
    put_all(store, &seed.infrastructure_projects)?;
    put_all(store, &seed.registrations)?;
    put_all(store, &seed.feedbacks)?;
    put_all(store, &seed.recent_activities)?;
    tracing::info!("Seeding complete");

    Ok(true)
}
