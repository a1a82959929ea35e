//! Join engine.
//!
//! Resolves foreign keys across collections to build the denormalized views in
//! [`crate::views`]. Joins come in two policies:
//!
//! - **strict**: a dangling reference is a `ReferenceNotFound` error. Used for
//!   detail views and the full school list.
//! - **lenient**: a dangling reference degrades to an absent or empty field.
//!   Used for table projections where partial rows are acceptable.
//!
//! The policy is always chosen by the caller, either by picking the named
//! function (`with_location` / `with_location_lenient`) or by passing a
//! [`JoinPolicy`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tapwatch_core::SchoolId;
use tapwatch_store::{
    Activity, Collection, Feedback, InfrastructureProject, Location, Record, School, SchoolScoped,
    TapConnection,
};

use crate::error::{DashboardError, Result};
use crate::views::{
    ConnectionRow, LocationSummary, SchoolDetail, SchoolSummary, SchoolWithLocation,
    SchoolWithOptionalLocation, SchoolWithTapConnection,
};

/// How a join treats a reference that does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Fail with `ReferenceNotFound`.
    Strict,
    /// Fill the missing fields with empty placeholders.
    #[default]
    Lenient,
}

/// Resolves record ids to records.
pub trait Lookup<R: Record> {
    /// Find the record with the given id.
    fn lookup(&self, id: &R::Id) -> Option<&R>;
}

/// An id → record index over a borrowed collection.
///
/// Build it once per collection and reuse it for every join so that joining
/// two collections stays linear in their combined size.
#[derive(Debug)]
pub struct RecordIndex<'a, R: Record> {
    by_id: HashMap<&'a R::Id, &'a R>,
}

impl<'a, R: Record> RecordIndex<'a, R> {
    /// Index `records` by id. If an id repeats, the first record wins.
    #[must_use]
    pub fn new(records: &'a [R]) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for record in records {
            by_id.entry(record.id()).or_insert(record);
        }
        Self { by_id }
    }

    /// Find the record with the given id.
    #[must_use]
    pub fn get(&self, id: &R::Id) -> Option<&'a R> {
        self.by_id.get(id).copied()
    }

    /// Number of distinct ids indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl<R: Record> Lookup<R> for RecordIndex<'_, R> {
    fn lookup(&self, id: &R::Id) -> Option<&R> {
        self.get(id)
    }
}

/// A single fetched record (or nothing) acts as a one-entry lookup.
impl<R: Record> Lookup<R> for Option<R> {
    fn lookup(&self, id: &R::Id) -> Option<&R> {
        self.as_ref().filter(|record| record.id() == id)
    }
}

fn location_not_found(school: &School) -> DashboardError {
    DashboardError::ReferenceNotFound {
        kind: Collection::Locations,
        id: school.location_id.to_string(),
        owner_kind: Collection::Schools,
        owner_id: school.id.to_string(),
    }
}

/// Join a school with its location, failing if the location is missing.
///
/// # Errors
///
/// Returns `DashboardError::ReferenceNotFound` naming the location id and the
/// school id if the location does not resolve.
pub fn with_location(
    school: &School,
    locations: &impl Lookup<Location>,
) -> Result<SchoolWithLocation> {
    let location = locations
        .lookup(&school.location_id)
        .ok_or_else(|| location_not_found(school))?;

    Ok(SchoolWithLocation {
        school: school.clone(),
        location: location.clone(),
    })
}

/// Join a school with its location, leaving it unset if the location is missing.
#[must_use]
pub fn with_location_lenient(
    school: &School,
    locations: &impl Lookup<Location>,
) -> SchoolWithOptionalLocation {
    SchoolWithOptionalLocation {
        school: school.clone(),
        location: locations.lookup(&school.location_id).cloned(),
    }
}

/// Join a school with its tap connection.
///
/// A school without a connection is normal and yields `tap_connection: None`.
///
/// # Errors
///
/// Returns `DashboardError::AmbiguousReference` if more than one connection
/// references the school; the relationship is at most one.
pub fn with_tap_connection(
    school: &School,
    connections: &[TapConnection],
) -> Result<SchoolWithTapConnection> {
    let mut matches = related_by_school(connections, &school.id).into_iter();
    let first = matches.next();
    let extra = matches.count();

    if extra > 0 {
        return Err(DashboardError::AmbiguousReference {
            kind: Collection::TapConnections,
            owner_id: school.id.to_string(),
            count: extra + 1,
        });
    }

    Ok(SchoolWithTapConnection {
        school: school.clone(),
        tap_connection: first.cloned(),
    })
}

/// Project a connection onto its school and the school's town and district.
///
/// # Errors
///
/// Under `JoinPolicy::Strict`, returns `DashboardError::ReferenceNotFound` if
/// the school or its location is missing. Under `JoinPolicy::Lenient` the
/// missing fields become empty strings and this never fails.
pub fn with_school_context(
    connection: &TapConnection,
    schools: &impl Lookup<School>,
    locations: &impl Lookup<Location>,
    policy: JoinPolicy,
) -> Result<ConnectionRow> {
    let school = schools.lookup(&connection.school_id);
    if school.is_none() && policy == JoinPolicy::Strict {
        return Err(DashboardError::ReferenceNotFound {
            kind: Collection::Schools,
            id: connection.school_id.to_string(),
            owner_kind: Collection::TapConnections,
            owner_id: connection.id.to_string(),
        });
    }

    let location = school.and_then(|s| locations.lookup(&s.location_id));
    if let (Some(school), None, JoinPolicy::Strict) = (school, location, policy) {
        return Err(location_not_found(school));
    }

    Ok(ConnectionRow {
        connection: connection.clone(),
        school: SchoolSummary {
            id: school.map(|s| s.id.to_string()).unwrap_or_default(),
            name: school.map(|s| s.name.clone()).unwrap_or_default(),
            location: LocationSummary {
                town_name: location.map(|l| l.town_name.clone()).unwrap_or_default(),
                district_name: location
                    .map(|l| l.district_name.clone())
                    .unwrap_or_default(),
            },
        },
    })
}

/// Join every school with its location, preserving school order.
///
/// Locations are indexed once, so the join is linear in the size of both
/// collections.
///
/// # Errors
///
/// Returns `DashboardError::ReferenceNotFound` for the first school whose
/// location is missing.
pub fn all_schools_with_locations(
    schools: &[School],
    locations: &[Location],
) -> Result<Vec<SchoolWithLocation>> {
    let index = RecordIndex::new(locations);
    schools
        .iter()
        .map(|school| with_location(school, &index))
        .collect()
}

/// Build the connection table: every connection with its school context.
///
/// # Errors
///
/// Only under `JoinPolicy::Strict`; see [`with_school_context`].
pub fn all_connections_with_school_context(
    connections: &[TapConnection],
    schools: &[School],
    locations: &[Location],
    policy: JoinPolicy,
) -> Result<Vec<ConnectionRow>> {
    let schools = RecordIndex::new(schools);
    let locations = RecordIndex::new(locations);
    connections
        .iter()
        .map(|connection| with_school_context(connection, &schools, &locations, policy))
        .collect()
}

/// Every record in `records` that belongs to `school_id`, in input order.
#[must_use]
pub fn related_by_school<'a, R: SchoolScoped>(
    records: &'a [R],
    school_id: &SchoolId,
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| record.school_id() == school_id)
        .collect()
}

/// Assemble the school details view.
///
/// The location join is strict and the connection join rejects duplicates.
/// Related collections may be passed unfiltered; only records belonging to
/// the school are kept.
///
/// # Errors
///
/// Returns `ReferenceNotFound` if the location is missing or
/// `AmbiguousReference` if the school has several connections.
pub fn school_detail(
    school: &School,
    locations: &impl Lookup<Location>,
    connections: &[TapConnection],
    projects: &[InfrastructureProject],
    feedback: &[Feedback],
    activities: &[Activity],
) -> Result<SchoolDetail> {
    let located = with_location(school, locations)?;
    let connected = with_tap_connection(school, connections)?;

    Ok(SchoolDetail {
        school: located.school,
        location: located.location,
        tap_connection: connected.tap_connection,
        projects: related_by_school(projects, &school.id)
            .into_iter()
            .cloned()
            .collect(),
        feedback: related_by_school(feedback, &school.id)
            .into_iter()
            .cloned()
            .collect(),
        activities: related_by_school(activities, &school.id)
            .into_iter()
            .cloned()
            .collect(),
    })
}
