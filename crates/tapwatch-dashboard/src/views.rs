//! Denormalized views built by the join engine.
//!
//! Each view owns copies of the fields it combines; the records in the store
//! are never modified. Views serialize with the joined record flattened at the
//! top level, matching the shapes the dashboard screens consume.

use serde::Serialize;
use tapwatch_core::SchoolId;
use tapwatch_store::{
    Activity, Feedback, InfrastructureProject, Location, School, TapConnection,
    TapConnectionStatus,
};

/// A school joined with its location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolWithLocation {
    /// The school record.
    #[serde(flatten)]
    pub school: School,
    /// The school's location.
    pub location: Location,
}

/// A school joined leniently with its location, which may be missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolWithOptionalLocation {
    /// The school record.
    #[serde(flatten)]
    pub school: School,
    /// The school's location, if it resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// A school joined with its tap connection, if it has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolWithTapConnection {
    /// The school record.
    #[serde(flatten)]
    pub school: School,
    /// The school's connection. Absence is normal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap_connection: Option<TapConnection>,
}

/// Town and district of a school, as shown in the connection table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    /// Town name, empty if the location did not resolve.
    pub town_name: String,
    /// District name, empty if the location did not resolve.
    pub district_name: String,
}

/// Minimal school projection attached to a connection row.
///
/// The id is a plain string because a lenient join fills it with an empty
/// placeholder when the school is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchoolSummary {
    /// School id, empty if the school did not resolve.
    pub id: String,
    /// School name, empty if the school did not resolve.
    pub name: String,
    /// Where the school is.
    pub location: LocationSummary,
}

/// A tap connection with its school context, one row of the connection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionRow {
    /// The connection record. Its `status` is the connection's own status,
    /// not the school's.
    #[serde(flatten)]
    pub connection: TapConnection,
    /// The owning school.
    pub school: SchoolSummary,
}

impl ConnectionRow {
    /// Whether the school leg of the join resolved.
    #[must_use]
    pub fn has_school(&self) -> bool {
        !self.school.id.is_empty()
    }
}

/// Everything the school details screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDetail {
    /// The school record.
    #[serde(flatten)]
    pub school: School,
    /// The school's location.
    pub location: Location,
    /// The school's tap connection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap_connection: Option<TapConnection>,
    /// Projects at the school, in store order.
    pub projects: Vec<InfrastructureProject>,
    /// Feedback from the school, in store order.
    pub feedback: Vec<Feedback>,
    /// Activity log entries for the school, in store order.
    pub activities: Vec<Activity>,
}

/// A point on the schools map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    /// The school the marker stands for.
    pub school_id: SchoolId,
    /// School name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// The school's own tap-connection status, used to colour the marker.
    pub tap_connection_status: TapConnectionStatus,
}
