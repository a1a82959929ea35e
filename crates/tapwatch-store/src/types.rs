//! Domain types stored in the record store.
//!
//! These types represent the seven record kinds of the dashboard. Field names
//! serialize in camelCase and enum variants serialize as their display labels,
//! so seed files written by the web dashboard load unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tapwatch_core::{
    ActivityId, CoreError, FeedbackId, LocationId, ProjectId, RecordId, RegistrationId, SchoolId,
    TapConnectionId,
};

/// The seven named collections held by a record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum Collection {
    /// Physical addresses and coordinates.
    Locations = 1,
    /// Registered schools.
    Schools = 2,
    /// Water-tap connections, at most one per school.
    TapConnections = 3,
    /// Infrastructure projects run at a school.
    InfrastructureProjects = 4,
    /// Programme registrations.
    Registrations = 5,
    /// Free-text feedback with a rating.
    Feedbacks = 6,
    /// Activity log entries.
    Activities = 7,
}

impl Collection {
    /// Every collection, in seeding order (referenced kinds first).
    pub const ALL: [Self; 7] = [
        Self::Locations,
        Self::Schools,
        Self::TapConnections,
        Self::InfrastructureProjects,
        Self::Registrations,
        Self::Feedbacks,
        Self::Activities,
    ];

    /// Convert the collection to its numeric tag.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Try to convert a numeric tag to a `Collection`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Locations),
            2 => Some(Self::Schools),
            3 => Some(Self::TapConnections),
            4 => Some(Self::InfrastructureProjects),
            5 => Some(Self::Registrations),
            6 => Some(Self::Feedbacks),
            7 => Some(Self::Activities),
            _ => None,
        }
    }

    /// The collection name used by seed files and log output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Locations => "locations",
            Self::Schools => "schools",
            Self::TapConnections => "tapConnections",
            Self::InfrastructureProjects => "infrastructureProjects",
            Self::Registrations => "registrations",
            Self::Feedbacks => "feedbacks",
            Self::Activities => "activities",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A foreign-key value pointing at another collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForeignKey {
    /// `School.locationId` → `Location`.
    Location(LocationId),
    /// `*.schoolId` → `School`.
    School(SchoolId),
}

impl ForeignKey {
    /// The field name carrying this key on the referencing record.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Location(_) => "locationId",
            Self::School(_) => "schoolId",
        }
    }

    /// The collection the key points into.
    #[must_use]
    pub const fn target(&self) -> Collection {
        match self {
            Self::Location(_) => Collection::Locations,
            Self::School(_) => Collection::Schools,
        }
    }

    /// The referenced identifier as a string.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Location(id) => id.as_str(),
            Self::School(id) => id.as_str(),
        }
    }
}

/// A record that lives in one of the store's collections.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The identifier type of this record kind.
    type Id: RecordId;

    /// The collection holding records of this kind.
    const COLLECTION: Collection;

    /// The record's unique identifier.
    fn id(&self) -> &Self::Id;

    /// The record's outgoing foreign key, if its kind has one.
    fn foreign_key(&self) -> Option<ForeignKey>;
}

/// A record that belongs to exactly one school.
pub trait SchoolScoped: Record {
    /// The owning school.
    fn school_id(&self) -> &SchoolId;
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The display label, identical to the serialized form.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| CoreError::UnknownLabel {
                        kind: $kind,
                        label: s.to_string(),
                    })
            }
        }
    };
}

labelled_enum! {
    /// Education level served by a school.
    SchoolCategory, "school category" {
        /// Primary school.
        Primary => "Primary",
        /// Secondary school.
        Secondary => "Secondary",
        /// Higher secondary school.
        HigherSecondary => "Higher Secondary",
    }
}

labelled_enum! {
    /// Whether a school is operating.
    SchoolStatus, "school status" {
        /// Operating.
        Active => "Active",
        /// Closed or suspended.
        Inactive => "Inactive",
    }
}

labelled_enum! {
    /// Tap-connection status, carried both by schools and by connections.
    TapConnectionStatus, "tap connection status" {
        /// Water is flowing.
        Connected => "Connected",
        /// Awaiting installation.
        Pending => "Pending",
        /// Application rejected.
        Rejected => "Rejected",
        /// The school has another water supply.
        NotRequired => "Not Required",
    }
}

labelled_enum! {
    /// Water source feeding a tap connection.
    WaterSourceType, "water source type" {
        /// Borewell.
        Borewell => "Borewell",
        /// Municipal supply.
        Municipality => "Municipality",
        /// Hand pump.
        HandPump => "Hand Pump",
    }
}

labelled_enum! {
    /// Progress of an infrastructure project.
    ProjectStatus, "project status" {
        /// Not started.
        Planned => "Planned",
        /// Work under way.
        InProgress => "In Progress",
        /// Finished.
        Completed => "Completed",
        /// Abandoned.
        Cancelled => "Cancelled",
    }
}

labelled_enum! {
    /// Kind of infrastructure work.
    ProjectType, "project type" {
        /// Water tap installation.
        TapConnection => "Tap Connection",
        /// Toilets and washrooms.
        Sanitation => "Sanitation",
        /// Electrical supply.
        Electricity => "Electricity",
        /// Classroom repairs.
        ClassroomRenovation => "Classroom Renovation",
        /// Desks and benches.
        Furniture => "Furniture",
    }
}

labelled_enum! {
    /// Outcome of a programme registration.
    ApprovalStatus, "approval status" {
        /// Accepted into the programme.
        Approved => "Approved",
        /// Under review.
        Pending => "Pending",
        /// Turned down.
        Rejected => "Rejected",
    }
}

labelled_enum! {
    /// Kind of activity log entry.
    ActivityType, "activity type" {
        /// A school registered.
        Registration => "Registration",
        /// A tap was connected.
        Connection => "Connection",
        /// A connection was inspected.
        Inspection => "Inspection",
        /// Project milestone.
        Project => "Project",
        /// Feedback was submitted.
        Feedback => "Feedback",
    }
}

impl TapConnectionStatus {
    /// The four statuses in the fixed chart order.
    pub const ORDERED: [Self; 4] = [
        Self::Connected,
        Self::Pending,
        Self::Rejected,
        Self::NotRequired,
    ];
}

impl ProjectStatus {
    /// The four statuses in the fixed chart order.
    pub const ORDERED: [Self; 4] = [
        Self::Planned,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];
}

/// A physical location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Unique identifier.
    pub id: LocationId,
    /// State name.
    pub state_name: String,
    /// District name.
    pub district_name: String,
    /// Town name.
    pub town_name: String,
    /// Street name.
    pub street_name: String,
    /// Postal code.
    pub pincode: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// A school registered in the programme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    /// Unique identifier.
    pub id: SchoolId,
    /// Location of the school.
    pub location_id: LocationId,
    /// School name.
    pub name: String,
    /// Enrolled students.
    pub number_of_students: u32,
    /// Education level.
    pub category: SchoolCategory,
    /// Operating status.
    pub status: SchoolStatus,
    /// The school's own view of its tap connection. Dashboard counts read this
    /// field; it is never synchronised with `TapConnection::status`.
    pub tap_connection_status: TapConnectionStatus,
    /// Last modification date.
    pub update_date: NaiveDate,
}

/// A water-tap connection for a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TapConnection {
    /// Unique identifier.
    pub id: TapConnectionId,
    /// Owning school.
    pub school_id: SchoolId,
    /// Date the tap went live.
    pub connection_date: Option<NaiveDate>,
    /// Connection status as recorded on the connection itself.
    pub status: TapConnectionStatus,
    /// Water source, unknown until surveyed.
    pub water_source_type: Option<WaterSourceType>,
    /// Most recent inspection.
    pub last_inspection_date: Option<NaiveDate>,
}

/// An infrastructure project at a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureProject {
    /// Unique identifier.
    pub id: ProjectId,
    /// Owning school.
    pub school_id: SchoolId,
    /// Kind of work.
    pub project_type: ProjectType,
    /// Progress.
    pub status: ProjectStatus,
    /// Start date.
    pub start_date: NaiveDate,
    /// Completion date, if finished.
    pub completion_date: Option<NaiveDate>,
}

/// A school's registration in the programme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Unique identifier.
    pub id: RegistrationId,
    /// Registering school.
    pub school_id: SchoolId,
    /// Date of registration.
    pub registration_date: NaiveDate,
    /// Approval outcome.
    pub approval_status: ApprovalStatus,
}

/// Feedback submitted by a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Unique identifier.
    pub id: FeedbackId,
    /// Submitting school.
    pub school_id: SchoolId,
    /// Free-text body.
    pub feedback_text: String,
    /// Rating, 1 to 5 by convention. Not validated on read.
    pub rating: u8,
    /// Submission date.
    pub submitted_date: NaiveDate,
}

/// An activity log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique identifier.
    pub id: ActivityId,
    /// Kind of activity.
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// School the activity concerns.
    pub school_id: SchoolId,
    /// The school's name at the time of the activity. This is a snapshot and
    /// may drift from the live `School::name`.
    pub school_name: String,
    /// Date of the activity.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Optional status label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Record for Location {
    type Id = LocationId;
    const COLLECTION: Collection = Collection::Locations;

    fn id(&self) -> &LocationId {
        &self.id
    }

    fn foreign_key(&self) -> Option<ForeignKey> {
        None
    }
}

impl Record for School {
    type Id = SchoolId;
    const COLLECTION: Collection = Collection::Schools;

    fn id(&self) -> &SchoolId {
        &self.id
    }

    fn foreign_key(&self) -> Option<ForeignKey> {
        Some(ForeignKey::Location(self.location_id.clone()))
    }
}

macro_rules! school_scoped {
    ($ty:ty, $id:ty, $collection:expr) => {
        impl Record for $ty {
            type Id = $id;
            const COLLECTION: Collection = $collection;

            fn id(&self) -> &$id {
                &self.id
            }

            fn foreign_key(&self) -> Option<ForeignKey> {
                Some(ForeignKey::School(self.school_id.clone()))
            }
        }

        impl SchoolScoped for $ty {
            fn school_id(&self) -> &SchoolId {
                &self.school_id
            }
        }
    };
}

school_scoped!(TapConnection, TapConnectionId, Collection::TapConnections);
school_scoped!(
    InfrastructureProject,
    ProjectId,
    Collection::InfrastructureProjects
);
school_scoped!(Registration, RegistrationId, Collection::Registrations);
school_scoped!(Feedback, FeedbackId, Collection::Feedbacks);
school_scoped!(Activity, ActivityId, Collection::Activities);
