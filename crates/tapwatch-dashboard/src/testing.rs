//! Record builders shared by the unit tests.

use chrono::NaiveDate;
use tapwatch_core::{
    ActivityId, FeedbackId, LocationId, ProjectId, SchoolId, TapConnectionId,
};
use tapwatch_store::{
    Activity, ActivityType, Feedback, InfrastructureProject, Location, ProjectStatus, ProjectType,
    School, SchoolCategory, SchoolStatus, TapConnection, TapConnectionStatus, WaterSourceType,
};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn location(id: &str, town: &str, district: &str) -> Location {
    Location {
        id: LocationId::new(id).unwrap(),
        state_name: "Karnataka".to_string(),
        district_name: district.to_string(),
        town_name: town.to_string(),
        street_name: "Main Road".to_string(),
        pincode: "560001".to_string(),
        latitude: 12.97,
        longitude: 77.59,
    }
}

pub fn school(id: &str, location_id: &str, name: &str, status: TapConnectionStatus) -> School {
    School {
        id: SchoolId::new(id).unwrap(),
        location_id: LocationId::new(location_id).unwrap(),
        name: name.to_string(),
        number_of_students: 100,
        category: SchoolCategory::Primary,
        status: SchoolStatus::Active,
        tap_connection_status: status,
        update_date: date("2023-10-15"),
    }
}

pub fn connection(
    id: &str,
    school_id: &str,
    status: TapConnectionStatus,
    connection_date: Option<&str>,
) -> TapConnection {
    TapConnection {
        id: TapConnectionId::new(id).unwrap(),
        school_id: SchoolId::new(school_id).unwrap(),
        connection_date: connection_date.map(date),
        status,
        water_source_type: Some(WaterSourceType::Borewell),
        last_inspection_date: None,
    }
}

pub fn project(id: &str, school_id: &str, status: ProjectStatus) -> InfrastructureProject {
    InfrastructureProject {
        id: ProjectId::new(id).unwrap(),
        school_id: SchoolId::new(school_id).unwrap(),
        project_type: ProjectType::TapConnection,
        status,
        start_date: date("2023-01-10"),
        completion_date: None,
    }
}

pub fn feedback(id: &str, school_id: &str, rating: u8) -> Feedback {
    Feedback {
        id: FeedbackId::new(id).unwrap(),
        school_id: SchoolId::new(school_id).unwrap(),
        feedback_text: "Water supply is regular".to_string(),
        rating,
        submitted_date: date("2023-09-01"),
    }
}

pub fn activity(id: &str, school_id: &str, on: &str) -> Activity {
    Activity {
        id: ActivityId::new(id).unwrap(),
        activity_type: ActivityType::Inspection,
        school_id: SchoolId::new(school_id).unwrap(),
        school_name: "School".to_string(),
        date: date(on),
        description: "Routine inspection".to_string(),
        status: None,
    }
}
