//! Opt-in record validation.
//!
//! Records are read as stored; nothing here runs unless the service is
//! configured with `validate_records`.

use tapwatch_store::{Feedback, Location, Record};

use crate::error::{DashboardError, Result};

/// Lowest accepted feedback rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted feedback rating.
pub const MAX_RATING: u8 = 5;

fn malformed<R: Record>(record: &R, reason: String) -> DashboardError {
    DashboardError::MalformedRecord {
        kind: R::COLLECTION,
        id: record.id().to_string(),
        reason,
    }
}

/// Check that a feedback rating lies in `1..=5`.
///
/// # Errors
///
/// Returns `DashboardError::MalformedRecord` if it does not.
pub fn validate_feedback(feedback: &Feedback) -> Result<()> {
    if (MIN_RATING..=MAX_RATING).contains(&feedback.rating) {
        Ok(())
    } else {
        Err(malformed(
            feedback,
            format!(
                "rating {} outside {MIN_RATING}..={MAX_RATING}",
                feedback.rating
            ),
        ))
    }
}

/// Check that a location's coordinates are finite and in range.
///
/// # Errors
///
/// Returns `DashboardError::MalformedRecord` naming the bad coordinate.
pub fn validate_location(location: &Location) -> Result<()> {
    let Location {
        latitude,
        longitude,
        ..
    } = *location;

    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(malformed(location, format!("latitude {latitude} out of range")));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(malformed(
            location,
            format!("longitude {longitude} out of range"),
        ));
    }
    Ok(())
}

/// Validate every record in `records`, stopping at the first failure.
///
/// # Errors
///
/// Returns the first `MalformedRecord` found.
pub fn validate_all<R>(records: &[R], check: impl Fn(&R) -> Result<()>) -> Result<()> {
    records.iter().try_for_each(check)
}
