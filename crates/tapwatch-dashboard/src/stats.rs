//! Aggregation engine.
//!
//! Scalar dashboard metrics and fixed-order status breakdowns. These are pure
//! counts: none of them divide, so an empty collection simply yields zeros.
//! Percentages are left to the caller.

use serde::Serialize;
use tapwatch_store::{
    InfrastructureProject, ProjectStatus, School, SchoolStatus, TapConnectionStatus,
};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// All schools.
    pub total_schools: usize,
    /// Schools with `status == Active`.
    pub active_schools: usize,
    /// Schools whose own tap status is `Connected`.
    pub connected_taps: usize,
    /// Schools whose own tap status is `Pending`.
    pub pending_taps: usize,
    /// Schools whose own tap status is `Rejected`.
    pub rejected_taps: usize,
    /// Schools whose own tap status is `Not Required`.
    pub not_required_taps: usize,
    /// All infrastructure projects.
    pub total_projects: usize,
    /// Projects with `status == Completed`.
    pub completed_projects: usize,
}

impl DashboardStats {
    /// Sum of the four tap-status counts. Always equals `total_schools`.
    #[must_use]
    pub const fn tap_counts_total(&self) -> usize {
        self.connected_taps + self.pending_taps + self.rejected_taps + self.not_required_taps
    }
}

/// Number of records in one status category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount<S> {
    /// The category.
    pub status: S,
    /// Records in the category.
    pub count: usize,
}

/// Compute the headline dashboard numbers.
///
/// Tap counts are taken from each school's own `tap_connection_status`, not
/// from the tap-connection records.
#[must_use]
pub fn dashboard_stats(schools: &[School], projects: &[InfrastructureProject]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_schools: schools.len(),
        total_projects: projects.len(),
        ..DashboardStats::default()
    };

    for school in schools {
        if school.status == SchoolStatus::Active {
            stats.active_schools += 1;
        }
        match school.tap_connection_status {
            TapConnectionStatus::Connected => stats.connected_taps += 1,
            TapConnectionStatus::Pending => stats.pending_taps += 1,
            TapConnectionStatus::Rejected => stats.rejected_taps += 1,
            TapConnectionStatus::NotRequired => stats.not_required_taps += 1,
        }
    }

    stats.completed_projects = projects
        .iter()
        .filter(|project| project.status == ProjectStatus::Completed)
        .count();

    stats
}

fn count_by<T, S: Copy + PartialEq>(
    records: &[T],
    order: &[S],
    status_of: impl Fn(&T) -> S,
) -> Vec<StatusCount<S>> {
    let mut counts: Vec<StatusCount<S>> = order
        .iter()
        .map(|&status| StatusCount { status, count: 0 })
        .collect();

    for record in records {
        let status = status_of(record);
        if let Some(entry) = counts.iter_mut().find(|entry| entry.status == status) {
            entry.count += 1;
        }
    }
    counts
}

/// Schools per tap-connection status for the status chart.
///
/// Always four entries, in the order Connected, Pending, Rejected,
/// Not Required, including categories with a zero count.
#[must_use]
pub fn connection_status_counts(schools: &[School]) -> Vec<StatusCount<TapConnectionStatus>> {
    count_by(schools, &TapConnectionStatus::ORDERED, |school| {
        school.tap_connection_status
    })
}

/// Projects per status.
///
/// Always four entries, in the order Planned, In Progress, Completed,
/// Cancelled, including categories with a zero count.
#[must_use]
pub fn project_status_counts(
    projects: &[InfrastructureProject],
) -> Vec<StatusCount<ProjectStatus>> {
    count_by(projects, &ProjectStatus::ORDERED, |project| project.status)
}
