//! Dashboard service implementation.
//!
//! This module provides the `Dashboard` trait and the `DashboardService`
//! implementation that reads a snapshot from the record store and runs it
//! through the join, aggregation and query engines.

use std::sync::Arc;

use async_trait::async_trait;
use tapwatch_core::SchoolId;
use tapwatch_store::{
    Activity, Collection, Feedback, ForeignKey, InfrastructureProject, Location, ProjectStatus,
    RecordStore, School, TapConnection, TapConnectionStatus,
};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::join;
use crate::overview;
use crate::query::{ConnectionQuery, SchoolQuery};
use crate::stats::{self, DashboardStats, StatusCount};
use crate::validate;
use crate::views::{
    ConnectionRow, MapMarker, SchoolDetail, SchoolWithLocation, SchoolWithTapConnection,
};

/// Trait defining the dashboard read operations.
///
/// Every call takes its own snapshot of the store; nothing is cached between
/// calls.
#[async_trait]
pub trait Dashboard: Send + Sync {
    // =========================================================================
    // Summary
    // =========================================================================

    /// Headline counts for the dashboard.
    async fn dashboard_stats(&self) -> Result<DashboardStats>;

    /// Schools per tap status, always four entries in chart order.
    async fn connection_status_counts(&self) -> Result<Vec<StatusCount<TapConnectionStatus>>>;

    /// Projects per status, always four entries in chart order.
    async fn project_status_counts(&self) -> Result<Vec<StatusCount<ProjectStatus>>>;

    // =========================================================================
    // Single school
    // =========================================================================

    /// Get a school joined with its location.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::RecordNotFound` if the school doesn't exist.
    /// Returns `DashboardError::ReferenceNotFound` if its location is missing.
    async fn school_with_location(&self, school_id: &SchoolId) -> Result<SchoolWithLocation>;

    /// Get a school joined with its tap connection, if any.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::RecordNotFound` if the school doesn't exist.
    /// Returns `DashboardError::AmbiguousReference` if several connections
    /// reference it.
    async fn school_with_tap_connection(
        &self,
        school_id: &SchoolId,
    ) -> Result<SchoolWithTapConnection>;

    /// Everything the school details screen shows.
    ///
    /// # Errors
    ///
    /// Fails like [`school_with_location`](Self::school_with_location) and
    /// [`school_with_tap_connection`](Self::school_with_tap_connection).
    async fn school_detail(&self, school_id: &SchoolId) -> Result<SchoolDetail>;

    // =========================================================================
    // Tables
    // =========================================================================

    /// The schools table after search, filters and sort.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::ReferenceNotFound` if any school's location is
    /// missing.
    async fn schools(&self, query: &SchoolQuery) -> Result<Vec<SchoolWithLocation>>;

    /// The tap connections table after search, filters and sort.
    ///
    /// Missing schools and locations are handled by the configured
    /// `connection_join_policy`.
    async fn connections(&self, query: &ConnectionQuery) -> Result<Vec<ConnectionRow>>;

    // =========================================================================
    // Overview
    // =========================================================================

    /// Markers for the schools map.
    async fn map_markers(&self) -> Result<Vec<MapMarker>>;

    /// The recent activity feed, `recent_activity_limit` entries at most.
    async fn recent_activities(&self) -> Result<Vec<Activity>>;
}

/// The main dashboard service implementation.
pub struct DashboardService<S: RecordStore> {
    store: Arc<S>,
    config: DashboardConfig,
}

impl<S: RecordStore> DashboardService<S> {
    /// Create a new dashboard service.
    #[must_use]
    pub fn new(store: Arc<S>, config: DashboardConfig) -> Self {
        Self { store, config }
    }

    /// Create with default configuration.
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, DashboardConfig::default())
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn load_school(&self, school_id: &SchoolId) -> Result<School> {
        self.store
            .get_by_id::<School>(school_id)?
            .ok_or_else(|| DashboardError::RecordNotFound {
                kind: Collection::Schools,
                id: school_id.to_string(),
            })
    }

    fn connections_of(&self, school_id: &SchoolId) -> Result<Vec<TapConnection>> {
        Ok(self
            .store
            .get_by_foreign_key(&ForeignKey::School(school_id.clone()))?)
    }

    fn check_locations<'a>(
        &self,
        locations: impl IntoIterator<Item = &'a Location>,
    ) -> Result<()> {
        if !self.config.validate_records {
            return Ok(());
        }
        locations.into_iter().try_for_each(validate::validate_location)
    }

    fn check_feedback(&self, feedback: &[Feedback]) -> Result<()> {
        if !self.config.validate_records {
            return Ok(());
        }
        validate::validate_all(feedback, validate::validate_feedback)
    }

    fn joined_schools(&self) -> Result<Vec<SchoolWithLocation>> {
        let schools = self.store.get_all::<School>()?;
        let locations = self.store.get_all::<Location>()?;
        let joined = join::all_schools_with_locations(&schools, &locations)?;
        self.check_locations(joined.iter().map(|row| &row.location))?;
        Ok(joined)
    }

    /// Log integrity failures before handing them back.
    fn observe<T>(operation: &'static str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_integrity_error() {
                tracing::warn!(operation, error = %err, "Inconsistent records");
            }
        }
        result
    }
}

#[async_trait]
impl<S: RecordStore + 'static> Dashboard for DashboardService<S> {
    // =========================================================================
    // Summary
    // =========================================================================

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let schools = self.store.get_all::<School>()?;
        let projects = self.store.get_all::<InfrastructureProject>()?;
        let stats = stats::dashboard_stats(&schools, &projects);

        tracing::debug!(
            total_schools = stats.total_schools,
            total_projects = stats.total_projects,
            "Computed dashboard stats"
        );
        Ok(stats)
    }

    async fn connection_status_counts(&self) -> Result<Vec<StatusCount<TapConnectionStatus>>> {
        let schools = self.store.get_all::<School>()?;
        Ok(stats::connection_status_counts(&schools))
    }

    async fn project_status_counts(&self) -> Result<Vec<StatusCount<ProjectStatus>>> {
        let projects = self.store.get_all::<InfrastructureProject>()?;
        Ok(stats::project_status_counts(&projects))
    }

    // =========================================================================
    // Single school
    // =========================================================================

    async fn school_with_location(&self, school_id: &SchoolId) -> Result<SchoolWithLocation> {
        tracing::debug!(school_id = %school_id, "Joining school with location");

        let result = self.load_school(school_id).and_then(|school| {
            let location = self.store.get_by_id::<Location>(&school.location_id)?;
            let joined = join::with_location(&school, &location)?;
            self.check_locations([&joined.location])?;
            Ok(joined)
        });
        Self::observe("school_with_location", result)
    }

    async fn school_with_tap_connection(
        &self,
        school_id: &SchoolId,
    ) -> Result<SchoolWithTapConnection> {
        tracing::debug!(school_id = %school_id, "Joining school with tap connection");

        let result = self.load_school(school_id).and_then(|school| {
            let connections = self.connections_of(school_id)?;
            join::with_tap_connection(&school, &connections)
        });
        Self::observe("school_with_tap_connection", result)
    }

    async fn school_detail(&self, school_id: &SchoolId) -> Result<SchoolDetail> {
        tracing::debug!(school_id = %school_id, "Loading school detail");

        let result = self.load_school(school_id).and_then(|school| {
            let key = ForeignKey::School(school_id.clone());
            let location = self.store.get_by_id::<Location>(&school.location_id)?;
            let connections = self.connections_of(school_id)?;
            let projects = self.store.get_by_foreign_key::<InfrastructureProject>(&key)?;
            let feedback = self.store.get_by_foreign_key::<Feedback>(&key)?;
            let activities = self.store.get_by_foreign_key::<Activity>(&key)?;

            self.check_feedback(&feedback)?;
            let detail = join::school_detail(
                &school,
                &location,
                &connections,
                &projects,
                &feedback,
                &activities,
            )?;
            self.check_locations([&detail.location])?;
            Ok(detail)
        });
        Self::observe("school_detail", result)
    }

    // =========================================================================
    // Tables
    // =========================================================================

    async fn schools(&self, query: &SchoolQuery) -> Result<Vec<SchoolWithLocation>> {
        let joined = Self::observe("schools", self.joined_schools())?;
        let rows: Vec<SchoolWithLocation> = query.apply(&joined).into_iter().cloned().collect();

        tracing::debug!(
            total = joined.len(),
            matched = rows.len(),
            search = %query.search,
            "Queried schools"
        );
        Ok(rows)
    }

    async fn connections(&self, query: &ConnectionQuery) -> Result<Vec<ConnectionRow>> {
        let connections = self.store.get_all::<TapConnection>()?;
        let schools = self.store.get_all::<School>()?;
        let locations = self.store.get_all::<Location>()?;

        let joined = Self::observe(
            "connections",
            join::all_connections_with_school_context(
                &connections,
                &schools,
                &locations,
                self.config.connection_join_policy,
            ),
        )?;

        let orphans = joined.iter().filter(|row| !row.has_school()).count();
        if orphans > 0 {
            tracing::warn!(orphans, "Connections without a school in the table");
        }

        let rows: Vec<ConnectionRow> = query.apply(&joined).into_iter().cloned().collect();
        tracing::debug!(
            total = joined.len(),
            matched = rows.len(),
            search = %query.search,
            "Queried connections"
        );
        Ok(rows)
    }

    // =========================================================================
    // Overview
    // =========================================================================

    async fn map_markers(&self) -> Result<Vec<MapMarker>> {
        let joined = Self::observe("map_markers", self.joined_schools())?;
        let markers = overview::map_markers(&joined);

        tracing::debug!(
            schools = joined.len(),
            markers = markers.len(),
            "Built map markers"
        );
        Ok(markers)
    }

    async fn recent_activities(&self) -> Result<Vec<Activity>> {
        let activities = self.store.get_all::<Activity>()?;
        Ok(
            overview::recent_activities(&activities, self.config.recent_activity_limit)
                .into_iter()
                .cloned()
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::JoinPolicy;
    use crate::query::{SchoolSortKey, SortConfig};
    use crate::testing::{activity, connection, feedback, location, project, school};
    use tapwatch_store::{MemoryStore, RocksStore, SchoolStatus};
    use tempfile::TempDir;

    fn populate<S: RecordStore>(store: &S) {
        store
            .put(&location("loc1", "Bangalore", "Bangalore Urban"))
            .unwrap();
        store.put(&location("loc2", "Adyar", "Chennai")).unwrap();

        let mut inactive = school("s3", "loc1", "Gamma Primary", TapConnectionStatus::Rejected);
        inactive.status = SchoolStatus::Inactive;
        for s in [
            school("s1", "loc1", "Alpha Primary", TapConnectionStatus::Connected),
            school("s2", "loc2", "Beta Secondary", TapConnectionStatus::Pending),
            inactive,
        ] {
            store.put(&s).unwrap();
        }

        store
            .put(&connection("tap1", "s1", TapConnectionStatus::Connected, Some("2023-08-20")))
            .unwrap();
        store
            .put(&connection("tap2", "s2", TapConnectionStatus::Pending, None))
            .unwrap();

        store.put(&project("p1", "s1", ProjectStatus::Completed)).unwrap();
        store.put(&project("p2", "s2", ProjectStatus::Planned)).unwrap();
        store.put(&project("p3", "s1", ProjectStatus::InProgress)).unwrap();

        store.put(&feedback("f1", "s1", 4)).unwrap();

        for i in 1..=7 {
            let school_id = if i % 2 == 0 { "s2" } else { "s1" };
            store
                .put(&activity(&format!("activity{i}"), school_id, "2023-11-01"))
                .unwrap();
        }
    }

    fn create_test_service() -> DashboardService<MemoryStore> {
        let store = MemoryStore::new();
        populate(&store);
        DashboardService::with_defaults(Arc::new(store))
    }

    fn id(s: &str) -> SchoolId {
        SchoolId::new(s).unwrap()
    }

    #[tokio::test]
    async fn stats_and_counts() {
        let service = create_test_service();

        let stats = service.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_schools, 3);
        assert_eq!(stats.active_schools, 2);
        assert_eq!(stats.connected_taps, 1);
        assert_eq!(stats.pending_taps, 1);
        assert_eq!(stats.rejected_taps, 1);
        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.completed_projects, 1);

        let counts = service.connection_status_counts().await.unwrap();
        let counts: Vec<usize> = counts.iter().map(|c| c.count).collect();
        assert_eq!(counts, [1, 1, 1, 0]);

        let projects = service.project_status_counts().await.unwrap();
        let projects: Vec<usize> = projects.iter().map(|c| c.count).collect();
        assert_eq!(projects, [1, 1, 1, 0]);
    }

    #[tokio::test]
    async fn school_with_location_joins() {
        let service = create_test_service();

        let joined = service.school_with_location(&id("s2")).await.unwrap();
        assert_eq!(joined.location.town_name, "Adyar");
    }

    #[tokio::test]
    async fn missing_school_is_record_not_found() {
        let service = create_test_service();

        let result = service.school_detail(&id("s9")).await;
        assert!(matches!(
            result,
            Err(DashboardError::RecordNotFound {
                kind: Collection::Schools,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn dangling_location_fails_strict_views() {
        let service = create_test_service();
        service
            .store()
            .put(&school("s4", "loc9", "Delta", TapConnectionStatus::Pending))
            .unwrap();

        let result = service.school_with_location(&id("s4")).await;
        assert!(matches!(
            result,
            Err(DashboardError::ReferenceNotFound { .. })
        ));

        let result = service.schools(&SchoolQuery::default()).await;
        assert!(matches!(
            result,
            Err(DashboardError::ReferenceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn school_without_connection() {
        let service = create_test_service();

        let joined = service.school_with_tap_connection(&id("s3")).await.unwrap();
        assert!(joined.tap_connection.is_none());

        let joined = service.school_with_tap_connection(&id("s1")).await.unwrap();
        assert_eq!(joined.tap_connection.unwrap().id.as_str(), "tap1");
    }

    #[tokio::test]
    async fn duplicate_connection_is_ambiguous() {
        let service = create_test_service();
        service
            .store()
            .put(&connection("tap9", "s1", TapConnectionStatus::Pending, None))
            .unwrap();

        let result = service.school_detail(&id("s1")).await;
        assert!(matches!(
            result,
            Err(DashboardError::AmbiguousReference { count: 2, .. })
        ));
    }

    #[tokio::test]
    async fn school_detail_collects_related_records() {
        let service = create_test_service();

        let detail = service.school_detail(&id("s1")).await.unwrap();
        assert_eq!(detail.location.town_name, "Bangalore");
        assert_eq!(detail.tap_connection.unwrap().id.as_str(), "tap1");

        let projects: Vec<&str> = detail.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(projects, ["p1", "p3"]);
        assert_eq!(detail.feedback.len(), 1);

        let activities: Vec<&str> = detail.activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(activities, ["activity1", "activity3", "activity5", "activity7"]);
    }

    #[tokio::test]
    async fn schools_query() {
        let service = create_test_service();

        let query = SchoolQuery {
            search: "BANGALORE".to_string(),
            sort: Some(SortConfig::descending(SchoolSortKey::Name)),
            ..SchoolQuery::default()
        };
        let rows = service.schools(&query).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.school.id.as_str()).collect();
        assert_eq!(ids, ["s3", "s1"]);
    }

    #[tokio::test]
    async fn connections_follow_configured_policy() {
        let store = MemoryStore::new();
        populate(&store);
        store
            .put(&connection("tap9", "s9", TapConnectionStatus::Rejected, None))
            .unwrap();
        let store = Arc::new(store);

        let lenient = DashboardService::with_defaults(Arc::clone(&store));
        let rows = lenient.connections(&ConnectionQuery::default()).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(!rows[2].has_school());
        assert_eq!(rows[0].school.location.district_name, "Bangalore Urban");

        let strict = DashboardService::new(
            store,
            DashboardConfig {
                connection_join_policy: JoinPolicy::Strict,
                ..DashboardConfig::default()
            },
        );
        let result = strict.connections(&ConnectionQuery::default()).await;
        assert!(matches!(
            result,
            Err(DashboardError::ReferenceNotFound {
                kind: Collection::Schools,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn recent_activities_respects_limit() {
        let service = create_test_service();
        assert_eq!(service.recent_activities().await.unwrap().len(), 5);

        let store = MemoryStore::new();
        populate(&store);
        let service = DashboardService::new(
            Arc::new(store),
            DashboardConfig {
                recent_activity_limit: 2,
                ..DashboardConfig::default()
            },
        );
        let recent = service.recent_activities().await.unwrap();
        let ids: Vec<&str> = recent.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["activity1", "activity2"]);
    }

    #[tokio::test]
    async fn validation_is_opt_in() {
        let store = MemoryStore::new();
        populate(&store);
        store.put(&feedback("f2", "s1", 9)).unwrap();
        let store = Arc::new(store);

        let lenient = DashboardService::with_defaults(Arc::clone(&store));
        assert_eq!(lenient.school_detail(&id("s1")).await.unwrap().feedback.len(), 2);

        let validating = DashboardService::new(
            store,
            DashboardConfig {
                validate_records: true,
                ..DashboardConfig::default()
            },
        );
        let result = validating.school_detail(&id("s1")).await;
        assert!(matches!(
            result,
            Err(DashboardError::MalformedRecord {
                kind: Collection::Feedbacks,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn map_markers_over_rocks_store() {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        populate(&store);

        let mut ungeocoded = location("loc3", "Unknown", "Unknown");
        ungeocoded.latitude = 0.0;
        store.put(&ungeocoded).unwrap();
        store
            .put(&school("s4", "loc3", "Delta", TapConnectionStatus::Pending))
            .unwrap();

        let service = DashboardService::with_defaults(Arc::new(store));
        let markers = service.map_markers().await.unwrap();
        let ids: Vec<&str> = markers.iter().map(|m| m.school_id.as_str()).collect();
        assert_eq!(ids, ["s1", "s2", "s3"]);
    }
}
