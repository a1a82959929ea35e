//! Dashboard service configuration.

use serde::Deserialize;

use crate::join::JoinPolicy;

/// Configuration for the dashboard service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// Number of entries shown in the recent activity feed.
    #[serde(default = "DashboardConfig::default_recent_activity_limit")]
    pub recent_activity_limit: usize,

    /// How the connection table treats a connection whose school or location
    /// is missing.
    #[serde(default)]
    pub connection_join_policy: JoinPolicy,

    /// Check feedback ratings and location coordinates before building views.
    #[serde(default)]
    pub validate_records: bool,
}

impl DashboardConfig {
    const fn default_recent_activity_limit() -> usize {
        5
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_activity_limit: Self::default_recent_activity_limit(),
            connection_join_policy: JoinPolicy::default(),
            validate_records: false,
        }
    }
}
