//! Client configuration.

use std::time::Duration;

/// Hosted project the equipments tables live in.
pub const DEFAULT_BASE_URL: &str = "https://pgjatiookprsvfesrsrx.supabase.co";

/// Minimum success rate, in percent, for a run to be reported as functional.
pub const DEFAULT_SUCCESS_THRESHOLD: u32 = 80;

/// Lower-case marker identifying a write denied by row-level access rules.
pub const POLICY_REJECTION_MARKER: &str = "row-level security";

/// Front-end the follow-up manual checks are performed in.
pub const DEFAULT_APP_URL: &str = "http://localhost:3002";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the hosted project (without `/rest/v1`)
    pub base_url: String,
    /// Static key, sent as `apikey` and as the bearer token
    pub api_key: String,
    /// Timeout for single reads and writes
    pub request_timeout: Duration,
    /// Timeout for the batch seed insert
    pub seed_timeout: Duration,
    /// Verdict gate in percent (0-100)
    pub success_threshold_percent: u32,
    /// Case-insensitive substring flagging an access-policy rejection
    pub policy_rejection_marker: String,
    /// Application URL printed in the follow-up instructions
    pub app_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(10),
            seed_timeout: Duration::from_secs(15),
            success_threshold_percent: DEFAULT_SUCCESS_THRESHOLD,
            policy_rejection_marker: POLICY_REJECTION_MARKER.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for `base_url` with default timeouts and heuristics.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Endpoint URL for a table, e.g. `https://host/rest/v1/equipments`.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }
}
