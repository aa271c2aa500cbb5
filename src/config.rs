use std::time::Duration;

use crate::record::FieldMap;

#[derive(Clone, Debug)]
pub struct Config {
    pub tracker_base: String,
    pub tracker_user: Option<String>,
    pub tracker_token: Option<String>,
    pub project: String,
    pub selector_clause: String,
    pub issue_type: String,
    pub group_field: String,
    pub group_clause: String,
    pub target_field: String,
    pub max_results: u32,
    pub initial_delay_ms: u64,
    pub scan_interval_ms: u64,
    pub max_idle_scans: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            tracker_base: std::env::var("TRACKER_BASE").unwrap_or(d.tracker_base),
            tracker_user: std::env::var("TRACKER_USER").ok(),
            tracker_token: std::env::var("TRACKER_TOKEN").ok(),
            project: std::env::var("TRACKER_PROJECT").unwrap_or(d.project),
            selector_clause: std::env::var("SELECTOR_CLAUSE").unwrap_or(d.selector_clause),
            issue_type: std::env::var("ISSUE_TYPE").unwrap_or(d.issue_type),
            group_field: std::env::var("GROUP_FIELD").unwrap_or(d.group_field),
            group_clause: std::env::var("GROUP_CLAUSE").unwrap_or(d.group_clause),
            target_field: std::env::var("TARGET_FIELD").unwrap_or(d.target_field),
            max_results: std::env::var("MAX_RESULTS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.max_results),
            initial_delay_ms: std::env::var("INITIAL_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.initial_delay_ms),
            scan_interval_ms: std::env::var("SCAN_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.scan_interval_ms),
            max_idle_scans: std::env::var("MAX_IDLE_SCANS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.max_idle_scans),
        }
    }

    pub fn field_map(&self) -> FieldMap {
        FieldMap {
            group: self.group_field.clone(),
            target: self.target_field.clone(),
        }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracker_base: "https://jira.unicorn.com".to_string(),
            tracker_user: None,
            tracker_token: None,
            project: "cams".to_string(),
            selector_clause: "component".to_string(),
            issue_type: "sub-task".to_string(),
            group_field: "customfield_12001".to_string(),
            group_clause: "cf[12001]".to_string(),
            target_field: "customfield_17113".to_string(),
            max_results: 10_000,
            initial_delay_ms: 2000,
            scan_interval_ms: 200,
            max_idle_scans: 20,
        }
    }
}
