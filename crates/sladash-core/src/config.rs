#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Every field has a default matching the dashboard's server-rendered markup,
//! so an empty JSON object (or no config at all) is valid:
//!
//! ```
//! use sladash_core::EngineConfig;
//!
//! let cfg = EngineConfig::from_json(r#"{ "resize_debounce_ms": 0 }"#).unwrap();
//! assert_eq!(cfg.breakpoint, 980);
//! assert_eq!(cfg.resize_debounce_ms, 0);
//! ```

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::viewport::DEFAULT_BREAKPOINT;

/// Configuration load failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// JSON was malformed or named an unknown field.
    Parse(String),
    /// A field holds a value the engine cannot use.
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid config field {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Element ids, classes and attributes each controller looks for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Anchors {
    pub sidebar_id: String,
    /// Used when no element carries `sidebar_id`.
    pub sidebar_class: String,
    pub sidebar_toggle_id: String,

    /// Attribute whose value names the tab's role.
    pub role_tab_attr: String,
    /// Alternate tab markup: elements with this class carrying `role_attr`.
    pub role_tab_class: String,
    pub role_attr: String,
    pub role_input_id: String,
    pub role_hint_id: String,

    pub profile_trigger_id: String,
    pub profile_menu_id: String,

    /// Attribute holding the selector of the table a search input filters.
    pub table_search_attr: String,
    /// Search inputs bound by the legacy fallback, first match wins.
    pub fallback_search_selectors: Vec<String>,
    /// Tables the legacy fallback input filters, first match wins.
    pub fallback_table_selectors: Vec<String>,

    pub kpi_table_id: String,
    pub kpi_resolved_id: String,
    pub kpi_active_id: String,
    pub kpi_breached_id: String,
    pub status_cell_class: String,

    pub metrics_container_id: String,
    pub sla_health_id: String,
    pub breach_rate_id: String,
    pub total_escalations_id: String,
    pub avg_resolution_time_id: String,

    /// Links handled by the smooth in-page scroller.
    pub anchor_link_selector: String,
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            sidebar_id: "sidebar".into(),
            sidebar_class: "sidebar".into(),
            sidebar_toggle_id: "toggleSidebar".into(),
            role_tab_attr: "data-role-tab".into(),
            role_tab_class: "role-tab".into(),
            role_attr: "data-role".into(),
            role_input_id: "roleInput".into(),
            role_hint_id: "roleHint".into(),
            profile_trigger_id: "profileBtn".into(),
            profile_menu_id: "profileMenu".into(),
            table_search_attr: "data-table-search".into(),
            fallback_search_selectors: vec![
                r#"input[placeholder*="Search tickets" i]"#.into(),
                "#ticketSearch".into(),
                ".ticket-search".into(),
                r#"input[name="search"]"#.into(),
            ],
            fallback_table_selectors: vec![
                "#ticketTable".into(),
                ".ticket-table".into(),
                "table".into(),
            ],
            kpi_table_id: "dashTable".into(),
            kpi_resolved_id: "kpiResolved".into(),
            kpi_active_id: "kpiActive".into(),
            kpi_breached_id: "kpiBreached".into(),
            status_cell_class: "ticket-status-cell".into(),
            metrics_container_id: "govLiveMetrics".into(),
            sla_health_id: "g_sla_health".into(),
            breach_rate_id: "g_breach_rate".into(),
            total_escalations_id: "g_total_escalations".into(),
            avg_resolution_time_id: "g_avg_resolution_time".into(),
            anchor_link_selector: r##"a[href^="#"]"##.into(),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Widths at or below this are mobile.
    pub breakpoint: u32,
    /// Durable storage key for the sidebar preference.
    pub preference_key: String,
    /// Relative path of the governance summary endpoint.
    pub summary_endpoint: String,
    /// Trailing-edge resize debounce; `0` applies every resize immediately.
    pub resize_debounce_ms: u64,
    pub anchors: Anchors,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            breakpoint: DEFAULT_BREAKPOINT,
            preference_key: "sla_sidebar_collapsed".into(),
            summary_endpoint: "/api/governance/".into(),
            resize_debounce_ms: 100,
            anchors: Anchors::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no controller could work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preference_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "preference_key",
                reason: "must not be empty",
            });
        }
        if self.summary_endpoint.is_empty() {
            return Err(ConfigError::Invalid {
                field: "summary_endpoint",
                reason: "must not be empty",
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn nested_anchor_overrides_keep_other_defaults() {
        let cfg = EngineConfig::from_json(
            r#"{ "summary_endpoint": "/api/governance-metrics/", "anchors": { "kpi_table_id": "engTable" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.summary_endpoint, "/api/governance-metrics/");
        assert_eq!(cfg.anchors.kpi_table_id, "engTable");
        assert_eq!(cfg.anchors.sidebar_id, "sidebar");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = EngineConfig::from_json(r#"{ "breakpoints": 1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_preference_key_is_invalid() {
        let err = EngineConfig::from_json(r#"{ "preference_key": "" }"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                field: "preference_key",
                reason: "must not be empty",
            }
        );
    }
}
