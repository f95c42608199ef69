//! Process-wide runtime settings.
//!
//! Read once from the environment on first use; later changes to the
//! environment have no effect.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `SPEECHKIT_MAX_HANDLES_PER_TABLE` | upper bound on live handles in one table |
//! | `SPEECHKIT_LOG` | `tracing` filter used by the C library's logger |

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Slot indices are 32-bit, so a table can never hold more than this.
pub const MAX_SLOTS: usize = u32::MAX as usize;

pub const DEFAULT_LOG_FILTER: &str = "speechkit=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct RuntimeSettings {
    pub max_handles_per_table: usize,
    pub log_filter: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            max_handles_per_table: MAX_SLOTS,
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl RuntimeSettings {
    /// Build settings from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(max) = std::env::var("SPEECHKIT_MAX_HANDLES_PER_TABLE")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            settings.max_handles_per_table = max;
        }
        if let Ok(filter) = std::env::var("SPEECHKIT_LOG") {
            settings.log_filter = filter;
        }
        settings.normalize();
        settings
    }

    pub fn normalize(&mut self) {
        self.max_handles_per_table = self.max_handles_per_table.clamp(1, MAX_SLOTS);
        let filter = self.log_filter.trim();
        self.log_filter = if filter.is_empty() {
            DEFAULT_LOG_FILTER.into()
        } else {
            filter.to_string()
        };
    }
}

/// Settings snapshot shared by the whole process.
pub fn runtime_settings() -> &'static RuntimeSettings {
    static SETTINGS: OnceLock<RuntimeSettings> = OnceLock::new();
    SETTINGS.get_or_init(RuntimeSettings::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_handle_limit_and_restores_empty_filter() {
        let mut settings = RuntimeSettings {
            max_handles_per_table: 0,
            log_filter: "   ".into(),
        };
        settings.normalize();
        assert_eq!(settings.max_handles_per_table, 1);
        assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);

        settings.max_handles_per_table = usize::MAX;
        settings.normalize();
        assert_eq!(settings.max_handles_per_table, MAX_SLOTS);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let settings: RuntimeSettings =
            serde_json::from_str(r#"{"maxHandlesPerTable": 16}"#).expect("parse settings");
        assert_eq!(settings.max_handles_per_table, 16);
        assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
    }
}
