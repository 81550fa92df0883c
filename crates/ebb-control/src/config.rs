// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration for the scheduler.

use crate::error::ConfigError;
use ebb_core::telemetry::ConnectionTier;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the [`Scheduler`](crate::Scheduler).
///
/// Every field has a default, so a JSON file only needs to name the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ceiling after which the host must run a pending drain pass even
    /// without idle time.
    pub idle_timeout_ms: u64,
    /// Minimum slice time left before another deferred task is started,
    /// used for every tier except `Slow`.
    pub min_task_time_ms: u64,
    /// Minimum slice time left before another deferred task is started
    /// under the `Slow` tier.
    pub slow_min_task_time_ms: u64,
    /// Upper bound on tasks run per drain pass. `None` means the pass runs
    /// until the budget or the queue is exhausted.
    pub max_tasks_per_slice: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 1000,
            min_task_time_ms: 30,
            slow_min_task_time_ms: 10,
            max_tasks_per_slice: None,
        }
    }
}

impl SchedulerConfig {
    /// The bounded wait ceiling for idle requests.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// The per-task minimum slice time used when draining under `tier`.
    ///
    /// `Slow` uses the smaller threshold so more tasks fit in a shrinking slice.
    pub fn min_task_time_for(&self, tier: ConnectionTier) -> Duration {
        match tier {
            ConnectionTier::Slow => Duration::from_millis(self.slow_min_task_time_ms),
            ConnectionTier::Medium | ConnectionTier::Fast | ConnectionTier::Unknown => {
                Duration::from_millis(self.min_task_time_ms)
            }
        }
    }

    /// Checks that the values can drive a scheduler.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "idle_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.max_tasks_per_slice == Some(0) {
            return Err(ConfigError::Invalid(
                "max_tasks_per_slice must allow at least one task".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded scheduler config from '{}': {:?}", path.display(), config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_idle_policy() {
        let config = SchedulerConfig::default();
        assert_eq!(config.idle_timeout(), Duration::from_millis(1000));
        assert_eq!(
            config.min_task_time_for(ConnectionTier::Slow),
            Duration::from_millis(10)
        );
        for tier in [
            ConnectionTier::Medium,
            ConnectionTier::Fast,
            ConnectionTier::Unknown,
        ] {
            assert_eq!(config.min_task_time_for(tier), Duration::from_millis(30));
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_defaults() {
        let config =
            SchedulerConfig::from_json_str(r#"{ "idle_timeout_ms": 250, "max_tasks_per_slice": 4 }"#)
                .unwrap();
        assert_eq!(config.idle_timeout_ms, 250);
        assert_eq!(config.max_tasks_per_slice, Some(4));
        assert_eq!(config.min_task_time_ms, 30);
        assert_eq!(config.slow_min_task_time_ms, 10);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            SchedulerConfig::from_json_str(r#"{ "idle_timeout_ms": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SchedulerConfig::from_json_str(r#"{ "max_tasks_per_slice": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SchedulerConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "slow_min_task_time_ms": 5 }}"#).unwrap();

        let config = SchedulerConfig::load(file.path()).unwrap();
        assert_eq!(config.slow_min_task_time_ms, 5);
        assert_eq!(config.idle_timeout_ms, 1000);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = SchedulerConfig::load("/definitely/not/here.json").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, Path::new("/definitely/not/here.json"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
