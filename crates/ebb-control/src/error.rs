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

//! Error types for the scheduling subsystem.

use std::path::PathBuf;
use thiserror::Error;

/// A task raised an error while a drain pass was running it.
///
/// The failing task has already been removed from the queue; tasks behind it
/// keep their positions and run on later passes.
#[derive(Debug, Error)]
#[error("deferred task failed after {executed} task(s) completed in this pass")]
pub struct TaskFailure {
    /// Tasks that completed in the same pass before the failure.
    pub executed: usize,
    /// The error raised by the task.
    #[source]
    pub source: anyhow::Error,
}

/// Errors surfaced by [`Scheduler`](crate::Scheduler) operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A task executed inline by `submit` failed.
    #[error("task execution failed")]
    TaskFailed(#[source] anyhow::Error),
    /// A task failed during an idle-time drain pass.
    #[error(transparent)]
    Drain(#[from] TaskFailure),
    /// The scheduler has been shut down and accepts no more work.
    #[error("scheduler has been shut down")]
    Closed,
}

/// Errors raised while loading or validating a [`SchedulerConfig`](crate::SchedulerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read scheduler config '{path}'")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid JSON for [`SchedulerConfig`](crate::SchedulerConfig).
    #[error("failed to parse scheduler config")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid scheduler config: {0}")]
    Invalid(String),
}
