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

//! # Ebb Control
//!
//! The adaptive scheduling policy engine.
//!
//! Every unit of work is submitted to the [`Scheduler`] tagged critical or
//! non-critical. Depending on the latest network sample it either runs inline
//! or is parked in the [`DeferredQueue`], which is drained cooperatively in
//! idle slices granted by the host. The [`policy`] module holds the pure,
//! tier-dependent quality rules that tasks consult before touching the
//! renderer.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod policy;
pub mod queue;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use error::{ConfigError, SchedulerError, TaskFailure};
pub use queue::{DeferredQueue, DrainReport};
pub use scheduler::{Scheduler, SchedulerMode, Submission};
