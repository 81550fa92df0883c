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

//! Provides the trait for active resource monitoring.
//!
//! A monitor holds the latest [`ResourceState`] and is fed by an external
//! sensor. Consumers only ever read whole snapshots.

use std::borrow::Cow;
use std::fmt::Debug;

use super::network::{NetworkUpdate, ResourceState};

/// The core trait for a resource monitor.
///
/// A `ResourceMonitor` is a stateful object, typically living in the
/// `ebb-telemetry` crate. A signal source calls [`on_update`](Self::on_update)
/// whenever the underlying condition changes, and the scheduler calls
/// [`sample`](Self::sample) before every decision.
///
/// Implementations must replace their state atomically: a concurrent
/// `sample` observes either the state before an update or the state after it,
/// never a mix of both.
pub trait ResourceMonitor: Send + Sync + Debug + 'static {
    /// Returns a unique, human-readable identifier for this monitor instance.
    fn monitor_id(&self) -> Cow<'static, str>;

    /// Returns the latest known state.
    ///
    /// Before any update has been received this is [`ResourceState::default`].
    fn sample(&self) -> ResourceState;

    /// Folds a raw sensor update into the stored state.
    ///
    /// Malformed or missing fields keep their prior values; this never fails.
    fn on_update(&self, update: &NetworkUpdate);
}
