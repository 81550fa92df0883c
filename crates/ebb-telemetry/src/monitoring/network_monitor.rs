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

//! Network Quality Resource Monitor
//!
//! Holds the latest network-quality sample pushed by the host's sensor.

use std::borrow::Cow;
use std::sync::{PoisonError, RwLock};

use ebb_core::telemetry::{NetworkUpdate, ResourceMonitor, ResourceState};

/// Network quality resource monitor.
///
/// The monitor updates passively: a signal source calls
/// [`ResourceMonitor::on_update`] and the state is swapped under a single
/// write lock, so readers on any thread see whole samples only.
#[derive(Debug)]
pub struct NetworkMonitor {
    id: String,
    state: RwLock<ResourceState>,
    update_count: RwLock<u64>,
}

impl NetworkMonitor {
    /// Creates a monitor holding the permissive default state.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_state(id, ResourceState::default())
    }

    /// Creates a monitor seeded with a known state.
    pub fn with_state(id: impl Into<String>, state: ResourceState) -> Self {
        Self {
            id: id.into(),
            state: RwLock::new(state),
            update_count: RwLock::new(0),
        }
    }

    /// Returns how many updates have been received since creation.
    pub fn update_count(&self) -> u64 {
        *self
            .update_count
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResourceMonitor for NetworkMonitor {
    fn monitor_id(&self) -> Cow<'static, str> {
        Cow::Owned(self.id.clone())
    }

    fn sample(&self) -> ResourceState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn on_update(&self, update: &NetworkUpdate) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let merged = state.merge(update);

        if !merged.rejected_fields.is_empty() {
            log::debug!(
                "[{}] Ignoring malformed update fields {:?}; keeping prior values.",
                self.id,
                merged.rejected_fields
            );
        }

        if merged.state.tier != state.tier {
            log::info!(
                "[{}] Connection tier changed: {:?} -> {:?} (~{:.1} Mbps, {:.0} ms RTT)",
                self.id,
                state.tier,
                merged.state.tier,
                merged.state.downlink_mbps,
                merged.state.round_trip_ms
            );
        }

        *state = merged.state;
        drop(state);

        *self
            .update_count
            .write()
            .unwrap_or_else(PoisonError::into_inner) += 1;
    }
}
