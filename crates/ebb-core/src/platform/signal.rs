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

//! Contract for the host's network-information sensor.

use crate::telemetry::NetworkUpdate;

/// Identifies a subscription so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A callback invoked with every raw update the sensor produces.
pub type SignalCallback = Box<dyn Fn(&NetworkUpdate)>;

/// Trait for observing the host's network conditions.
///
/// Implementations deliver updates on the control thread.
pub trait SignalSource {
    /// Registers a callback for all future updates.
    fn subscribe(&self, callback: SignalCallback) -> SubscriptionId;

    /// Removes a previously registered callback. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Returns the latest known reading, if the sensor has produced one.
    fn current(&self) -> Option<NetworkUpdate> {
        None
    }
}
