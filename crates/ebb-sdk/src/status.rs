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

//! The one-line status readout shown next to the drawing surface.

use ebb_core::telemetry::{ConnectionTier, ResourceState};
use std::fmt;

/// A snapshot of what the session is adapting to.
///
/// Displays as
/// `Network: 4G | Quality: High (4G+) | Speed: ~10.0 Mbps | Mode: Real-time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusLine {
    /// The classified connection tier.
    pub tier: ConnectionTier,
    /// Estimated downlink in megabits per second.
    pub downlink_mbps: f64,
    /// `true` while non-critical work is being deferred.
    pub deferred: bool,
}

impl StatusLine {
    /// Builds a status line from a monitor sample and the scheduler's mode.
    pub fn new(state: &ResourceState, deferred: bool) -> Self {
        Self {
            tier: state.tier,
            downlink_mbps: state.downlink_mbps,
            deferred,
        }
    }

    /// `"Optimized"` while deferring, `"Real-time"` otherwise.
    pub fn mode_label(&self) -> &'static str {
        if self.deferred {
            "Optimized"
        } else {
            "Real-time"
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Network: {} | Quality: {} | Speed: ~{:.1} Mbps | Mode: {}",
            self.tier,
            self.tier.quality_label(),
            self.downlink_mbps,
            self.mode_label()
        )
    }
}
