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

//! Network-quality state and the raw updates that drive it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of the observed connection quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionTier {
    /// 2G-class links (`slow-2g`, `2g`).
    Slow,
    /// 3G-class links.
    Medium,
    /// 4G-class links and better.
    Fast,
    /// No classification has been received yet.
    #[default]
    Unknown,
}

impl ConnectionTier {
    /// Classifies a sensor's `effectiveType` string.
    ///
    /// Returns `None` for strings that name no known class.
    pub fn from_effective_type(effective_type: &str) -> Option<Self> {
        let normalized = effective_type.trim().to_ascii_lowercase();
        if normalized.contains("2g") {
            Some(Self::Slow)
        } else if normalized.contains("3g") {
            Some(Self::Medium)
        } else if normalized.contains("4g") {
            Some(Self::Fast)
        } else {
            None
        }
    }

    /// Returns `true` if work submitted under this tier may run inline.
    ///
    /// `Unknown` is permissive so that a host without a sensor never defers.
    pub fn is_permissive(self) -> bool {
        matches!(self, Self::Fast | Self::Unknown)
    }

    /// Human-readable quality level shown in status displays.
    pub fn quality_label(self) -> &'static str {
        match self {
            Self::Slow => "Low (2G)",
            Self::Medium => "Medium (3G)",
            Self::Fast => "High (4G+)",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConnectionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Slow => "2G",
            Self::Medium => "3G",
            Self::Fast => "4G",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// A raw update payload as delivered by a network sensor.
///
/// Every field is optional: sensors on some hosts only report a subset, and
/// absent fields leave the corresponding part of the state untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkUpdate {
    /// The sensor's classification string (e.g. `"4g"`, `"slow-2g"`).
    pub effective_type: Option<String>,
    /// Whether the user asked for reduced data usage.
    pub save_data: Option<bool>,
    /// Estimated downlink bandwidth in megabits per second.
    pub downlink: Option<f64>,
    /// Estimated round-trip time in milliseconds.
    pub rtt: Option<f64>,
}

impl NetworkUpdate {
    /// Creates an update that only carries an effective type.
    pub fn effective(effective_type: impl Into<String>) -> Self {
        Self {
            effective_type: Some(effective_type.into()),
            ..Default::default()
        }
    }

    /// Sets the downlink estimate.
    pub fn with_downlink(mut self, downlink: f64) -> Self {
        self.downlink = Some(downlink);
        self
    }

    /// Sets the round-trip estimate.
    pub fn with_rtt(mut self, rtt: f64) -> Self {
        self.rtt = Some(rtt);
        self
    }

    /// Sets the save-data flag.
    pub fn with_save_data(mut self, save_data: bool) -> Self {
        self.save_data = Some(save_data);
        self
    }

    /// Overlays the fields present in `newer` onto `self`.
    pub fn overlay(&mut self, newer: &NetworkUpdate) {
        if newer.effective_type.is_some() {
            self.effective_type.clone_from(&newer.effective_type);
        }
        self.save_data = newer.save_data.or(self.save_data);
        self.downlink = newer.downlink.or(self.downlink);
        self.rtt = newer.rtt.or(self.rtt);
    }
}

/// The latest known network-quality sample.
///
/// Only one sample is ever kept; it is replaced wholesale on every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// The coarse quality classification.
    pub tier: ConnectionTier,
    /// Whether the user asked for reduced data usage.
    pub save_data: bool,
    /// Estimated downlink bandwidth in megabits per second.
    pub downlink_mbps: f64,
    /// Estimated round-trip time in milliseconds.
    pub round_trip_ms: f64,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self {
            tier: ConnectionTier::Unknown,
            save_data: false,
            downlink_mbps: 10.0,
            round_trip_ms: 50.0,
        }
    }
}

/// The result of folding a [`NetworkUpdate`] into a [`ResourceState`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergedState {
    /// The state after the update.
    pub state: ResourceState,
    /// Names of the fields that were present but unusable and kept their prior value.
    pub rejected_fields: Vec<&'static str>,
}

impl ResourceState {
    /// Folds `update` into this state and returns the replacement.
    ///
    /// Absent fields and malformed fields (unclassifiable effective types,
    /// negative or non-finite measurements) keep the value held before the
    /// update. This never fails.
    pub fn merge(&self, update: &NetworkUpdate) -> MergedState {
        let mut state = *self;
        let mut rejected_fields = Vec::new();

        if let Some(effective_type) = update.effective_type.as_deref() {
            match ConnectionTier::from_effective_type(effective_type) {
                Some(tier) => state.tier = tier,
                None => rejected_fields.push("effectiveType"),
            }
        }

        if let Some(save_data) = update.save_data {
            state.save_data = save_data;
        }

        match update.downlink {
            Some(downlink) if is_valid_measurement(downlink) => state.downlink_mbps = downlink,
            Some(_) => rejected_fields.push("downlink"),
            None => {}
        }

        match update.rtt {
            Some(rtt) if is_valid_measurement(rtt) => state.round_trip_ms = rtt,
            Some(_) => rejected_fields.push("rtt"),
            None => {}
        }

        MergedState {
            state,
            rejected_fields,
        }
    }
}

fn is_valid_measurement(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
