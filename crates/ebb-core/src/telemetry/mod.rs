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

//! Provides the foundational types and traits for resource observation.
//!
//! This module defines the "common language" the scheduler uses to reason
//! about the host's network conditions. It contains the sampled state, the raw
//! update payload delivered by sensors, and the [`ResourceMonitor`] contract.
//!
//! `ebb-core` only defines the abstract "what"; `ebb-telemetry` provides the
//! monitor that keeps the state current.

pub mod monitoring;
pub mod network;

pub use self::monitoring::ResourceMonitor;
pub use self::network::{ConnectionTier, MergedState, NetworkUpdate, ResourceState};
