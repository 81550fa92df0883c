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

//! Provides abstractions over the host facilities the scheduler consumes.
//!
//! The host offers two services: a subscribable network sensor
//! ([`SignalSource`]) and a facility that hands out idle time slices
//! ([`IdleHost`]). Both are single-threaded: callbacks run on the control
//! thread that owns the scheduler.

pub mod idle;
pub mod signal;

pub use idle::{FixedDeadline, IdleCallback, IdleDeadline, IdleHost, IdleRequestId};
pub use signal::{SignalCallback, SignalSource, SubscriptionId};
