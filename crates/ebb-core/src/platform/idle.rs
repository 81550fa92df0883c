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

//! Contracts for cooperative idle-time scheduling.

use std::time::Duration;

/// The budget handed to an idle callback.
pub trait IdleDeadline {
    /// Time left in the current idle slice. Zero once the slice is spent.
    fn time_remaining(&self) -> Duration;

    /// `true` if the callback runs because its timeout ceiling elapsed rather
    /// than because the host had idle time.
    fn did_timeout(&self) -> bool;
}

/// Identifies an outstanding idle request so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdleRequestId(pub u64);

/// A callback run once when the host grants an idle slice.
///
/// Errors are returned to the host, which decides how to report them.
pub type IdleCallback = Box<dyn FnOnce(&dyn IdleDeadline) -> anyhow::Result<()>>;

/// A host facility that runs callbacks during idle time.
pub trait IdleHost {
    /// Requests one idle slice.
    ///
    /// The host must invoke `callback` exactly once, either when idle time is
    /// available or, at the latest, once `timeout` has elapsed (in which case
    /// [`IdleDeadline::did_timeout`] reports `true`), unless the request is
    /// cancelled first.
    fn request_idle_slice(&self, callback: IdleCallback, timeout: Duration) -> IdleRequestId;

    /// Cancels an outstanding request. Unknown or already-run ids are ignored.
    fn cancel_idle_slice(&self, id: IdleRequestId);
}

/// A deadline with a fixed remaining budget.
///
/// Hosts use it for forced passes; tests use it to hand out exact budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDeadline {
    /// The time reported by [`IdleDeadline::time_remaining`].
    pub remaining: Duration,
    /// The flag reported by [`IdleDeadline::did_timeout`].
    pub forced: bool,
}

impl FixedDeadline {
    /// A regular idle slice with `remaining` time.
    pub fn idle(remaining: Duration) -> Self {
        Self {
            remaining,
            forced: false,
        }
    }

    /// A slice forced by the timeout ceiling, with no idle time left.
    pub fn forced() -> Self {
        Self {
            remaining: Duration::ZERO,
            forced: true,
        }
    }
}

impl IdleDeadline for FixedDeadline {
    fn time_remaining(&self) -> Duration {
        self.remaining
    }

    fn did_timeout(&self) -> bool {
        self.forced
    }
}
