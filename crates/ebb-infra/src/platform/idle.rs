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

//! A frame-loop driven implementation of [`IdleHost`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use ebb_core::platform::{FixedDeadline, IdleCallback, IdleDeadline, IdleHost, IdleRequestId};

struct PendingSlice {
    id: IdleRequestId,
    requested_at: Instant,
    timeout: Duration,
    callback: IdleCallback,
}

impl PendingSlice {
    fn expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.requested_at) >= self.timeout
    }
}

/// A deadline measured against the wall clock.
struct WallClockDeadline {
    end: Instant,
}

impl IdleDeadline for WallClockDeadline {
    fn time_remaining(&self) -> Duration {
        self.end.saturating_duration_since(Instant::now())
    }

    fn did_timeout(&self) -> bool {
        false
    }
}

/// What one call into the host ran.
#[derive(Debug, Default)]
pub struct IdleReport {
    /// Callbacks invoked.
    pub ran: usize,
    /// Errors returned by those callbacks, in invocation order.
    pub failures: Vec<anyhow::Error>,
}

impl IdleReport {
    fn record(&mut self, id: IdleRequestId, result: anyhow::Result<()>) {
        self.ran += 1;
        if let Err(e) = result {
            log::error!("Idle callback {:?} failed: {:#}", id, e);
            self.failures.push(e);
        }
    }
}

/// An idle host driven by the application's frame loop.
///
/// The loop calls [`run_idle_period`](Self::run_idle_period) with whatever
/// time is left in a frame and [`run_expired`](Self::run_expired) once per
/// frame so that requests whose timeout ceiling has elapsed are forced
/// through even when no frame ever has spare time.
///
/// Requests made by a callback are queued for the next call, never run in the
/// call that is currently dispatching.
#[derive(Default)]
pub struct FrameIdleHost {
    next_id: Cell<u64>,
    pending: RefCell<VecDeque<PendingSlice>>,
}

impl FrameIdleHost {
    /// Creates a host with no outstanding requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests waiting to run.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Runs outstanding requests, oldest first, while `budget` lasts.
    ///
    /// All callbacks run in this period share one wall-clock deadline. Once it
    /// is spent the remaining requests stay queued in their original order.
    pub fn run_idle_period(&self, budget: Duration) -> IdleReport {
        let mut report = IdleReport::default();
        let deadline = WallClockDeadline {
            end: Instant::now() + budget,
        };

        let mut batch: VecDeque<PendingSlice> = self.pending.borrow_mut().drain(..).collect();
        while let Some(slice) = batch.pop_front() {
            if deadline.time_remaining().is_zero() {
                batch.push_front(slice);
                break;
            }
            report.record(slice.id, (slice.callback)(&deadline));
        }

        if !batch.is_empty() {
            let mut pending = self.pending.borrow_mut();
            while let Some(slice) = batch.pop_back() {
                pending.push_front(slice);
            }
        }

        if report.ran > 0 {
            log::trace!("Idle period of {:?} ran {} callback(s).", budget, report.ran);
        }
        report
    }

    /// Forces every request whose timeout has elapsed.
    pub fn run_expired(&self) -> IdleReport {
        self.run_expired_at(Instant::now())
    }

    /// Forces every request whose timeout has elapsed as of `now`.
    ///
    /// Forced callbacks see no remaining idle time and
    /// [`IdleDeadline::did_timeout`] set.
    pub fn run_expired_at(&self, now: Instant) -> IdleReport {
        let mut report = IdleReport::default();

        let expired: Vec<PendingSlice> = {
            let mut pending = self.pending.borrow_mut();
            let (expired, waiting): (Vec<_>, Vec<_>) =
                pending.drain(..).partition(|slice| slice.expired_at(now));
            *pending = waiting.into();
            expired
        };

        for slice in expired {
            log::debug!(
                "Idle request {:?} reached its {:?} ceiling; forcing it.",
                slice.id,
                slice.timeout
            );
            report.record(slice.id, (slice.callback)(&FixedDeadline::forced()));
        }
        report
    }
}

impl IdleHost for FrameIdleHost {
    fn request_idle_slice(&self, callback: IdleCallback, timeout: Duration) -> IdleRequestId {
        let id = IdleRequestId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.pending.borrow_mut().push_back(PendingSlice {
            id,
            requested_at: Instant::now(),
            timeout,
            callback,
        });
        id
    }

    fn cancel_idle_slice(&self, id: IdleRequestId) {
        self.pending.borrow_mut().retain(|slice| slice.id != id);
    }
}

impl fmt::Debug for FrameIdleHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameIdleHost")
            .field("next_id", &self.next_id.get())
            .field("pending", &self.pending_count())
            .finish()
    }
}
