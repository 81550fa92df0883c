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

//! The adaptive scheduler.
//!
//! The scheduler has two modes, inferred from whether an idle request is
//! outstanding:
//!
//! - **Real-time**: no request outstanding, the queue is empty, and every
//!   submission runs inline.
//! - **Deferred**: a drain request is outstanding. Non-critical work submitted
//!   under a constrained tier joins the backlog until a drain pass empties it.
//!
//! Critical work, and any work submitted while the tier is permissive, always
//! runs inline and may overtake the backlog.

use crate::config::SchedulerConfig;
use crate::error::{ConfigError, SchedulerError};
use crate::queue::DeferredQueue;
use ebb_core::platform::{IdleDeadline, IdleHost, IdleRequestId};
use ebb_core::telemetry::ResourceMonitor;
use ebb_core::Task;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The scheduler's mode. `Deferred` carries the one outstanding drain request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMode {
    /// Every submission runs inline.
    RealTime,
    /// A drain pass has been requested from the idle host.
    Deferred {
        /// The outstanding idle request.
        handle: IdleRequestId,
    },
}

/// What `submit` did with a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The task ran inline and completed.
    Executed,
    /// The task joined the deferred backlog.
    Deferred,
}

struct Shared {
    config: SchedulerConfig,
    monitor: Arc<dyn ResourceMonitor>,
    host: Rc<dyn IdleHost>,
    queue: DeferredQueue,
    mode: Cell<SchedulerMode>,
    /// When the backlog last started waiting without progress.
    waiting_since: Cell<Option<Instant>>,
    closed: Cell<bool>,
}

/// Decides, per task, between inline execution and idle-time deferral.
///
/// The scheduler lives on the single control thread. Idle callbacks only
/// hold a weak reference to it, so a callback that fires after the scheduler
/// is dropped does nothing.
pub struct Scheduler {
    shared: Rc<Shared>,
}

impl Scheduler {
    /// Creates a scheduler in real-time mode.
    pub fn new(
        config: SchedulerConfig,
        monitor: Arc<dyn ResourceMonitor>,
        host: Rc<dyn IdleHost>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "Scheduler created with monitor '{}': {:?}",
            monitor.monitor_id(),
            config
        );
        Ok(Self {
            shared: Rc::new(Shared {
                config,
                monitor,
                host,
                queue: DeferredQueue::new(),
                mode: Cell::new(SchedulerMode::RealTime),
                waiting_since: Cell::new(None),
                closed: Cell::new(false),
            }),
        })
    }

    /// Submits a task.
    ///
    /// The task runs inline if it is `critical` or the current tier is
    /// permissive; otherwise it is queued and, if no drain is pending, one is
    /// requested with the configured timeout ceiling.
    ///
    /// An inline task's error is returned as [`SchedulerError::TaskFailed`].
    pub fn submit(&self, task: Task, critical: bool) -> Result<Submission, SchedulerError> {
        let shared = &self.shared;
        if shared.closed.get() {
            return Err(SchedulerError::Closed);
        }

        let state = shared.monitor.sample();
        if critical || state.tier.is_permissive() {
            log::trace!(
                "Running task inline (critical={}, tier={:?}).",
                critical,
                state.tier
            );
            task().map_err(SchedulerError::TaskFailed)?;
            return Ok(Submission::Executed);
        }

        shared.queue.enqueue(task);
        log::trace!(
            "Deferred task under {:?}; backlog is {}.",
            state.tier,
            shared.queue.len()
        );

        if shared.mode.get() == SchedulerMode::RealTime {
            shared.waiting_since.set(Some(Instant::now()));
            shared.request_drain(shared.config.idle_timeout());
            log::debug!("Scheduler: Real-time -> Deferred ({:?}).", state.tier);
        }
        Ok(Submission::Deferred)
    }

    /// Returns `true` while a drain request is outstanding.
    pub fn is_deferred_mode_active(&self) -> bool {
        matches!(self.shared.mode.get(), SchedulerMode::Deferred { .. })
    }

    /// The current mode.
    pub fn mode(&self) -> SchedulerMode {
        self.shared.mode.get()
    }

    /// Number of tasks waiting in the backlog.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// The configuration this scheduler runs with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.shared.config
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has run.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.get()
    }

    /// Tears the scheduler down.
    ///
    /// Cancels the outstanding drain request, drops the backlog without
    /// running it and rejects further submissions. Calling it again is a no-op.
    pub fn shutdown(&self) {
        let shared = &self.shared;
        if shared.closed.replace(true) {
            return;
        }

        if let SchedulerMode::Deferred { handle } = shared.mode.replace(SchedulerMode::RealTime) {
            shared.host.cancel_idle_slice(handle);
        }
        shared.waiting_since.set(None);

        let dropped = shared.queue.clear();
        log::info!("Scheduler shut down; dropped {} deferred task(s).", dropped);
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    /// Asks the host for an idle slice and records the request as outstanding.
    fn request_drain(self: &Rc<Self>, timeout: Duration) {
        let weak = Rc::downgrade(self);
        let handle = self.host.request_idle_slice(
            Box::new(move |deadline: &dyn IdleDeadline| match weak.upgrade() {
                Some(shared) => shared.run_drain_pass(deadline),
                None => Ok(()),
            }),
            timeout,
        );
        self.mode.set(SchedulerMode::Deferred { handle });
    }

    /// Runs one drain pass and arranges the next one if work remains.
    fn run_drain_pass(self: &Rc<Self>, deadline: &dyn IdleDeadline) -> anyhow::Result<()> {
        if self.closed.get() {
            return Ok(());
        }

        let tier = self.monitor.sample().tier;
        let min_task_time = self.config.min_task_time_for(tier);
        let result = self
            .queue
            .drain(deadline, min_task_time, self.config.max_tasks_per_slice);

        // The request that brought us here has fired; replace or clear it
        // before reporting anything so the backlog is never stranded.
        let progressed = match &result {
            Ok(report) => report.executed > 0,
            Err(_) => true,
        };
        if self.queue.is_empty() {
            self.mode.set(SchedulerMode::RealTime);
            self.waiting_since.set(None);
            log::debug!("Scheduler: Deferred -> Real-time (backlog drained).");
        } else if progressed {
            self.waiting_since.set(Some(Instant::now()));
            self.request_drain(self.config.idle_timeout());
        } else {
            // The ceiling keeps counting from when the backlog last moved.
            let waited = self
                .waiting_since
                .get()
                .map_or(Duration::ZERO, |since| since.elapsed());
            self.request_drain(self.config.idle_timeout().saturating_sub(waited));
        }

        match result {
            Ok(report) => {
                log::trace!(
                    "Drain pass under {:?} (forced={}): ran {}, {} remaining.",
                    tier,
                    deadline.did_timeout(),
                    report.executed,
                    report.remaining
                );
                Ok(())
            }
            Err(failure) => {
                log::warn!(
                    "Deferred task failed: {:#}. {} task(s) remain queued.",
                    failure.source,
                    self.queue.len()
                );
                Err(SchedulerError::from(failure).into())
            }
        }
    }
}
