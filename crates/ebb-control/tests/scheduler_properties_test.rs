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

use anyhow::Result;
use ebb_control::{Scheduler, SchedulerConfig, SchedulerError, SchedulerMode, Submission};
use ebb_core::platform::{FixedDeadline, IdleCallback, IdleHost, IdleRequestId};
use ebb_core::task::task;
use ebb_core::telemetry::{NetworkUpdate, ResourceMonitor};
use ebb_telemetry::NetworkMonitor;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

// --- Test Setup: a host that only runs slices when told to ---
#[derive(Default)]
struct ScriptedHost {
    next_id: Cell<u64>,
    pending: RefCell<Vec<(IdleRequestId, IdleCallback)>>,
    cancelled: RefCell<Vec<IdleRequestId>>,
}

impl ScriptedHost {
    fn outstanding(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Runs the oldest outstanding request with `deadline`.
    fn run_next(&self, deadline: FixedDeadline) -> Option<Result<()>> {
        let next = {
            let mut pending = self.pending.borrow_mut();
            (!pending.is_empty()).then(|| pending.remove(0))
        };
        next.map(|(_, callback)| callback(&deadline))
    }
}

impl IdleHost for ScriptedHost {
    fn request_idle_slice(&self, callback: IdleCallback, _timeout: Duration) -> IdleRequestId {
        let id = IdleRequestId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.pending.borrow_mut().push((id, callback));
        id
    }

    fn cancel_idle_slice(&self, id: IdleRequestId) {
        self.pending.borrow_mut().retain(|(pending, _)| *pending != id);
        self.cancelled.borrow_mut().push(id);
    }
}

struct Harness {
    scheduler: Scheduler,
    monitor: Arc<NetworkMonitor>,
    host: Rc<ScriptedHost>,
    log: Rc<RefCell<Vec<u32>>>,
}

impl Harness {
    fn new(effective_type: &str, config: SchedulerConfig) -> Self {
        let monitor = Arc::new(NetworkMonitor::new("test-network"));
        monitor.on_update(&NetworkUpdate::effective(effective_type));
        let host = Rc::new(ScriptedHost::default());
        let scheduler = Scheduler::new(config, monitor.clone(), host.clone()).unwrap();
        Self {
            scheduler,
            monitor,
            host,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn submit(&self, value: u32, critical: bool) -> Submission {
        let log = Rc::clone(&self.log);
        self.scheduler
            .submit(
                task(move || {
                    log.borrow_mut().push(value);
                    Ok(())
                }),
                critical,
            )
            .unwrap()
    }

    fn ran(&self) -> Vec<u32> {
        self.log.borrow().clone()
    }
}
// ---

#[test]
fn test_critical_tasks_run_in_submission_order_on_every_tier() {
    for effective_type in ["slow-2g", "2g", "3g", "4g"] {
        let harness = Harness::new(effective_type, SchedulerConfig::default());
        for i in 0..5 {
            assert_eq!(harness.submit(i, true), Submission::Executed);
        }
        assert_eq!(harness.ran(), vec![0, 1, 2, 3, 4], "tier {effective_type}");
        assert_eq!(harness.host.outstanding(), 0);
        assert!(!harness.scheduler.is_deferred_mode_active());
    }
}

#[test]
fn test_fast_tier_never_enqueues() {
    let harness = Harness::new("4g", SchedulerConfig::default());
    for i in 0..10 {
        assert_eq!(harness.submit(i, false), Submission::Executed);
        assert_eq!(harness.scheduler.pending(), 0);
    }
    assert_eq!(harness.ran().len(), 10);
    assert_eq!(harness.host.outstanding(), 0);
}

#[test]
fn test_unknown_tier_runs_inline() {
    let monitor = Arc::new(NetworkMonitor::new("fresh"));
    let host = Rc::new(ScriptedHost::default());
    let scheduler = Scheduler::new(SchedulerConfig::default(), monitor, host.clone()).unwrap();

    let outcome = scheduler.submit(task(|| Ok(())), false).unwrap();
    assert_eq!(outcome, Submission::Executed);
    assert_eq!(host.outstanding(), 0);
}

#[test]
fn test_constrained_tiers_defer_fifo_exactly_once() {
    for effective_type in ["2g", "3g"] {
        let harness = Harness::new(effective_type, SchedulerConfig::default());
        for i in 0..6 {
            assert_eq!(harness.submit(i, false), Submission::Deferred);
        }
        assert!(harness.ran().is_empty());
        assert_eq!(harness.host.outstanding(), 1);

        // Keep offering generous slices until the scheduler stops asking.
        while let Some(result) = harness.host.run_next(FixedDeadline::idle(Duration::from_millis(50))) {
            result.unwrap();
        }

        assert_eq!(harness.ran(), vec![0, 1, 2, 3, 4, 5], "tier {effective_type}");
        assert_eq!(harness.scheduler.mode(), SchedulerMode::RealTime);
    }
}

#[test]
fn test_critical_task_overtakes_backlog() {
    let harness = Harness::new("2g", SchedulerConfig::default());
    harness.submit(1, false);
    harness.submit(2, false);
    assert_eq!(harness.submit(99, true), Submission::Executed);
    harness.submit(3, false);

    harness.host.run_next(FixedDeadline::forced()).unwrap().unwrap();
    assert_eq!(harness.ran(), vec![99, 1, 2, 3]);
}

#[test]
fn test_draining_empty_queue_is_noop() {
    let harness = Harness::new("3g", SchedulerConfig::default());
    harness.submit(1, false);
    harness.host.run_next(FixedDeadline::forced()).unwrap().unwrap();
    assert_eq!(harness.scheduler.mode(), SchedulerMode::RealTime);

    // Nothing left to run and nothing requested.
    assert!(harness.host.run_next(FixedDeadline::forced()).is_none());
    assert_eq!(harness.scheduler.mode(), SchedulerMode::RealTime);
    assert_eq!(harness.host.outstanding(), 0);
    assert_eq!(harness.ran(), vec![1]);
}

#[test]
fn test_forced_passes_drain_within_bound() {
    const N: usize = 23;
    const PER_SLICE: usize = 5;
    let config = SchedulerConfig {
        max_tasks_per_slice: Some(PER_SLICE),
        ..Default::default()
    };
    let harness = Harness::new("2g", config);
    for i in 0..N as u32 {
        harness.submit(i, false);
    }

    let mut passes = 0;
    while let Some(result) = harness.host.run_next(FixedDeadline::forced()) {
        result.unwrap();
        passes += 1;
    }

    assert_eq!(passes, N.div_ceil(PER_SLICE));
    assert_eq!(harness.ran(), (0..N as u32).collect::<Vec<_>>());
    assert!(!harness.scheduler.is_deferred_mode_active());
}

#[test]
fn test_single_forced_pass_empties_medium_backlog() {
    let harness = Harness::new("3g", SchedulerConfig::default());
    for i in 0..3 {
        harness.submit(i, false);
    }
    assert!(harness.scheduler.is_deferred_mode_active());

    let deadline = FixedDeadline {
        remaining: Duration::from_millis(50),
        forced: true,
    };
    harness.host.run_next(deadline).unwrap().unwrap();

    assert_eq!(harness.ran(), vec![0, 1, 2]);
    assert_eq!(harness.scheduler.pending(), 0);
    assert_eq!(harness.scheduler.mode(), SchedulerMode::RealTime);
    assert_eq!(harness.host.outstanding(), 0);
}

#[test]
fn test_failed_task_does_not_strand_the_backlog() {
    let harness = Harness::new("2g", SchedulerConfig::default());
    harness.submit(1, false);
    harness
        .scheduler
        .submit(task(|| Err(anyhow::anyhow!("surface lost"))), false)
        .unwrap();
    harness.submit(3, false);

    let err = harness
        .host
        .run_next(FixedDeadline::forced())
        .unwrap()
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchedulerError>(),
        Some(SchedulerError::Drain(failure)) if failure.executed == 1
    ));
    assert_eq!(harness.ran(), vec![1]);
    assert!(harness.scheduler.is_deferred_mode_active());

    harness.host.run_next(FixedDeadline::forced()).unwrap().unwrap();
    assert_eq!(harness.ran(), vec![1, 3]);
    assert_eq!(harness.scheduler.mode(), SchedulerMode::RealTime);
}

#[test]
fn test_tier_change_mid_backlog_applies_to_new_submissions() {
    let harness = Harness::new("2g", SchedulerConfig::default());
    harness.submit(1, false);
    harness.monitor.on_update(&NetworkUpdate::effective("4g"));

    // Fast now: inline, ahead of the backlog.
    assert_eq!(harness.submit(2, false), Submission::Executed);
    assert!(harness.scheduler.is_deferred_mode_active());

    harness.host.run_next(FixedDeadline::idle(Duration::from_millis(40))).unwrap().unwrap();
    assert_eq!(harness.ran(), vec![2, 1]);
}

#[test]
fn test_task_submitted_from_a_drain_runs_later_in_order() {
    let harness = Rc::new(Harness::new("2g", SchedulerConfig::default()));
    {
        let inner = Rc::downgrade(&harness);
        harness
            .scheduler
            .submit(
                task(move || {
                    if let Some(harness) = inner.upgrade() {
                        harness.log.borrow_mut().push(0);
                        harness.submit(2, false);
                    }
                    Ok(())
                }),
                false,
            )
            .unwrap();
    }
    harness.submit(1, false);

    harness.host.run_next(FixedDeadline::forced()).unwrap().unwrap();
    assert_eq!(harness.ran(), vec![0, 1, 2]);
    assert_eq!(harness.host.outstanding(), 0);
}

#[test]
fn test_shutdown_cancels_request_and_drops_backlog() {
    let harness = Harness::new("2g", SchedulerConfig::default());
    harness.submit(1, false);
    harness.submit(2, false);
    let SchedulerMode::Deferred { handle } = harness.scheduler.mode() else {
        panic!("expected a pending drain request");
    };

    harness.scheduler.shutdown();

    assert_eq!(*harness.host.cancelled.borrow(), vec![handle]);
    assert_eq!(harness.host.outstanding(), 0);
    assert!(harness.ran().is_empty());
    assert!(matches!(
        harness.scheduler.submit(task(|| Ok(())), false),
        Err(SchedulerError::Closed)
    ));
}
