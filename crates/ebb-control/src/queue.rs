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

//! FIFO buffering of deferred work with cooperative, time-sliced draining.

use crate::error::TaskFailure;
use ebb_core::platform::IdleDeadline;
use ebb_core::Task;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Outcome of one bounded drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Tasks run during the pass.
    pub executed: usize,
    /// Tasks still queued after the pass.
    pub remaining: usize,
    /// `true` if the pass stopped on the slice budget or the per-pass cap
    /// while work was still queued.
    pub budget_exhausted: bool,
}

/// An ordered queue of pending tasks.
///
/// The queue uses interior mutability and only borrows its storage for the
/// duration of a push or pop. A task may therefore enqueue more work while a
/// drain pass is running it; that work lands at the tail.
#[derive(Default)]
pub struct DeferredQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl DeferredQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task to the tail.
    ///
    /// Returns `true` if the queue was empty before the push; the caller
    /// decides whether a drain pass must be arranged.
    pub fn enqueue(&self, task: Task) -> bool {
        let mut tasks = self.tasks.borrow_mut();
        let was_empty = tasks.is_empty();
        tasks.push_back(task);
        was_empty
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Drops every queued task without running it and returns how many there were.
    pub fn clear(&self) -> usize {
        let dropped: Vec<Task> = self.tasks.borrow_mut().drain(..).collect();
        dropped.len()
    }

    /// Runs queued tasks from the head for as long as the slice allows.
    ///
    /// Before each pop the pass continues only while the deadline has more
    /// than `min_task_time` left or was forced by its timeout, and while fewer
    /// than `max_tasks` tasks have run. Each task is removed before it is
    /// invoked and is never re-queued.
    ///
    /// The first task error ends the pass and is returned; it is not caught.
    /// This never blocks.
    pub fn drain(
        &self,
        deadline: &dyn IdleDeadline,
        min_task_time: Duration,
        max_tasks: Option<usize>,
    ) -> Result<DrainReport, TaskFailure> {
        let mut executed = 0;
        let mut budget_exhausted = false;

        loop {
            if self.is_empty() {
                break;
            }
            if max_tasks.is_some_and(|cap| executed >= cap) {
                budget_exhausted = true;
                break;
            }
            if !deadline.did_timeout() && deadline.time_remaining() <= min_task_time {
                budget_exhausted = true;
                break;
            }

            let next = self.tasks.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };

            if let Err(source) = task() {
                return Err(TaskFailure { executed, source });
            }
            executed += 1;
        }

        Ok(DrainReport {
            executed,
            remaining: self.len(),
            budget_exhausted,
        })
    }
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("len", &self.len())
            .finish()
    }
}
