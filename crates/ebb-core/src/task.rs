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

//! The unit of work handled by the scheduler.

/// An opaque, zero-argument unit of work with a side effect.
///
/// A task is owned by whichever queue holds it, moved out when it is invoked,
/// and dropped afterwards. It is never retried.
pub type Task = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// Boxes a closure into a [`Task`].
pub fn task<F>(f: F) -> Task
where
    F: FnOnce() -> anyhow::Result<()> + 'static,
{
    Box::new(f)
}
