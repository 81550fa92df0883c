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

//! Logger bootstrap for binaries.
//!
//! Libraries only use the `log` facade; a binary picks the backend once at
//! startup. The filter honours `RUST_LOG` and defaults to `info`.

use env_logger::{Builder, Env};

/// Installs the global logger, returning an error if one is already set.
pub fn try_init() -> Result<(), log::SetLoggerError> {
    Builder::from_env(Env::default().default_filter_or("info")).try_init()
}

/// Installs the global logger, ignoring an already-installed one.
pub fn init() {
    if try_init().is_err() {
        log::debug!("Logger already initialized.");
    }
}
