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

//! The public-facing SDK for Ebb.
//!
//! Wires a [`Scheduler`](ebb_control::Scheduler) to a renderer and exposes
//! the pointer and toolbar handlers of a freehand drawing surface that keeps
//! responding as network conditions degrade.

#![warn(missing_docs)]

pub use ebb_telemetry::logging;

pub mod session;
pub mod status;

pub use session::{BrushSettings, DrawingSession};
pub use status::StatusLine;

/// The types a drawing surface needs, from every layer.
pub mod prelude {
    pub use crate::{BrushSettings, DrawingSession, StatusLine};
    pub use ebb_control::{
        Scheduler, SchedulerConfig, SchedulerError, SchedulerMode, Submission,
    };
    pub use ebb_core::math::{Color, Point};
    pub use ebb_core::platform::{IdleHost, SignalSource};
    pub use ebb_core::renderer::{RenderError, StrokeRenderer};
    pub use ebb_core::telemetry::{ConnectionTier, NetworkUpdate, ResourceMonitor, ResourceState};
    pub use ebb_infra::{ChannelSignalSource, FrameIdleHost, RecordingRenderer, StrokeCommand};
    pub use ebb_telemetry::{attach, MonitorAttachment, NetworkMonitor};
}
