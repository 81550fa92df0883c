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

//! An in-memory renderer that records the commands it receives.

use ebb_core::math::{Color, Point};
use ebb_core::renderer::{RenderError, StrokeRenderer};

/// One call made on a [`RecordingRenderer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeCommand {
    /// `begin_stroke` was called.
    Begin {
        /// Where the stroke starts.
        point: Point,
        /// Stroke color.
        color: Color,
        /// Stroke width in surface pixels.
        width: f32,
    },
    /// `extend_stroke` was called.
    Extend(Point),
    /// `end_stroke` was called.
    End,
    /// `clear` was called.
    Clear,
}

/// A [`StrokeRenderer`] that draws nothing and keeps a log of its commands.
///
/// Headless hosts and tests use it to observe exactly what scheduled tasks
/// did. An `Extend` outside an open stroke is recorded like any other; a
/// surface would simply append it to its current path.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<StrokeCommand>,
    stroke_open: bool,
    fail_next: Option<String>,
}

impl RecordingRenderer {
    /// Creates an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command received so far, oldest first.
    pub fn commands(&self) -> &[StrokeCommand] {
        &self.commands
    }

    /// Returns and forgets the recorded commands.
    pub fn take_commands(&mut self) -> Vec<StrokeCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of strokes started so far.
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, StrokeCommand::Begin { .. }))
            .count()
    }

    /// Returns `true` between a `begin_stroke` and the matching `end_stroke` or `clear`.
    pub fn is_stroke_open(&self) -> bool {
        self.stroke_open
    }

    /// Makes the next call fail with [`RenderError::SurfaceUnavailable`].
    pub fn fail_next(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    fn check_surface(&mut self) -> Result<(), RenderError> {
        match self.fail_next.take() {
            Some(reason) => Err(RenderError::SurfaceUnavailable(reason)),
            None => Ok(()),
        }
    }
}

impl StrokeRenderer for RecordingRenderer {
    fn begin_stroke(&mut self, point: Point, color: Color, width: f32) -> Result<(), RenderError> {
        self.check_surface()?;
        // Also rejects NaN.
        if !(width > 0.0) {
            return Err(RenderError::InvalidWidth(width));
        }
        self.commands.push(StrokeCommand::Begin { point, color, width });
        self.stroke_open = true;
        Ok(())
    }

    fn extend_stroke(&mut self, point: Point) -> Result<(), RenderError> {
        self.check_surface()?;
        self.commands.push(StrokeCommand::Extend(point));
        Ok(())
    }

    fn end_stroke(&mut self) -> Result<(), RenderError> {
        self.check_surface()?;
        self.commands.push(StrokeCommand::End);
        self.stroke_open = false;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.check_surface()?;
        self.commands.push(StrokeCommand::Clear);
        self.stroke_open = false;
        Ok(())
    }
}
