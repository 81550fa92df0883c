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

//! The drawing-surface contract that scheduled tasks invoke.
//!
//! The scheduler never calls a renderer itself; it only runs tasks that do.
//! Concrete surfaces live in `ebb-infra`.

mod error;

pub use self::error::RenderError;

use crate::math::{Color, Point};

/// A surface that draws freehand strokes.
pub trait StrokeRenderer {
    /// Starts a new stroke at `point`.
    fn begin_stroke(&mut self, point: Point, color: Color, width: f32) -> Result<(), RenderError>;

    /// Extends the current path to `point` and strokes it.
    fn extend_stroke(&mut self, point: Point) -> Result<(), RenderError>;

    /// Closes the current path.
    fn end_stroke(&mut self) -> Result<(), RenderError>;

    /// Erases the whole surface.
    fn clear(&mut self) -> Result<(), RenderError>;
}
