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

//! Errors raised by drawing surfaces.

use thiserror::Error;

/// An error raised by a [`StrokeRenderer`](super::StrokeRenderer) operation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The surface is gone or cannot be drawn to right now.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// A stroke was started with a width that cannot be drawn.
    #[error("invalid stroke width {0}")]
    InvalidWidth(f32),
}
