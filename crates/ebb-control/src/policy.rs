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

//! Renderer-facing quality policies.
//!
//! Tasks consult these before touching the renderer. They are pure functions
//! of the sampled [`ResourceState`]; randomness is injected by the caller.
//!
//! | Tier | Stroke width | Points skipped |
//! |---|---|---|
//! | Slow | `max(width, 3)` | 30 % |
//! | Medium | unchanged | 10 % |
//! | Fast / Unknown | unchanged | never |

use ebb_core::telemetry::{ConnectionTier, ResourceState};
use rand::Rng;

/// Minimum stroke width under the `Slow` tier, in surface pixels.
pub const SLOW_STROKE_WIDTH_FLOOR: f32 = 3.0;

/// A point is kept under `Slow` when a uniform sample in `[0, 1)` is at most this.
pub const SLOW_KEEP_CUTOFF: f64 = 0.7;

/// A point is kept under `Medium` when a uniform sample in `[0, 1)` is at most this.
pub const MEDIUM_KEEP_CUTOFF: f64 = 0.9;

/// Returns the stroke width to draw with.
///
/// Under `Slow` the user's width is raised to [`SLOW_STROKE_WIDTH_FLOOR`] so
/// decimated strokes stay visible; other tiers use it unchanged.
pub fn effective_stroke_width(state: &ResourceState, user_width: f32) -> f32 {
    match state.tier {
        ConnectionTier::Slow => user_width.max(SLOW_STROKE_WIDTH_FLOOR),
        ConnectionTier::Medium | ConnectionTier::Fast | ConnectionTier::Unknown => user_width,
    }
}

fn keep_cutoff(tier: ConnectionTier) -> Option<f64> {
    match tier {
        ConnectionTier::Slow => Some(SLOW_KEEP_CUTOFF),
        ConnectionTier::Medium => Some(MEDIUM_KEEP_CUTOFF),
        ConnectionTier::Fast | ConnectionTier::Unknown => None,
    }
}

/// The probability that [`should_skip_point`] drops a sample under `tier`.
pub fn skip_probability(tier: ConnectionTier) -> f64 {
    keep_cutoff(tier).map_or(0.0, |cutoff| 1.0 - cutoff)
}

/// Decides whether a pointer sample should be dropped.
///
/// Under `Fast` and `Unknown` this always returns `false` without touching
/// `rng`.
pub fn should_skip_point<R: Rng>(state: &ResourceState, rng: &mut R) -> bool {
    match keep_cutoff(state.tier) {
        Some(cutoff) => rng.random::<f64>() > cutoff,
        None => false,
    }
}
