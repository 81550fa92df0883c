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

//! A freehand drawing session driven by the adaptive scheduler.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;
use std::sync::Arc;

use ebb_control::policy::{effective_stroke_width, should_skip_point};
use ebb_control::{ConfigError, Scheduler, SchedulerConfig, SchedulerError, Submission};
use ebb_core::math::color::ParseColorError;
use ebb_core::math::{Color, Point};
use ebb_core::platform::IdleHost;
use ebb_core::renderer::StrokeRenderer;
use ebb_core::task::task;
use ebb_core::telemetry::ResourceMonitor;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::status::StatusLine;

/// Smallest brush size the toolbar accepts.
pub const MIN_BRUSH_SIZE: f32 = 1.0;
/// Largest brush size the toolbar accepts.
pub const MAX_BRUSH_SIZE: f32 = 50.0;

/// The user's current brush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSettings {
    /// Stroke color.
    pub color: Color,
    /// Requested stroke width, before any tier policy is applied.
    pub size: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 3.0,
        }
    }
}

/// Pointer and toolbar handlers for one drawing surface.
///
/// Stroke boundaries (`start_drawing`, `stop_drawing`) and `clear_canvas` are
/// critical and always hit the renderer immediately. Intermediate points from
/// `draw` are ordinary work: under a constrained connection they wait for
/// idle time, and some are dropped by the point-skip policy when they run.
pub struct DrawingSession<R: StrokeRenderer + 'static> {
    scheduler: Scheduler,
    monitor: Arc<dyn ResourceMonitor>,
    renderer: Rc<RefCell<R>>,
    brush: Cell<BrushSettings>,
    drawing: Rc<Cell<bool>>,
    rng: Rc<RefCell<StdRng>>,
}

impl<R: StrokeRenderer + 'static> DrawingSession<R> {
    /// Creates a session whose point-skip policy draws from OS entropy.
    pub fn new(
        renderer: R,
        monitor: Arc<dyn ResourceMonitor>,
        host: Rc<dyn IdleHost>,
        config: SchedulerConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(renderer, monitor, host, config, StdRng::from_os_rng())
    }

    /// Creates a session with a reproducible point-skip sequence.
    pub fn with_seed(
        renderer: R,
        monitor: Arc<dyn ResourceMonitor>,
        host: Rc<dyn IdleHost>,
        config: SchedulerConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(renderer, monitor, host, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        renderer: R,
        monitor: Arc<dyn ResourceMonitor>,
        host: Rc<dyn IdleHost>,
        config: SchedulerConfig,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        let scheduler = Scheduler::new(config, monitor.clone(), host)?;
        Ok(Self {
            scheduler,
            monitor,
            renderer: Rc::new(RefCell::new(renderer)),
            brush: Cell::new(BrushSettings::default()),
            drawing: Rc::new(Cell::new(false)),
            rng: Rc::new(RefCell::new(rng)),
        })
    }

    /// Pointer down: begins a stroke at `point` with the tier-adjusted width.
    pub fn start_drawing(&self, point: Point) -> Result<Submission, SchedulerError> {
        let brush = self.brush.get();
        let monitor = Arc::clone(&self.monitor);
        let renderer = Rc::clone(&self.renderer);
        let drawing = Rc::clone(&self.drawing);

        self.scheduler.submit(
            task(move || {
                let width = effective_stroke_width(&monitor.sample(), brush.size);
                renderer.borrow_mut().begin_stroke(point, brush.color, width)?;
                drawing.set(true);
                Ok(())
            }),
            true,
        )
    }

    /// Pointer move: extends the open stroke to `point`.
    ///
    /// Returns `Ok(None)` without scheduling anything when no stroke is open.
    pub fn draw(&self, point: Point) -> Result<Option<Submission>, SchedulerError> {
        if !self.drawing.get() {
            return Ok(None);
        }

        let monitor = Arc::clone(&self.monitor);
        let renderer = Rc::clone(&self.renderer);
        let rng = Rc::clone(&self.rng);

        self.scheduler
            .submit(
                task(move || {
                    // Decided when the point is drawn, against the tier at that moment.
                    if should_skip_point(&monitor.sample(), &mut *rng.borrow_mut()) {
                        log::trace!("Skipped point {:?}.", point);
                        return Ok(());
                    }
                    renderer.borrow_mut().extend_stroke(point)?;
                    Ok(())
                }),
                false,
            )
            .map(Some)
    }

    /// Pointer up or leave: closes the open stroke, if any.
    pub fn stop_drawing(&self) -> Result<Submission, SchedulerError> {
        let renderer = Rc::clone(&self.renderer);
        let drawing = Rc::clone(&self.drawing);

        self.scheduler.submit(
            task(move || {
                if drawing.replace(false) {
                    renderer.borrow_mut().end_stroke()?;
                }
                Ok(())
            }),
            true,
        )
    }

    /// Erases the surface.
    pub fn clear_canvas(&self) -> Result<Submission, SchedulerError> {
        let renderer = Rc::clone(&self.renderer);
        self.scheduler.submit(
            task(move || {
                renderer.borrow_mut().clear()?;
                Ok(())
            }),
            true,
        )
    }

    /// Sets the brush color used by the next stroke.
    pub fn set_color(&self, color: Color) {
        self.update_brush(|brush| brush.color = color);
    }

    /// Sets the brush color from a `#RRGGBB` string.
    pub fn set_color_hex(&self, hex: &str) -> Result<(), ParseColorError> {
        let color = Color::from_hex(hex)?;
        self.set_color(color);
        Ok(())
    }

    /// Sets the brush size used by the next stroke, clamped to
    /// [`MIN_BRUSH_SIZE`]`..=`[`MAX_BRUSH_SIZE`]. Non-finite sizes are ignored.
    pub fn set_brush_size(&self, size: f32) {
        if !size.is_finite() {
            log::warn!("Ignoring non-finite brush size {}.", size);
            return;
        }
        let size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        self.update_brush(|brush| brush.size = size);
    }

    /// The current brush.
    pub fn brush(&self) -> BrushSettings {
        self.brush.get()
    }

    /// Returns `true` between a successful `start_drawing` and `stop_drawing`.
    pub fn is_drawing(&self) -> bool {
        self.drawing.get()
    }

    /// The status readout for the current conditions.
    pub fn status(&self) -> StatusLine {
        StatusLine::new(&self.monitor.sample(), self.scheduler.is_deferred_mode_active())
    }

    /// The scheduler driving this session.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Borrows the renderer.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a task that is currently drawing.
    pub fn renderer(&self) -> Ref<'_, R> {
        self.renderer.borrow()
    }

    /// Mutably borrows the renderer, e.g. to resize or replace its surface.
    ///
    /// # Panics
    ///
    /// Panics if the renderer is already borrowed.
    pub fn renderer_mut(&self) -> RefMut<'_, R> {
        self.renderer.borrow_mut()
    }

    fn update_brush(&self, f: impl FnOnce(&mut BrushSettings)) {
        let mut brush = self.brush.get();
        f(&mut brush);
        self.brush.set(brush);
    }
}
