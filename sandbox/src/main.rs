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

// Ebb Sandbox
// Headless drawing session under a simulated network that degrades and recovers.
//
// Usage: sandbox [scheduler-config.json]

use std::f32::consts::TAU;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use ebb_sdk::prelude::*;

const FRAME: Duration = Duration::from_millis(16);
/// Simulated render work per frame; the rest of the frame is offered as idle time.
const FRAME_WORK: Duration = Duration::from_millis(5);
const FRAMES: u32 = 480;
const STROKE_FRAMES: u32 = 60;

/// The network the sensor thread reports, one phase after another.
fn sensor_script() -> Vec<(Duration, NetworkUpdate)> {
    let phase = FRAME * 120;
    vec![
        (
            phase,
            NetworkUpdate::effective("3g").with_downlink(1.4).with_rtt(270.0),
        ),
        (
            phase,
            NetworkUpdate::effective("2g")
                .with_downlink(0.25)
                .with_rtt(1400.0)
                .with_save_data(true),
        ),
        (
            phase,
            NetworkUpdate::effective("4g")
                .with_downlink(10.0)
                .with_rtt(50.0)
                .with_save_data(false),
        ),
    ]
}

/// A point on a circle traced by the simulated pointer.
fn pointer_at(frame: u32) -> Point {
    let angle = (frame % STROKE_FRAMES) as f32 / STROKE_FRAMES as f32 * TAU;
    let radius = 60.0 + (frame / STROKE_FRAMES) as f32 * 10.0;
    Point::new(200.0 + radius * angle.cos(), 150.0 + radius * angle.sin())
}

fn main() -> Result<()> {
    ebb_sdk::logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SchedulerConfig::load(path)?,
        None => SchedulerConfig::default(),
    };
    let flush_after = config.idle_timeout();

    let monitor = Arc::new(NetworkMonitor::new("network"));
    let source = Rc::new(ChannelSignalSource::with_initial(
        NetworkUpdate::effective("4g").with_downlink(10.0).with_rtt(50.0),
    ));
    let _attachment = attach(monitor.clone(), source.clone());

    let host = Rc::new(FrameIdleHost::new());
    let session = DrawingSession::new(RecordingRenderer::new(), monitor, host.clone(), config)?;
    session.set_color_hex("#1E88E5")?;
    session.set_brush_size(2.0);

    let sender = source.sender();
    let sensor = thread::spawn(move || {
        for (delay, update) in sensor_script() {
            thread::sleep(delay);
            if sender.send(update).is_err() {
                break;
            }
        }
    });

    log::info!("Sandbox: drawing for {} frames.", FRAMES);
    for frame in 0..FRAMES {
        let frame_start = Instant::now();

        source.pump();

        match frame % STROKE_FRAMES {
            0 => {
                session.start_drawing(pointer_at(frame))?;
            }
            f if f == STROKE_FRAMES - 1 => {
                session.stop_drawing()?;
            }
            _ => {
                session.draw(pointer_at(frame))?;
            }
        }

        thread::sleep(FRAME_WORK);
        host.run_idle_period(FRAME.saturating_sub(frame_start.elapsed()));
        host.run_expired();

        if frame % 30 == 0 {
            log::info!("[frame {:>3}] {}", frame, session.status());
        }
        thread::sleep(FRAME.saturating_sub(frame_start.elapsed()));
    }

    // Whatever is still queued is forced through before reporting.
    host.run_expired_at(Instant::now() + flush_after);
    sensor
        .join()
        .map_err(|_| anyhow!("sensor thread panicked"))?;

    let renderer = session.renderer();
    let points = renderer
        .commands()
        .iter()
        .filter(|c| matches!(c, StrokeCommand::Extend(_)))
        .count();
    log::info!(
        "Sandbox: {} stroke(s), {} point(s) drawn; final status: {}",
        renderer.stroke_count(),
        points,
        session.status()
    );
    Ok(())
}
