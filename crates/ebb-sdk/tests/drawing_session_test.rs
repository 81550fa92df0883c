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

use ebb_sdk::prelude::*;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

// --- Test Setup ---
struct Rig {
    session: DrawingSession<RecordingRenderer>,
    host: Rc<FrameIdleHost>,
    source: Rc<ChannelSignalSource>,
    _attachment: MonitorAttachment,
}

impl Rig {
    fn new(effective_type: &str) -> Self {
        let monitor = Arc::new(NetworkMonitor::new("network"));
        let source = Rc::new(ChannelSignalSource::with_initial(
            NetworkUpdate::effective(effective_type).with_downlink(1.5),
        ));
        let attachment = attach(monitor.clone(), source.clone());
        let host = Rc::new(FrameIdleHost::new());
        let session = DrawingSession::with_seed(
            RecordingRenderer::new(),
            monitor,
            host.clone(),
            SchedulerConfig::default(),
            42,
        )
        .unwrap();
        Self {
            session,
            host,
            source,
            _attachment: attachment,
        }
    }

    /// Fires every outstanding idle request as if its ceiling had elapsed.
    fn force_idle(&self) {
        let report = self
            .host
            .run_expired_at(Instant::now() + Duration::from_secs(5));
        assert!(report.failures.is_empty());
    }

    fn extends(&self) -> Vec<Point> {
        self.session
            .renderer()
            .commands()
            .iter()
            .filter_map(|c| match c {
                StrokeCommand::Extend(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

fn path(n: usize) -> Vec<Point> {
    (0..n).map(|i| Point::new(i as f32, (i * 2) as f32)).collect()
}
// ---

#[test]
fn test_fast_tier_draws_every_point_inline() {
    let rig = Rig::new("4g");
    rig.session.set_brush_size(1.0);

    rig.session.start_drawing(Point::ORIGIN).unwrap();
    for point in path(50) {
        assert_eq!(rig.session.draw(point).unwrap(), Some(Submission::Executed));
    }
    rig.session.stop_drawing().unwrap();

    assert_eq!(rig.extends(), path(50));
    assert_eq!(rig.host.pending_count(), 0);
    let commands = rig.session.renderer();
    assert!(matches!(
        commands.commands().first(),
        Some(StrokeCommand::Begin { width, .. }) if *width == 1.0
    ));
    assert_eq!(commands.commands().last(), Some(&StrokeCommand::End));
}

#[test]
fn test_slow_tier_defers_and_thins_points() {
    let rig = Rig::new("2g");
    rig.session.set_brush_size(1.0);

    assert_eq!(rig.session.start_drawing(Point::ORIGIN).unwrap(), Submission::Executed);
    for point in path(200) {
        assert_eq!(rig.session.draw(point).unwrap(), Some(Submission::Deferred));
    }
    assert!(rig.session.status().to_string().ends_with("Mode: Optimized"));
    assert_eq!(rig.session.scheduler().pending(), 200);

    rig.force_idle();

    let drawn = rig.extends();
    // Roughly 30% dropped, survivors keep their order.
    assert!(drawn.len() > 100 && drawn.len() < 180, "drew {}", drawn.len());
    let all = path(200);
    let mut cursor = all.iter();
    assert!(drawn.iter().all(|p| cursor.any(|q| q == p)));

    let begin = rig.session.renderer().commands()[0];
    assert!(matches!(begin, StrokeCommand::Begin { width, .. } if width == 3.0));
    assert!(!rig.session.scheduler().is_deferred_mode_active());
}

#[test]
fn test_stroke_end_overtakes_pending_points() {
    let rig = Rig::new("3g");
    rig.session.start_drawing(Point::ORIGIN).unwrap();
    rig.session.draw(Point::new(1.0, 1.0)).unwrap();
    rig.session.draw(Point::new(2.0, 2.0)).unwrap();
    assert_eq!(rig.session.stop_drawing().unwrap(), Submission::Executed);

    {
        let renderer = rig.session.renderer();
        assert_eq!(renderer.commands().len(), 2);
        assert_eq!(renderer.commands()[1], StrokeCommand::End);
    }

    // Late points are still delivered once the host is idle.
    rig.force_idle();
    assert!(rig.extends().len() <= 2);
    assert_eq!(rig.session.scheduler().pending(), 0);
}

#[test]
fn test_tier_change_from_sensor_reaches_session() {
    let rig = Rig::new("4g");
    assert_eq!(
        rig.session.status().to_string(),
        "Network: 4G | Quality: High (4G+) | Speed: ~1.5 Mbps | Mode: Real-time"
    );

    rig.source.publish(NetworkUpdate::effective("slow-2g").with_downlink(0.2));
    assert_eq!(rig.source.pump(), 1);

    rig.session.start_drawing(Point::ORIGIN).unwrap();
    assert_eq!(
        rig.session.draw(Point::new(3.0, 3.0)).unwrap(),
        Some(Submission::Deferred)
    );
    assert_eq!(
        rig.session.status().to_string(),
        "Network: 2G | Quality: Low (2G) | Speed: ~0.2 Mbps | Mode: Optimized"
    );
}

#[test]
fn test_clear_runs_immediately_under_any_tier() {
    for effective_type in ["2g", "3g", "4g"] {
        let rig = Rig::new(effective_type);
        assert_eq!(rig.session.clear_canvas().unwrap(), Submission::Executed);
        assert_eq!(rig.session.renderer().commands(), &[StrokeCommand::Clear]);
    }
}

#[test]
fn test_deferred_render_failure_reaches_host_without_losing_later_points() {
    let rig = Rig::new("3g");
    rig.session.start_drawing(Point::ORIGIN).unwrap();
    for x in 1..=3 {
        assert_eq!(
            rig.session.draw(Point::new(x as f32, 0.0)).unwrap(),
            Some(Submission::Deferred)
        );
    }
    assert_eq!(rig.session.scheduler().pending(), 3);

    // Back on a fast link nothing is skipped, so the first point hits the broken surface.
    rig.source.publish(NetworkUpdate::effective("4g"));
    assert_eq!(rig.source.pump(), 1);
    rig.session.renderer_mut().fail_next("context lost");

    let mut failures = 0;
    let mut passes = 0;
    while rig.host.pending_count() > 0 {
        let report = rig.host.run_expired_at(Instant::now() + Duration::from_secs(5));
        failures += report.failures.len();
        passes += 1;
        assert!(passes < 10);
    }

    assert_eq!(failures, 1);
    assert_eq!(rig.extends(), vec![Point::new(2.0, 0.0), Point::new(3.0, 0.0)]);
    assert!(rig.session.is_drawing());
    assert_eq!(rig.session.scheduler().pending(), 0);
    assert!(!rig.session.scheduler().is_deferred_mode_active());
}
