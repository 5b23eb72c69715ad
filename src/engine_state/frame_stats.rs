//! Once-a-second frame statistics: frame rate, faces drawn and where the
//! player is.

use cgmath::Point3;
use web_time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Figures for one reporting window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frames_per_second: f32,
    pub faces_per_second: f32,
    pub faces_per_frame: f32,
}

pub struct FrameStats {
    enabled: bool,
    window_start: Instant,
    frames: u32,
    faces: u64,
}

impl FrameStats {
    pub fn new(enabled: bool, now: Instant) -> Self {
        Self {
            enabled,
            window_start: now,
            frames: 0,
            faces: 0,
        }
    }

    #[cfg(test)]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        log::info!("Frame statistics {}", if self.enabled { "on" } else { "off" });
    }

    /// Counts a finished frame and the faces it drew.
    pub fn record_frame(&mut self, faces: usize) {
        self.frames += 1;
        self.faces += faces as u64;
    }

    /// Closes the window once a second has passed.
    ///
    /// Counters reset whether or not reporting is enabled, so turning it on
    /// never reports a stale window.
    ///
    /// # Returns
    /// The report when a window closed while enabled.
    pub fn end_window(&mut self, now: Instant, player_position: Point3<f32>) -> Option<FrameReport> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }

        let seconds = elapsed.as_secs_f32();
        let report = FrameReport {
            frames_per_second: self.frames as f32 / seconds,
            faces_per_second: self.faces as f32 / seconds,
            faces_per_frame: if self.frames == 0 { 0.0 } else { self.faces as f32 / self.frames as f32 },
        };

        self.window_start = now;
        self.frames = 0;
        self.faces = 0;

        if !self.enabled {
            return None;
        }

        log::info!(
            "{:.1} FPS, {:.1} faces/sec, {:.1} faces/frame, player at {:.0} {:.0} {:.0}",
            report.frames_per_second,
            report.faces_per_second,
            report.faces_per_frame,
            player_position.x,
            player_position.y,
            player_position.z
        );
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Point3<f32> {
        Point3::new(0.0, 0.0, 0.0)
    }

    #[test]
    fn reports_once_a_second() {
        let start = Instant::now();
        let mut stats = FrameStats::new(true, start);
        for _ in 0..4 {
            stats.record_frame(250);
        }

        assert_eq!(stats.end_window(start + Duration::from_millis(500), origin()), None);

        let report = stats
            .end_window(start + Duration::from_secs(2), origin())
            .expect("a full window has passed");
        assert_eq!(report.frames_per_second, 2.0);
        assert_eq!(report.faces_per_second, 500.0);
        assert_eq!(report.faces_per_frame, 250.0);
    }

    #[test]
    fn disabled_stats_still_reset_the_window() {
        let start = Instant::now();
        let mut stats = FrameStats::new(false, start);
        stats.record_frame(10);
        assert_eq!(stats.end_window(start + Duration::from_secs(1), origin()), None);

        stats.toggle();
        assert!(stats.enabled());
        let report = stats
            .end_window(start + Duration::from_secs(2), origin())
            .expect("enabled now");
        assert_eq!(report.faces_per_frame, 0.0);
    }
}
