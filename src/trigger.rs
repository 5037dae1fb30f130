// Pointer/trigger monitor: decides when a new stamp should go in.
// Mouse (fine pointer): stamp once the pointer has travelled far enough.
// Touch (coarse pointer): no hover, so stamp on a clock at random spots, plus on every touch.

use crate::config::Timing;
use crate::types::{Point, Size};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Continuous,
    Periodic,
}

impl InputMode {
    pub fn detect(touch: bool) -> Self {
        if touch { InputMode::Periodic } else { InputMode::Continuous }
    }
}

pub struct TriggerMonitor {
    mode: InputMode,
    min_travel: f32,
    interval: Duration,
    next_due: Duration, // periodic deadline, moves in whole intervals
    rng: StdRng,
}

impl TriggerMonitor {
    pub fn new(mode: InputMode, timing: &Timing, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mode,
            min_travel: timing.min_travel,
            interval: timing.periodic_interval,
            next_due: timing.periodic_interval,
            rng,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Continuous mode: fire when `current` is strictly farther than the threshold from `last`.
    pub fn pointer_moved(&self, last: Point, current: Point) -> bool {
        self.mode == InputMode::Continuous && last.distance(current) > self.min_travel
    }

    /// Periodic mode: a touch stamps right where the finger landed.
    pub fn touch_started(&self, at: Point) -> Option<Point> {
        (self.mode == InputMode::Periodic).then_some(at)
    }

    /// Periodic mode, once per frame: a random spot inside `bounds` when the clock says so.
    pub fn frame(&mut self, timestamp: Duration, bounds: Size) -> Option<Point> {
        if self.mode != InputMode::Periodic || timestamp < self.next_due {
            return None;
        }
        // skip the boundaries a slow frame jumped over instead of bursting
        while self.next_due <= timestamp {
            self.next_due += self.interval;
        }
        Some(Point::new(
            self.rng.gen_range(0.0..1.0) * bounds.width,
            self.rng.gen_range(0.0..1.0) * bounds.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn bounds() -> Size {
        Size { width: 400.0, height: 300.0 }
    }

    #[test]
    fn test_travel_threshold_is_strict() {
        let mon = TriggerMonitor::new(InputMode::Continuous, &Timing::default(), Some(1));
        let origin = Point::default();
        assert!(!mon.pointer_moved(origin, Point::new(50.0, 0.0)));
        assert!(!mon.pointer_moved(origin, Point::new(100.0, 0.0)));
        assert!(mon.pointer_moved(origin, Point::new(101.0, 0.0)));
        assert!(mon.pointer_moved(origin, Point::new(80.0, 80.0)));
    }

    #[test]
    fn test_continuous_mode_ignores_clock_and_touch() {
        let mut mon = TriggerMonitor::new(InputMode::Continuous, &Timing::default(), Some(1));
        assert!(mon.frame(ms(10_000), bounds()).is_none());
        assert!(mon.touch_started(Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_periodic_mode_ignores_pointer_travel() {
        let mon = TriggerMonitor::new(InputMode::Periodic, &Timing::default(), Some(1));
        assert!(!mon.pointer_moved(Point::default(), Point::new(500.0, 0.0)));
        assert_eq!(mon.touch_started(Point::new(3.0, 4.0)), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_periodic_fires_on_first_frame_past_each_boundary() {
        let mut mon = TriggerMonitor::new(InputMode::Periodic, &Timing::default(), Some(9));
        let fired: Vec<u64> = (0..=63)
            .map(|i| i * 16)
            .filter(|&t| mon.frame(ms(t), bounds()).is_some())
            .collect();
        assert_eq!(fired, vec![128, 256, 384, 512, 640, 752, 880, 1008]);
    }

    #[test]
    fn test_periodic_slow_frame_fires_once() {
        let mut mon = TriggerMonitor::new(InputMode::Periodic, &Timing::default(), Some(9));
        assert!(mon.frame(ms(600), bounds()).is_some());
        assert!(mon.frame(ms(616), bounds()).is_none());
        assert!(mon.frame(ms(625), bounds()).is_some());
    }

    #[test]
    fn test_periodic_points_stay_inside_bounds() {
        let mut mon = TriggerMonitor::new(InputMode::Periodic, &Timing::default(), Some(3));
        for i in 1..200u64 {
            if let Some(p) = mon.frame(ms(i * 125), bounds()) {
                assert!((0.0..=400.0).contains(&p.x));
                assert!((0.0..=300.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn test_detect() {
        assert_eq!(InputMode::detect(true), InputMode::Periodic);
        assert_eq!(InputMode::detect(false), InputMode::Continuous);
    }
}
