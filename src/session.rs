// A running stamp session: trigger monitor + lifecycle manager + scheduler + surface.
// Built only after the image load settles, so input is never observed before that.

use crate::config::Timing;
use crate::lifecycle::StampManager;
use crate::scheduler::FrameScheduler;
use crate::selection::Selector;
use crate::surface::{StampKey, Surface};
use crate::trigger::{InputMode, TriggerMonitor};
use crate::types::{ImageResource, Point};
use std::time::Duration;
use tracing::{debug, info};

pub struct Session {
    monitor: TriggerMonitor,
    stamps: StampManager,
    scheduler: FrameScheduler,
    surface: Surface,
}

impl Session {
    pub fn new(
        resources: Vec<ImageResource>,
        selector: Selector,
        monitor: TriggerMonitor,
        timing: Timing,
        surface: Surface,
    ) -> Self {
        info!(
            images = resources.len(),
            mode = ?monitor.mode(),
            "stamp session ready"
        );
        Self {
            monitor,
            stamps: StampManager::new(resources, selector, timing),
            scheduler: FrameScheduler::new(),
            surface,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn stamps(&self) -> &StampManager {
        &self.stamps
    }

    pub fn mode(&self) -> InputMode {
        self.monitor.mode()
    }

    /// Pointer moved to `at` (fine pointer).
    pub fn pointer_moved(&mut self, at: Point, now: Duration) -> Option<StampKey> {
        if !self.monitor.pointer_moved(self.stamps.last_position(), at) {
            return None;
        }
        self.insert(at, now)
    }

    /// A finger just landed at `at` (coarse pointer).
    pub fn touch_started(&mut self, at: Point, now: Duration) -> Option<StampKey> {
        let at = self.monitor.touch_started(at)?;
        self.insert(at, now)
    }

    /// One frame boundary: due timers, then frame callbacks, then the periodic trigger.
    pub fn tick(&mut self, now: Duration) -> Option<StampKey> {
        for task in self.scheduler.due_timers(now) {
            self.stamps.run(task, &mut self.surface, &mut self.scheduler, now);
        }
        for task in self.scheduler.take_frame_tasks() {
            self.stamps.run(task, &mut self.surface, &mut self.scheduler, now);
        }

        let at = self.monitor.frame(now, self.surface.bounds())?;
        self.insert(at, now)
    }

    /// Drop every pending timer and callback; stamps stay where they are.
    pub fn shutdown(&mut self) {
        let dropped = self.scheduler.clear();
        info!(dropped, live = self.surface.len(), "stamp session stopped");
    }

    fn insert(&mut self, at: Point, now: Duration) -> Option<StampKey> {
        if !self.stamps.has_resources() {
            debug!("no images loaded, trigger ignored");
            return None;
        }
        self.stamps.insert(&mut self.surface, &mut self.scheduler, at, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionPolicy;
    use crate::stamp::StampState;
    use image::RgbaImage;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn session(names: &[&str], mode: InputMode, policy: SelectionPolicy) -> Session {
        let timing = Timing::default();
        let resources = names
            .iter()
            .map(|n| ImageResource::new(*n, RgbaImage::new(16, 16)))
            .collect();
        Session::new(
            resources,
            Selector::new(policy, Some(11)),
            TriggerMonitor::new(mode, &timing, Some(5)),
            timing,
            Surface::new(800, 600),
        )
    }

    #[test]
    fn test_threshold_scenario() {
        let mut s = session(&["a", "b"], InputMode::Continuous, SelectionPolicy::Sequential);

        assert!(s.pointer_moved(Point::new(100.0, 0.0), ms(0)).is_none());
        assert_eq!(s.stamps().last_position(), Point::default());

        assert!(s.pointer_moved(Point::new(101.0, 0.0), ms(16)).is_some());
        assert_eq!(s.stamps().last_position(), Point::new(101.0, 0.0));

        // travel is measured from the last stamp, not the last event
        assert!(s.pointer_moved(Point::new(150.0, 0.0), ms(32)).is_none());
        assert!(s.pointer_moved(Point::new(200.0, 0.0), ms(48)).is_none());
        assert!(s.pointer_moved(Point::new(202.0, 0.0), ms(64)).is_some());
        assert_eq!(s.surface().len(), 2);
    }

    #[test]
    fn test_sequential_scenario() {
        let mut s = session(&["a", "b", "c", "d"], InputMode::Continuous, SelectionPolicy::Sequential);
        for (i, x) in [150.0, 300.0, 450.0].into_iter().enumerate() {
            assert!(s.pointer_moved(Point::new(x, 10.0), ms(i as u64 * 16)).is_some());
        }
        let used: Vec<&str> = s.surface().iter().map(|st| st.image().name()).collect();
        assert_eq!(used, vec!["a", "b", "c"]);
        assert_eq!(s.stamps().next_index(), 3);
    }

    #[test]
    fn test_empty_session_is_inert() {
        let mut s = session(&[], InputMode::Continuous, SelectionPolicy::Random);
        assert!(s.pointer_moved(Point::new(500.0, 500.0), ms(0)).is_none());
        assert!(s.tick(ms(16)).is_none());
        assert!(s.surface().is_empty());

        let mut s = session(&[], InputMode::Periodic, SelectionPolicy::Random);
        assert!(s.touch_started(Point::new(1.0, 1.0), ms(0)).is_none());
        for i in 0..100 {
            assert!(s.tick(ms(i * 16)).is_none());
        }
        assert!(s.surface().is_empty());
    }

    #[test]
    fn test_stamp_reveals_on_following_tick() {
        let mut s = session(&["a"], InputMode::Continuous, SelectionPolicy::Random);
        let key = s.pointer_moved(Point::new(200.0, 200.0), ms(0)).unwrap();
        assert!(!s.surface().get(key).unwrap().is_visible());

        s.tick(ms(16));
        let stamp = s.surface().get(key).unwrap();
        assert!(stamp.is_visible());
        assert_eq!(stamp.state(), StampState::Entering);
    }

    #[test]
    fn test_periodic_stamp_reveals_next_tick_and_expires() {
        let mut s = session(&["a", "b", "c"], InputMode::Periodic, SelectionPolicy::Random);
        let mut key = None;
        let mut t = 0;
        while key.is_none() {
            t += 16;
            key = s.tick(ms(t));
        }
        let key = key.unwrap();
        assert_eq!(t, 128);
        assert!(!s.surface().get(key).unwrap().is_visible());

        s.tick(ms(t + 16));
        assert!(s.surface().get(key).unwrap().is_visible());

        s.tick(ms(t + 1749));
        assert!(s.surface().contains(key));
        s.tick(ms(t + 1750));
        assert!(!s.surface().contains(key));
    }

    #[test]
    fn test_touch_stamps_at_touch_point() {
        let mut s = session(&["a", "b"], InputMode::Periodic, SelectionPolicy::Random);
        let key = s.touch_started(Point::new(40.0, 60.0), ms(3)).unwrap();
        let stamp = s.surface().get(key).unwrap();
        assert_eq!(stamp.center(), Point::new(40.0, 60.0));
        assert!(s.pointer_moved(Point::new(700.0, 500.0), ms(4)).is_none());
    }

    #[test]
    fn test_random_scenario_never_repeats() {
        let mut s = session(&["a", "b", "c"], InputMode::Continuous, SelectionPolicy::Random);
        let mut x = 0.0;
        for i in 0..50 {
            x += 150.0;
            s.pointer_moved(Point::new(x % 800.0, (i % 2) as f32 * 400.0), ms(i));
        }
        let used: Vec<&str> = s.surface().iter().map(|st| st.image().name()).collect();
        assert!(used.len() > 10);
        assert!(used.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn test_shutdown_cancels_pending_work() {
        let mut s = session(&["a"], InputMode::Continuous, SelectionPolicy::Random);
        let key = s.pointer_moved(Point::new(300.0, 300.0), ms(0)).unwrap();
        s.shutdown();
        s.tick(ms(5000));
        let stamp = s.surface().get(key).unwrap();
        assert_eq!(stamp.state(), StampState::Created);
    }
}
