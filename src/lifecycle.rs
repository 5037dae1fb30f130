// Stamp lifecycle manager.
// Insert -> (next frame) reveal -> (after fade-out delay, next frame) fade -> (delay + transition) remove.
// Every stamp runs its own timers; nothing caps how many are alive at once.

use crate::config::Timing;
use crate::scheduler::{Scheduler, Task};
use crate::selection::Selector;
use crate::stamp::Stamp;
use crate::surface::{StampKey, Surface};
use crate::types::{ImageResource, Point};
use std::time::Duration;
use tracing::{debug, trace};

pub struct StampManager {
    resources: Vec<ImageResource>, // fixed after load
    selector: Selector,
    last: Point, // where the last stamp went in
    timing: Timing,
}

impl StampManager {
    pub fn new(resources: Vec<ImageResource>, selector: Selector, timing: Timing) -> Self {
        Self { resources, selector, last: Point::default(), timing }
    }

    pub fn has_resources(&self) -> bool {
        !self.resources.is_empty()
    }

    /// Cursor memory: position of the last successful insertion.
    pub fn last_position(&self) -> Point {
        self.last
    }

    /// Index of the image the next insertion will use.
    pub fn next_index(&self) -> usize {
        self.selector.current()
    }

    /// Put a new stamp centered on `at`. Declines (returns None) when nothing is loaded.
    pub fn insert(
        &mut self,
        surface: &mut Surface,
        scheduler: &mut impl Scheduler,
        at: Point,
        now: Duration,
    ) -> Option<StampKey> {
        let image = self.resources.get(self.selector.current())?.clone();
        trace!(image = image.name(), x = at.x, y = at.y, "inserting stamp");

        let key = surface.attach(Stamp::new(image, at));
        scheduler.request_frame(Task::Reveal(key));
        scheduler.schedule_after(now, self.timing.fade_out_delay, Task::QueueFade(key));
        scheduler.schedule_after(
            now,
            self.timing.fade_out_delay + self.timing.transition,
            Task::Remove(key),
        );

        self.last = at;
        self.selector.advance(self.resources.len());
        Some(key)
    }

    /// Carry out one deferred step for a stamp.
    pub fn run(
        &self,
        task: Task,
        surface: &mut Surface,
        scheduler: &mut impl Scheduler,
        now: Duration,
    ) {
        let transition = self.timing.transition;
        match task {
            Task::Reveal(key) => {
                if let Some(stamp) = surface.get_mut(key) {
                    stamp.reveal(now, transition);
                }
            }
            Task::QueueFade(key) => scheduler.request_frame(Task::Fade(key)),
            Task::Fade(key) => {
                if let Some(stamp) = surface.get_mut(key) {
                    stamp.fade(now, transition);
                }
            }
            Task::Remove(key) => {
                if surface.detach(key).is_none() {
                    debug!(?key, "stamp already gone");
                }
            }
        }
    }
}
