// Frame callbacks + delayed timers, driven by the main loop's clock.
// Nothing here knows about windows: tests pump it with hand-made timestamps.

use crate::surface::StampKey;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// Deferred work for one stamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Frame callback: make visible, grow to full scale
    Reveal(StampKey),
    /// Timer: fade-out delay elapsed, ask for a frame to start the exit
    QueueFade(StampKey),
    /// Frame callback: shrink and fade to transparent
    Fade(StampKey),
    /// Timer: detach from the surface
    Remove(StampKey),
}

/// The two deferral primitives the stamp lifecycle needs.
pub trait Scheduler {
    /// Run `task` on the next frame boundary, never in the current step.
    fn request_frame(&mut self, task: Task);
    /// Run `task` once `delay` has elapsed after `now`.
    fn schedule_after(&mut self, now: Duration, delay: Duration, task: Task);
}

#[derive(Debug, PartialEq, Eq)]
struct Timer {
    due: Duration,
    seq: u64, // keeps equal deadlines in scheduling order
    task: Task,
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
pub struct FrameScheduler {
    frame: Vec<Task>,
    timers: BinaryHeap<Reverse<Timer>>,
    seq: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop every timer whose deadline is at or before `now`, earliest first.
    pub fn due_timers(&mut self, now: Duration) -> Vec<Task> {
        let mut due = Vec::new();
        while let Some(Reverse(timer)) = self.timers.peek() {
            if timer.due > now {
                break;
            }
            if let Some(Reverse(timer)) = self.timers.pop() {
                due.push(timer.task);
            }
        }
        due
    }

    /// Hand over the callbacks queued so far; anything queued afterwards waits a frame.
    pub fn take_frame_tasks(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.frame)
    }

    pub fn pending(&self) -> usize {
        self.frame.len() + self.timers.len()
    }

    /// Drop everything still waiting. Returns how much was dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending();
        self.frame.clear();
        self.timers.clear();
        dropped
    }
}

impl Scheduler for FrameScheduler {
    fn request_frame(&mut self, task: Task) {
        self.frame.push(task);
    }

    fn schedule_after(&mut self, now: Duration, delay: Duration, task: Task) {
        self.seq += 1;
        self.timers.push(Reverse(Timer { due: now + delay, seq: self.seq, task }));
    }
}
