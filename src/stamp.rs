// One stamp on the surface and the little transitions that animate it.
// Visual: a stamp pops in small and invisible, grows to full size, then
// shrinks while fading to nothing.

use crate::types::{ImageResource, Point};
use std::time::Duration;

pub const HIDDEN_SCALE: f32 = 0.5; // scale before reveal and after fade
pub const FULL_SCALE: f32 = 1.0;

/// Where a stamp is in its life. `Removed` is not a state here: a removed
/// stamp is simply gone from the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StampState {
    Created,
    Entering,
    Exiting,
}

/// A value easing from `from` to `to` over `duration`, starting at `start`.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
}

impl Tween {
    pub fn fixed(value: f32) -> Self {
        Self { from: value, to: value, start: Duration::ZERO, duration: Duration::ZERO }
    }

    pub fn value_at(&self, now: Duration) -> f32 {
        if self.duration.is_zero() || now >= self.start + self.duration {
            return self.to;
        }
        if now <= self.start {
            return self.from;
        }
        let t = (now - self.start).as_secs_f32() / self.duration.as_secs_f32();
        let eased = t * t * (3.0 - 2.0 * t); // smoothstep
        self.from + (self.to - self.from) * eased
    }

    /// Head for `to`, starting from whatever is showing at `now`.
    pub fn retarget(&mut self, now: Duration, to: f32, duration: Duration) {
        *self = Self { from: self.value_at(now), to, start: now, duration };
    }
}

pub struct Stamp {
    image: ImageResource,
    origin: Point, // top-left corner at full scale
    state: StampState,
    scale: Tween,
    opacity: Tween,
}

impl Stamp {
    /// Center the image on `at`. Starts hidden at half scale.
    pub fn new(image: ImageResource, at: Point) -> Self {
        let origin = Point::new(
            at.x - image.width() as f32 / 2.0,
            at.y - image.height() as f32 / 2.0,
        );
        Self {
            image,
            origin,
            state: StampState::Created,
            scale: Tween::fixed(HIDDEN_SCALE),
            opacity: Tween::fixed(1.0),
        }
    }

    pub fn reveal(&mut self, now: Duration, transition: Duration) {
        self.state = StampState::Entering;
        self.scale.retarget(now, FULL_SCALE, transition);
    }

    pub fn fade(&mut self, now: Duration, transition: Duration) {
        self.state = StampState::Exiting;
        self.scale.retarget(now, HIDDEN_SCALE, transition);
        self.opacity.retarget(now, 0.0, transition);
    }

    pub fn image(&self) -> &ImageResource { &self.image }
    pub fn state(&self) -> StampState { self.state }
    /// Nothing shows until the first frame after insertion.
    #[cfg(test)]
    pub fn is_visible(&self) -> bool { self.state != StampState::Created }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.image.width() as f32 / 2.0,
            self.origin.y + self.image.height() as f32 / 2.0,
        )
    }

    pub fn scale_at(&self, now: Duration) -> f32 { self.scale.value_at(now) }
    pub fn opacity_at(&self, now: Duration) -> f32 { self.opacity.value_at(now) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_tween_endpoints_and_midpoint() {
        let mut tw = Tween::fixed(0.5);
        tw.retarget(ms(100), 1.0, ms(750));
        assert_eq!(tw.value_at(ms(0)), 0.5);
        assert_eq!(tw.value_at(ms(100)), 0.5);
        assert!((tw.value_at(ms(475)) - 0.75).abs() < 1e-4);
        assert_eq!(tw.value_at(ms(850)), 1.0);
        assert_eq!(tw.value_at(ms(5000)), 1.0);
    }

    #[test]
    fn test_retarget_mid_flight_starts_from_shown_value() {
        let mut tw = Tween::fixed(0.0);
        tw.retarget(ms(0), 1.0, ms(100));
        let shown = tw.value_at(ms(50));
        tw.retarget(ms(50), 0.0, ms(100));
        assert!((tw.value_at(ms(50)) - shown).abs() < 1e-6);
        assert_eq!(tw.value_at(ms(150)), 0.0);
    }

    #[test]
    fn test_new_stamp_is_centered_and_hidden() {
        let img = ImageResource::new("s", RgbaImage::new(40, 20));
        let stamp = Stamp::new(img, Point::new(100.0, 50.0));
        assert_eq!(stamp.origin, Point::new(80.0, 40.0));
        assert_eq!(stamp.center(), Point::new(100.0, 50.0));
        assert_eq!(stamp.state(), StampState::Created);
        assert!(!stamp.is_visible());
        assert_eq!(stamp.scale_at(ms(7)), HIDDEN_SCALE);
    }

    #[test]
    fn test_reveal_then_fade() {
        let img = ImageResource::new("s", RgbaImage::new(10, 10));
        let mut stamp = Stamp::new(img, Point::new(0.0, 0.0));

        stamp.reveal(ms(16), ms(750));
        assert!(stamp.is_visible());
        assert_eq!(stamp.state(), StampState::Entering);
        assert_eq!(stamp.scale_at(ms(766)), FULL_SCALE);
        assert_eq!(stamp.opacity_at(ms(766)), 1.0);

        stamp.fade(ms(1000), ms(750));
        assert_eq!(stamp.state(), StampState::Exiting);
        assert_eq!(stamp.scale_at(ms(1000)), FULL_SCALE);
        assert_eq!(stamp.scale_at(ms(1750)), HIDDEN_SCALE);
        assert_eq!(stamp.opacity_at(ms(1750)), 0.0);
    }
}
