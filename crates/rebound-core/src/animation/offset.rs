//! Eased transition of a content offset
//!
//! Created by the container when an animated offset change is requested and
//! sampled on every host tick until it reaches its target.

use std::time::Duration;

use super::timing::{is_complete, lerp, progress};
use crate::config::EasingType;
use crate::geometry::Point;
use crate::scheduler::Completion;

#[derive(Debug)]
pub struct OffsetAnimation {
    /// Animation start on the virtual clock
    start: Duration,
    /// Starting offset
    from: Point,
    /// Target offset
    to: Point,
    duration: Duration,
    easing: EasingType,
    /// Tasks to run once the animation ends (finished or interrupted)
    completion: Option<Completion>,
}

/// One sample of a running animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetSample {
    pub offset: Point,
    pub finished: bool,
}

impl OffsetAnimation {
    pub fn new(
        start: Duration,
        from: Point,
        to: Point,
        duration: Duration,
        easing: EasingType,
        completion: Option<Completion>,
    ) -> Self {
        Self {
            start,
            from,
            to,
            duration,
            easing,
            completion,
        }
    }

    pub fn target(&self) -> Point {
        self.to
    }

    /// Interpolated offset at `now`
    pub fn sample(&self, now: Duration) -> OffsetSample {
        if is_complete(self.start, now, self.duration) {
            return OffsetSample {
                offset: self.to,
                finished: true,
            };
        }
        let t = self.easing.apply(progress(self.start, now, self.duration));
        OffsetSample {
            offset: Point::new(
                lerp(self.from.x, self.to.x, t),
                lerp(self.from.y, self.to.y, t),
            ),
            finished: false,
        }
    }

    pub fn take_completion(&mut self) -> Option<Completion> {
        self.completion.take()
    }
}
