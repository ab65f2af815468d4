//! Scroll container model
//!
//! The container is the collaborator refresh components observe: it owns
//! the content offset, content size and content inset, knows whether the
//! user is dragging, and runs eased offset animations on the virtual clock.
//! Every observable change is queued as a [`ContainerEvent`]; the host
//! drains the queue and forwards it to the subscribed components.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::trace;

use crate::animation::OffsetAnimation;
use crate::config::EasingType;
use crate::geometry::{EdgeInsets, Point, Size};
use crate::scheduler::Completion;

/// Resistance applied to drag deltas past either edge
const RUBBER_BAND_RESISTANCE: f64 = 0.3;

#[derive(Debug)]
pub enum ContainerEvent {
    /// The content offset was set or stepped by an animation
    OffsetChanged {
        old: Point,
        new: Point,
        /// Whether the user was dragging when the change happened
        dragging: bool,
    },
    ContentSizeChanged { old: Size, new: Size },
    /// An offset animation ended (finished or interrupted)
    AnimationFinished(Completion),
}

#[derive(Debug)]
pub struct ScrollContainer {
    bounds: Size,
    content_size: Size,
    content_inset: EdgeInsets,
    content_offset: Point,
    dragging: bool,
    scroll_enabled: bool,
    multiple_touch_enabled: bool,
    maximum_touches: u32,
    animation: Option<OffsetAnimation>,
    clock: Duration,
    events: VecDeque<ContainerEvent>,
}

impl ScrollContainer {
    pub fn new(bounds: Size) -> Self {
        Self {
            bounds,
            content_size: Size::ZERO,
            content_inset: EdgeInsets::ZERO,
            content_offset: Point::ZERO,
            dragging: false,
            scroll_enabled: true,
            multiple_touch_enabled: true,
            maximum_touches: u32::MAX,
            animation: None,
            clock: Duration::ZERO,
            events: VecDeque::new(),
        }
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn content_inset(&self) -> EdgeInsets {
        self.content_inset
    }

    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    pub fn is_multiple_touch_enabled(&self) -> bool {
        self.multiple_touch_enabled
    }

    pub fn maximum_touches(&self) -> u32 {
        self.maximum_touches
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Smallest resting offset: the top inset pulled into view
    pub fn min_offset_y(&self) -> f64 {
        -self.content_inset.top
    }

    /// Largest resting offset: the bottom of the content plus its inset
    pub fn max_offset_y(&self) -> f64 {
        let bottom =
            self.content_size.height + self.content_inset.bottom - self.bounds.height;
        bottom.max(self.min_offset_y())
    }

    pub fn is_out_of_range(&self) -> bool {
        let y = self.content_offset.y;
        y < self.min_offset_y() || y > self.max_offset_y()
    }

    /// Set the offset immediately, interrupting any running animation.
    /// Always notifies observers, even when the value is unchanged.
    pub fn set_content_offset(&mut self, offset: Point) {
        self.interrupt_animation();
        self.apply_offset(offset);
    }

    /// Animate the offset to `offset` without completion work
    pub fn animate_offset_to(&mut self, offset: Point, duration: Duration, easing: EasingType) {
        self.set_content_offset_animated(offset, duration, easing, None);
    }

    /// Drop the running animation along with its completion work
    pub fn cancel_animation(&mut self) -> bool {
        self.animation.take().is_some()
    }

    pub(crate) fn set_content_offset_animated(
        &mut self,
        offset: Point,
        duration: Duration,
        easing: EasingType,
        completion: Option<Completion>,
    ) {
        self.interrupt_animation();
        if duration.is_zero() {
            self.apply_offset(offset);
            if let Some(tasks) = completion {
                self.events.push_back(ContainerEvent::AnimationFinished(tasks));
            }
            return;
        }
        trace!(from = self.content_offset.y, to = offset.y, "offset animation started");
        self.animation = Some(OffsetAnimation::new(
            self.clock,
            self.content_offset,
            offset,
            duration,
            easing,
            completion,
        ));
    }

    /// Step the running animation to `now`
    pub fn advance(&mut self, now: Duration) {
        self.clock = now;
        let Some(anim) = self.animation.as_ref() else {
            return;
        };
        let sample = anim.sample(now);
        if sample.offset != self.content_offset {
            self.apply_offset(sample.offset);
        }
        if sample.finished {
            if let Some(mut anim) = self.animation.take() {
                if let Some(tasks) = anim.take_completion() {
                    self.events.push_back(ContainerEvent::AnimationFinished(tasks));
                }
            }
        }
    }

    pub fn set_content_size(&mut self, size: Size) {
        if size == self.content_size {
            return;
        }
        let old = self.content_size;
        self.content_size = size;
        self.events
            .push_back(ContainerEvent::ContentSizeChanged { old, new: size });
    }

    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    pub fn set_content_inset(&mut self, inset: EdgeInsets) {
        self.content_inset = inset;
    }

    pub fn set_inset_top(&mut self, top: f64) {
        self.content_inset.top = top;
    }

    pub fn set_inset_bottom(&mut self, bottom: f64) {
        self.content_inset.bottom = bottom;
    }

    /// Start a drag gesture. Refused while scrolling is disabled.
    pub fn begin_dragging(&mut self) -> bool {
        if !self.scroll_enabled {
            return false;
        }
        self.interrupt_animation();
        self.dragging = true;
        true
    }

    /// Move the content by a finger delta, with resistance past either edge
    pub fn drag_by(&mut self, dy: f64) {
        if !self.dragging || !self.scroll_enabled {
            return;
        }
        let dy = if self.is_out_of_range() {
            dy * RUBBER_BAND_RESISTANCE
        } else {
            dy
        };
        let next = Point::new(self.content_offset.x, self.content_offset.y + dy);
        self.apply_offset(next);
    }

    /// End the drag gesture and bounce back into range if needed.
    /// Observers see the release at the current offset before the bounce.
    pub fn end_dragging(&mut self, bounce: Duration) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.apply_offset(self.content_offset);
        if self.is_out_of_range() {
            let target = Point::new(
                self.content_offset.x,
                self.content_offset
                    .y
                    .clamp(self.min_offset_y(), self.max_offset_y()),
            );
            self.set_content_offset_animated(target, bounce, EasingType::EaseOut, None);
        }
    }

    /// Raw dragging flag, without gesture side effects
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging && self.scroll_enabled;
    }

    /// Wheel-style scroll, clamped to the resting range
    pub fn scroll_by(&mut self, dy: f64) {
        if !self.scroll_enabled {
            return;
        }
        let y = (self.content_offset.y + dy).clamp(self.min_offset_y(), self.max_offset_y());
        self.set_content_offset(Point::new(self.content_offset.x, y));
    }

    /// Disabling scrolling cancels an in-progress drag
    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
        if !enabled {
            self.dragging = false;
        }
    }

    pub fn set_multiple_touch_enabled(&mut self, enabled: bool) {
        self.multiple_touch_enabled = enabled;
    }

    pub fn set_maximum_touches(&mut self, touches: u32) {
        self.maximum_touches = touches.max(1);
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn drain_events(&mut self) -> Vec<ContainerEvent> {
        self.events.drain(..).collect()
    }

    fn apply_offset(&mut self, offset: Point) {
        let old = self.content_offset;
        self.content_offset = offset;
        self.events.push_back(ContainerEvent::OffsetChanged {
            old,
            new: offset,
            dragging: self.dragging,
        });
    }

    /// Stop the running animation where it is; its completion still runs
    fn interrupt_animation(&mut self) {
        if let Some(mut anim) = self.animation.take() {
            if let Some(tasks) = anim.take_completion() {
                self.events.push_back(ContainerEvent::AnimationFinished(tasks));
            }
        }
    }
}
