//! Refresh components
//!
//! A [`RefreshComponent`] sits on one edge of a [`ScrollContainer`], turns
//! the container's offset changes into a [`RefreshState`] for its animator,
//! and temporarily perturbs the content inset while a refresh or load is in
//! flight. The edge-specific geometry and choreography live in four
//! variants: manual pulls and threshold auto-loads.
//!
//! Components never hold on to the container. The host lends it, together
//! with the scheduler and the opposite edge's component, through a
//! [`Context`] for the duration of each call.

mod auto_load;
mod pull;

pub(crate) use auto_load::{BottomAutoLoad, TopAutoLoad};
pub(crate) use pull::{BottomPull, TopPull};

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animator::{clamp_ratio, Animator, AnimatorTexts, RefreshState};
use crate::config::TimingConfig;
use crate::container::ScrollContainer;
use crate::geometry::{EdgeInsets, Point, Rect};
use crate::scheduler::{Completion, Scheduler, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
}

impl Edge {
    pub fn opposite(self) -> Self {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }

    pub fn is_top(self) -> bool {
        self == Edge::Top
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Top => f.write_str("top"),
            Edge::Bottom => f.write_str("bottom"),
        }
    }
}

/// Identity of one attached component.
/// Deferred tasks carry it so they can be dropped once the slot changes hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshKind {
    /// Release past the threshold to trigger
    Pull,
    /// Crossing the threshold triggers on its own
    AutoLoad,
}

/// Everything a component borrows from its host for one call
pub struct Context<'a> {
    pub container: &'a mut ScrollContainer,
    pub scheduler: &'a mut Scheduler,
    pub timing: &'a TimingConfig,
    pub now: Duration,
    /// Occupant of the opposite edge, if any
    pub opposite: Option<&'a mut RefreshComponent>,
}

impl Context<'_> {
    /// Stop the opposite edge's component, whatever its kind
    pub fn stop_opposite(&mut self, animated: bool) {
        let Some(opposite) = self.opposite.as_deref_mut() else {
            return;
        };
        let mut cx = Context {
            container: &mut *self.container,
            scheduler: &mut *self.scheduler,
            timing: self.timing,
            now: self.now,
            opposite: None,
        };
        opposite.stop_refreshing(animated, &mut cx);
    }

    pub fn schedule(&mut self, delay: Duration, task: Task) {
        self.scheduler.schedule(self.now, delay, task);
    }

    /// Animate the vertical offset with the configured duration and easing
    pub fn animate_offset(&mut self, y: f64, completion: Completion) {
        let x = self.container.content_offset().x;
        self.container.set_content_offset_animated(
            Point::new(x, y),
            self.timing.animation_duration(),
            self.timing.easing,
            Some(completion),
        );
    }

    /// Set the offset in place; used to pin the content before an animation
    pub fn pin_offset(&mut self, y: f64) {
        let x = self.container.content_offset().x;
        self.container.set_content_offset(Point::new(x, y));
    }
}

/// Ratio of `distance` past the edge to `trigger`, clamped into [0, 1]
pub(crate) fn offset_ratio(distance: f64, trigger: f64) -> f64 {
    let distance = distance.max(0.0);
    if trigger <= 0.0 {
        return if distance > 0.0 { 1.0 } else { 0.0 };
    }
    clamp_ratio(distance / trigger)
}

/// Bookkeeping shared by every variant
#[derive(Debug)]
pub(crate) struct ComponentState {
    pub(crate) id: ComponentId,
    pub(crate) edge: Edge,
    pub(crate) frame: Rect,
    /// Container inset captured when observation began
    pub(crate) origin_inset: EdgeInsets,
    /// Last processed raw offset
    pub(crate) previous_offset_y: f64,
    pub(crate) is_refreshing: bool,
    /// Set while the component animates the container itself
    pub(crate) ignore_observe: bool,
    pub(crate) is_observing: bool,
    pub(crate) is_hidden: bool,
    pub(crate) is_enabled: bool,
    pub(crate) needs_layout: bool,
    pub(crate) animator: Box<dyn Animator>,
    pub(crate) start_count: usize,
    pub(crate) stop_count: usize,
    pub(crate) trigger_count: usize,
}

impl ComponentState {
    fn new(id: ComponentId, edge: Edge, animator: Box<dyn Animator>) -> Self {
        Self {
            id,
            edge,
            frame: Rect::ZERO,
            origin_inset: EdgeInsets::ZERO,
            previous_offset_y: 0.0,
            is_refreshing: false,
            ignore_observe: false,
            is_observing: false,
            is_hidden: false,
            is_enabled: true,
            needs_layout: false,
            animator,
            start_count: 0,
            stop_count: 0,
            trigger_count: 0,
        }
    }

    pub(crate) fn set_state(&mut self, state: RefreshState) {
        let old = self.animator.state();
        if old == state {
            return;
        }
        debug!(edge = %self.edge, from = %old, to = %state, "refresh state changed");
        self.animator.set_state(state);
    }

    /// Muting observation also locks user scrolling on the container
    pub(crate) fn set_ignore_observe(&mut self, ignore: bool, container: &mut ScrollContainer) {
        self.ignore_observe = ignore;
        container.set_scroll_enabled(!ignore);
    }

    pub(crate) fn task_trigger(&self) -> Task {
        Task::Trigger {
            edge: self.edge,
            id: self.id,
        }
    }

    pub(crate) fn task_release_observe(&self) -> Task {
        Task::ReleaseObserve {
            edge: self.edge,
            id: self.id,
        }
    }

    fn accepts_events(&self) -> bool {
        self.is_observing && !self.is_hidden && self.is_enabled && !self.ignore_observe
    }
}

/// Edge-specific behavior of a component
pub(crate) trait RefreshVariant: fmt::Debug {
    fn kind(&self) -> RefreshKind;

    /// Recompute the component frame and cached thresholds
    fn adjust_view(&mut self, state: &mut ComponentState, container: &ScrollContainer);

    /// Interpret one offset change
    fn offset_change_action(
        &mut self,
        state: &mut ComponentState,
        raw_y: f64,
        dragging: bool,
        cx: &mut Context<'_>,
    );

    fn start(&mut self, state: &mut ComponentState, cx: &mut Context<'_>);

    fn stop(&mut self, state: &mut ComponentState, animated: bool, cx: &mut Context<'_>);

    /// Undo any inset the variant still holds
    fn detach(&mut self, state: &mut ComponentState, container: &mut ScrollContainer);

    /// `None` for variants without a no-more-data flag
    fn is_no_more_data(&self) -> Option<bool> {
        None
    }

    /// Returns false when the variant has no such flag
    fn set_no_more_data(&mut self, _state: &mut ComponentState, _value: bool) -> bool {
        false
    }

    /// Returns false when the variant has no top space
    fn set_top_space(&mut self, _space: Option<f64>) -> bool {
        false
    }

    fn start_refreshing(&mut self, state: &mut ComponentState, cx: &mut Context<'_>) {
        if state.is_refreshing || self.is_no_more_data() == Some(true) {
            return;
        }
        state.is_refreshing = true;
        state.start_count += 1;
        self.start(state, cx);
        state.set_state(RefreshState::Refreshing);
    }

    fn stop_refreshing(&mut self, state: &mut ComponentState, animated: bool, cx: &mut Context<'_>) {
        if !state.is_refreshing {
            return;
        }
        state.stop_count += 1;
        self.stop(state, animated, cx);
        state.is_refreshing = false;
    }
}

pub struct RefreshComponent {
    state: ComponentState,
    variant: Box<dyn RefreshVariant>,
    action: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for RefreshComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshComponent")
            .field("state", &self.state)
            .field("variant", &self.variant)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl RefreshComponent {
    pub(crate) fn new(
        id: ComponentId,
        edge: Edge,
        variant: Box<dyn RefreshVariant>,
        animator: Box<dyn Animator>,
        action: Option<Box<dyn FnMut()>>,
    ) -> Self {
        Self {
            state: ComponentState::new(id, edge, animator),
            variant,
            action,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.state.id
    }

    pub fn edge(&self) -> Edge {
        self.state.edge
    }

    pub fn kind(&self) -> RefreshKind {
        self.variant.kind()
    }

    /// Current animator state
    pub fn state(&self) -> RefreshState {
        self.state.animator.state()
    }

    pub fn offset_ratio(&self) -> f64 {
        self.state.animator.offset_ratio()
    }

    pub fn animator(&self) -> &dyn Animator {
        self.state.animator.as_ref()
    }

    /// Frame in content coordinates
    pub fn frame(&self) -> Rect {
        self.state.frame
    }

    pub fn origin_inset(&self) -> EdgeInsets {
        self.state.origin_inset
    }

    pub fn previous_offset_y(&self) -> f64 {
        self.state.previous_offset_y
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.is_refreshing
    }

    pub fn is_ignoring_observe(&self) -> bool {
        self.state.ignore_observe
    }

    pub fn is_observing(&self) -> bool {
        self.state.is_observing
    }

    pub fn is_hidden(&self) -> bool {
        self.state.is_hidden
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled
    }

    pub fn is_no_more_data(&self) -> Option<bool> {
        self.variant.is_no_more_data()
    }

    /// Times a refresh cycle actually started
    pub fn start_count(&self) -> usize {
        self.state.start_count
    }

    /// Times a refresh cycle actually stopped
    pub fn stop_count(&self) -> usize {
        self.state.stop_count
    }

    /// Times the trigger callback ran
    pub fn trigger_count(&self) -> usize {
        self.state.trigger_count
    }

    pub fn start_refreshing(&mut self, cx: &mut Context<'_>) {
        self.variant.start_refreshing(&mut self.state, cx);
    }

    pub fn stop_refreshing(&mut self, animated: bool, cx: &mut Context<'_>) {
        self.variant.stop_refreshing(&mut self.state, animated, cx);
    }

    /// Capture the origin inset and subscribe
    pub(crate) fn begin_observing(&mut self, container: &ScrollContainer) {
        if self.state.is_observing {
            return;
        }
        self.state.origin_inset = container.content_inset();
        self.state.is_observing = true;
        self.state.needs_layout = true;
        debug!(edge = %self.state.edge, inset_top = self.state.origin_inset.top, "observing container");
    }

    pub(crate) fn observe_offset(&mut self, raw_y: f64, dragging: bool, cx: &mut Context<'_>) {
        if !self.state.accepts_events() {
            return;
        }
        self.variant
            .offset_change_action(&mut self.state, raw_y, dragging, cx);
        // a start that muted observation has already recorded its target
        if !self.state.ignore_observe {
            self.state.previous_offset_y = raw_y;
        }
    }

    pub(crate) fn observe_content_size(&mut self) {
        if self.state.accepts_events() {
            self.state.needs_layout = true;
        }
    }

    /// Layout pass; stays pending while a refresh is in flight
    pub(crate) fn layout_if_needed(&mut self, container: &ScrollContainer) {
        if !self.state.needs_layout || self.state.is_refreshing {
            return;
        }
        self.state.needs_layout = false;
        self.state.previous_offset_y = container.content_offset().y;
        self.variant.adjust_view(&mut self.state, container);

        let size = self.state.frame.size;
        if self.state.animator.size() != size {
            self.state.animator.adjust_view(size);
        }
    }

    pub(crate) fn refresh_display(&mut self) -> bool {
        self.state.animator.refresh_display()
    }

    pub(crate) fn trigger(&mut self) {
        self.state.trigger_count += 1;
        debug!(edge = %self.state.edge, "refresh triggered");
        if let Some(action) = self.action.as_mut() {
            action();
        }
    }

    pub(crate) fn release_observe(&mut self, container: &mut ScrollContainer) {
        self.state.set_ignore_observe(false, container);
    }

    pub(crate) fn detach(&mut self, container: &mut ScrollContainer) {
        if self.state.ignore_observe {
            self.state.set_ignore_observe(false, container);
        }
        if self.state.is_observing {
            self.variant.detach(&mut self.state, container);
        }
        self.state.is_observing = false;
    }

    pub(crate) fn set_animator(&mut self, mut animator: Box<dyn Animator>) {
        animator.adjust_view(self.state.frame.size);
        self.state.animator = animator;
        self.state.needs_layout = true;
    }

    pub(crate) fn set_texts(&mut self, texts: AnimatorTexts) {
        self.state.animator.set_texts(texts);
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.state.is_hidden = hidden;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.state.is_enabled = enabled;
    }

    pub(crate) fn set_no_more_data(&mut self, value: bool) -> bool {
        self.variant.set_no_more_data(&mut self.state, value)
    }

    pub(crate) fn set_top_space(&mut self, space: Option<f64>) -> bool {
        let supported = self.variant.set_top_space(space);
        if supported {
            self.state.needs_layout = true;
        }
        supported
    }
}
