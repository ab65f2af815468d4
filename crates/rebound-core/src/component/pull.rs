//! Manual pull variants: release past the threshold to trigger.

use super::{offset_ratio, ComponentState, Context, RefreshKind, RefreshVariant};
use crate::animator::RefreshState;
use crate::container::ScrollContainer;
use crate::geometry::Rect;

/// Pull down from the top to refresh
#[derive(Debug, Default)]
pub(crate) struct TopPull {
    /// Overrides the gap between the frame and the content top
    top_space: Option<f64>,
    max_real_offset: f64,
    trigger_offset: f64,
}

impl TopPull {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl RefreshVariant for TopPull {
    fn kind(&self) -> RefreshKind {
        RefreshKind::Pull
    }

    fn adjust_view(&mut self, state: &mut ComponentState, container: &ScrollContainer) {
        let space = self
            .top_space
            .unwrap_or_else(|| state.origin_inset.top.max(0.0));
        let height = state.animator.view_height();
        state.frame = Rect::new(0.0, -(space + height), container.bounds().width, height);
        self.max_real_offset = height;
        self.trigger_offset = state.animator.trigger_height();
    }

    fn offset_change_action(
        &mut self,
        state: &mut ComponentState,
        raw_y: f64,
        dragging: bool,
        cx: &mut Context<'_>,
    ) {
        let real = raw_y + state.origin_inset.top;
        if !state.is_refreshing {
            if real < -self.trigger_offset {
                if dragging {
                    state.set_state(RefreshState::ReleaseToRefresh);
                } else {
                    self.start_refreshing(state, cx);
                }
            } else if real < 0.0 {
                state.set_state(RefreshState::Pulling);
            }
        }
        state
            .animator
            .set_offset_ratio(offset_ratio(-real, self.trigger_offset));
    }

    fn start(&mut self, state: &mut ComponentState, cx: &mut Context<'_>) {
        cx.stop_opposite(false);
        state.set_ignore_observe(true, cx.container);

        let target = -(state.origin_inset.top + self.max_real_offset);
        cx.container.set_inset_top(-target);
        // keep the content where the finger left it; the inset alone must not jump it
        let live = cx.container.content_offset().y;
        cx.pin_offset(live);
        state.previous_offset_y = target;

        let completion = vec![state.task_trigger(), state.task_release_observe()];
        cx.animate_offset(target, completion);
    }

    fn stop(&mut self, state: &mut ComponentState, animated: bool, cx: &mut Context<'_>) {
        state.set_state(RefreshState::Idle);
        let origin_top = state.origin_inset.top;
        let rest = -origin_top;
        let live = cx.container.content_offset().y;
        // start() records its target here before the live offset gets there
        let shown = live.min(state.previous_offset_y) < rest;
        if !animated {
            cx.container.set_inset_top(origin_top);
            if shown {
                cx.pin_offset(live.max(rest));
                state.previous_offset_y = live.max(rest);
            }
            return;
        }
        if !shown {
            cx.container.set_inset_top(origin_top);
            return;
        }

        state.set_ignore_observe(true, cx.container);
        // drop an unfinished extend so it neither fires nor unmutes
        cx.container.cancel_animation();
        cx.container.set_inset_top(origin_top);
        cx.pin_offset(live);
        state.previous_offset_y = rest;
        let completion = vec![state.task_release_observe()];
        cx.animate_offset(rest, completion);
    }

    fn detach(&mut self, state: &mut ComponentState, container: &mut ScrollContainer) {
        container.set_inset_top(state.origin_inset.top);
    }

    fn set_top_space(&mut self, space: Option<f64>) -> bool {
        self.top_space = space;
        true
    }
}

/// Pull up from the bottom to load more
#[derive(Debug, Default)]
pub(crate) struct BottomPull {
    min_real_offset: f64,
    max_real_offset: f64,
    trigger_offset: f64,
}

impl BottomPull {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl RefreshVariant for BottomPull {
    fn kind(&self) -> RefreshKind {
        RefreshKind::Pull
    }

    fn adjust_view(&mut self, state: &mut ComponentState, container: &ScrollContainer) {
        let origin = state.origin_inset;
        let height = state.animator.view_height();
        let content_height = container.content_size().height;
        state.frame = Rect::new(
            0.0,
            content_height + origin.bottom.max(0.0),
            container.bounds().width,
            height,
        );
        let overflow = content_height + origin.top + origin.bottom - container.bounds().height;
        self.min_real_offset = overflow.max(0.0);
        self.max_real_offset = (overflow + height).max(0.0);
        self.trigger_offset = self.min_real_offset + height;
    }

    fn offset_change_action(
        &mut self,
        state: &mut ComponentState,
        raw_y: f64,
        dragging: bool,
        cx: &mut Context<'_>,
    ) {
        let real = raw_y + state.origin_inset.top;
        if !state.is_refreshing {
            if real > self.trigger_offset {
                if dragging {
                    state.set_state(RefreshState::ReleaseToRefresh);
                } else {
                    self.start_refreshing(state, cx);
                }
            } else if real > 0.0 {
                state.set_state(RefreshState::Pulling);
            }
        }
        state
            .animator
            .set_offset_ratio(offset_ratio(real, self.trigger_offset));
    }

    fn start(&mut self, state: &mut ComponentState, cx: &mut Context<'_>) {
        cx.stop_opposite(false);
        state.set_ignore_observe(true, cx.container);

        let origin = state.origin_inset;
        let target = self.max_real_offset - origin.top;
        // short content already shows the footer without extra inset
        let extension = if self.max_real_offset > 0.0 {
            state.animator.view_height()
        } else {
            0.0
        };
        cx.container.set_inset_bottom(origin.bottom + extension);
        let live = cx.container.content_offset().y;
        cx.pin_offset(live);
        state.previous_offset_y = target;

        let completion = vec![state.task_trigger(), state.task_release_observe()];
        cx.animate_offset(target, completion);
    }

    fn stop(&mut self, state: &mut ComponentState, _animated: bool, cx: &mut Context<'_>) {
        state.set_state(RefreshState::Idle);
        // the caller repositions the content once new rows are in
        cx.container.set_inset_bottom(state.origin_inset.bottom);
    }

    fn detach(&mut self, state: &mut ComponentState, container: &mut ScrollContainer) {
        container.set_inset_bottom(state.origin_inset.bottom);
    }
}
