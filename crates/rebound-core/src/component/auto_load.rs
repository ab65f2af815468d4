//! Auto-load variants: crossing the threshold triggers without a release.

use super::{offset_ratio, ComponentState, Context, RefreshKind, RefreshVariant};
use crate::animator::RefreshState;
use crate::container::ScrollContainer;
use crate::geometry::Rect;
use crate::scheduler::Task;

fn resting_state(no_more_data: bool) -> RefreshState {
    if no_more_data {
        RefreshState::NoMoreData
    } else {
        RefreshState::Idle
    }
}

/// Stop the opposite edge, then fire, both after the cross-edge delay
fn schedule_start(state: &ComponentState, cx: &mut Context<'_>) {
    let delay = cx.timing.cross_edge_delay();
    cx.schedule(
        delay,
        Task::StopRefreshing {
            edge: state.edge.opposite(),
            animated: false,
        },
    );
    cx.schedule(delay, state.task_trigger());
}

/// Load older content when the top is reached
#[derive(Debug, Default)]
pub(crate) struct TopAutoLoad {
    max_real_offset: f64,
    trigger_offset: f64,
    no_more_data: bool,
}

impl TopAutoLoad {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl RefreshVariant for TopAutoLoad {
    fn kind(&self) -> RefreshKind {
        RefreshKind::AutoLoad
    }

    fn adjust_view(&mut self, state: &mut ComponentState, container: &ScrollContainer) {
        let space = state.origin_inset.top.max(0.0);
        let height = state.animator.view_height();
        state.frame = Rect::new(0.0, -(space + height), container.bounds().width, height);
        self.max_real_offset = height;
        self.trigger_offset = state.animator.trigger_height();
    }

    fn offset_change_action(
        &mut self,
        state: &mut ComponentState,
        raw_y: f64,
        _dragging: bool,
        cx: &mut Context<'_>,
    ) {
        let real = raw_y + state.origin_inset.top;
        // the inset follows the pull so the header stays where it was revealed
        if real < 0.0 && real > -self.max_real_offset {
            cx.container.set_inset_top(-raw_y);
        } else if real >= 0.0 {
            cx.container.set_inset_top(state.origin_inset.top);
        }

        if !state.is_refreshing && !self.no_more_data {
            if real < -self.trigger_offset {
                self.start_refreshing(state, cx);
            } else if real < 0.0 {
                state.set_state(RefreshState::Pulling);
            }
        }
        state
            .animator
            .set_offset_ratio(offset_ratio(-real, self.trigger_offset));
    }

    fn start(&mut self, state: &mut ComponentState, cx: &mut Context<'_>) {
        schedule_start(state, cx);
    }

    fn stop(&mut self, state: &mut ComponentState, _animated: bool, cx: &mut Context<'_>) {
        state.set_state(resting_state(self.no_more_data));
        state.set_ignore_observe(true, cx.container);
        let origin_top = state.origin_inset.top;
        cx.container.set_inset_top(origin_top);
        cx.pin_offset(-origin_top);
        let delay = cx.timing.observe_release_delay();
        cx.schedule(delay, state.task_release_observe());
    }

    fn detach(&mut self, state: &mut ComponentState, container: &mut ScrollContainer) {
        container.set_inset_top(state.origin_inset.top);
    }

    fn is_no_more_data(&self) -> Option<bool> {
        Some(self.no_more_data)
    }

    fn set_no_more_data(&mut self, state: &mut ComponentState, value: bool) -> bool {
        self.no_more_data = value;
        state.set_state(resting_state(value));
        true
    }
}

/// Load more content when the bottom is reached
#[derive(Debug, Default)]
pub(crate) struct BottomAutoLoad {
    min_real_offset: f64,
    trigger_offset: f64,
    no_more_data: bool,
    /// Whether the footer's inset is currently applied
    inset_extended: bool,
}

impl BottomAutoLoad {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn set_inset_extended(
        &mut self,
        extended: bool,
        state: &ComponentState,
        container: &mut ScrollContainer,
    ) {
        if self.inset_extended == extended {
            return;
        }
        self.inset_extended = extended;
        let bottom = state.origin_inset.bottom;
        if extended {
            container.set_inset_bottom(bottom + state.animator.view_height());
        } else {
            container.set_inset_bottom(bottom);
        }
    }
}

impl RefreshVariant for BottomAutoLoad {
    fn kind(&self) -> RefreshKind {
        RefreshKind::AutoLoad
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
        self.trigger_offset = self.min_real_offset + state.animator.trigger_height();
    }

    fn offset_change_action(
        &mut self,
        state: &mut ComponentState,
        raw_y: f64,
        _dragging: bool,
        cx: &mut Context<'_>,
    ) {
        let real = raw_y + state.origin_inset.top;
        if !state.is_refreshing && !self.no_more_data {
            if real > self.trigger_offset {
                self.start_refreshing(state, cx);
            } else {
                if real > self.min_real_offset {
                    state.set_state(RefreshState::Pulling);
                }
                self.set_inset_extended(true, state, cx.container);
            }
        }
        let trigger_height = self.trigger_offset - self.min_real_offset;
        state
            .animator
            .set_offset_ratio(offset_ratio(real - self.min_real_offset, trigger_height));
    }

    fn start(&mut self, state: &mut ComponentState, cx: &mut Context<'_>) {
        schedule_start(state, cx);
    }

    fn stop(&mut self, state: &mut ComponentState, _animated: bool, cx: &mut Context<'_>) {
        state.set_state(resting_state(self.no_more_data));
        state.set_ignore_observe(true, cx.container);
        self.set_inset_extended(false, state, cx.container);
        let delay = cx.timing.observe_release_delay();
        cx.schedule(delay, state.task_release_observe());
    }

    fn detach(&mut self, state: &mut ComponentState, container: &mut ScrollContainer) {
        self.set_inset_extended(false, state, container);
    }

    fn is_no_more_data(&self) -> Option<bool> {
        Some(self.no_more_data)
    }

    fn set_no_more_data(&mut self, state: &mut ComponentState, value: bool) -> bool {
        self.no_more_data = value;
        state.set_state(resting_state(value));
        true
    }
}
