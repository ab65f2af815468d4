//! Host that ties a container to its header and footer components
//!
//! `ScrollView` owns the [`ScrollContainer`], one header slot, one footer
//! slot, the [`Scheduler`] and a virtual clock. Every public mutation ends
//! with a dispatch loop that forwards queued container events to the
//! components until nothing is left to deliver.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::animator::{Animator, AnimatorTexts};
use crate::component::{
    BottomAutoLoad, BottomPull, ComponentId, Context, Edge, RefreshComponent, RefreshKind,
    RefreshVariant, TopAutoLoad, TopPull,
};
use crate::config::RefreshConfig;
use crate::container::{ContainerEvent, ScrollContainer};
use crate::geometry::{EdgeInsets, Point, Size};
use crate::scheduler::{Scheduler, Task};
use crate::{Error, Result};

/// Upper bound on event rounds per dispatch
const MAX_DISPATCH_ROUNDS: usize = 64;

#[derive(Debug)]
pub struct ScrollView {
    container: ScrollContainer,
    header: Option<RefreshComponent>,
    footer: Option<RefreshComponent>,
    scheduler: Scheduler,
    config: RefreshConfig,
    now: Duration,
    next_id: u64,
}

impl ScrollView {
    pub fn new(bounds: Size, config: RefreshConfig) -> Self {
        Self {
            container: ScrollContainer::new(bounds),
            header: None,
            footer: None,
            scheduler: Scheduler::new(),
            config,
            now: Duration::ZERO,
            next_id: 0,
        }
    }

    pub fn container(&self) -> &ScrollContainer {
        &self.container
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn header(&self) -> Option<&RefreshComponent> {
        self.header.as_ref()
    }

    pub fn footer(&self) -> Option<&RefreshComponent> {
        self.footer.as_ref()
    }

    pub fn component(&self, edge: Edge) -> Option<&RefreshComponent> {
        match edge {
            Edge::Top => self.header.as_ref(),
            Edge::Bottom => self.footer.as_ref(),
        }
    }

    /// Current time on the virtual clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Nothing scheduled, animating or waiting for delivery
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_empty()
            && !self.container.is_animating()
            && !self.container.has_pending_events()
    }

    // Attachment

    pub fn add_top_refresh(&mut self, action: impl FnMut() + 'static) -> ComponentId {
        self.attach(Edge::Top, Box::new(TopPull::new()), Box::new(action))
    }

    pub fn add_bottom_refresh(&mut self, action: impl FnMut() + 'static) -> ComponentId {
        self.attach(Edge::Bottom, Box::new(BottomPull::new()), Box::new(action))
    }

    pub fn add_top_auto_refresh(&mut self, action: impl FnMut() + 'static) -> ComponentId {
        self.attach(Edge::Top, Box::new(TopAutoLoad::new()), Box::new(action))
    }

    pub fn add_bottom_auto_refresh(&mut self, action: impl FnMut() + 'static) -> ComponentId {
        self.attach(Edge::Bottom, Box::new(BottomAutoLoad::new()), Box::new(action))
    }

    /// Stop and detach the header; returns whether one was attached
    pub fn remove_header(&mut self) -> bool {
        self.remove(Edge::Top)
    }

    /// Stop and detach the footer; returns whether one was attached
    pub fn remove_footer(&mut self) -> bool {
        self.remove(Edge::Bottom)
    }

    fn attach(
        &mut self,
        edge: Edge,
        variant: Box<dyn RefreshVariant>,
        action: Box<dyn FnMut()>,
    ) -> ComponentId {
        // one finger only, two would desync the offset math
        self.container.set_multiple_touch_enabled(false);
        self.container.set_maximum_touches(1);

        self.next_id += 1;
        let id = ComponentId::from_raw(self.next_id);
        let kind = variant.kind();
        let animator_kind = match kind {
            RefreshKind::Pull => self.config.animators.pull,
            RefreshKind::AutoLoad => self.config.animators.auto,
        };
        let animator = animator_kind.build(edge.is_top(), &self.config.texts);
        let component = RefreshComponent::new(id, edge, variant, animator, Some(action));

        self.remove(edge);
        *self.slot_mut(edge) = Some(component);
        self.scheduler
            .schedule(self.now, Duration::ZERO, Task::BeginObserving { edge, id });
        debug!(%edge, ?kind, id = id.raw(), "refresh component attached");
        id
    }

    fn remove(&mut self, edge: Edge) -> bool {
        if self.component(edge).is_none() {
            return false;
        }
        self.with_component(edge, |component, cx| component.stop_refreshing(true, cx));
        if let Some(mut component) = self.slot_mut(edge).take() {
            component.detach(&mut self.container);
            debug!(%edge, id = component.id().raw(), "refresh component removed");
        }
        self.dispatch();
        true
    }

    // Refresh control

    pub fn start_refreshing(&mut self, edge: Edge) -> Result<()> {
        self.with_component(edge, |component, cx| component.start_refreshing(cx))
            .ok_or(Error::EmptySlot(edge))?;
        self.dispatch();
        Ok(())
    }

    pub fn stop_refreshing(&mut self, edge: Edge, animated: bool) -> Result<()> {
        self.with_component(edge, |component, cx| {
            component.stop_refreshing(animated, cx)
        })
        .ok_or(Error::EmptySlot(edge))?;
        self.dispatch();
        Ok(())
    }

    pub fn set_no_more_data(&mut self, edge: Edge, value: bool) -> Result<()> {
        let component = self.slot_mut(edge).as_mut().ok_or(Error::EmptySlot(edge))?;
        if !component.set_no_more_data(value) {
            return Err(Error::NotAutoLoad(edge));
        }
        self.dispatch();
        Ok(())
    }

    pub fn is_no_more_data(&self, edge: Edge) -> Result<bool> {
        let component = self.component(edge).ok_or(Error::EmptySlot(edge))?;
        component.is_no_more_data().ok_or(Error::NotAutoLoad(edge))
    }

    /// Replace the animator; it starts from a blank state
    pub fn set_animator(&mut self, edge: Edge, animator: Box<dyn Animator>) -> Result<()> {
        self.slot_mut(edge)
            .as_mut()
            .ok_or(Error::EmptySlot(edge))?
            .set_animator(animator);
        self.dispatch();
        Ok(())
    }

    pub fn set_texts(&mut self, edge: Edge, texts: AnimatorTexts) -> Result<()> {
        self.slot_mut(edge)
            .as_mut()
            .ok_or(Error::EmptySlot(edge))?
            .set_texts(texts);
        self.dispatch();
        Ok(())
    }

    /// Override the gap above a top pull header
    pub fn set_top_space(&mut self, space: Option<f64>) -> Result<()> {
        let component = self
            .header
            .as_mut()
            .ok_or(Error::EmptySlot(Edge::Top))?;
        if !component.set_top_space(space) {
            return Err(Error::NotTopPull(Edge::Top));
        }
        self.dispatch();
        Ok(())
    }

    pub fn set_hidden(&mut self, edge: Edge, hidden: bool) -> Result<()> {
        self.slot_mut(edge)
            .as_mut()
            .ok_or(Error::EmptySlot(edge))?
            .set_hidden(hidden);
        Ok(())
    }

    pub fn set_enabled(&mut self, edge: Edge, enabled: bool) -> Result<()> {
        self.slot_mut(edge)
            .as_mut()
            .ok_or(Error::EmptySlot(edge))?
            .set_enabled(enabled);
        Ok(())
    }

    // Container mutations

    pub fn set_content_offset(&mut self, offset: Point) {
        self.container.set_content_offset(offset);
        self.dispatch();
    }

    pub fn animate_offset_to(&mut self, offset: Point) {
        let timing = &self.config.timing;
        self.container
            .animate_offset_to(offset, timing.animation_duration(), timing.easing);
        self.dispatch();
    }

    pub fn scroll_by(&mut self, dy: f64) {
        self.container.scroll_by(dy);
        self.dispatch();
    }

    pub fn begin_dragging(&mut self) -> bool {
        let began = self.container.begin_dragging();
        self.dispatch();
        began
    }

    pub fn drag_by(&mut self, dy: f64) {
        self.container.drag_by(dy);
        self.dispatch();
    }

    pub fn end_dragging(&mut self) {
        self.container
            .end_dragging(self.config.timing.bounce_duration());
        self.dispatch();
    }

    /// Set the dragging flag without gesture side effects
    pub fn set_dragging(&mut self, dragging: bool) {
        self.container.set_dragging(dragging);
    }

    pub fn set_content_size(&mut self, size: Size) {
        self.container.set_content_size(size);
        self.dispatch();
    }

    pub fn set_bounds(&mut self, bounds: Size) {
        self.container.set_bounds(bounds);
        for component in [&mut self.header, &mut self.footer].into_iter().flatten() {
            component.observe_content_size();
        }
        self.dispatch();
    }

    pub fn set_content_inset(&mut self, inset: EdgeInsets) {
        self.container.set_content_inset(inset);
        self.dispatch();
    }

    // Clock

    /// Move the virtual clock, step animations and run due tasks
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
        self.container.advance(self.now);
        self.dispatch();
        for task in self.scheduler.take_due(self.now) {
            self.run_task(task);
            self.dispatch();
        }
    }

    fn slot_mut(&mut self, edge: Edge) -> &mut Option<RefreshComponent> {
        match edge {
            Edge::Top => &mut self.header,
            Edge::Bottom => &mut self.footer,
        }
    }

    /// Lend the container, scheduler and opposite slot to one component
    fn with_component<R>(
        &mut self,
        edge: Edge,
        f: impl FnOnce(&mut RefreshComponent, &mut Context<'_>) -> R,
    ) -> Option<R> {
        let (slot, other) = match edge {
            Edge::Top => (&mut self.header, &mut self.footer),
            Edge::Bottom => (&mut self.footer, &mut self.header),
        };
        let component = slot.as_mut()?;
        let mut cx = Context {
            container: &mut self.container,
            scheduler: &mut self.scheduler,
            timing: &self.config.timing,
            now: self.now,
            opposite: other.as_mut(),
        };
        Some(f(component, &mut cx))
    }

    fn dispatch(&mut self) {
        let mut rounds = 0;
        loop {
            let events = self.container.drain_events();
            let settled = events.is_empty();
            for event in events {
                self.handle_event(event);
            }
            self.layout_pass();
            if settled && !self.container.has_pending_events() {
                break;
            }
            rounds += 1;
            if rounds >= MAX_DISPATCH_ROUNDS {
                warn!(rounds, "container events did not settle");
                break;
            }
        }

        for component in [&mut self.header, &mut self.footer].into_iter().flatten() {
            component.refresh_display();
        }
        self.sync_interactivity();
    }

    fn handle_event(&mut self, event: ContainerEvent) {
        match event {
            ContainerEvent::OffsetChanged { new, dragging, .. } => {
                trace!(y = new.y, dragging, "offset changed");
                for edge in [Edge::Top, Edge::Bottom] {
                    self.with_component(edge, |component, cx| {
                        component.observe_offset(new.y, dragging, cx)
                    });
                }
            }
            ContainerEvent::ContentSizeChanged { new, .. } => {
                trace!(height = new.height, "content size changed");
                for component in [&mut self.header, &mut self.footer].into_iter().flatten() {
                    component.observe_content_size();
                }
            }
            ContainerEvent::AnimationFinished(tasks) => {
                for task in tasks {
                    self.run_task(task);
                }
            }
        }
    }

    fn layout_pass(&mut self) {
        let container = &self.container;
        for component in [&mut self.header, &mut self.footer].into_iter().flatten() {
            component.layout_if_needed(container);
        }
    }

    /// Scrolling stays locked while either component mutes observation
    fn sync_interactivity(&mut self) {
        let locked = [&self.header, &self.footer]
            .into_iter()
            .flatten()
            .any(|component| component.is_ignoring_observe());
        if self.container.is_scroll_enabled() == locked {
            self.container.set_scroll_enabled(!locked);
        }
    }

    fn run_task(&mut self, task: Task) {
        let ran = match task {
            Task::BeginObserving { edge, id } => {
                let container = &self.container;
                let slot = match edge {
                    Edge::Top => &mut self.header,
                    Edge::Bottom => &mut self.footer,
                };
                match slot.as_mut().filter(|component| component.id() == id) {
                    Some(component) => {
                        component.begin_observing(container);
                        true
                    }
                    None => false,
                }
            }
            Task::Trigger { edge, id } => match self.occupant_mut(edge, id) {
                Some(component) if component.is_refreshing() => {
                    component.trigger();
                    true
                }
                Some(_) => {
                    trace!(%edge, "dropped trigger for a stopped component");
                    true
                }
                None => false,
            },
            Task::StopRefreshing { edge, animated } => {
                self.with_component(edge, |component, cx| {
                    component.stop_refreshing(animated, cx)
                });
                true
            }
            Task::ReleaseObserve { edge, id } => {
                let container = &mut self.container;
                let slot = match edge {
                    Edge::Top => &mut self.header,
                    Edge::Bottom => &mut self.footer,
                };
                match slot.as_mut().filter(|component| component.id() == id) {
                    Some(component) => {
                        component.release_observe(container);
                        true
                    }
                    None => false,
                }
            }
        };
        if !ran {
            trace!(?task, "dropped task for a replaced component");
        }
    }

    fn occupant_mut(&mut self, edge: Edge, id: ComponentId) -> Option<&mut RefreshComponent> {
        self.slot_mut(edge)
            .as_mut()
            .filter(|component| component.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::animator::{AnimatorKind, RefreshState};

    const BOUNDS: Size = Size {
        width: 320.0,
        height: 100.0,
    };

    fn view_with_content(height: f64) -> ScrollView {
        let mut view = ScrollView::new(BOUNDS, RefreshConfig::default());
        view.set_content_size(Size::new(320.0, height));
        view
    }

    fn counter() -> (Rc<Cell<usize>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move || handle.set(handle.get() + 1))
    }

    fn offset(view: &mut ScrollView, y: f64, dragging: bool) -> RefreshState {
        view.set_dragging(dragging);
        view.set_content_offset(Point::new(0.0, y));
        view.header()
            .or(view.footer())
            .map(|component| component.state())
            .unwrap_or_default()
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_top_pull_release_scenario() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);

        let states = vec![
            offset(&mut view, 0.0, false),
            offset(&mut view, -20.0, true),
            offset(&mut view, -65.0, true),
            offset(&mut view, -65.0, false),
        ];
        assert_eq!(
            states,
            vec![
                RefreshState::Idle,
                RefreshState::Pulling,
                RefreshState::ReleaseToRefresh,
                RefreshState::Refreshing,
            ]
        );

        let header = view.header().unwrap();
        assert_eq!(header.start_count(), 1);
        assert!(header.is_ignoring_observe());
        assert_eq!(fired.get(), 0);

        view.advance(ms(300));
        let header = view.header().unwrap();
        assert_eq!(fired.get(), 1);
        assert_eq!(header.trigger_count(), 1);
        assert!(!header.is_ignoring_observe());
        assert_eq!(view.container().content_offset().y, -60.0);
        assert_eq!(view.container().content_inset().top, 60.0);
        assert!(view.container().is_scroll_enabled());
    }

    #[test]
    fn test_start_refreshing_twice_starts_once() {
        let mut view = view_with_content(400.0);
        let (_, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);

        view.start_refreshing(Edge::Top).unwrap();
        view.start_refreshing(Edge::Top).unwrap();
        assert_eq!(view.header().unwrap().start_count(), 1);
        assert_eq!(view.header().unwrap().state(), RefreshState::Refreshing);
    }

    #[test]
    fn test_stop_without_refresh_is_noop() {
        let mut view = view_with_content(400.0);
        let (_, action) = counter();
        view.add_bottom_auto_refresh(action);
        view.advance(Duration::ZERO);

        view.stop_refreshing(Edge::Bottom, true).unwrap();
        view.stop_refreshing(Edge::Bottom, false).unwrap();
        assert_eq!(view.footer().unwrap().stop_count(), 0);
        assert!(!view.footer().unwrap().is_ignoring_observe());
    }

    #[test]
    fn test_stop_without_animation_restores_origin_inset() {
        let origin = EdgeInsets::vertical(10.0, 5.0);
        let mut view = view_with_content(400.0);
        view.set_content_inset(origin);
        let (_, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);
        assert_eq!(view.header().unwrap().origin_inset(), origin);

        view.start_refreshing(Edge::Top).unwrap();
        view.advance(ms(300));
        assert_eq!(view.container().content_inset().top, 70.0);

        view.stop_refreshing(Edge::Top, false).unwrap();
        assert_eq!(view.container().content_inset(), origin);
        assert_eq!(view.header().unwrap().state(), RefreshState::Idle);
    }

    #[test]
    fn test_auto_load_stop_restores_origin_inset() {
        let mut view = view_with_content(400.0);
        let (_, action) = counter();
        view.add_bottom_auto_refresh(action);
        view.advance(Duration::ZERO);

        offset(&mut view, 310.0, true);
        assert_eq!(view.container().content_inset().bottom, 40.0);
        offset(&mut view, 330.0, false);
        assert!(view.footer().unwrap().is_refreshing());

        view.stop_refreshing(Edge::Bottom, false).unwrap();
        assert_eq!(view.container().content_inset(), EdgeInsets::ZERO);
    }

    #[test]
    fn test_offset_ratio_stays_in_unit_range() {
        let mut view = view_with_content(400.0);
        let (_, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);

        let mut y = -1000.0;
        while y <= 1000.0 {
            offset(&mut view, y, true);
            let ratio = view.header().unwrap().offset_ratio();
            assert!((0.0..=1.0).contains(&ratio), "ratio {ratio} at {y}");
            y += 37.0;
        }
        offset(&mut view, -30.0, true);
        assert_eq!(view.header().unwrap().offset_ratio(), 0.5);
    }

    #[test]
    fn test_bottom_auto_goes_straight_to_refreshing() {
        let mut view = view_with_content(100.0);
        let (fired, action) = counter();
        view.add_bottom_auto_refresh(action);
        view.advance(Duration::ZERO);

        let states = vec![offset(&mut view, 0.0, true), offset(&mut view, 30.0, true)];
        assert_eq!(states, vec![RefreshState::Idle, RefreshState::Refreshing]);

        view.advance(ms(199));
        assert_eq!(fired.get(), 0);
        view.advance(ms(1));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_no_more_data_never_refreshes() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_bottom_auto_refresh(action);
        view.advance(Duration::ZERO);

        view.set_no_more_data(Edge::Bottom, true).unwrap();
        assert!(view.is_no_more_data(Edge::Bottom).unwrap());
        for y in [0.0, 200.0, 320.0, 500.0, 10_000.0] {
            let state = offset(&mut view, y, false);
            assert_eq!(state, RefreshState::NoMoreData);
        }
        view.start_refreshing(Edge::Bottom).unwrap();
        view.advance(ms(500));
        assert_eq!(view.footer().unwrap().start_count(), 0);
        assert_eq!(fired.get(), 0);

        view.set_no_more_data(Edge::Bottom, false).unwrap();
        assert_eq!(view.footer().unwrap().state(), RefreshState::Idle);
    }

    #[test]
    fn test_add_top_refresh_twice_replaces_header() {
        let mut view = view_with_content(400.0);
        let (first_fired, first) = counter();
        let first_id = view.add_top_refresh(first);
        view.advance(Duration::ZERO);
        view.start_refreshing(Edge::Top).unwrap();

        let (_, second) = counter();
        let second_id = view.add_top_refresh(second);
        assert_ne!(first_id, second_id);

        let header = view.header().unwrap();
        assert_eq!(header.id(), second_id);
        assert!(!header.is_refreshing());
        assert_eq!(view.container().content_inset().top, 0.0);

        view.advance(ms(1000));
        assert_eq!(first_fired.get(), 0);
        assert!(view.header().unwrap().is_observing());
    }

    #[test]
    fn test_attach_restricts_touches() {
        let mut view = view_with_content(400.0);
        assert!(view.container().is_multiple_touch_enabled());
        view.add_bottom_refresh(|| {});
        assert!(!view.container().is_multiple_touch_enabled());
        assert_eq!(view.container().maximum_touches(), 1);
    }

    #[test]
    fn test_observation_starts_next_turn() {
        let mut view = view_with_content(400.0);
        view.add_top_refresh(|| {});
        offset(&mut view, -80.0, false);
        assert!(!view.header().unwrap().is_observing());
        assert_eq!(view.header().unwrap().state(), RefreshState::Idle);

        view.advance(Duration::ZERO);
        assert!(view.header().unwrap().is_observing());
    }

    #[test]
    fn test_top_pull_stops_refreshing_footer() {
        let mut view = view_with_content(400.0);
        view.add_top_refresh(|| {});
        view.add_bottom_refresh(|| {});
        view.advance(Duration::ZERO);

        view.start_refreshing(Edge::Bottom).unwrap();
        assert_eq!(view.container().content_inset().bottom, 60.0);

        view.start_refreshing(Edge::Top).unwrap();
        let footer = view.footer().unwrap();
        assert!(!footer.is_refreshing());
        assert_eq!(footer.stop_count(), 1);
        assert_eq!(view.container().content_inset().bottom, 0.0);
        assert!(view.header().unwrap().is_refreshing());
        assert!(!view.container().is_scroll_enabled());
    }

    #[test]
    fn test_auto_load_stops_opposite_after_delay() {
        let mut view = view_with_content(400.0);
        view.add_top_refresh(|| {});
        let (fired, action) = counter();
        view.add_bottom_auto_refresh(action);
        view.advance(Duration::ZERO);

        view.start_refreshing(Edge::Top).unwrap();
        view.advance(ms(300));
        view.start_refreshing(Edge::Bottom).unwrap();
        assert!(view.header().unwrap().is_refreshing());

        view.advance(ms(200));
        assert!(!view.header().unwrap().is_refreshing());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_replaced_component_tasks_never_fire() {
        let mut view = view_with_content(400.0);
        let (first_fired, first) = counter();
        view.add_bottom_auto_refresh(first);
        view.advance(Duration::ZERO);
        offset(&mut view, 330.0, false);
        assert!(view.footer().unwrap().is_refreshing());

        let (second_fired, second) = counter();
        view.add_bottom_auto_refresh(second);
        view.advance(ms(500));
        assert_eq!(first_fired.get(), 0);
        assert_eq!(second_fired.get(), 0);
        assert!(view.is_idle());
    }

    #[test]
    fn test_gesture_pull_triggers_on_release() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);

        assert!(view.begin_dragging());
        view.drag_by(-20.0);
        view.drag_by(-200.0);
        assert_eq!(view.container().content_offset().y, -80.0);
        assert_eq!(view.header().unwrap().state(), RefreshState::ReleaseToRefresh);

        view.end_dragging();
        assert_eq!(view.header().unwrap().state(), RefreshState::Refreshing);
        assert!(!view.begin_dragging());

        view.advance(ms(300));
        assert_eq!(fired.get(), 1);
        assert_eq!(view.container().content_offset().y, -60.0);

        view.stop_refreshing(Edge::Top, true).unwrap();
        assert!(view.header().unwrap().is_ignoring_observe());
        assert_eq!(view.container().content_inset().top, 0.0);
        view.advance(ms(300));
        assert_eq!(view.container().content_offset().y, 0.0);
        assert!(!view.header().unwrap().is_ignoring_observe());
        assert_eq!(view.header().unwrap().state(), RefreshState::Idle);
        assert!(view.is_idle());
    }

    #[test]
    fn test_bottom_pull_with_overflow_extends_inset() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_bottom_refresh(action);
        view.advance(Duration::ZERO);
        assert_eq!(view.footer().unwrap().frame().min_y(), 400.0);

        assert_eq!(offset(&mut view, 150.0, true), RefreshState::Pulling);
        assert_eq!(offset(&mut view, 370.0, true), RefreshState::ReleaseToRefresh);
        assert_eq!(offset(&mut view, 370.0, false), RefreshState::Refreshing);
        assert_eq!(view.container().content_inset().bottom, 60.0);

        view.advance(ms(300));
        assert_eq!(fired.get(), 1);
        assert_eq!(view.container().content_offset().y, 360.0);
    }

    #[test]
    fn test_bottom_pull_short_content_still_refreshes() {
        let mut view = view_with_content(40.0);
        let (fired, action) = counter();
        view.add_bottom_refresh(action);
        view.advance(Duration::ZERO);

        assert_eq!(offset(&mut view, 70.0, true), RefreshState::ReleaseToRefresh);
        assert_eq!(offset(&mut view, 70.0, false), RefreshState::Refreshing);
        assert_eq!(view.container().content_inset().bottom, 0.0);

        view.advance(ms(300));
        assert_eq!(fired.get(), 1);
        assert_eq!(view.container().content_offset().y, 0.0);
    }

    #[test]
    fn test_top_auto_rubber_band_inset() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_top_auto_refresh(action);
        view.advance(Duration::ZERO);

        assert_eq!(offset(&mut view, -10.0, true), RefreshState::Pulling);
        assert_eq!(view.container().content_inset().top, 10.0);
        assert_eq!(offset(&mut view, -30.0, true), RefreshState::Refreshing);
        assert_eq!(view.container().content_inset().top, 30.0);

        view.advance(ms(200));
        assert_eq!(fired.get(), 1);

        view.stop_refreshing(Edge::Top, true).unwrap();
        assert_eq!(view.container().content_inset().top, 0.0);
        assert_eq!(view.container().content_offset().y, 0.0);
        assert!(view.header().unwrap().is_ignoring_observe());
        view.advance(ms(10));
        assert!(!view.header().unwrap().is_ignoring_observe());
    }

    #[test]
    fn test_hidden_component_ignores_offsets() {
        let mut view = view_with_content(400.0);
        view.add_top_refresh(|| {});
        view.advance(Duration::ZERO);
        view.set_hidden(Edge::Top, true).unwrap();
        assert_eq!(offset(&mut view, -80.0, false), RefreshState::Idle);

        view.set_hidden(Edge::Top, false).unwrap();
        view.set_enabled(Edge::Top, false).unwrap();
        assert_eq!(offset(&mut view, -80.0, false), RefreshState::Idle);
    }

    #[test]
    fn test_top_space_moves_header_frame() {
        let mut view = view_with_content(400.0);
        view.add_top_refresh(|| {});
        view.advance(Duration::ZERO);
        assert_eq!(view.header().unwrap().frame().min_y(), -60.0);
        assert_eq!(view.header().unwrap().frame().size.width, 320.0);

        view.set_top_space(Some(20.0)).unwrap();
        assert_eq!(view.header().unwrap().frame().min_y(), -80.0);
    }

    #[test]
    fn test_slot_errors() {
        let mut view = view_with_content(400.0);
        assert!(matches!(
            view.start_refreshing(Edge::Top),
            Err(Error::EmptySlot(Edge::Top))
        ));

        view.add_top_auto_refresh(|| {});
        view.add_bottom_refresh(|| {});
        assert!(matches!(
            view.set_no_more_data(Edge::Bottom, true),
            Err(Error::NotAutoLoad(Edge::Bottom))
        ));
        assert!(matches!(
            view.set_top_space(Some(10.0)),
            Err(Error::NotTopPull(Edge::Top))
        ));
        assert!(view.remove_footer());
        assert!(!view.remove_footer());
    }

    #[test]
    fn test_set_animator_relays_out() {
        let mut view = view_with_content(400.0);
        view.add_top_refresh(|| {});
        view.advance(Duration::ZERO);
        assert_eq!(view.header().unwrap().frame().size.height, 60.0);

        let texts = view.config().texts.clone();
        view.set_animator(Edge::Top, AnimatorKind::Auto.build(true, &texts))
            .unwrap();
        let header = view.header().unwrap();
        assert_eq!(header.frame().size.height, 40.0);
        assert_eq!(header.animator().size(), Size::new(320.0, 40.0));
    }

    #[test]
    fn test_text_changes_render_once_per_dispatch() {
        let mut view = view_with_content(400.0);
        view.add_top_refresh(|| {});
        view.advance(Duration::ZERO);
        let header = view.header().unwrap();
        assert_eq!(header.animator().display().title, "Pull to refresh");
        let renders = header.animator().renders();

        let mut texts = header.animator().texts().clone();
        texts.pulling = "Swipe down".to_string();
        texts.refreshing = "Fetching".to_string();
        view.set_texts(Edge::Top, texts).unwrap();

        let animator = view.header().unwrap().animator();
        assert_eq!(animator.display().title, "Swipe down");
        assert_eq!(animator.renders(), renders + 1);
    }

    #[test]
    fn test_layout_waits_for_refresh_to_end() {
        let mut view = view_with_content(400.0);
        view.add_bottom_auto_refresh(|| {});
        view.advance(Duration::ZERO);
        offset(&mut view, 330.0, false);
        assert!(view.footer().unwrap().is_refreshing());

        view.set_content_size(Size::new(320.0, 800.0));
        assert_eq!(view.footer().unwrap().frame().min_y(), 400.0);

        view.stop_refreshing(Edge::Bottom, false).unwrap();
        assert_eq!(view.footer().unwrap().frame().min_y(), 800.0);
    }

    fn assert_top_at_rest(view: &ScrollView) {
        let container = view.container();
        assert_eq!(container.content_offset().y, 0.0);
        assert_eq!(container.content_inset().top, 0.0);
        assert!(!container.is_out_of_range());
        assert!(view.is_idle());
    }

    #[test]
    fn test_animated_stop_before_extend_moves() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);

        view.start_refreshing(Edge::Top).unwrap();
        view.stop_refreshing(Edge::Top, true).unwrap();
        view.advance(ms(1000));

        assert_top_at_rest(&view);
        let header = view.header().unwrap();
        assert_eq!(header.state(), RefreshState::Idle);
        assert!(!header.is_ignoring_observe());
        assert_eq!(fired.get(), 0);
        assert_eq!(header.trigger_count(), 0);
    }

    #[test]
    fn test_animated_stop_mid_extend_returns_to_rest() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);

        view.start_refreshing(Edge::Top).unwrap();
        view.advance(ms(100));
        assert!((view.container().content_offset().y + 20.0).abs() < 1e-9);

        view.stop_refreshing(Edge::Top, true).unwrap();
        assert!(view.header().unwrap().is_ignoring_observe());
        view.advance(ms(1000));

        assert_top_at_rest(&view);
        // muted on the way back, so no pulling state either
        assert_eq!(view.header().unwrap().state(), RefreshState::Idle);
        assert!(!view.header().unwrap().is_ignoring_observe());
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_plain_stop_mid_extend_snaps_to_rest() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);

        view.start_refreshing(Edge::Top).unwrap();
        view.advance(ms(150));
        view.stop_refreshing(Edge::Top, false).unwrap();
        assert_eq!(view.container().content_offset().y, 0.0);
        view.advance(ms(1000));

        assert_top_at_rest(&view);
        assert!(!view.header().unwrap().is_ignoring_observe());
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_remove_header_mid_extend_restores_container() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);

        view.start_refreshing(Edge::Top).unwrap();
        assert!(view.remove_header());
        assert!(view.container().is_scroll_enabled());
        view.advance(ms(1000));

        assert_top_at_rest(&view);
        assert_eq!(fired.get(), 0);
        assert!(view.header().is_none());
    }

    #[test]
    fn test_stopped_auto_load_never_fires() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_bottom_auto_refresh(action);
        view.advance(Duration::ZERO);

        view.start_refreshing(Edge::Bottom).unwrap();
        view.advance(ms(50));
        view.stop_refreshing(Edge::Bottom, false).unwrap();
        view.advance(ms(500));

        assert_eq!(fired.get(), 0);
        assert_eq!(view.footer().unwrap().trigger_count(), 0);
        assert!(view.is_idle());
    }

    #[test]
    fn test_release_state_falls_back_to_pulling_while_dragging() {
        let mut view = view_with_content(400.0);
        let (fired, action) = counter();
        view.add_top_refresh(action);
        view.advance(Duration::ZERO);

        let states = vec![
            offset(&mut view, -20.0, true),
            offset(&mut view, -70.0, true),
            offset(&mut view, -30.0, true),
            offset(&mut view, -30.0, false),
        ];
        assert_eq!(
            states,
            vec![
                RefreshState::Pulling,
                RefreshState::ReleaseToRefresh,
                RefreshState::Pulling,
                RefreshState::Pulling,
            ]
        );
        assert_eq!(view.header().unwrap().start_count(), 0);

        // only a stop leaves refreshing, whatever the offset does
        assert_eq!(offset(&mut view, -70.0, true), RefreshState::ReleaseToRefresh);
        assert_eq!(offset(&mut view, -70.0, false), RefreshState::Refreshing);
        view.advance(ms(400));
        assert_eq!(fired.get(), 1);
        assert_eq!(offset(&mut view, -10.0, true), RefreshState::Refreshing);
        assert_eq!(offset(&mut view, -100.0, true), RefreshState::Refreshing);
    }
}
