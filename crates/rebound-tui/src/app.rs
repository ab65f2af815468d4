use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use rebound_core::{Edge, Error, Point, RefreshConfig, RefreshKind, RefreshState, ScrollView, Size};

use crate::event::{LoadRequest, LoadResult};
use crate::input::Action;
use crate::theme::Theme;

/// Rows scrolled per wheel notch
const WHEEL_ROWS: f64 = 3.0;

/// Demo state: a paged list behind a refresh header and a footer
pub struct App {
    pub view: ScrollView,
    pub config: RefreshConfig,
    pub theme: Theme,
    pub items: Vec<String>,
    /// Pages loaded since the last header refresh
    pub pages: usize,
    /// Header refreshes completed so far
    pub generation: usize,
    pub footer_mode: RefreshKind,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub spinner_frame: usize,
    /// Edges whose action fired and still wait for a load
    fired: Rc<RefCell<VecDeque<Edge>>>,
    /// Last row seen by a mouse drag
    drag_row: Option<u16>,
}

impl App {
    pub fn new(config: RefreshConfig, footer_mode: RefreshKind, width: u16, height: u16) -> Self {
        let ppr = config.demo.points_per_row;
        let view = ScrollView::new(
            Size::new(f64::from(width), f64::from(height) * ppr),
            config.clone(),
        );
        let mut app = Self {
            view,
            theme: Theme::default(),
            items: Vec::new(),
            pages: 0,
            generation: 0,
            footer_mode,
            status_message: None,
            should_quit: false,
            spinner_frame: 0,
            fired: Rc::new(RefCell::new(VecDeque::new())),
            drag_row: None,
            config,
        };

        let first = LoadResult::for_request(
            LoadRequest {
                edge: Edge::Top,
                page: 0,
            },
            app.config.demo.page_size,
            0,
        );
        app.items = first.items;
        app.pages = 1;
        app.sync_content_size();

        let fired = Rc::clone(&app.fired);
        app.view.add_top_refresh(move || fired.borrow_mut().push_back(Edge::Top));
        app.attach_footer();
        app.view.advance(Duration::ZERO);
        app
    }

    pub fn points_per_row(&self) -> f64 {
        self.config.demo.points_per_row
    }

    /// Content rows hidden above the viewport; negative while pulled
    pub fn offset_rows(&self) -> f64 {
        self.view.container().content_offset().y / self.points_per_row()
    }

    pub fn header_state(&self) -> RefreshState {
        self.view.header().map(|c| c.state()).unwrap_or_default()
    }

    pub fn footer_state(&self) -> RefreshState {
        self.view.footer().map(|c| c.state()).unwrap_or_default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Advance the refresh clock by one frame
    pub fn tick(&mut self, dt: Duration) {
        self.view.advance(dt);
        let refreshing = [self.view.header(), self.view.footer()]
            .into_iter()
            .flatten()
            .any(|c| c.is_refreshing());
        if refreshing || !self.view.is_idle() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let ppr = self.points_per_row();
        self.view
            .set_bounds(Size::new(f64::from(width), f64::from(height) * ppr));
    }

    pub fn apply(&mut self, action: Action) {
        let ppr = self.points_per_row();
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollUp => self.view.scroll_by(-ppr),
            Action::ScrollDown => self.view.scroll_by(ppr),
            Action::Wheel(notches) => self.view.scroll_by(f64::from(notches) * WHEEL_ROWS * ppr),
            Action::PullDown => self.pull_step(-ppr),
            Action::PullUp => self.pull_step(ppr),
            Action::PressAt(row) => {
                if self.view.begin_dragging() {
                    self.drag_row = Some(row);
                }
            }
            Action::DragTo(row) => {
                if let Some(previous) = self.drag_row.replace(row) {
                    // Finger moving down reveals content above
                    let rows = f64::from(previous) - f64::from(row);
                    self.view.drag_by(rows * ppr);
                }
            }
            Action::Release => {
                self.drag_row = None;
                self.view.end_dragging();
            }
            Action::RefreshHeader => {
                if let Err(e) = self.view.start_refreshing(Edge::Top) {
                    self.report(e);
                }
            }
            Action::LoadFooter => {
                if let Err(e) = self.view.start_refreshing(Edge::Bottom) {
                    self.report(e);
                }
            }
            Action::ToggleNoMoreData => {
                let result = self
                    .view
                    .is_no_more_data(Edge::Bottom)
                    .and_then(|current| self.view.set_no_more_data(Edge::Bottom, !current));
                if let Err(e) = result {
                    self.report(e);
                }
            }
            Action::SwitchFooterMode => {
                self.footer_mode = match self.footer_mode {
                    RefreshKind::Pull => RefreshKind::AutoLoad,
                    RefreshKind::AutoLoad => RefreshKind::Pull,
                };
                self.attach_footer();
                self.set_status(format!("Footer: {}", footer_label(self.footer_mode)));
            }
            Action::None => {}
        }
    }

    /// Loads to start for every action fired since the last call
    pub fn take_load_requests(&mut self) -> Vec<LoadRequest> {
        let fired: Vec<Edge> = self.fired.borrow_mut().drain(..).collect();
        let mut requests = Vec::with_capacity(fired.len());
        for edge in fired {
            match edge {
                Edge::Top => requests.push(LoadRequest { edge, page: 0 }),
                Edge::Bottom if self.pages >= self.config.demo.max_pages => {
                    tracing::debug!(pages = self.pages, "footer fired past the last page");
                    if let Err(e) = self.view.stop_refreshing(Edge::Bottom, true) {
                        self.report(e);
                    }
                    self.settle();
                    self.set_status("No more pages");
                }
                Edge::Bottom => requests.push(LoadRequest {
                    edge,
                    page: self.pages,
                }),
            }
        }
        requests
    }

    pub fn handle_load_result(&mut self, result: LoadResult) {
        tracing::debug!(edge = %result.edge, page = result.page, items = result.items.len(), "load finished");
        match result.edge {
            Edge::Top => {
                self.items = result.items;
                self.pages = 1;
                self.generation += 1;
                self.sync_content_size();
                if let Err(e) = self.view.stop_refreshing(Edge::Top, true) {
                    self.report(e);
                }
                if self.footer_mode == RefreshKind::AutoLoad {
                    if let Err(e) = self.view.set_no_more_data(Edge::Bottom, false) {
                        self.report(e);
                    }
                }
                self.set_status(format!("Refreshed ({} items)", self.items.len()));
            }
            Edge::Bottom => {
                // Grow the content before the footer gives its space back
                self.items.extend(result.items);
                self.pages += 1;
                self.sync_content_size();
                if let Err(e) = self.view.stop_refreshing(Edge::Bottom, true) {
                    self.report(e);
                }
                self.settle();
                if self.pages >= self.config.demo.max_pages
                    && self.footer_mode == RefreshKind::AutoLoad
                {
                    if let Err(e) = self.view.set_no_more_data(Edge::Bottom, true) {
                        self.report(e);
                    }
                }
                self.set_status(format!("Loaded page {}", self.pages));
            }
        }
    }

    fn pull_step(&mut self, dy: f64) {
        if !self.view.container().is_dragging() && !self.view.begin_dragging() {
            return;
        }
        self.view.drag_by(dy);
    }

    /// A bottom pull leaves the content where it was; bring it back in range
    fn settle(&mut self) {
        let container = self.view.container();
        if container.is_dragging() || !container.is_out_of_range() {
            return;
        }
        let y = container
            .content_offset()
            .y
            .clamp(container.min_offset_y(), container.max_offset_y());
        self.view.animate_offset_to(Point::new(0.0, y));
    }

    fn attach_footer(&mut self) {
        let fired = Rc::clone(&self.fired);
        let action = move || fired.borrow_mut().push_back(Edge::Bottom);
        match self.footer_mode {
            RefreshKind::Pull => self.view.add_bottom_refresh(action),
            RefreshKind::AutoLoad => self.view.add_bottom_auto_refresh(action),
        };
        // Observation starts on the next turn of the clock
        self.view.advance(Duration::ZERO);
        if self.footer_mode == RefreshKind::AutoLoad && self.pages >= self.config.demo.max_pages {
            if let Err(e) = self.view.set_no_more_data(Edge::Bottom, true) {
                self.report(e);
            }
        }
    }

    fn sync_content_size(&mut self) {
        let width = self.view.container().bounds().width;
        let height = self.items.len() as f64 * self.points_per_row();
        self.view.set_content_size(Size::new(width, height));
    }

    fn report(&mut self, error: Error) {
        tracing::debug!(%error, "refresh control refused");
        let message = match error {
            Error::NotAutoLoad(_) => "Footer is in pull mode (press m)".to_string(),
            other => other.to_string(),
        };
        self.set_status(message);
    }
}

pub fn footer_label(kind: RefreshKind) -> &'static str {
    match kind {
        RefreshKind::Pull => "PULL",
        RefreshKind::AutoLoad => "AUTO",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RefreshConfig {
        let mut config = RefreshConfig::default();
        config.demo.page_size = 5;
        config.demo.max_pages = 3;
        config
    }

    fn app(mode: RefreshKind) -> App {
        // 5 rows of 20 points over 5 items of 20 points
        App::new(test_config(), mode, 40, 5)
    }

    fn run_for(app: &mut App, ms: u64) {
        for _ in 0..ms / 10 {
            app.tick(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_initial_page() {
        let app = app(RefreshKind::AutoLoad);
        assert_eq!(app.items.len(), 5);
        assert_eq!(app.pages, 1);
        assert_eq!(app.view.container().content_size().height, 100.0);
        assert_eq!(app.header_state(), RefreshState::Idle);
        assert!(app.view.footer().is_some_and(|c| c.is_observing()));
    }

    #[test]
    fn test_refresh_key_requests_first_page() {
        let mut app = app(RefreshKind::Pull);
        app.apply(Action::RefreshHeader);
        assert_eq!(app.header_state(), RefreshState::Refreshing);

        run_for(&mut app, 400);
        let requests = app.take_load_requests();
        assert_eq!(
            requests,
            vec![LoadRequest {
                edge: Edge::Top,
                page: 0
            }]
        );
        assert!(app.take_load_requests().is_empty());

        let result = LoadResult::for_request(requests[0], 5, 1);
        app.handle_load_result(result);
        run_for(&mut app, 400);
        assert_eq!(app.header_state(), RefreshState::Idle);
        assert_eq!(app.generation, 1);
        assert_eq!(app.view.container().content_inset().top, 0.0);
    }

    #[test]
    fn test_keyboard_pull_and_release_fires_header() {
        let mut app = app(RefreshKind::Pull);
        for _ in 0..12 {
            app.apply(Action::PullDown);
        }
        assert_eq!(app.header_state(), RefreshState::ReleaseToRefresh);
        app.apply(Action::Release);
        assert_eq!(app.header_state(), RefreshState::Refreshing);
        run_for(&mut app, 400);
        assert_eq!(app.take_load_requests().len(), 1);
    }

    #[test]
    fn test_mouse_drag_moves_content() {
        let mut app = app(RefreshKind::Pull);
        app.apply(Action::PressAt(1));
        app.apply(Action::DragTo(2));
        assert_eq!(app.view.container().content_offset().y, -20.0);
        assert_eq!(app.header_state(), RefreshState::Pulling);
        app.apply(Action::Release);
        assert!(!app.view.container().is_dragging());
    }

    #[test]
    fn test_footer_loads_pages_until_exhausted() {
        let mut app = app(RefreshKind::AutoLoad);
        for page in 1..3 {
            app.apply(Action::LoadFooter);
            run_for(&mut app, 300);
            let requests = app.take_load_requests();
            assert_eq!(
                requests,
                vec![LoadRequest {
                    edge: Edge::Bottom,
                    page
                }]
            );
            app.handle_load_result(LoadResult::for_request(requests[0], 5, 0));
            run_for(&mut app, 100);
        }
        assert_eq!(app.items.len(), 15);
        assert_eq!(app.footer_state(), RefreshState::NoMoreData);

        app.apply(Action::LoadFooter);
        assert_eq!(app.footer_state(), RefreshState::NoMoreData);
    }

    #[test]
    fn test_header_refresh_resets_no_more_data() {
        let mut app = app(RefreshKind::AutoLoad);
        app.apply(Action::ToggleNoMoreData);
        assert_eq!(app.view.is_no_more_data(Edge::Bottom).ok(), Some(true));

        app.apply(Action::RefreshHeader);
        run_for(&mut app, 400);
        let requests = app.take_load_requests();
        app.handle_load_result(LoadResult::for_request(requests[0], 5, 1));
        assert_eq!(app.view.is_no_more_data(Edge::Bottom).ok(), Some(false));
        assert_eq!(app.pages, 1);
    }

    #[test]
    fn test_toggle_on_pull_footer_reports() {
        let mut app = app(RefreshKind::Pull);
        app.apply(Action::ToggleNoMoreData);
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("pull mode")));
    }

    #[test]
    fn test_switch_footer_mode_replaces_component() {
        let mut app = app(RefreshKind::Pull);
        app.apply(Action::SwitchFooterMode);
        assert_eq!(app.footer_mode, RefreshKind::AutoLoad);
        assert_eq!(
            app.view.footer().map(|c| c.kind()),
            Some(RefreshKind::AutoLoad)
        );
        app.apply(Action::SwitchFooterMode);
        assert_eq!(app.view.footer().map(|c| c.kind()), Some(RefreshKind::Pull));
    }

    #[test]
    fn test_pull_footer_past_last_page_stops() {
        let mut app = app(RefreshKind::Pull);
        app.pages = 3;
        app.apply(Action::LoadFooter);
        run_for(&mut app, 400);
        assert!(app.take_load_requests().is_empty());
        assert_eq!(app.status_message.as_deref(), Some("No more pages"));
        assert_eq!(app.footer_state(), RefreshState::Idle);
        run_for(&mut app, 400);
        assert_eq!(app.view.container().content_offset().y, 0.0);
        assert_eq!(app.view.container().content_inset().bottom, 0.0);
    }

    #[test]
    fn test_quit() {
        let mut app = app(RefreshKind::Pull);
        app.apply(Action::Quit);
        assert!(app.should_quit);
    }
}
