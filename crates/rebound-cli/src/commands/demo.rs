use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;

use rebound_core::{RefreshConfig, RefreshKind};
use rebound_tui::{
    app::App,
    event::{AppEvent, EventHandler, LoadRequest, LoadResult},
    input::{handle_key_event, handle_mouse_event},
    widgets::{list_viewport, FeedListWidget, StatusBarWidget},
};

pub async fn run(config: RefreshConfig, footer_mode: RefreshKind) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Rebound"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let (width, height) = list_viewport(size.width, size.height);
    let event_handler = EventHandler::new(config.demo.tick_rate_ms.max(1));
    let mut app = App::new(config, footer_mode, width, height);

    // Channel for finished loads
    let (load_tx, mut load_rx) = mpsc::unbounded_channel::<LoadResult>();
    let mut last_frame = Instant::now();

    // Main loop
    loop {
        // Process any finished loads (non-blocking)
        while let Ok(result) = load_rx.try_recv() {
            app.handle_load_result(result);
        }

        let now = Instant::now();
        app.tick(now.duration_since(last_frame));
        last_frame = now;

        for request in app.take_load_requests() {
            spawn_load(&app, request, load_tx.clone());
        }

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: content + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            FeedListWidget::render(frame, main_layout[0], &app);
            StatusBarWidget::render(frame, main_layout[1], &app);
        })?;

        if let Some(event) = event_handler.next()? {
            match event {
                AppEvent::Key(key) => {
                    app.clear_status();
                    app.apply(handle_key_event(key));
                }
                AppEvent::Mouse(mouse) => {
                    app.apply(handle_mouse_event(mouse));
                }
                AppEvent::Resize(w, h) => {
                    let (width, height) = list_viewport(w, h);
                    app.resize(width, height);
                }
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

/// Fake a network round trip for `request`
fn spawn_load(app: &App, request: LoadRequest, tx: mpsc::UnboundedSender<LoadResult>) {
    let latency = Duration::from_millis(app.config.demo.load_latency_ms);
    let page_size = app.config.demo.page_size;
    let generation = match request.edge {
        rebound_core::Edge::Top => app.generation + 1,
        rebound_core::Edge::Bottom => app.generation,
    };
    tracing::debug!(edge = %request.edge, page = request.page, "load started");

    tokio::spawn(async move {
        tokio::time::sleep(latency).await;
        let _ = tx.send(LoadResult::for_request(request, page_size, generation));
    });
}
