use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rebound_core::animator::ArrowDirection;
use rebound_core::{Indicator, RefreshComponent, RefreshState};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Shortest progress gauge, in columns
const MIN_GAUGE_WIDTH: usize = 8;

/// Paints one component's animator display
pub struct RefreshIndicatorWidget;

impl RefreshIndicatorWidget {
    pub fn render(frame: &mut Frame, area: Rect, component: &RefreshComponent, app: &App) {
        if area.height == 0 || component.is_hidden() {
            return;
        }
        let theme = &app.theme;
        let animator = component.animator();
        let display = animator.display();
        let state = animator.state();

        let color = match state {
            RefreshState::ReleaseToRefresh => theme.armed,
            RefreshState::Refreshing => theme.indicator,
            RefreshState::NoMoreData => theme.exhausted,
            RefreshState::Idle | RefreshState::Pulling => theme.fg0,
        };
        let mut title_style = Style::default().fg(color);
        if !component.is_enabled() {
            title_style = title_style.add_modifier(Modifier::DIM);
        }

        let mut spans = Vec::new();
        if let Some(glyph) = glyph(display.indicator, app.spinner_frame) {
            spans.push(Span::styled(glyph, Style::default().fg(theme.blue)));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(display.title.clone(), title_style));

        let mut lines = Vec::with_capacity(area.height as usize);
        // Title sits on the middle row, the gauge right below it
        let middle = area.height.saturating_sub(1) / 2;
        for _ in 0..middle {
            lines.push(Line::default());
        }
        lines.push(Line::from(spans));
        if matches!(state, RefreshState::Pulling | RefreshState::ReleaseToRefresh)
            && lines.len() < area.height as usize
        {
            let width = display.title.width().max(MIN_GAUGE_WIDTH);
            lines.push(Line::from(Span::styled(
                gauge(display.progress, width),
                Style::default().fg(theme.grey1),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.bg1));
        frame.render_widget(paragraph, area);
    }
}

fn glyph(indicator: Indicator, spinner_frame: usize) -> Option<&'static str> {
    match indicator {
        Indicator::None => None,
        Indicator::Arrow(ArrowDirection::Down) => Some("↓"),
        Indicator::Arrow(ArrowDirection::Up) => Some("↑"),
        Indicator::Spinner => Some(SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()]),
    }
}

/// Horizontal bar filled to `progress`
fn gauge(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "━".repeat(filled), "─".repeat(width - filled))
}
