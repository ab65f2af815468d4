use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{footer_label, App};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {msg}")
        } else {
            format!(
                " {} | header: {} | footer: {} | offset: {:.1} rows",
                footer_label(app.footer_mode),
                app.header_state(),
                app.footer_state(),
                app.offset_rows()
            )
        };

        let help_hint = " q:quit j/k:scroll K/J:pull space:release r:refresh l:load n:nomore m:mode ";
        let padding_len = area
            .width
            .saturating_sub(status_text.width() as u16 + help_hint.width() as u16)
            as usize;

        let status_style = if app.status_message.is_some() {
            Style::default().fg(theme.yellow).bg(theme.bg2)
        } else {
            Style::default().fg(theme.fg0).bg(theme.bg2)
        };

        let line = Line::from(vec![
            Span::styled(status_text, status_style),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
