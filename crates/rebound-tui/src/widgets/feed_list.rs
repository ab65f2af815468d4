use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rebound_core::RefreshComponent;

use super::RefreshIndicatorWidget;
use crate::app::{footer_label, App};

/// Rows and columns left for the list inside a terminal of `width` x `height`
pub fn list_viewport(width: u16, height: u16) -> (u16, u16) {
    // borders plus the status bar
    (width.saturating_sub(2), height.saturating_sub(3))
}

/// The scrolling list with its header and footer components
pub struct FeedListWidget;

impl FeedListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let border_style = if app.view.is_idle() {
            Style::default().fg(theme.grey0)
        } else {
            Style::default().fg(theme.aqua)
        };
        let title = format!(
            " Feed [{}] {} items ",
            footer_label(app.footer_mode),
            app.items.len()
        );
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let ppr = app.points_per_row();
        let offset = app.view.container().content_offset().y;
        let lines: Vec<Line> = (0..inner.height)
            .map(|row| {
                let y = offset + f64::from(row) * ppr;
                let index = (y / ppr).floor();
                if index < 0.0 {
                    return Line::default();
                }
                match app.items.get(index as usize) {
                    Some(item) => {
                        let bg = if index as usize % 2 == 0 {
                            theme.bg0
                        } else {
                            theme.bg1
                        };
                        Line::from(Span::styled(
                            format!(" {item}"),
                            Style::default().fg(theme.fg1).bg(bg),
                        ))
                    }
                    None => Line::default(),
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        for component in [app.view.header(), app.view.footer()].into_iter().flatten() {
            if let Some(rows) = visible_rows(component, offset, ppr, inner) {
                RefreshIndicatorWidget::render(frame, rows, component, app);
            }
        }
    }
}

/// Screen rows covered by a component's frame
fn visible_rows(component: &RefreshComponent, offset: f64, ppr: f64, inner: Rect) -> Option<Rect> {
    let frame = component.frame();
    let top = ((frame.min_y() - offset) / ppr).round().max(0.0);
    let bottom = ((frame.max_y() - offset) / ppr)
        .round()
        .min(f64::from(inner.height));
    if bottom <= top {
        return None;
    }
    Some(Rect::new(
        inner.x,
        inner.y + top as u16,
        inner.width,
        (bottom - top) as u16,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_viewport_leaves_room_for_chrome() {
        assert_eq!(list_viewport(80, 24), (78, 21));
        assert_eq!(list_viewport(1, 2), (0, 0));
    }
}
