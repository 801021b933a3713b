// Connection listing rendering module
//
// Renders the scrollable list of connections. Rows come fully styled from
// the line formatter; this panel only frames them and tracks the selection.

use crate::app::AppState;
use crate::theme::RELAY_BLUE;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

/// Highlight behind the selected row
const SELECTION_BG: Color = Color::Rgb(47, 51, 77);

pub fn render_listing(f: &mut Frame, area: Rect, app: &mut AppState) {
    // rows are laid out for the space inside the borders
    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .listing_rows(width)
        .into_iter()
        .map(ListItem::new)
        .collect();

    let title = format!(
        " Connections ({}, by {}) ",
        app.lines.len(),
        app.listing_mode.label()
    );

    let listing = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default().fg(RELAY_BLUE).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(RELAY_BLUE)),
        )
        .highlight_style(Style::default().bg(SELECTION_BG));

    f.render_stateful_widget(listing, area, &mut app.connection_list_state);
}
