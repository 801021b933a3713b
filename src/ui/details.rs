// Detail page rendering module
//
// Renders the seven line detail page of the selected connection below the
// listing, or a hint when nothing is selected.

use crate::app::AppState;
use crate::theme::{MUTED_WHITE, RELAY_BLUE};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_details(f: &mut Frame, area: Rect, app: &mut AppState) {
    // the page crops itself to width - 2, which is the inside of the borders
    let lines = app
        .selected_details(area.width as usize)
        .unwrap_or_else(|| {
            vec![Line::from(Span::styled(
                "Select a connection with ↑/↓ to see its details",
                Style::default().fg(MUTED_WHITE),
            ))]
        });

    let details = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(
                " Details ",
                Style::default().fg(RELAY_BLUE).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(RELAY_BLUE)),
    );

    f.render_widget(details, area);
}
