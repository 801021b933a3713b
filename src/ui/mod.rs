// UI rendering module
//
// This module contains all UI rendering components for relaytop.
// The main draw() function orchestrates rendering of all UI panels.

mod details;
mod listing;
mod status_bar;

use crate::app::AppState;
use crate::app::config::DETAIL_LINE_COUNT;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use details::render_details;
use listing::render_listing;
use status_bar::render_status_bar;

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let size = f.area();

    // Main layout: connection listing, detail page, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                               // Listing
            Constraint::Length(DETAIL_LINE_COUNT as u16 + 2), // Detail page + borders
            Constraint::Length(3),                            // Status bar
        ])
        .split(size);

    render_listing(f, chunks[0], app);
    render_details(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}
