// Default theme functions
//
// Colors for connection categories and the refresh interval indicator.

use ratatui::style::Color;

use super::{
    CIRCUIT_CYAN, EXIT_RED, INBOUND_GREEN, ONION_PURPLE, RELAY_BLUE, SOCKS_YELLOW,
};
use crate::net::Category;

/// Color a connection of the given category is drawn in
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Inbound => INBOUND_GREEN,
        Category::Outbound => RELAY_BLUE,
        Category::Exit => EXIT_RED,
        Category::Hidden | Category::Control | Category::Directory => ONION_PURPLE,
        Category::Socks => SOCKS_YELLOW,
        Category::Circuit => CIRCUIT_CYAN,
    }
}

/// Get color for refresh interval based on its value relative to default
///
/// Color coding:
/// - Green: default or slower (normal resource usage)
/// - Yellow: faster than default
/// - Red: more than twice as fast as default
///
/// Recently changed values are drawn 20% brighter.
pub fn get_refresh_color(interval_ms: u64, default_ms: u64, recently_changed: bool) -> Color {
    let base_color = if interval_ms < default_ms {
        let ratio = (default_ms - interval_ms) as f32 / default_ms as f32;

        if ratio > 0.5 {
            EXIT_RED
        } else {
            SOCKS_YELLOW
        }
    } else {
        INBOUND_GREEN
    };

    if !recently_changed {
        return base_color;
    }

    match base_color {
        Color::Rgb(r, g, b) => {
            let brighten = |c: u8| ((c as f32 * 1.2).min(255.0)) as u8;
            Color::Rgb(brighten(r), brighten(g), brighten(b))
        }
        _ => base_color,
    }
}
