// Theme module - Color palette and theme re-exports
//
// Connection categories each get a color, used for the whole listing row and
// the detail page. The remaining colors are for the panel chrome.

pub mod default;

use ratatui::style::Color;

/// Borders, titles and outbound traffic
/// RGB: (122, 162, 247)
pub const RELAY_BLUE: Color = Color::Rgb(122, 162, 247);

/// Connections coming in to us
/// RGB: (158, 206, 106)
pub const INBOUND_GREEN: Color = Color::Rgb(158, 206, 106);

/// Exit traffic and errors
/// RGB: (247, 118, 142)
pub const EXIT_RED: Color = Color::Rgb(247, 118, 142);

/// Local applications (SOCKS clients) and warnings
/// RGB: (224, 175, 104)
pub const SOCKS_YELLOW: Color = Color::Rgb(224, 175, 104);

/// Hidden services, controllers and directory fetches
/// RGB: (187, 154, 247)
pub const ONION_PURPLE: Color = Color::Rgb(187, 154, 247);

/// Our own circuits
/// RGB: (125, 207, 255)
pub const CIRCUIT_CYAN: Color = Color::Rgb(125, 207, 255);

/// Neutral text
/// RGB: (169, 177, 214)
pub const MUTED_WHITE: Color = Color::Rgb(169, 177, 214);

pub use default::*;
