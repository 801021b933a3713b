// Keyboard event handling
//
// This module contains the keyboard event handler that processes
// user input and updates the application state accordingly.

use super::{AppState, Toggle};
use crossterm::event::KeyCode;

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings
/// - `q`, `Q`, `Esc` - Quit the application
/// - `Up` / `Down` - Select previous / next connection
/// - `l`, `L` - Cycle listing mode (IP address, fingerprint, nickname)
/// - `f`, `n`, `d`, `e` - Toggle fingerprint / nickname / destination /
///   expanded address columns
/// - `i` - Toggle showing addresses at all
/// - `x` - Toggle exit ports
/// - `+`, `=` - Slower refresh
/// - `-`, `_` - Faster refresh
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    let toggle = match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.running = false;
            return false;
        }
        KeyCode::Up => {
            app.select_previous_connection();
            return true;
        }
        KeyCode::Down => {
            app.select_next_connection();
            return true;
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            app.cycle_listing_mode();
            return true;
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.decrease_refresh_rate();
            return true;
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            app.increase_refresh_rate();
            return true;
        }
        KeyCode::Char('f') | KeyCode::Char('F') => Toggle::Fingerprint,
        KeyCode::Char('n') | KeyCode::Char('N') => Toggle::Nickname,
        KeyCode::Char('d') | KeyCode::Char('D') => Toggle::Destination,
        KeyCode::Char('e') | KeyCode::Char('E') => Toggle::ExpandedIp,
        KeyCode::Char('i') | KeyCode::Char('I') => Toggle::Ips,
        KeyCode::Char('x') | KeyCode::Char('X') => Toggle::ExitPort,
        _ => return true,
    };

    app.toggle(toggle);
    true
}
