// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts and toggle indicators.

use crate::app::config::RefreshConfig;
use crate::app::AppState;
use crate::theme::{get_refresh_color, INBOUND_GREEN, MUTED_WHITE, RELAY_BLUE};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    // Calculate available width for hints (subtract borders)
    let available_width = area.width.saturating_sub(2) as usize;

    // Define all hints with priority levels
    struct Hint {
        priority: u8,
        key: &'static str,
        desc: &'static str,
        color: Color,
    }

    let hints = [
        Hint {
            priority: 1,
            key: "Q:",
            desc: "Quit | ",
            color: Color::Red,
        },
        Hint {
            priority: 1,
            key: "↑↓:",
            desc: "Select | ",
            color: RELAY_BLUE,
        },
        Hint {
            priority: 1,
            key: "L:",
            desc: "Listing | ",
            color: RELAY_BLUE,
        },
        Hint {
            priority: 2,
            key: "+/-:",
            desc: "Speed | ",
            color: RELAY_BLUE,
        },
    ];

    let indicators = build_toggle_indicators(app);
    let indicator_width: usize = indicators.iter().map(|span| span.width()).sum();

    let mut spans = vec![Span::raw(" ")];
    let mut current_length = 1 + indicator_width;

    // Process hints by priority, leaving room for the indicators
    for priority in 1..=2 {
        for hint in hints.iter().filter(|hint| hint.priority == priority) {
            let hint_length = hint.key.chars().count() + hint.desc.len();
            if current_length + hint_length <= available_width {
                spans.push(Span::styled(
                    hint.key,
                    Style::default().fg(hint.color).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(hint.desc));
                current_length += hint_length;
            }
        }
    }

    spans.extend(indicators);

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(RELAY_BLUE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

/// Toggle status indicator spans for the status bar
///
/// Shows `[F:ON]` style markers for each display toggle, green when on,
/// followed by the refresh interval.
pub fn build_toggle_indicators(app: &AppState) -> Vec<Span<'static>> {
    let display = &app.display;
    let toggles = [
        ("F", display.show_fingerprint_column),
        ("N", display.show_nickname_column),
        ("D", display.show_destination_column),
        ("E", display.show_expanded_ip_column),
        ("I", display.show_ips),
        ("X", display.show_exit_port),
    ];

    let mut spans = Vec::new();

    for (key, enabled) in toggles {
        let (state, color) = if enabled {
            ("ON", INBOUND_GREEN)
        } else {
            ("OFF", MUTED_WHITE)
        };
        spans.push(Span::styled(format!("[{}:", key), Style::default().fg(MUTED_WHITE)));
        spans.push(Span::styled(
            state,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("] ", Style::default().fg(MUTED_WHITE)));
    }

    let refresh = &app.refresh_config;
    spans.push(Span::styled(
        format!("{}ms", refresh.refresh_ms),
        Style::default()
            .fg(get_refresh_color(
                refresh.refresh_ms,
                RefreshConfig::new().refresh_ms,
                refresh.recently_changed(),
            ))
            .add_modifier(Modifier::BOLD),
    ));

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Toggle;
    use ratatui::{backend::TestBackend, Terminal};

    fn text(spans: &[Span<'_>]) -> String {
        spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_indicators_follow_toggles() {
        let mut app = AppState::new();
        assert_eq!(
            text(&build_toggle_indicators(&app)),
            "[F:ON] [N:ON] [D:ON] [E:ON] [I:ON] [X:ON] 500ms"
        );

        app.toggle(Toggle::Ips);
        assert!(text(&build_toggle_indicators(&app)).contains("[I:OFF]"));
    }

    #[test]
    fn test_renders_in_narrow_terminal() {
        let app = AppState::new();
        let backend = TestBackend::new(30, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|f| render_status_bar(f, f.area(), &app))
            .unwrap();
    }
}
