// Application state management
//
// This module contains the main AppState struct: the relay snapshot the panel
// renders, one ConnectionLine per connection, the listing mode and display
// toggles, and the selection.

pub mod config;
pub mod event;
pub mod sample;

pub use config::{DisplayConfig, RefreshConfig};

use crate::line::ConnectionLine;
use crate::net::{Category, ConnectionEntry, ConnectionRecord, ListingMode, RelayRole};
use crate::procfs::SystemPortTracker;
use crate::relay::ports::WellKnownPorts;
use crate::relay::snapshot::Snapshot;
use crate::relay::{ControlFacts, PortUsageTracker, ProcessLookup, RenderContext};
use ratatui::text::Line;
use ratatui::widgets::ListState;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Display toggles the panel can flip at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Ips,
    ExitPort,
    Fingerprint,
    Nickname,
    Destination,
    ExpandedIp,
}

impl Toggle {
    pub fn label(&self) -> &'static str {
        match self {
            Toggle::Ips => "addresses",
            Toggle::ExitPort => "exit ports",
            Toggle::Fingerprint => "fingerprint column",
            Toggle::Nickname => "nickname column",
            Toggle::Destination => "destination column",
            Toggle::ExpandedIp => "expanded addresses",
        }
    }
}

/// Sample processes first, then whatever the system tracker has found
struct LayeredProcesses<'a> {
    sample: &'a Snapshot,
    system: Option<&'a SystemPortTracker>,
}

impl PortUsageTracker for LayeredProcesses<'_> {
    fn fetch(&self, port: u16) -> ProcessLookup {
        match self.sample.fetch(port) {
            ProcessLookup::Unknown => self
                .system
                .map(|tracker| tracker.fetch(port))
                .unwrap_or(ProcessLookup::Unknown),
            found => found,
        }
    }
}

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// Relay facts every line is rendered against
    pub snapshot: Snapshot,

    /// Listener ports of the relay, used to classify connections
    pub role: RelayRole,

    /// One line per open connection, in listing order
    pub lines: Vec<ConnectionLine>,

    /// Identity axis the listing is shown by
    pub listing_mode: ListingMode,

    /// Display toggles read by the line formatter
    pub display: DisplayConfig,

    /// Currently selected connection index
    pub selected_connection: Option<usize>,

    /// List state for the connection listing (enables scrolling)
    pub connection_list_state: ListState,

    /// Refresh interval configuration
    pub refresh_config: RefreshConfig,

    /// Resolves ports the snapshot doesn't know the owner of
    tracker: Option<SystemPortTracker>,

    /// Whether the tracker had completed a scan at the last process refresh
    tracker_ready: bool,

    /// Last time application lines were re-resolved against the tracker
    last_process_refresh: Instant,
}

impl AppState {
    /// Create a new AppState showing the sample relay
    pub fn new() -> Self {
        Self::with_display(DisplayConfig::default())
    }

    pub fn with_display(display: DisplayConfig) -> Self {
        let sample = sample::sample_relay(unix_now());

        let mut state = Self {
            running: true,
            snapshot: sample.snapshot,
            role: sample.role,
            lines: Vec::new(),
            listing_mode: ListingMode::default(),
            display,
            selected_connection: None,
            connection_list_state: ListState::default(),
            refresh_config: RefreshConfig::new(),
            tracker: None,
            tracker_ready: false,
            last_process_refresh: Instant::now(),
        };

        state.load_connections(sample.records);
        state
    }

    /// Resolve otherwise unknown process owners from the live system
    pub fn with_system_tracker(mut self) -> Self {
        self.tracker = Some(SystemPortTracker::start(self.refresh_config.data_interval()));
        self
    }

    /// Replace every line with ones built from `records`
    pub fn load_connections(&mut self, records: Vec<ConnectionRecord>) {
        let user_traffic = self.snapshot.user_traffic_allowed();

        self.lines = records
            .into_iter()
            .map(|record| {
                let hints = self.snapshot.hints_for(&record);
                let entry = ConnectionEntry::new(record, &self.role, &hints, user_traffic);
                ConnectionLine::new(entry)
            })
            .collect();

        tracing::debug!(connections = self.lines.len(), "Loaded connections");
        self.clamp_selection();
    }

    /// Update state on each tick
    ///
    /// Process ownership is the only thing that changes underneath a line,
    /// so application lines are rebuilt once per data interval, or as soon
    /// as the tracker completes its first scan.
    pub fn on_tick(&mut self) {
        let Some(tracker) = &self.tracker else {
            return;
        };

        let ready = tracker.is_ready();
        let due = self.last_process_refresh.elapsed() >= self.refresh_config.data_interval();

        if due || ready != self.tracker_ready {
            self.tracker_ready = ready;
            self.last_process_refresh = Instant::now();
            self.invalidate_where(|category| category.is_application());
        }
    }

    /// Listing rows for every connection, `width` cells wide
    pub fn listing_rows(&mut self, width: usize) -> Vec<Line<'static>> {
        let now = unix_now();
        let processes = LayeredProcesses {
            sample: &self.snapshot,
            system: self.tracker.as_ref(),
        };
        let ctx = RenderContext {
            control: &self.snapshot,
            consensus: &self.snapshot,
            processes: &processes,
            ports: &WellKnownPorts,
            config: &self.display,
        };
        let mode = self.listing_mode;

        self.lines
            .iter_mut()
            .map(|line| line.listing_entry(&ctx, width, now, mode))
            .collect()
    }

    /// Detail page of the selected connection
    pub fn selected_details(&mut self, width: usize) -> Option<Vec<Line<'static>>> {
        let idx = self.selected_connection?;
        let processes = LayeredProcesses {
            sample: &self.snapshot,
            system: self.tracker.as_ref(),
        };
        let ctx = RenderContext {
            control: &self.snapshot,
            consensus: &self.snapshot,
            processes: &processes,
            ports: &WellKnownPorts,
            config: &self.display,
        };

        self.lines
            .get_mut(idx)
            .map(|line| line.details(&ctx, width))
    }

    /// Switch to the next listing mode
    pub fn cycle_listing_mode(&mut self) {
        self.listing_mode = self.listing_mode.next();
        tracing::info!(mode = self.listing_mode.label(), "Listing mode changed");
    }

    /// Flip a display toggle
    ///
    /// Toggles aren't part of the line cache keys, so every line is
    /// invalidated.
    pub fn toggle(&mut self, toggle: Toggle) {
        let flag = match toggle {
            Toggle::Ips => &mut self.display.show_ips,
            Toggle::ExitPort => &mut self.display.show_exit_port,
            Toggle::Fingerprint => &mut self.display.show_fingerprint_column,
            Toggle::Nickname => &mut self.display.show_nickname_column,
            Toggle::Destination => &mut self.display.show_destination_column,
            Toggle::ExpandedIp => &mut self.display.show_expanded_ip_column,
        };
        *flag = !*flag;
        let enabled = *flag;

        tracing::info!(toggle = toggle.label(), enabled, "Display toggle changed");
        self.invalidate_where(|_| true);
    }

    fn invalidate_where<F>(&mut self, predicate: F)
    where
        F: Fn(Category) -> bool,
    {
        for line in self.lines.iter_mut().filter(|line| predicate(line.category())) {
            line.invalidate();
        }
    }

    fn clamp_selection(&mut self) {
        let selected = match self.selected_connection {
            _ if self.lines.is_empty() => None,
            Some(idx) => Some(idx.min(self.lines.len() - 1)),
            None => None,
        };
        self.selected_connection = selected;
        self.connection_list_state.select(selected);
    }

    /// Move connection selection up (decrease index)
    pub fn select_previous_connection(&mut self) {
        if self.lines.is_empty() {
            self.selected_connection = None;
            self.connection_list_state.select(None);
            return;
        }

        match self.selected_connection {
            None => {
                // Start at the last connection
                let idx = self.lines.len() - 1;
                self.selected_connection = Some(idx);
                self.connection_list_state.select(Some(idx));
            }
            Some(idx) => {
                if idx > 0 {
                    self.selected_connection = Some(idx - 1);
                    self.connection_list_state.select(Some(idx - 1));
                }
            }
        }
    }

    /// Move connection selection down (increase index)
    pub fn select_next_connection(&mut self) {
        if self.lines.is_empty() {
            self.selected_connection = None;
            self.connection_list_state.select(None);
            return;
        }

        match self.selected_connection {
            None => {
                self.selected_connection = Some(0);
                self.connection_list_state.select(Some(0));
            }
            Some(idx) => {
                if idx < self.lines.len() - 1 {
                    self.selected_connection = Some(idx + 1);
                    self.connection_list_state.select(Some(idx + 1));
                }
            }
        }
    }

    /// Increase refresh rate (decrease interval, clamped to the minimum)
    pub fn increase_refresh_rate(&mut self) {
        let new_interval = self
            .refresh_config
            .refresh_ms
            .saturating_sub(config::REFRESH_STEP);
        self.refresh_config.refresh_ms = new_interval.max(config::MIN_REFRESH_MS);
        self.refresh_config.last_change = Some(Instant::now());
    }

    /// Decrease refresh rate (increase interval, clamped to the maximum)
    pub fn decrease_refresh_rate(&mut self) {
        let new_interval = self
            .refresh_config
            .refresh_ms
            .saturating_add(config::REFRESH_STEP);
        self.refresh_config.refresh_ms = new_interval.min(config::MAX_REFRESH_MS);
        self.refresh_config.last_change = Some(Instant::now());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Current unix time in seconds
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_sample_connections_loaded() {
        let app = AppState::new();
        assert_eq!(app.lines.len(), 12);
        assert_eq!(app.selected_connection, None);
        assert_eq!(app.listing_mode, ListingMode::IpAddress);
    }

    #[test]
    fn test_rows_fill_width() {
        let mut app = AppState::new();
        for width in [40, 80, 120, 200] {
            for row in app.listing_rows(width) {
                assert_eq!(row.width(), width);
            }
        }
    }

    #[test]
    fn test_toggle_applies_immediately() {
        let mut app = AppState::new();
        let dannenberg = "7BE683E65D48141321C5ED92F075C55364AC7123";

        // first render fills the caches
        let rows: Vec<String> = app.listing_rows(200).iter().map(row_text).collect();
        assert!(rows.iter().any(|row| row.contains(dannenberg)));

        app.toggle(Toggle::Fingerprint);
        assert!(!app.display.show_fingerprint_column);
        let rows: Vec<String> = app.listing_rows(200).iter().map(row_text).collect();
        assert!(rows.iter().all(|row| !row.contains(dannenberg)));

        app.toggle(Toggle::Ips);
        let rows: Vec<String> = app.listing_rows(200).iter().map(row_text).collect();
        assert!(rows.iter().all(|row| !row.contains("193.23.244.244")));

        app.toggle(Toggle::Ips);
        let rows: Vec<String> = app.listing_rows(200).iter().map(row_text).collect();
        assert!(rows.iter().any(|row| row.contains("193.23.244.244")));
    }

    #[test]
    fn test_addresses_revealed_after_starting_hidden() {
        let mut app = AppState::with_display(DisplayConfig {
            show_ips: false,
            ..Default::default()
        });

        let rows: Vec<String> = app.listing_rows(200).iter().map(row_text).collect();
        assert!(rows.iter().all(|row| !row.contains("193.23.244.244")));

        app.toggle(Toggle::Ips);
        assert!(app.display.show_ips);
        let rows: Vec<String> = app.listing_rows(200).iter().map(row_text).collect();
        assert!(rows.iter().any(|row| row.contains("193.23.244.244")), "{:#?}", rows);
        assert!(rows.iter().any(|row| row.contains("86.59.21.38")), "{:#?}", rows);

        // clients stay hidden whatever the toggle says
        assert!(rows.iter().all(|row| !row.contains("203.0.113.9")));
    }

    #[test]
    fn test_scrubbed_clients_never_shown() {
        let mut app = AppState::new();
        for mode in [ListingMode::IpAddress, ListingMode::Fingerprint, ListingMode::Nickname] {
            app.listing_mode = mode;
            for row in app.listing_rows(160) {
                let text = row_text(&row);
                assert!(!text.contains("203.0.113.9"), "{:?}", text);
                assert!(!text.contains("93.184.216.34"), "{:?}", text);
                assert!(!text.contains("9.9.9.9"), "{:?}", text);
            }
        }
    }

    #[test]
    fn test_listing_mode_cycles() {
        let mut app = AppState::new();
        app.cycle_listing_mode();
        assert_eq!(app.listing_mode, ListingMode::Fingerprint);
        app.cycle_listing_mode();
        assert_eq!(app.listing_mode, ListingMode::Nickname);
        app.cycle_listing_mode();
        assert_eq!(app.listing_mode, ListingMode::IpAddress);
    }

    #[test]
    fn test_selected_details() {
        let mut app = AppState::new();
        assert!(app.selected_details(80).is_none());

        app.select_next_connection();
        let details = app.selected_details(80).expect("details");
        assert_eq!(details.len(), config::DETAIL_LINE_COUNT);
    }

    #[test]
    fn test_connection_selection_navigation() {
        let mut app = AppState::new();
        let last = app.lines.len() - 1;

        app.select_previous_connection();
        assert_eq!(app.selected_connection, Some(last));

        app.select_next_connection();
        assert_eq!(app.selected_connection, Some(last));

        app.selected_connection = None;
        app.select_next_connection();
        assert_eq!(app.selected_connection, Some(0));
        app.select_previous_connection();
        assert_eq!(app.selected_connection, Some(0));
        assert_eq!(app.connection_list_state.selected(), Some(0));
    }

    #[test]
    fn test_empty_listing_selection() {
        let mut app = AppState::new();
        app.selected_connection = Some(3);
        app.load_connections(Vec::new());
        assert_eq!(app.selected_connection, None);

        app.select_next_connection();
        assert_eq!(app.selected_connection, None);
        assert!(app.listing_rows(80).is_empty());
    }

    #[test]
    fn test_refresh_rate_bounds() {
        let mut app = AppState::new();
        for _ in 0..1_000 {
            app.increase_refresh_rate();
        }
        assert_eq!(app.refresh_config.refresh_ms, config::MIN_REFRESH_MS);

        for _ in 0..1_000 {
            app.decrease_refresh_rate();
        }
        assert_eq!(app.refresh_config.refresh_ms, config::MAX_REFRESH_MS);
        assert!(app.refresh_config.recently_changed());
    }

    /// Row text with the age slot left out
    fn without_age(line: &Line<'_>) -> Vec<String> {
        line.spans
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != 2)
            .map(|(_, span)| span.content.to_string())
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// After any sequence of toggles and mode switches, cached rows match
        /// rows built from scratch with the same settings
        #[test]
        fn prop_toggles_leave_no_stale_rows(
            initial in proptest::array::uniform6(any::<bool>()),
            toggles in proptest::collection::vec(0usize..6, 0..12),
            width in 0usize..220,
        ) {
            const ALL: [Toggle; 6] = [
                Toggle::Ips,
                Toggle::ExitPort,
                Toggle::Fingerprint,
                Toggle::Nickname,
                Toggle::Destination,
                Toggle::ExpandedIp,
            ];

            let mut app = AppState::with_display(DisplayConfig {
                show_ips: initial[0],
                show_exit_port: initial[1],
                show_fingerprint_column: initial[2],
                show_nickname_column: initial[3],
                show_destination_column: initial[4],
                show_expanded_ip_column: initial[5],
            });
            for idx in toggles {
                app.listing_rows(width);
                app.toggle(ALL[idx]);
                app.cycle_listing_mode();
            }

            let cached = app.listing_rows(width);
            for line in app.lines.iter_mut() {
                line.invalidate();
            }
            let rebuilt = app.listing_rows(width);
            let mut fresh_app = AppState::with_display(app.display.clone());
            fresh_app.listing_mode = app.listing_mode;
            let fresh = fresh_app.listing_rows(width);

            prop_assert_eq!(cached.len(), rebuilt.len());
            for (cached, rebuilt) in cached.iter().zip(&rebuilt) {
                prop_assert_eq!(cached.width(), width);
                prop_assert_eq!(without_age(cached), without_age(rebuilt));
            }

            // an app started with the final settings renders the same rows
            prop_assert_eq!(fresh.len(), rebuilt.len());
            for (fresh, rebuilt) in fresh.iter().zip(&rebuilt) {
                prop_assert_eq!(without_age(fresh), without_age(rebuilt));
            }
        }
    }
}
