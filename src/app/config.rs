// Application configuration types
//
// This module contains:
// - Display toggles read live by the line formatter
// - Listing layout constants (column widths and thresholds)
// - Refresh intervals for the panel and the process tracker

use std::time::{Duration, Instant};

// ============================================================================
// Listing layout
// ============================================================================

/// Fixed block after the listing content: " " + age + " (" + TYPE + ")"
pub const LISTING_SUFFIX_WIDTH: usize = 19;

/// Width of the age slot, legacy marker included
pub const AGE_WIDTH: usize = 6;

/// Width the category label is padded to
pub const CATEGORY_LABEL_WIDTH: usize = 9;

/// Separators in "<src>  -->  <dst>  <etc>"
pub const LABEL_SEPARATOR_WIDTH: usize = 9;

/// Minimum space between the listing label and the data after it
pub const LABEL_MIN_PADDING: usize = 2;

/// ip:port source column
pub const SOURCE_WIDTH: usize = 21;

/// ip:port (xx) destination column
pub const DESTINATION_WIDTH: usize = 26;

/// Relay fingerprints are 40 hex characters
pub const FINGERPRINT_WIDTH: usize = 40;

/// Gap between etc columns
pub const COLUMN_GAP: usize = 2;

/// Fingerprint column including its gap
pub const FINGERPRINT_COLUMN: usize = FINGERPRINT_WIDTH + COLUMN_GAP;

/// Destination column including its gap
pub const DESTINATION_COLUMN: usize = DESTINATION_WIDTH + COLUMN_GAP;

/// Internal address prepended to the source when expanded addresses show
pub const EXPANDED_ADDRESS_WIDTH: usize = 28;

/// Above this much spare room both the expanded address and the fingerprint
/// column fit
pub const EXPANDED_WITH_FINGERPRINT_WIDTH: usize = 70;

/// Minimum room for the nickname column when listing by address
pub const NICKNAME_MIN_WIDTH: usize = 10;

/// Minimum room for the nickname column when listing by fingerprint
pub const FINGERPRINT_MODE_NICKNAME_MIN_WIDTH: usize = 17;

/// Room needed for nickname plus destination when listing by fingerprint
pub const FINGERPRINT_MODE_DESTINATION_MIN_WIDTH: usize = 45;

/// Space reserved for the two nicknames when listing by nickname
pub const NICKNAME_MODE_BASE_WIDTH: usize = 50;

/// Lines on a connection's detail page
pub const DETAIL_LINE_COUNT: usize = 7;

/// Candidate relays listed on the detail page before summarizing the rest
pub const DETAIL_MAX_CANDIDATES: usize = 4;

/// Cached listing skeletons per line; one per (width, mode) recently drawn
pub const LISTING_CACHE_CAPACITY: usize = 8;

/// Cached detail pages per line
pub const DETAIL_CACHE_CAPACITY: usize = 4;

// ============================================================================
// Refresh
// ============================================================================

/// Minimum refresh interval in milliseconds
pub const MIN_REFRESH_MS: u64 = 50;

/// Maximum refresh interval in milliseconds
pub const MAX_REFRESH_MS: u64 = 10000;

/// Refresh interval adjustment step in milliseconds
pub const REFRESH_STEP: u64 = 50;

/// Data refresh multiplier (data refreshes at N times the UI interval)
pub const DATA_REFRESH_MULTIPLIER: u64 = 10;

/// Duration to highlight recently changed refresh intervals
pub const CHANGE_HIGHLIGHT_DURATION: Duration = Duration::from_millis(500);

// ============================================================================
// Display toggles
// ============================================================================

/// Toggles consulted on every layout decision
///
/// Values are read each time a line is built rather than copied into the
/// line, so flipping a toggle takes effect as soon as cached lines are
/// invalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Show remote addresses; when off every address is scrubbed
    pub show_ips: bool,

    /// Show the port (and its purpose) of exit connections
    pub show_exit_port: bool,

    pub show_fingerprint_column: bool,

    pub show_nickname_column: bool,

    /// Destination ip:port (locale) column in fingerprint/nickname listings
    pub show_destination_column: bool,

    /// Internal address ahead of the external one when they differ
    pub show_expanded_ip_column: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_ips: true,
            show_exit_port: true,
            show_fingerprint_column: true,
            show_nickname_column: true,
            show_destination_column: true,
            show_expanded_ip_column: true,
        }
    }
}

impl DisplayConfig {
    /// Defaults with `RELAYTOP_SHOW_*` environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let toggles: [(&str, &mut bool); 6] = [
            ("RELAYTOP_SHOW_IPS", &mut self.show_ips),
            ("RELAYTOP_SHOW_EXIT_PORT", &mut self.show_exit_port),
            ("RELAYTOP_SHOW_FINGERPRINT", &mut self.show_fingerprint_column),
            ("RELAYTOP_SHOW_NICKNAME", &mut self.show_nickname_column),
            ("RELAYTOP_SHOW_DESTINATION", &mut self.show_destination_column),
            ("RELAYTOP_SHOW_EXPANDED_IP", &mut self.show_expanded_ip_column),
        ];

        for (name, toggle) in toggles {
            let Some(raw) = lookup(name) else {
                continue;
            };
            match parse_toggle(&raw) {
                Some(value) => *toggle = value,
                None => tracing::warn!(variable = name, value = %raw, "Ignoring unrecognized toggle value"),
            }
        }
    }
}

fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration for refresh intervals (unified)
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Refresh interval in milliseconds
    /// Process ownership scans use this * DATA_REFRESH_MULTIPLIER
    pub refresh_ms: u64,

    /// Timestamp of last interval change (for visual feedback)
    pub last_change: Option<Instant>,
}

impl RefreshConfig {
    pub fn new() -> Self {
        Self {
            refresh_ms: 500,
            last_change: None,
        }
    }

    /// Get UI refresh interval as Duration
    pub fn ui_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    /// Get data refresh interval as Duration (10x UI interval)
    pub fn data_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms * DATA_REFRESH_MULTIPLIER)
    }

    pub fn recently_changed(&self) -> bool {
        self.last_change
            .is_some_and(|changed| changed.elapsed() < CHANGE_HIGHLIGHT_DURATION)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new()
    }
}
