// Optional listing columns
//
// Whatever room the source and destination leave is handed out to optional
// columns in a fixed priority order. A column is drawn only when both its
// minimum width is available and its display toggle is on; each drawn column
// is padded to its full reservation so the result exactly fills the budget.

use super::text::{self, crop, pad_right, Ending};
use super::{ConnectionLine, UNKNOWN};
use crate::app::config::{
    COLUMN_GAP, DESTINATION_COLUMN, DESTINATION_WIDTH, FINGERPRINT_COLUMN, FINGERPRINT_WIDTH,
    FINGERPRINT_MODE_DESTINATION_MIN_WIDTH, FINGERPRINT_MODE_NICKNAME_MIN_WIDTH,
    NICKNAME_MIN_WIDTH,
};
use crate::net::{Category, ListingMode};
use crate::relay::{ProcessInfo, ProcessLookup, RenderContext};

const GAP: &str = "  ";

impl ConnectionLine {
    /// Extra columns for the listing, `width` cells wide or empty
    ///
    /// Local applications get the name of the process on the other end.
    /// Everything else gets consensus columns depending on the listing mode:
    /// - IP address: fingerprint, then nickname taking the remainder
    /// - fingerprint: nickname, then destination
    /// - nickname: fingerprint, then destination
    pub fn etc_content(&self, ctx: &RenderContext<'_>, width: usize, mode: ListingMode) -> String {
        let category = self.category();

        if category.is_application() {
            return self.process_column(ctx, width);
        }

        let config = ctx.config;
        let mut etc = String::new();
        let mut used = 0;

        match mode {
            ListingMode::IpAddress => {
                if width >= used + FINGERPRINT_COLUMN && config.show_fingerprint_column {
                    etc.push_str(&self.fingerprint_field(ctx));
                    used += FINGERPRINT_COLUMN;
                }

                if width >= used + NICKNAME_MIN_WIDTH && config.show_nickname_column {
                    let nickname_space = width - used - COLUMN_GAP;
                    etc.push_str(&self.nickname_field(ctx, nickname_space));
                    used += nickname_space + COLUMN_GAP;
                }
            }
            ListingMode::Fingerprint => {
                if width >= used + FINGERPRINT_MODE_NICKNAME_MIN_WIDTH {
                    let mut nickname_space = width - used - COLUMN_GAP;

                    let include_destination = width >= used + FINGERPRINT_MODE_DESTINATION_MIN_WIDTH
                        && config.show_destination_column;

                    if include_destination {
                        nickname_space -= DESTINATION_COLUMN;
                    }

                    if config.show_nickname_column {
                        etc.push_str(&self.nickname_field(ctx, nickname_space));
                        used += nickname_space + COLUMN_GAP;
                    }

                    if include_destination {
                        etc.push_str(&self.destination_field(ctx));
                        used += DESTINATION_COLUMN;
                    }
                }
            }
            ListingMode::Nickname => {
                if width >= used + FINGERPRINT_COLUMN && config.show_fingerprint_column {
                    etc.push_str(&self.fingerprint_field(ctx));
                    used += FINGERPRINT_COLUMN;
                }

                if width >= used + DESTINATION_COLUMN && config.show_destination_column {
                    etc.push_str(&self.destination_field(ctx));
                    used += DESTINATION_COLUMN;
                }
            }
        }

        tracing::trace!(width, used, mode = mode.label(), "Allocated etc columns");
        pad_right(&etc, width)
    }

    /// "<name> (<pid>)" of the application on the other end, or nothing if
    /// it doesn't fit; a cropped process name would be misleading
    fn process_column(&self, ctx: &RenderContext<'_>, width: usize) -> String {
        let record = self.entry.record();
        let port = match self.category() {
            Category::Hidden => record.local_port,
            _ => record.remote_port,
        };

        let label = match ctx.processes.fetch(port) {
            ProcessLookup::Resolved(ProcessInfo {
                name,
                pid: Some(pid),
            }) => format!("{} ({})", name, pid),
            ProcessLookup::Resolved(ProcessInfo { name, pid: None }) => name,
            ProcessLookup::Pending => "resolving...".to_string(),
            ProcessLookup::Unknown => UNKNOWN.to_string(),
        };

        if text::width(&label) < width {
            pad_right(&label, width)
        } else {
            String::new()
        }
    }

    fn fingerprint_field(&self, ctx: &RenderContext<'_>) -> String {
        let fingerprint = self
            .fingerprint(ctx)
            .unwrap_or_else(|| UNKNOWN.to_string());
        format!("{}{}", pad_right(&fingerprint, FINGERPRINT_WIDTH), GAP)
    }

    fn nickname_field(&self, ctx: &RenderContext<'_>, space: usize) -> String {
        let nickname = self.nickname(ctx).unwrap_or_else(|| UNKNOWN.to_string());
        let nickname = crop(&nickname, space, 0, Ending::Ellipsis);
        format!("{}{}", pad_right(&nickname, space), GAP)
    }

    fn destination_field(&self, ctx: &RenderContext<'_>) -> String {
        let destination = self.destination_label(ctx, DESTINATION_WIDTH, true);
        format!("{}{}", pad_right(&destination, DESTINATION_WIDTH), GAP)
    }
}
