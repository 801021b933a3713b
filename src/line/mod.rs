// Connection line formatting
//
// A ConnectionLine turns a classified connection into the listing row and the
// detail page shown by the connection panel. Rows are laid out for an exact
// terminal width: optional columns are added in priority order while they
// fit, and every field is cropped or padded so nothing wraps.
//
// Building a row means several consensus and process lookups, so the layout
// is memoized per (width, listing mode). The connection's age changes every
// second and is never part of the cached value; it is spliced into the
// cached skeleton on each call.

pub mod cache;
mod destination;
mod detail;
mod etc;
mod listing;
pub mod text;

use crate::app::config::{
    AGE_WIDTH, CATEGORY_LABEL_WIDTH, DETAIL_CACHE_CAPACITY, LISTING_CACHE_CAPACITY,
    LISTING_SUFFIX_WIDTH,
};
use crate::net::{Category, ConnectionEntry, ListingMode};
use crate::relay::RenderContext;
use crate::theme::category_color;
use cache::BoundedCache;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Placeholder for fingerprints, nicknames and processes we can't resolve
pub const UNKNOWN: &str = "UNKNOWN";

/// Shown in place of a scrubbed remote address
pub const SCRUBBED_ADDRESS: &str = "<scrubbed>";

/// Index of the age span within a listing row
const AGE_SLOT: usize = 2;

/// Display wrapper around a connection entry
#[derive(Debug, Clone)]
pub struct ConnectionLine {
    entry: ConnectionEntry,

    /// Show local/remote ports alongside addresses
    pub include_port: bool,

    /// Show the internal address next to the external one when they differ
    pub include_expanded_addresses: bool,

    listings: BoundedCache<(usize, ListingMode), Vec<Span<'static>>>,
    details: BoundedCache<usize, Vec<Line<'static>>>,
}

impl ConnectionLine {
    pub fn new(entry: ConnectionEntry) -> Self {
        Self::with_options(entry, true, true)
    }

    pub fn with_options(
        entry: ConnectionEntry,
        include_port: bool,
        include_expanded_addresses: bool,
    ) -> Self {
        Self {
            entry,
            include_port,
            include_expanded_addresses,
            listings: BoundedCache::new(LISTING_CACHE_CAPACITY),
            details: BoundedCache::new(DETAIL_CACHE_CAPACITY),
        }
    }

    pub fn entry(&self) -> &ConnectionEntry {
        &self.entry
    }

    pub fn category(&self) -> Category {
        self.entry.category()
    }

    /// Drop every memoized row and detail page
    ///
    /// Needed whenever something outside the cache key changes, such as a
    /// display toggle. Resizes and listing mode switches are covered by the
    /// key itself.
    pub fn invalidate(&mut self) {
        self.listings.clear();
        self.details.clear();
    }

    /// Listing row exactly `width` cells wide
    ///
    /// Layout: `" " + content + age + " (" + TYPE + ")" + padding`, where the
    /// content is `"<src>  -->  <dst>  <etc><padding>"`.
    ///
    /// # Arguments
    /// * `ctx` - Collaborators and display toggles
    /// * `width` - Terminal cells available for the row
    /// * `now` - Current unix time in seconds, used for the age column
    /// * `mode` - Identity axis the panel is listing by
    pub fn listing_entry(
        &mut self,
        ctx: &RenderContext<'_>,
        width: usize,
        now: u64,
        mode: ListingMode,
    ) -> Line<'static> {
        let key = (width, mode);
        let mut spans = match self.listings.get(&key) {
            Some(spans) => spans,
            None => {
                tracing::debug!(
                    width,
                    mode = mode.label(),
                    category = self.category().label(),
                    "Building listing skeleton"
                );
                let spans = self.listing_skeleton(ctx, width, mode);
                self.listings.insert(key, spans.clone());
                spans
            }
        };

        let record = self.entry.record();
        let age = text::age_label(now.saturating_sub(record.start_time), record.is_legacy);
        let style = spans[AGE_SLOT].style;
        spans[AGE_SLOT] = Span::styled(age, style);

        Line::from(fit_spans(spans, width))
    }

    /// Seven line detail page, each line at most `width - 2` cells
    pub fn details(&mut self, ctx: &RenderContext<'_>, width: usize) -> Vec<Line<'static>> {
        if let Some(lines) = self.details.get(&width) {
            return lines;
        }

        tracing::debug!(width, category = self.category().label(), "Building detail page");
        let style = Style::default()
            .fg(category_color(self.category()))
            .add_modifier(Modifier::BOLD);
        let lines: Vec<Line<'static>> = self
            .detail_content(ctx, width)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, style)))
            .collect();

        self.details.insert(width, lines.clone());
        lines
    }

    /// Row without the age, which is left as a blank slot
    fn listing_skeleton(
        &self,
        ctx: &RenderContext<'_>,
        width: usize,
        mode: ListingMode,
    ) -> Vec<Span<'static>> {
        let category = self.category();
        let style = Style::default().fg(category_color(category));
        let label = category.label();

        let content_width = width.saturating_sub(LISTING_SUFFIX_WIDTH);
        let content = text::fit(&self.listing_content(ctx, content_width, mode), content_width);

        vec![
            Span::styled(" ", style),
            Span::styled(content, style),
            Span::styled(" ".repeat(AGE_WIDTH), style),
            Span::styled(" (", style),
            Span::styled(label, style.add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("){}", " ".repeat(CATEGORY_LABEL_WIDTH.saturating_sub(label.len()))),
                style,
            ),
        ]
    }

    /// Remote address must stay hidden
    fn is_scrubbed(&self, ctx: &RenderContext<'_>) -> bool {
        self.entry.is_private() || !ctx.config.show_ips
    }

    /// Two letter country code of the remote address
    pub fn locale(&self, ctx: &RenderContext<'_>) -> Option<String> {
        ctx.control.locale(&self.entry.record().remote_addr)
    }

    /// Fingerprint of the remote relay
    ///
    /// Only connections made to a relay's ORPort can be resolved; inbound
    /// and application connections never have one.
    pub fn fingerprint(&self, ctx: &RenderContext<'_>) -> Option<String> {
        if !self.category().has_relay_endpoint() {
            return None;
        }
        let record = self.entry.record();
        ctx.consensus
            .relay_fingerprint(&record.remote_addr, record.remote_port)
    }

    /// Nickname of the remote relay
    pub fn nickname(&self, ctx: &RenderContext<'_>) -> Option<String> {
        let fingerprint = self.fingerprint(ctx)?;
        ctx.consensus.relay_nickname(&fingerprint)
    }
}

/// Truncate and pad spans so they cover exactly `width` cells
fn fit_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Span<'static>> {
    let mut fitted = Vec::with_capacity(spans.len());
    let mut used = 0;
    let mut last_style = Style::default();

    for span in spans {
        last_style = span.style;
        let room = width - used;
        if room == 0 {
            break;
        }
        let span_width = text::width(&span.content);
        if span_width <= room {
            used += span_width;
            fitted.push(span);
        } else {
            let cropped = text::truncate(&span.content, room);
            used += text::width(&cropped);
            fitted.push(Span::styled(cropped, span.style));
        }
    }

    if used < width {
        fitted.push(Span::styled(" ".repeat(width - used), last_style));
    }
    fitted
}
