// Connection detail page
//
// Seven lines describing the remote end: address and locale, then whatever
// the consensus and server descriptor say about the relay. When the address
// hosts several relays and the port doesn't single one out, the candidates
// are listed instead.

use super::text::{crop, pad_right, Ending};
use super::ConnectionLine;
use crate::app::config::{DETAIL_LINE_COUNT, DETAIL_MAX_CANDIDATES};
use crate::relay::RenderContext;

/// "address: " plus the separator space before the label
const ADDRESS_PREFIX_WIDTH: usize = 11;

/// Column the fingerprint starts at on the locale line
const LOCALE_COLUMN_WIDTH: usize = 13;

/// Column the os/version start at on the published line
const PUBLISHED_COLUMN_WIDTH: usize = 35;

const PUBLISHED_FORMAT: &str = "%H:%M %m/%d/%Y";

impl ConnectionLine {
    /// Raw detail lines, each cropped to `width - 2`
    pub fn detail_content(&self, ctx: &RenderContext<'_>, width: usize) -> Vec<String> {
        let mut lines = vec![String::new(); DETAIL_LINE_COUNT];

        lines[0] = format!(
            "address: {}",
            self.destination_label(ctx, width.saturating_sub(ADDRESS_PREFIX_WIDTH), false)
        );

        let locale = if self.is_scrubbed(ctx) {
            None
        } else {
            self.locale(ctx)
        };
        lines[1] = format!("locale: {}", locale.as_deref().unwrap_or("??"));

        match self.fingerprint(ctx) {
            Some(fingerprint) => self.relay_details(ctx, &fingerprint, &mut lines),
            None => self.candidate_details(ctx, &mut lines),
        }

        let max_width = width.saturating_sub(2);
        lines
            .into_iter()
            .map(|line| crop(&line, max_width, 4, Ending::Ellipsis))
            .collect()
    }

    fn relay_details(&self, ctx: &RenderContext<'_>, fingerprint: &str, lines: &mut [String]) {
        lines[1] = format!(
            "{}fingerprint: {}",
            pad_right(&lines[1], LOCALE_COLUMN_WIDTH),
            fingerprint
        );

        if let Some(status) = ctx.control.network_status(fingerprint) {
            let dir_port = status
                .dir_port
                .map(|port| format!("dirport: {}", port))
                .unwrap_or_default();

            lines[2] = format!(
                "nickname: {:<25} orport: {:<10} {}",
                status.nickname, status.or_port, dir_port
            );
            lines[3] = format!("published: {}", status.published.format(PUBLISHED_FORMAT));
            lines[4] = format!("flags: {}", status.flags.join(", "));
        }

        if let Some(descriptor) = ctx.control.server_descriptor(fingerprint) {
            lines[5] = format!(
                "exit policy: {}",
                descriptor.exit_policy.as_deref().unwrap_or("unknown")
            );
            lines[3] = format!(
                "{} os: {:<14} version: {}",
                pad_right(&lines[3], PUBLISHED_COLUMN_WIDTH),
                descriptor.operating_system,
                descriptor.version
            );

            if let Some(contact) = descriptor.contact {
                lines[6] = format!("contact: {}", contact);
            }
        }
    }

    /// Every relay at the remote address, or a note that there are none
    fn candidate_details(&self, ctx: &RenderContext<'_>, lines: &mut [String]) {
        let candidates = ctx
            .consensus
            .all_relay_fingerprints(&self.entry.record().remote_addr);

        if candidates.is_empty() {
            lines[2] = "No consensus data found".to_string();
            return;
        }

        lines[2] = "Multiple matches, possible fingerprints are:".to_string();

        for (i, (or_port, fingerprint)) in candidates
            .iter()
            .enumerate()
            .take(DETAIL_MAX_CANDIDATES)
        {
            let remaining = candidates.len() - i;
            let is_last_line = i == DETAIL_MAX_CANDIDATES - 1;

            lines[3 + i] = if is_last_line && remaining > 1 {
                format!("... {} more", remaining)
            } else {
                format!("{}. or port: {:<5} fingerprint: {}", i + 1, or_port, fingerprint)
            };
        }
    }
}
