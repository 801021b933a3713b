// Destination label
//
// "<address>:<port> (<extra>)" where the extra is the port's purpose for exit
// connections or the remote locale otherwise.

use super::text::{self, crop, Ending};
use super::{ConnectionLine, SCRUBBED_ADDRESS};
use crate::net::{is_private_address, Category};
use crate::relay::RenderContext;

/// Room needed beyond the address for even a two letter annotation
const ANNOTATION_MIN_ROOM: usize = 5;

/// " (" and ")" around the annotation
const ANNOTATION_OVERHEAD: usize = 3;

impl ConnectionLine {
    /// Short description of the remote end, at most `max_length` cells
    ///
    /// Scrubbed connections never show their address. Ports are hidden when
    /// the line excludes them, or for exit connections when exit ports are
    /// toggled off. Exit connections are annotated with what their port is
    /// usually used for; others with the remote locale when `include_locale`
    /// is set and the address is publicly routable.
    pub fn destination_label(
        &self,
        ctx: &RenderContext<'_>,
        max_length: usize,
        include_locale: bool,
    ) -> String {
        let record = self.entry.record();
        let category = self.category();
        let scrubbed = self.is_scrubbed(ctx);

        let include_port =
            self.include_port && (ctx.config.show_exit_port || category != Category::Exit);

        let address = if scrubbed {
            SCRUBBED_ADDRESS
        } else {
            record.remote_addr.as_str()
        };

        let mut label = if include_port {
            format!("{}:{}", address, record.remote_port)
        } else {
            address.to_string()
        };

        let label_width = text::width(&label);
        if label_width + ANNOTATION_MIN_ROOM <= max_length {
            let space_available = max_length - label_width - ANNOTATION_OVERHEAD;

            if category == Category::Exit && include_port {
                if let Some(purpose) = ctx.ports.port_usage(record.remote_port) {
                    let purpose = if text::width(&purpose) > space_available && purpose == "BitTorrent" {
                        "Torrent".to_string()
                    } else {
                        purpose
                    };

                    let purpose = crop(&purpose, space_available, 0, Ending::Hyphen);
                    if !purpose.is_empty() {
                        label.push_str(&format!(" ({})", purpose));
                    }
                }
            } else if include_locale
                && !scrubbed
                && !is_private_address(&record.remote_addr)
                && !ctx.control.is_geoip_unavailable()
            {
                let locale = self.locale(ctx).unwrap_or_else(|| "??".to_string());
                label.push_str(&format!(" ({})", locale));
            }
        }

        text::truncate(&label, max_length)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::app::config::DisplayConfig;
    use crate::net::ConnectionEntry;
    use crate::relay::PortPurpose;

    /// Always answers BitTorrent, to exercise the abbreviation
    struct TorrentPorts;

    impl PortPurpose for TorrentPorts {
        fn port_usage(&self, _port: u16) -> Option<String> {
            Some("BitTorrent".to_string())
        }
    }

    #[test]
    fn test_locale_annotation() {
        let snapshot = snapshot();
        let config = DisplayConfig::default();
        let ctx = context(&snapshot, &config);
        let line = ConnectionLine::new(entry(Category::Outbound, RELAY_ADDRESS, 9101));

        assert_eq!(line.destination_label(&ctx, 26, true), "128.31.0.34:9101 (us)");
        assert_eq!(line.destination_label(&ctx, 26, false), "128.31.0.34:9101");
        // no room for a country code
        assert_eq!(line.destination_label(&ctx, 20, true), "128.31.0.34:9101");
    }

    #[test]
    fn test_unknown_locale_and_missing_geoip() {
        let mut snapshot = snapshot();
        let config = DisplayConfig::default();
        let line = ConnectionLine::new(entry(Category::Outbound, "203.0.113.9", 443));

        let ctx = context(&snapshot, &config);
        assert_eq!(line.destination_label(&ctx, 26, true), "203.0.113.9:443 (??)");

        snapshot.geoip_unavailable = true;
        let ctx = context(&snapshot, &config);
        assert_eq!(line.destination_label(&ctx, 26, true), "203.0.113.9:443");
    }

    #[test]
    fn test_private_range_has_no_locale() {
        let snapshot = snapshot();
        let config = DisplayConfig::default();
        let ctx = context(&snapshot, &config);
        let line = ConnectionLine::new(entry(Category::Outbound, "192.168.0.40", 9001));

        assert_eq!(line.destination_label(&ctx, 26, true), "192.168.0.40:9001");
    }

    #[test]
    fn test_exit_purpose() {
        let snapshot = snapshot();
        let config = DisplayConfig::default();
        let ctx = context(&snapshot, &config);
        let line = ConnectionLine::new(entry(Category::Exit, "93.184.216.34", 443));

        assert_eq!(line.destination_label(&ctx, 26, true), "93.184.216.34:443 (HTTPS)");
    }

    #[test]
    fn test_exit_port_toggle_hides_port_and_purpose() {
        let snapshot = snapshot();
        let config = DisplayConfig {
            show_exit_port: false,
            ..Default::default()
        };
        let ctx = context(&snapshot, &config);

        let exit = ConnectionLine::new(entry(Category::Exit, "93.184.216.34", 443));
        assert_eq!(exit.destination_label(&ctx, 26, true), "93.184.216.34 (de)");

        // only exit ports are affected
        let outbound = ConnectionLine::new(entry(Category::Outbound, "93.184.216.34", 443));
        assert_eq!(outbound.destination_label(&ctx, 26, true), "93.184.216.34:443 (de)");
    }

    #[test]
    fn test_line_without_ports() {
        let snapshot = snapshot();
        let config = DisplayConfig::default();
        let ctx = context(&snapshot, &config);
        let line = ConnectionLine::with_options(
            entry(Category::Exit, "93.184.216.34", 443),
            false,
            true,
        );

        assert_eq!(line.destination_label(&ctx, 26, true), "93.184.216.34 (de)");
    }

    #[test]
    fn test_bittorrent_abbreviation() {
        let snapshot = snapshot();
        let config = DisplayConfig::default();
        let ctx = crate::relay::RenderContext {
            ports: &TorrentPorts,
            ..context(&snapshot, &config)
        };
        // "1.2.3.4:6881" is 12 cells, leaving max_length - 15 for the purpose
        let line = ConnectionLine::new(entry(Category::Exit, "1.2.3.4", 6881));

        assert_eq!(line.destination_label(&ctx, 25, true), "1.2.3.4:6881 (BitTorrent)");
        assert_eq!(line.destination_label(&ctx, 22, true), "1.2.3.4:6881 (Torrent)");
        assert_eq!(line.destination_label(&ctx, 21, true), "1.2.3.4:6881 (Torre-)");
        assert_eq!(line.destination_label(&ctx, 18, true), "1.2.3.4:6881 (To-)");
        assert_eq!(line.destination_label(&ctx, 17, true), "1.2.3.4:6881 (T-)");
        assert_eq!(line.destination_label(&ctx, 16, true), "1.2.3.4:6881");
    }

    #[test]
    fn test_scrubbed_address_never_leaks() {
        let snapshot = snapshot();
        let config = DisplayConfig::default();
        let ctx = context(&snapshot, &config);
        let line = ConnectionLine::new(ConnectionEntry::with_category(
            record("93.184.216.34", 443),
            Category::Inbound,
            true,
        ));

        for max_length in 0..40 {
            let label = line.destination_label(&ctx, max_length, true);
            assert!(!label.contains("93.184"), "{:?}", label);
            assert!(text::width(&label) <= max_length);
        }
        assert_eq!(line.destination_label(&ctx, 26, true), "<scrubbed>:443");
    }

    #[test]
    fn test_hidden_ips_toggle_scrubs() {
        let snapshot = snapshot();
        let config = DisplayConfig {
            show_ips: false,
            ..Default::default()
        };
        let ctx = context(&snapshot, &config);
        let line = ConnectionLine::new(entry(Category::Outbound, RELAY_ADDRESS, 9101));

        assert_eq!(line.destination_label(&ctx, 26, true), "<scrubbed>:9101");
    }
}
