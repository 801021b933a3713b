// Listing row content
//
// Builds "<src>  -->  <dst>  <etc><padding>" for one connection. What the
// source and destination are depends on the listing mode; the etc columns get
// whatever is left.

use super::text::{self, crop, pad_right, Ending};
use super::{ConnectionLine, UNKNOWN};
use crate::app::config::{
    DESTINATION_WIDTH, EXPANDED_ADDRESS_WIDTH, EXPANDED_WITH_FINGERPRINT_WIDTH,
    FINGERPRINT_COLUMN, FINGERPRINT_WIDTH, LABEL_MIN_PADDING, LABEL_SEPARATOR_WIDTH,
    NICKNAME_MODE_BASE_WIDTH, SOURCE_WIDTH,
};
use crate::net::{Category, ListingMode};
use crate::relay::RenderContext;

const ARROW: &str = "  -->  ";

impl ConnectionLine {
    /// Source, destination and extra columns, laid out for `width` cells
    pub fn listing_content(
        &self,
        ctx: &RenderContext<'_>,
        width: usize,
        mode: ListingMode,
    ) -> String {
        let category = self.category();
        let mut used = LABEL_SEPARATOR_WIDTH + LABEL_MIN_PADDING;

        let (mut src, mut dst, etc) = match mode {
            ListingMode::IpAddress => {
                let (src, dst) = self.address_endpoints(ctx, width, &mut used);
                let etc = self.etc_content(ctx, width.saturating_sub(used), mode);
                used += text::width(&etc);
                (src, dst, etc)
            }
            ListingMode::Fingerprint => {
                let src = "localhost".to_string();
                let remote = match category {
                    Category::Control => "localhost".to_string(),
                    _ => self.fingerprint(ctx).unwrap_or_else(|| UNKNOWN.to_string()),
                };
                let dst = pad_right(&remote, FINGERPRINT_WIDTH);
                used += text::width(&src) + text::width(&dst);

                let etc = self.etc_content(ctx, width.saturating_sub(used), mode);
                used += text::width(&etc);
                (src, dst, etc)
            }
            ListingMode::Nickname => {
                let ours = ctx
                    .control
                    .nickname()
                    .unwrap_or_else(|| UNKNOWN.to_string());
                let theirs = match category {
                    Category::Control => ours.clone(),
                    _ => self.nickname(ctx).unwrap_or_else(|| UNKNOWN.to_string()),
                };

                let etc = self.etc_content(
                    ctx,
                    width.saturating_sub(used + NICKNAME_MODE_BASE_WIDTH),
                    mode,
                );
                used += text::width(&etc);

                let base_space = width.saturating_sub(used);
                used = width.max(used);

                let (src, dst) = if text::width(&ours) + text::width(&theirs) > base_space {
                    let src = crop(&ours, base_space / 3, 4, Ending::Ellipsis);
                    let dst = crop(
                        &theirs,
                        base_space.saturating_sub(text::width(&src)),
                        4,
                        Ending::Ellipsis,
                    );
                    (src, dst)
                } else {
                    (ours, theirs)
                };

                let dst = pad_right(&dst, base_space.saturating_sub(text::width(&src)));
                (src, dst, etc)
            }
        };

        if category == Category::Inbound {
            std::mem::swap(&mut src, &mut dst);
        }

        let padding = " ".repeat((width + LABEL_MIN_PADDING).saturating_sub(used));
        format!("{}{}{}  {}{}", src, ARROW, dst, etc, padding)
    }

    /// Source and destination columns when listing by address
    ///
    /// Connections leaving through our external address can additionally
    /// show the internal address they were translated from, as
    /// "<internal>  -->  <external>". That column yields to the fingerprint
    /// column unless there's room for both.
    fn address_endpoints(
        &self,
        ctx: &RenderContext<'_>,
        width: usize,
        used: &mut usize,
    ) -> (String, String) {
        let record = self.entry.record();
        let category = self.category();
        let config = ctx.config;

        let external = ctx
            .control
            .external_address()
            .unwrap_or_else(|| record.local_addr.clone());
        let addresses_differ = external != record.local_addr;

        let local_port = if self.include_port {
            format!(":{}", record.local_port)
        } else {
            String::new()
        };

        let src_address = if category.is_address_translated() {
            format!("{}{}", external, local_port)
        } else {
            format!("{}{}", record.local_addr, local_port)
        };
        let destination = self.destination_label(ctx, DESTINATION_WIDTH, true);

        // local applications are swapped here rather than at the end so their
        // columns stay aligned with everything else
        let (mut src, dst) = match category {
            Category::Socks | Category::Control => (
                pad_right(&destination, SOURCE_WIDTH),
                pad_right(&src_address, DESTINATION_WIDTH),
            ),
            _ => (
                pad_right(&src_address, SOURCE_WIDTH),
                pad_right(&destination, DESTINATION_WIDTH),
            ),
        };
        *used += text::width(&src) + text::width(&dst);

        let mut expanded_visible = width > *used + EXPANDED_ADDRESS_WIDTH;
        if expanded_visible && config.show_fingerprint_column {
            expanded_visible =
                width < *used + FINGERPRINT_COLUMN || width > *used + EXPANDED_WITH_FINGERPRINT_WIDTH;
        }

        if addresses_differ
            && category.is_address_translated()
            && expanded_visible
            && self.include_expanded_addresses
            && config.show_expanded_ip_column
        {
            let internal = format!("{}{}", record.local_addr, local_port);

            // inbound rows are swapped afterward, reading
            // <remote> --> <external> --> <internal>
            src = if category == Category::Inbound {
                format!("{}{}{}", pad_right(&src, SOURCE_WIDTH), ARROW, pad_right(&internal, SOURCE_WIDTH))
            } else {
                format!("{}{}{}", pad_right(&internal, SOURCE_WIDTH), ARROW, src)
            };
            *used += EXPANDED_ADDRESS_WIDTH;
        }

        (src, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::app::config::DisplayConfig;
    use crate::net::ConnectionEntry;

    fn content(line: &ConnectionLine, config: &DisplayConfig, width: usize, mode: ListingMode) -> String {
        let snapshot = snapshot();
        let ctx = context(&snapshot, config);
        line.listing_content(&ctx, width, mode)
    }

    #[test]
    fn test_address_mode_columns() {
        let config = DisplayConfig::default();
        let line = ConnectionLine::new(entry(Category::Outbound, RELAY_ADDRESS, 9101));

        // base columns use 58 cells, fingerprint fits and takes priority
        let text = content(&line, &config, 110, ListingMode::IpAddress);
        assert_eq!(text.len(), 110);
        assert!(text.starts_with(&format!("{:<21}  -->  {:<26}  ", "73.94.20.11:51413", "128.31.0.34:9101 (us)")));
        assert!(text.contains(RELAY_FINGERPRINT));
        assert!(!text.contains("192.168.0.12"));
    }

    #[test]
    fn test_expanded_address_yields_to_fingerprint() {
        let config = DisplayConfig::default();
        let line = ConnectionLine::new(entry(Category::Outbound, RELAY_ADDRESS, 9101));

        // room for the internal address but not the fingerprint
        let text = content(&line, &config, 90, ListingMode::IpAddress);
        assert!(text.starts_with("192.168.0.12:51413     -->  73.94.20.11:51413"), "{:?}", text);

        // room for both
        let text = content(&line, &config, 140, ListingMode::IpAddress);
        assert!(text.starts_with("192.168.0.12:51413"), "{:?}", text);
        assert!(text.contains(RELAY_FINGERPRINT));

        // without a fingerprint column nothing competes
        let config = DisplayConfig {
            show_fingerprint_column: false,
            ..Default::default()
        };
        let text = content(&line, &config, 110, ListingMode::IpAddress);
        assert!(text.starts_with("192.168.0.12:51413"), "{:?}", text);
    }

    #[test]
    fn test_expanded_address_toggles() {
        let line = ConnectionLine::with_options(
            entry(Category::Outbound, RELAY_ADDRESS, 9101),
            true,
            false,
        );
        let text = content(&line, &DisplayConfig::default(), 90, ListingMode::IpAddress);
        assert!(!text.contains("192.168.0.12"));

        let config = DisplayConfig {
            show_expanded_ip_column: false,
            ..Default::default()
        };
        let line = ConnectionLine::new(entry(Category::Outbound, RELAY_ADDRESS, 9101));
        let text = content(&line, &config, 90, ListingMode::IpAddress);
        assert!(!text.contains("192.168.0.12"));
    }

    #[test]
    fn test_inbound_expanded_order() {
        let config = DisplayConfig::default();
        let line = ConnectionLine::new(entry(Category::Inbound, "93.184.216.34", 443));

        let text = content(&line, &config, 90, ListingMode::IpAddress);
        assert_eq!(text.len(), 90);
        let remote = text.find("93.184.216.34").expect("remote");
        let external = text.find("73.94.20.11").expect("external");
        let internal = text.find("192.168.0.12").expect("internal");
        assert!(remote < external && external < internal, "{:?}", text);
    }

    #[test]
    fn test_local_applications_swap_in_address_mode() {
        let config = DisplayConfig::default();
        let line = ConnectionLine::new(entry(Category::Socks, "127.0.0.1", 9050));

        let text = content(&line, &config, 80, ListingMode::IpAddress);
        assert!(text.starts_with(&format!("{:<21}  -->  192.168.0.12:51413", "127.0.0.1:9050")), "{:?}", text);
        assert!(text.contains("firefox (2421)"));
    }

    #[test]
    fn test_fingerprint_mode() {
        let config = DisplayConfig::default();

        let line = ConnectionLine::new(entry(Category::Outbound, RELAY_ADDRESS, 9101));
        let text = content(&line, &config, 100, ListingMode::Fingerprint);
        assert!(text.starts_with(&format!("localhost  -->  {}  moria1", RELAY_FINGERPRINT)), "{:?}", text);
        assert_eq!(text.len(), 100);

        let control = ConnectionLine::new(entry(Category::Control, "127.0.0.1", 9051));
        let text = content(&control, &config, 100, ListingMode::Fingerprint);
        assert!(text.starts_with(&format!("localhost  -->  {:<40}", "localhost")));

        let unknown = ConnectionLine::new(entry(Category::Outbound, "203.0.113.9", 443));
        let text = content(&unknown, &config, 100, ListingMode::Fingerprint);
        assert!(text.starts_with(&format!("localhost  -->  {:<40}", UNKNOWN)));
    }

    #[test]
    fn test_nickname_mode() {
        let config = DisplayConfig::default();
        let line = ConnectionLine::new(entry(Category::Outbound, RELAY_ADDRESS, 9101));

        let text = content(&line, &config, 30, ListingMode::Nickname);
        assert_eq!(text, format!("caerSidi  -->  {:<11}    ", "moria1"));

        let control = ConnectionLine::new(entry(Category::Control, "127.0.0.1", 9051));
        let text = content(&control, &config, 40, ListingMode::Nickname);
        assert!(text.starts_with("caerSidi  -->  caerSidi"));
        assert_eq!(text.len(), 40);
    }

    #[test]
    fn test_nickname_mode_crops_when_cramped() {
        let config = DisplayConfig::default();
        let line = ConnectionLine::new(entry(Category::Outbound, RELAY_ADDRESS, 9101));

        let text = content(&line, &config, 20, ListingMode::Nickname);
        assert_eq!(text.len(), 20);
        assert!(!text.contains("caerSidi"));
        assert!(text.contains("moria1"));
    }

    #[test]
    fn test_scrubbed_entry_hides_remote() {
        let config = DisplayConfig::default();
        let line = ConnectionLine::new(ConnectionEntry::with_category(
            record("93.184.216.34", 443),
            Category::Exit,
            true,
        ));

        for mode in [ListingMode::IpAddress, ListingMode::Fingerprint, ListingMode::Nickname] {
            for width in [40, 80, 120, 200] {
                let text = content(&line, &config, width, mode);
                assert!(!text.contains("93.184.216.34"), "{:?}", text);
            }
        }
    }
}
