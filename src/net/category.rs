// Connection categories and the classifier that assigns them
//
// Classification is a pure function of the connection, the local relay's
// listener ports and a few correlation hints the caller resolved beforehand.
// It never fails: anything unrecognized lands in OUTBOUND.

use super::ConnectionRecord;

/// Functional role of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Another relay or client connected to our OR/Dir port
    Inbound,
    /// We connected to another relay
    Outbound,
    /// Traffic leaving the network through us
    Exit,
    /// Hidden service hosted behind us
    Hidden,
    /// Local application using our SOCKS port
    Socks,
    /// Controller attached to our control port
    Control,
    /// One-hop tunnel for directory fetches
    Directory,
    /// Hop of one of our own circuits
    Circuit,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Inbound,
        Category::Outbound,
        Category::Exit,
        Category::Hidden,
        Category::Socks,
        Category::Control,
        Category::Directory,
        Category::Circuit,
    ];

    /// Upper-case label shown in the listing's type column
    pub fn label(&self) -> &'static str {
        match self {
            Category::Inbound => "INBOUND",
            Category::Outbound => "OUTBOUND",
            Category::Exit => "EXIT",
            Category::Hidden => "HIDDEN",
            Category::Socks => "SOCKS",
            Category::Control => "CONTROL",
            Category::Directory => "DIRECTORY",
            Category::Circuit => "CIRCUIT",
        }
    }

    /// Local applications talk to us directly, so their etc column shows the
    /// owning process rather than consensus data
    pub fn is_application(&self) -> bool {
        matches!(self, Category::Socks | Category::Hidden | Category::Control)
    }

    /// Connections whose remote end may be a relay we can look up by ORPort
    pub fn has_relay_endpoint(&self) -> bool {
        match self {
            Category::Outbound | Category::Circuit | Category::Directory | Category::Exit => true,
            Category::Inbound | Category::Hidden | Category::Socks | Category::Control => false,
        }
    }

    /// Whether the connection goes out through the relay's external address
    pub fn is_address_translated(&self) -> bool {
        !self.is_application()
    }
}

/// Primary identity axis of the connection listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListingMode {
    #[default]
    IpAddress,
    Fingerprint,
    Nickname,
}

impl ListingMode {
    pub fn label(&self) -> &'static str {
        match self {
            ListingMode::IpAddress => "IP address",
            ListingMode::Fingerprint => "fingerprint",
            ListingMode::Nickname => "nickname",
        }
    }

    /// Next mode in the cycle IP address -> fingerprint -> nickname
    pub fn next(&self) -> Self {
        match self {
            ListingMode::IpAddress => ListingMode::Fingerprint,
            ListingMode::Fingerprint => ListingMode::Nickname,
            ListingMode::Nickname => ListingMode::IpAddress,
        }
    }
}

/// Listener ports of the local relay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayRole {
    pub or_ports: Vec<u16>,
    pub dir_ports: Vec<u16>,
    pub socks_ports: Vec<u16>,
    pub control_ports: Vec<u16>,
    pub hidden_service_ports: Vec<u16>,
}

/// Facts about the remote end, resolved by the caller from consensus and
/// circuit state before classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteHints {
    /// The connection is a hop of one of our circuits
    pub circuit_hop: bool,
    /// Remote address/port matches a relay in the consensus
    pub known_relay: bool,
    /// Our exit policy permits traffic to the remote address/port
    pub exit_permitted: bool,
    /// Remote relay is the first hop of a one-hop directory tunnel
    pub one_hop_tunnel: bool,
}

/// Assign a category to a connection
pub fn classify(record: &ConnectionRecord, role: &RelayRole, hints: &RemoteHints) -> Category {
    if hints.circuit_hop {
        return Category::Circuit;
    }

    if role.or_ports.contains(&record.local_port) || role.dir_ports.contains(&record.local_port) {
        return Category::Inbound;
    }

    if role.socks_ports.contains(&record.remote_port) {
        return Category::Socks;
    }

    if role.hidden_service_ports.contains(&record.remote_port) {
        return Category::Hidden;
    }

    if role.control_ports.contains(&record.remote_port) {
        return Category::Control;
    }

    if !hints.known_relay {
        if hints.exit_permitted {
            return Category::Exit;
        }
    } else if hints.one_hop_tunnel {
        return Category::Directory;
    }

    Category::Outbound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Protocol;

    fn record(local_port: u16, remote_port: u16) -> ConnectionRecord {
        ConnectionRecord {
            local_addr: "10.0.0.5".to_string(),
            local_port,
            remote_addr: "198.51.100.7".to_string(),
            remote_port,
            protocol: Protocol::Tcp,
            start_time: 0,
            is_legacy: false,
        }
    }

    fn role() -> RelayRole {
        RelayRole {
            or_ports: vec![9001],
            dir_ports: vec![9030],
            socks_ports: vec![9050],
            control_ports: vec![9051],
            hidden_service_ports: vec![8080],
        }
    }

    #[test]
    fn test_classify_inbound_on_listener_ports() {
        let hints = RemoteHints::default();
        assert_eq!(classify(&record(9001, 51234), &role(), &hints), Category::Inbound);
        assert_eq!(classify(&record(9030, 51234), &role(), &hints), Category::Inbound);
    }

    #[test]
    fn test_classify_local_applications() {
        let hints = RemoteHints::default();
        assert_eq!(classify(&record(40000, 9050), &role(), &hints), Category::Socks);
        assert_eq!(classify(&record(40000, 8080), &role(), &hints), Category::Hidden);
        assert_eq!(classify(&record(40000, 9051), &role(), &hints), Category::Control);
    }

    #[test]
    fn test_classify_exit_and_directory() {
        let exit = RemoteHints {
            exit_permitted: true,
            ..Default::default()
        };
        assert_eq!(classify(&record(40000, 443), &role(), &exit), Category::Exit);

        // a known relay is never an exit destination
        let relay = RemoteHints {
            known_relay: true,
            exit_permitted: true,
            ..Default::default()
        };
        assert_eq!(classify(&record(40000, 9001), &role(), &relay), Category::Outbound);

        let tunnel = RemoteHints {
            known_relay: true,
            one_hop_tunnel: true,
            ..Default::default()
        };
        assert_eq!(classify(&record(40000, 9001), &role(), &tunnel), Category::Directory);
    }

    #[test]
    fn test_classify_circuit_wins() {
        let hints = RemoteHints {
            circuit_hop: true,
            ..Default::default()
        };
        assert_eq!(classify(&record(9001, 9050), &role(), &hints), Category::Circuit);
    }

    #[test]
    fn test_classify_fallback_is_outbound() {
        let hints = RemoteHints::default();
        assert_eq!(classify(&record(40000, 443), &RelayRole::default(), &hints), Category::Outbound);
    }

    #[test]
    fn test_category_labels_fit_type_column() {
        for category in Category::ALL {
            assert!(category.label().len() <= 9);
        }
        assert_eq!(Category::Directory.label(), "DIRECTORY");
    }

    #[test]
    fn test_listing_mode_cycle() {
        let mode = ListingMode::default();
        assert_eq!(mode, ListingMode::IpAddress);
        assert_eq!(mode.next().next().next(), ListingMode::IpAddress);
    }
}
