// Connection model
//
// Snapshots of connections as handed over by the connection tracker, tagged
// with their category and whether the remote address must be scrubbed.

pub mod category;

pub use category::{classify, Category, ListingMode, RelayRole, RemoteHints};

use crate::relay::UserTraffic;
use std::net::IpAddr;

/// Transport protocol of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

/// Immutable snapshot of a single connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub local_addr: String,
    pub local_port: u16,
    pub remote_addr: String,
    pub remote_port: u16,
    pub protocol: Protocol,
    /// Unix timestamp (seconds) the connection was first seen
    pub start_time: u64,
    /// Connection predates the current monitoring session
    pub is_legacy: bool,
}

/// Connection tagged with its category and privacy flag
///
/// Both tags are decided once at creation and never change for the lifetime
/// of the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEntry {
    record: ConnectionRecord,
    category: Category,
    private: bool,
}

impl ConnectionEntry {
    /// Classify a record and decide whether its remote address is scrubbed
    ///
    /// The address display toggle isn't part of this decision; it is read
    /// live by the formatter on every layout.
    ///
    /// # Arguments
    /// * `role` - Listener ports of the local relay
    /// * `hints` - Consensus/circuit correlation for the remote end
    /// * `user_traffic` - Whether the relay carries client traffic in/out
    pub fn new(
        record: ConnectionRecord,
        role: &RelayRole,
        hints: &RemoteHints,
        user_traffic: UserTraffic,
    ) -> Self {
        let category = classify(&record, role, hints);
        let private = scrub_required(category, user_traffic, hints.known_relay);

        Self {
            record,
            category,
            private,
        }
    }

    /// Entry with an already decided category and privacy flag
    pub fn with_category(record: ConnectionRecord, category: Category, private: bool) -> Self {
        Self {
            record,
            category,
            private,
        }
    }

    pub fn record(&self) -> &ConnectionRecord {
        &self.record
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Remote address must not be shown
    pub fn is_private(&self) -> bool {
        self.private
    }
}

/// Client connections are scrubbed so the display never reveals who uses the
/// relay: inbound peers that aren't relays and every exit destination.
fn scrub_required(category: Category, user_traffic: UserTraffic, known_relay: bool) -> bool {
    match category {
        Category::Inbound => user_traffic.inbound && !known_relay,
        Category::Exit => user_traffic.outbound,
        Category::Outbound
        | Category::Hidden
        | Category::Socks
        | Category::Control
        | Category::Directory
        | Category::Circuit => false,
    }
}

/// Whether an address is on a private, loopback or link-local range
///
/// Unparseable addresses are treated as private so no locale lookup is
/// attempted for them.
pub fn is_private_address(addr: &str) -> bool {
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => ip.is_private() || ip.is_loopback() || ip.is_link_local(),
        Ok(IpAddr::V6(ip)) => {
            let first = ip.segments()[0];
            ip.is_loopback()
                || (first & 0xfe00) == 0xfc00 // unique local
                || (first & 0xffc0) == 0xfe80 // link local
        }
        Err(_) => true,
    }
}
