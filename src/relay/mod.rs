// Collaborator seams
//
// The line formatter never talks to the relay, the consensus or the OS
// directly. Everything it needs is read through these traits, bundled in a
// RenderContext that the panel passes explicitly on every call. All reads
// must be non-blocking: implementations answer from their own caches and
// report "not known yet" instead of waiting.

pub mod ports;
pub mod snapshot;

use crate::app::config::DisplayConfig;
use chrono::{DateTime, Utc};

/// Whether the relay carries client traffic in each direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserTraffic {
    pub inbound: bool,
    pub outbound: bool,
}

/// Router status entry from the consensus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterStatus {
    pub fingerprint: String,
    pub nickname: String,
    pub address: String,
    pub or_port: u16,
    pub dir_port: Option<u16>,
    pub published: DateTime<Utc>,
    pub flags: Vec<String>,
}

/// Subset of a relay's server descriptor shown on the detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    pub fingerprint: String,
    /// Exit policy summary such as "reject 1-65535"
    pub exit_policy: Option<String>,
    pub operating_system: String,
    pub version: String,
    pub contact: Option<String>,
}

/// Process owning a local port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: Option<u32>,
}

/// Outcome of a port ownership lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessLookup {
    Resolved(ProcessInfo),
    /// Resolution hasn't completed yet
    Pending,
    /// No process is known to own the port
    Unknown,
}

/// Facts read from the relay's control session
pub trait ControlFacts {
    /// Address the relay is reachable at from the outside
    fn external_address(&self) -> Option<String>;

    /// Our configured nickname
    fn nickname(&self) -> Option<String>;

    fn network_status(&self, fingerprint: &str) -> Option<RouterStatus>;

    fn server_descriptor(&self, fingerprint: &str) -> Option<ServerDescriptor>;

    /// Geoip database is missing, so locale lookups are pointless
    fn is_geoip_unavailable(&self) -> bool;

    /// Two letter country code for an address
    fn locale(&self, address: &str) -> Option<String>;

    fn user_traffic_allowed(&self) -> UserTraffic;
}

/// Correlates addresses with relays in the consensus
pub trait ConsensusTracker {
    fn relay_fingerprint(&self, address: &str, port: u16) -> Option<String>;

    fn relay_nickname(&self, fingerprint: &str) -> Option<String>;

    /// Every (ORPort, fingerprint) pair of relays on an address, ordered
    fn all_relay_fingerprints(&self, address: &str) -> Vec<(u16, String)>;
}

/// Resolves which local process owns a port
pub trait PortUsageTracker {
    fn fetch(&self, port: u16) -> ProcessLookup;
}

/// Maps a port to the protocol commonly served on it
pub trait PortPurpose {
    fn port_usage(&self, port: u16) -> Option<String>;
}

/// Everything a ConnectionLine reads while rendering
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub control: &'a dyn ControlFacts,
    pub consensus: &'a dyn ConsensusTracker,
    pub processes: &'a dyn PortUsageTracker,
    pub ports: &'a dyn PortPurpose,
    pub config: &'a DisplayConfig,
}
