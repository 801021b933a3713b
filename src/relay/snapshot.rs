// In-memory relay facts
//
// A plain-data stand-in for the control session and trackers. The preview
// panel renders from one, and tests build small ones to pin down exactly
// what the formatter sees.

use super::{
    ConsensusTracker, ControlFacts, PortUsageTracker, ProcessLookup, RouterStatus,
    ServerDescriptor, UserTraffic,
};
use crate::net::{ConnectionRecord, RemoteHints};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub external_address: Option<String>,
    pub nickname: Option<String>,
    pub geoip_unavailable: bool,
    pub user_traffic: UserTraffic,
    /// Address -> country code
    pub locales: HashMap<String, String>,
    /// Consensus entries, in consensus order
    pub relays: Vec<RouterStatus>,
    /// Fingerprint -> descriptor
    pub descriptors: HashMap<String, ServerDescriptor>,
    /// Local port -> owning process
    pub processes: HashMap<u16, ProcessLookup>,
    /// Remote ports our exit policy accepts
    pub exit_ports: Vec<u16>,
    /// Fingerprints of relays we hold one-hop directory tunnels to
    pub directory_tunnels: Vec<String>,
    /// Fingerprints of relays on our circuits' paths
    pub circuit_hops: Vec<String>,
}

impl Snapshot {
    pub fn with_relay(mut self, status: RouterStatus) -> Self {
        self.relays.push(status);
        self
    }

    pub fn with_descriptor(mut self, descriptor: ServerDescriptor) -> Self {
        self.descriptors
            .insert(descriptor.fingerprint.clone(), descriptor);
        self
    }

    pub fn with_locale(mut self, address: &str, locale: &str) -> Self {
        self.locales.insert(address.to_string(), locale.to_string());
        self
    }

    pub fn with_process(mut self, port: u16, lookup: ProcessLookup) -> Self {
        self.processes.insert(port, lookup);
        self
    }

    /// Correlate a connection's remote end with the consensus and our circuits
    pub fn hints_for(&self, record: &ConnectionRecord) -> RemoteHints {
        let fingerprint = self.relay_fingerprint(&record.remote_addr, record.remote_port);

        RemoteHints {
            circuit_hop: fingerprint
                .as_ref()
                .is_some_and(|fp| self.circuit_hops.contains(fp)),
            known_relay: fingerprint.is_some(),
            exit_permitted: self.exit_ports.contains(&record.remote_port),
            one_hop_tunnel: fingerprint
                .as_ref()
                .is_some_and(|fp| self.directory_tunnels.contains(fp)),
        }
    }
}

impl ControlFacts for Snapshot {
    fn external_address(&self) -> Option<String> {
        self.external_address.clone()
    }

    fn nickname(&self) -> Option<String> {
        self.nickname.clone()
    }

    fn network_status(&self, fingerprint: &str) -> Option<RouterStatus> {
        self.relays
            .iter()
            .find(|relay| relay.fingerprint == fingerprint)
            .cloned()
    }

    fn server_descriptor(&self, fingerprint: &str) -> Option<ServerDescriptor> {
        self.descriptors.get(fingerprint).cloned()
    }

    fn is_geoip_unavailable(&self) -> bool {
        self.geoip_unavailable
    }

    fn locale(&self, address: &str) -> Option<String> {
        self.locales.get(address).cloned()
    }

    fn user_traffic_allowed(&self) -> UserTraffic {
        self.user_traffic
    }
}

impl ConsensusTracker for Snapshot {
    fn relay_fingerprint(&self, address: &str, port: u16) -> Option<String> {
        self.relays
            .iter()
            .find(|relay| relay.address == address && relay.or_port == port)
            .map(|relay| relay.fingerprint.clone())
    }

    fn relay_nickname(&self, fingerprint: &str) -> Option<String> {
        self.relays
            .iter()
            .find(|relay| relay.fingerprint == fingerprint)
            .map(|relay| relay.nickname.clone())
    }

    fn all_relay_fingerprints(&self, address: &str) -> Vec<(u16, String)> {
        self.relays
            .iter()
            .filter(|relay| relay.address == address)
            .map(|relay| (relay.or_port, relay.fingerprint.clone()))
            .collect()
    }
}

impl PortUsageTracker for Snapshot {
    fn fetch(&self, port: u16) -> ProcessLookup {
        self.processes
            .get(&port)
            .cloned()
            .unwrap_or(ProcessLookup::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Protocol;
    use chrono::{TimeZone, Utc};

    fn relay(fingerprint: &str, address: &str, or_port: u16) -> RouterStatus {
        RouterStatus {
            fingerprint: fingerprint.to_string(),
            nickname: format!("relay{}", or_port),
            address: address.to_string(),
            or_port,
            dir_port: None,
            published: Utc.with_ymd_and_hms(2016, 4, 28, 12, 0, 0).unwrap(),
            flags: vec!["Fast".to_string()],
        }
    }

    fn record(remote_port: u16) -> ConnectionRecord {
        ConnectionRecord {
            local_addr: "10.0.0.5".to_string(),
            local_port: 40000,
            remote_addr: "198.51.100.7".to_string(),
            remote_port,
            protocol: Protocol::Tcp,
            start_time: 0,
            is_legacy: false,
        }
    }

    #[test]
    fn test_consensus_lookups() {
        let snapshot = Snapshot::default()
            .with_relay(relay("AAAA", "198.51.100.7", 9001))
            .with_relay(relay("BBBB", "198.51.100.7", 443));

        assert_eq!(snapshot.relay_fingerprint("198.51.100.7", 443).as_deref(), Some("BBBB"));
        assert_eq!(snapshot.relay_fingerprint("198.51.100.7", 80), None);
        assert_eq!(snapshot.relay_nickname("AAAA").as_deref(), Some("relay9001"));
        assert_eq!(
            snapshot.all_relay_fingerprints("198.51.100.7"),
            vec![(9001, "AAAA".to_string()), (443, "BBBB".to_string())]
        );
    }

    #[test]
    fn test_unknown_port_has_no_process() {
        let snapshot = Snapshot::default().with_process(9050, ProcessLookup::Pending);
        assert_eq!(snapshot.fetch(9050), ProcessLookup::Pending);
        assert_eq!(snapshot.fetch(1), ProcessLookup::Unknown);
    }

    #[test]
    fn test_hints_for_remote_relay() {
        let mut snapshot = Snapshot::default().with_relay(relay("AAAA", "198.51.100.7", 9001));
        snapshot.directory_tunnels.push("AAAA".to_string());
        snapshot.exit_ports = vec![443];

        let hints = snapshot.hints_for(&record(9001));
        assert!(hints.known_relay);
        assert!(hints.one_hop_tunnel);
        assert!(!hints.circuit_hop);

        let hints = snapshot.hints_for(&record(443));
        assert!(!hints.known_relay);
        assert!(hints.exit_permitted);
    }
}
