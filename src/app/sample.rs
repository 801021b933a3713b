// Sample relay
//
// A small, self-consistent relay used by the panel: consensus entries,
// descriptors, locales and one connection of every category. Start times
// are relative to the moment the sample is built so ages look plausible.

use crate::net::{ConnectionRecord, Protocol, RelayRole};
use crate::relay::snapshot::Snapshot;
use crate::relay::{ProcessInfo, ProcessLookup, RouterStatus, ServerDescriptor, UserTraffic};
use chrono::{DateTime, Duration, Utc};

const LOCAL_ADDRESS: &str = "192.168.0.12";
const EXTERNAL_ADDRESS: &str = "73.94.20.11";
const LOOPBACK: &str = "127.0.0.1";

const OR_PORT: u16 = 9001;
const DIR_PORT: u16 = 9030;
const SOCKS_PORT: u16 = 9050;
const CONTROL_PORT: u16 = 9051;
const HIDDEN_SERVICE_PORT: u16 = 8080;

/// Relay facts, listener ports and open connections of the sample relay
pub struct Sample {
    pub snapshot: Snapshot,
    pub role: RelayRole,
    pub records: Vec<ConnectionRecord>,
}

struct Relay {
    nickname: &'static str,
    fingerprint: &'static str,
    address: &'static str,
    or_port: u16,
    dir_port: Option<u16>,
    locale: &'static str,
    platform: (&'static str, &'static str),
    contact: Option<&'static str>,
    flags: &'static [&'static str],
}

const RELAYS: &[Relay] = &[
    Relay {
        nickname: "moria1",
        fingerprint: "9695DFC35FFEB861329B9F1AB04C46397020CE31",
        address: "128.31.0.34",
        or_port: 9101,
        dir_port: Some(9131),
        locale: "us",
        platform: ("Linux", "0.2.8.1-alpha-dev"),
        contact: Some("1024D/28988BF5 arma mit edu"),
        flags: &["Authority", "Fast", "Running", "Stable", "V2Dir", "Valid"],
    },
    Relay {
        nickname: "tor26",
        fingerprint: "847B1F850344D7876491A54892F904934E4EB85D",
        address: "86.59.21.38",
        or_port: 443,
        dir_port: Some(80),
        locale: "at",
        platform: ("Linux", "0.2.7.6"),
        contact: Some("Peter Palfrader <peter@palfrader.org>"),
        flags: &["Authority", "Fast", "Guard", "HSDir", "Running", "Stable", "Valid"],
    },
    Relay {
        nickname: "dannenberg",
        fingerprint: "7BE683E65D48141321C5ED92F075C55364AC7123",
        address: "193.23.244.244",
        or_port: 443,
        dir_port: Some(80),
        locale: "de",
        platform: ("FreeBSD", "0.2.7.6"),
        contact: Some("Andreas Lehner"),
        flags: &["Authority", "Fast", "Guard", "Running", "Stable", "Valid"],
    },
    Relay {
        nickname: "Serge",
        fingerprint: "BA44A889E64B93FAA2B114E02C2A279A8555C533",
        address: "66.111.2.131",
        or_port: 9001,
        dir_port: Some(9030),
        locale: "us",
        platform: ("Linux", "0.2.7.6"),
        contact: None,
        flags: &["Fast", "Running", "Stable", "Valid"],
    },
    Relay {
        nickname: "PrivacyRepublic0001",
        fingerprint: "2A4C0F4BE23D3A7E1E9D6E1C5A1B7E0F6C0D8E21",
        address: "37.218.247.217",
        or_port: 9001,
        dir_port: None,
        locale: "nl",
        platform: ("Linux", "0.2.7.6"),
        contact: None,
        flags: &["Exit", "Fast", "Running", "Valid"],
    },
    Relay {
        nickname: "PrivacyRepublic0002",
        fingerprint: "5B1D6A8F2E4C0D7A9B3E1F5C7D2A4B6E8F0C1D33",
        address: "37.218.247.217",
        or_port: 9002,
        dir_port: None,
        locale: "nl",
        platform: ("Linux", "0.2.7.6"),
        contact: None,
        flags: &["Exit", "Fast", "Running", "Valid"],
    },
];

/// Fingerprint of the relay we hold a one-hop directory tunnel to (tor26)
const DIRECTORY_TUNNEL: &str = "847B1F850344D7876491A54892F904934E4EB85D";

/// Fingerprint of the relay one of our circuits goes through (Serge)
const CIRCUIT_HOP: &str = "BA44A889E64B93FAA2B114E02C2A279A8555C533";

/// Build the sample relay as seen at unix time `now`
pub fn sample_relay(now: u64) -> Sample {
    let published = DateTime::<Utc>::from_timestamp(now as i64, 0)
        .unwrap_or_default()
        - Duration::hours(3);

    let mut snapshot = Snapshot {
        external_address: Some(EXTERNAL_ADDRESS.to_string()),
        nickname: Some("caerSidi".to_string()),
        user_traffic: UserTraffic {
            inbound: true,
            outbound: true,
        },
        exit_ports: vec![53, 80, 443, 6881],
        directory_tunnels: vec![DIRECTORY_TUNNEL.to_string()],
        circuit_hops: vec![CIRCUIT_HOP.to_string()],
        ..Default::default()
    };

    for relay in RELAYS {
        snapshot = snapshot
            .with_relay(RouterStatus {
                fingerprint: relay.fingerprint.to_string(),
                nickname: relay.nickname.to_string(),
                address: relay.address.to_string(),
                or_port: relay.or_port,
                dir_port: relay.dir_port,
                published,
                flags: relay.flags.iter().map(|flag| flag.to_string()).collect(),
            })
            .with_descriptor(ServerDescriptor {
                fingerprint: relay.fingerprint.to_string(),
                exit_policy: Some(if relay.flags.contains(&"Exit") {
                    "accept 80, 443".to_string()
                } else {
                    "reject 1-65535".to_string()
                }),
                operating_system: relay.platform.0.to_string(),
                version: relay.platform.1.to_string(),
                contact: relay.contact.map(str::to_string),
            })
            .with_locale(relay.address, relay.locale);
    }

    let snapshot = snapshot
        .with_locale("93.184.216.34", "us")
        .with_locale("151.101.1.69", "us")
        .with_locale("203.0.113.9", "au")
        .with_process(
            SOCKS_PORT,
            ProcessLookup::Resolved(ProcessInfo {
                name: "firefox".to_string(),
                pid: Some(2421),
            }),
        )
        .with_process(CONTROL_PORT, ProcessLookup::Pending)
        .with_process(
            HIDDEN_SERVICE_PORT,
            ProcessLookup::Resolved(ProcessInfo {
                name: "nginx".to_string(),
                pid: None,
            }),
        );

    let role = RelayRole {
        or_ports: vec![OR_PORT],
        dir_ports: vec![DIR_PORT],
        socks_ports: vec![SOCKS_PORT],
        control_ports: vec![CONTROL_PORT],
        hidden_service_ports: vec![HIDDEN_SERVICE_PORT],
    };

    let record = |local_addr: &str,
                  local_port: u16,
                  remote_addr: &str,
                  remote_port: u16,
                  age: u64,
                  is_legacy: bool| ConnectionRecord {
        local_addr: local_addr.to_string(),
        local_port,
        remote_addr: remote_addr.to_string(),
        remote_port,
        protocol: Protocol::Tcp,
        start_time: now.saturating_sub(age),
        is_legacy,
    };

    let mut records = vec![
        // peers connecting to our ORPort
        record(LOCAL_ADDRESS, OR_PORT, "128.31.0.34", 51234, 7_260, true),
        record(LOCAL_ADDRESS, OR_PORT, "203.0.113.9", 40022, 95, false),
        record(LOCAL_ADDRESS, 51413, "193.23.244.244", 443, 3_480, false),
        record(LOCAL_ADDRESS, 51420, "37.218.247.217", 8443, 640, false),
        record(LOCAL_ADDRESS, 51502, "86.59.21.38", 443, 12, false),
        record(LOCAL_ADDRESS, 51533, "66.111.2.131", 9001, 305, false),
        record(LOCAL_ADDRESS, 52001, "93.184.216.34", 443, 41, false),
        record(LOCAL_ADDRESS, 52007, "151.101.1.69", 6881, 9, false),
        record(LOOPBACK, 41234, LOOPBACK, SOCKS_PORT, 180, false),
        record(LOOPBACK, 41290, LOOPBACK, CONTROL_PORT, 90_000, true),
        record(LOOPBACK, HIDDEN_SERVICE_PORT, LOOPBACK, HIDDEN_SERVICE_PORT, 33, false),
    ];

    // name lookup exiting on behalf of a client
    records.push(ConnectionRecord {
        protocol: Protocol::Udp,
        ..record(LOCAL_ADDRESS, 53017, "9.9.9.9", 53, 4, false)
    });

    Sample {
        snapshot,
        role,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{classify, Category};

    #[test]
    fn test_sample_covers_every_category() {
        let sample = sample_relay(1_000_000);
        let categories: Vec<Category> = sample
            .records
            .iter()
            .map(|record| classify(record, &sample.role, &sample.snapshot.hints_for(record)))
            .collect();

        for category in Category::ALL {
            assert!(categories.contains(&category), "missing {:?}", category);
        }
    }

    #[test]
    fn test_sample_includes_udp_exit() {
        let sample = sample_relay(1_000_000);
        let udp: Vec<&ConnectionRecord> = sample
            .records
            .iter()
            .filter(|record| record.protocol == Protocol::Udp)
            .collect();

        assert_eq!(udp.len(), 1);
        let hints = sample.snapshot.hints_for(udp[0]);
        assert_eq!(classify(udp[0], &sample.role, &hints), Category::Exit);
    }

    #[test]
    fn test_sample_has_ambiguous_address() {
        use crate::relay::ConsensusTracker;

        let sample = sample_relay(1_000_000);
        assert_eq!(sample.snapshot.all_relay_fingerprints("37.218.247.217").len(), 2);
        assert_eq!(sample.snapshot.relay_fingerprint("37.218.247.217", 8443), None);
    }
}
