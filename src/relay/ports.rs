// Well known port purposes
//
// Static table used to annotate exit connections with what they are most
// likely carrying.

use super::PortPurpose;

/// Inclusive port ranges and the protocol usually found on them
const PORT_USAGE: &[(u16, u16, &str)] = &[
    (20, 21, "FTP"),
    (22, 22, "SSH"),
    (23, 23, "Telnet"),
    (25, 25, "SMTP"),
    (43, 43, "WHOIS"),
    (53, 53, "DNS"),
    (70, 70, "Gopher"),
    (79, 79, "Finger"),
    (80, 80, "HTTP"),
    (110, 110, "POP3"),
    (119, 119, "NNTP"),
    (123, 123, "NTP"),
    (143, 143, "IMAP"),
    (194, 194, "IRC"),
    (443, 443, "HTTPS"),
    (465, 465, "SMTP"),
    (563, 563, "NNTP"),
    (587, 587, "Submission"),
    (706, 706, "SILC"),
    (873, 873, "rsync"),
    (993, 993, "IMAPS"),
    (995, 995, "POP3S"),
    (1194, 1194, "OpenVPN"),
    (1863, 1863, "MSNP"),
    (3128, 3128, "SQUID"),
    (3306, 3306, "MySQL"),
    (5050, 5050, "Yahoo IM"),
    (5190, 5190, "AIM/ICQ"),
    (5222, 5223, "Jabber"),
    (5228, 5228, "Android Market"),
    (5432, 5432, "PostgreSQL"),
    (6660, 6669, "IRC"),
    (6679, 6679, "IRC SSL"),
    (6697, 6697, "IRC SSL"),
    (6881, 6999, "BitTorrent"),
    (8000, 8000, "iRDMI"),
    (8008, 8008, "HTTP Alternate"),
    (8080, 8080, "HTTP Proxy"),
    (8332, 8333, "Bitcoin"),
    (8443, 8443, "PCsync HTTPS"),
    (9001, 9001, "Tor"),
    (9030, 9030, "Tor"),
    (9050, 9051, "Tor"),
    (11371, 11371, "OpenPGP"),
    (19294, 19294, "Google Voice"),
    (50002, 50002, "Electrum Bitcoin SSL"),
];

/// Built-in port purpose table
#[derive(Debug, Clone, Copy, Default)]
pub struct WellKnownPorts;

impl PortPurpose for WellKnownPorts {
    fn port_usage(&self, port: u16) -> Option<String> {
        PORT_USAGE
            .iter()
            .find(|(start, end, _)| (*start..=*end).contains(&port))
            .map(|(_, _, purpose)| purpose.to_string())
    }
}
