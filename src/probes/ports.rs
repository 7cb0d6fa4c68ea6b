/// Open-ports panel: TCP connect scan of the well-known range on localhost.

use anyhow::Result;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

const SCAN_RANGE: std::ops::Range<u16> = 1..1024;
const PER_PORT_TIMEOUT: Duration = Duration::from_millis(25);
const PORTS_PER_LINE: usize = 5;

pub fn open_ports() -> Result<String> {
    let open: Vec<u16> = SCAN_RANGE
        .filter(|&port| {
            let addr = SocketAddr::from(([127, 0, 0, 1], port));
            TcpStream::connect_timeout(&addr, PER_PORT_TIMEOUT).is_ok()
        })
        .collect();

    Ok(render_ports(&open))
}

fn render_ports(open: &[u16]) -> String {
    if open.is_empty() {
        return "no open ports in 1-1023\n".to_string();
    }

    let labels: Vec<String> = open
        .iter()
        .map(|&port| match service_name(port) {
            Some(name) => format!("{port} ({name})"),
            None => port.to_string(),
        })
        .collect();

    let mut out = String::new();
    for chunk in labels.chunks(PORTS_PER_LINE) {
        out.push_str(&chunk.join(", "));
        out.push('\n');
    }
    out
}

/// Static subset of /etc/services for the scanned range.
fn service_name(port: u16) -> Option<&'static str> {
    Some(match port {
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        53 => "domain",
        80 => "http",
        110 => "pop3",
        111 => "sunrpc",
        119 => "nntp",
        123 => "ntp",
        139 => "netbios-ssn",
        143 => "imap",
        179 => "bgp",
        389 => "ldap",
        443 => "https",
        445 => "microsoft-ds",
        465 => "smtps",
        514 => "syslog",
        587 => "submission",
        631 => "ipp",
        636 => "ldaps",
        873 => "rsync",
        993 => "imaps",
        995 => "pop3s",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_service_names() {
        assert_eq!(service_name(22), Some("ssh"));
        assert_eq!(service_name(443), Some("https"));
        assert_eq!(service_name(999), None);
    }

    #[test]
    fn test_render_annotates_and_wraps() {
        let rendered = render_ports(&[22, 80, 443, 631, 873, 1000]);
        assert!(rendered.contains("22 (ssh)"));
        assert!(rendered.contains("1000"));
        // Six ports wrap onto two lines
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn test_render_empty() {
        assert!(render_ports(&[]).contains("no open ports"));
    }
}
