use std::net::{IpAddr, Ipv4Addr};
use std::ops::RangeInclusive;

/// Local address a WebRTC transport binds, plus the address announced to
/// clients when the server sits behind NAT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenIp {
    pub ip: IpAddr,
    pub announced_address: Option<String>,
}

/// Settings applied to every WebRTC transport the coordinator creates.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub listen_ips: Vec<ListenIp>,
    pub port_range: RangeInclusive<u16>,
    pub enable_udp: bool,
    pub enable_tcp: bool,
    pub prefer_udp: bool,
    pub initial_available_outgoing_bitrate: u32,
    /// Best effort cap applied after creation. `None` leaves the engine default.
    pub max_incoming_bitrate: Option<u32>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            listen_ips: vec![ListenIp {
                ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                announced_address: None,
            }],
            port_range: 10000..=10100,
            enable_udp: true,
            enable_tcp: true,
            prefer_udp: true,
            initial_available_outgoing_bitrate: 1_000_000,
            max_incoming_bitrate: Some(1_500_000),
        }
    }
}
