//! Command-line and environment configuration for the relay server.

use crate::engine::{
    EngineLogLevel, KNOWN_LOG_TAGS, ListenIp, TransportOptions, WorkerOptions,
};
use crate::supervisor::DEFAULT_DEATH_GRACE;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Single-room WebRTC relay: one producer, one consumer, WebSocket signaling.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP and signaling server binds
    #[arg(long, default_value = "0.0.0.0", env = "RELAY_LISTEN_IP")]
    pub listen_ip: IpAddr,

    #[arg(long, default_value_t = 3000, env = "RELAY_LISTEN_PORT")]
    pub listen_port: u16,

    /// Directory served for any path other than the signaling socket
    #[arg(long, default_value = ".", env = "RELAY_STATIC_DIR")]
    pub static_dir: PathBuf,

    #[arg(long, value_enum, default_value = "warn", env = "RELAY_WORKER_LOG_LEVEL")]
    pub worker_log_level: EngineLogLevel,

    /// Media worker log tags (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "info,ice,dtls,rtp,srtp,rtcp",
        env = "RELAY_WORKER_LOG_TAGS"
    )]
    pub worker_log_tags: Vec<String>,

    /// Address media transports bind, defaults to --listen-ip
    #[arg(long, env = "RELAY_RTC_LISTEN_IP")]
    pub rtc_listen_ip: Option<IpAddr>,

    /// Lowest UDP/TCP port used for media
    #[arg(long, default_value_t = 10000, env = "RELAY_RTC_MIN_PORT")]
    pub rtc_min_port: u16,

    /// Highest UDP/TCP port used for media
    #[arg(long, default_value_t = 10100, env = "RELAY_RTC_MAX_PORT")]
    pub rtc_max_port: u16,

    /// Public address advertised in ICE candidates when behind NAT
    #[arg(long, env = "RELAY_ANNOUNCED_IP")]
    pub announced_ip: Option<String>,

    /// Incoming bitrate cap per transport in bps, 0 to leave it unset
    #[arg(long, default_value_t = 1_500_000, env = "RELAY_MAX_INCOMING_BITRATE")]
    pub max_incoming_bitrate: u32,

    #[arg(long, default_value_t = 1_000_000, env = "RELAY_INITIAL_OUTGOING_BITRATE")]
    pub initial_outgoing_bitrate: u32,

    /// Delay between media worker death and process exit
    #[arg(
        long,
        default_value_t = DEFAULT_DEATH_GRACE.as_millis() as u64,
        env = "RELAY_WORKER_DEATH_GRACE_MS"
    )]
    pub worker_death_grace_ms: u64,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_ip, self.listen_port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rtc_min_port > self.rtc_max_port {
            return Err(ConfigError::InvalidValue {
                field: "rtc-min-port",
                reason: format!(
                    "{} is above rtc-max-port {}",
                    self.rtc_min_port, self.rtc_max_port
                ),
            });
        }

        if let Some(tag) = self
            .worker_log_tags
            .iter()
            .find(|tag| !KNOWN_LOG_TAGS.contains(&tag.as_str()))
        {
            return Err(ConfigError::InvalidValue {
                field: "worker-log-tags",
                reason: format!("unknown tag '{tag}'"),
            });
        }

        Ok(())
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            listen_ips: vec![ListenIp {
                ip: self.rtc_listen_ip.unwrap_or(self.listen_ip),
                announced_address: self.announced_ip.clone(),
            }],
            port_range: self.rtc_min_port..=self.rtc_max_port,
            initial_available_outgoing_bitrate: self.initial_outgoing_bitrate,
            max_incoming_bitrate: (self.max_incoming_bitrate > 0)
                .then_some(self.max_incoming_bitrate),
            ..TransportOptions::default()
        }
    }

    pub fn worker_options(&self) -> WorkerOptions {
        WorkerOptions {
            log_level: self.worker_log_level,
            log_tags: self.worker_log_tags.clone(),
        }
    }

    pub fn worker_death_grace(&self) -> Duration {
        Duration::from_millis(self.worker_death_grace_ms)
    }
}
