use clap::ValueEnum;

/// Log tags the media worker understands.
pub const KNOWN_LOG_TAGS: &[&str] = &[
    "info",
    "ice",
    "dtls",
    "rtp",
    "srtp",
    "rtcp",
    "rtx",
    "bwe",
    "score",
    "simulcast",
    "svc",
    "sctp",
    "message",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineLogLevel {
    Debug,
    Warn,
    Error,
    None,
}

#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub log_level: EngineLogLevel,
    pub log_tags: Vec<String>,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            log_level: EngineLogLevel::Warn,
            log_tags: ["info", "ice", "dtls", "rtp", "srtp", "rtcp"]
                .iter()
                .map(|tag| tag.to_string())
                .collect(),
        }
    }
}
