use super::mediasoup_objects::{MediasoupTransport, decode};
use crate::engine::{
    EngineError, EngineLogLevel, MediaRouter, MediaTransport, TransportOptions, WorkerOptions,
};
use crate::supervisor::WorkerDeath;
use async_trait::async_trait;
use mediasoup::prelude::{
    ListenInfo, Protocol, Router, RouterOptions, RtpCapabilities, RtpCodecCapability,
    WebRtcTransportListenInfos, WebRtcTransportOptions, Worker, WorkerManager, WorkerSettings,
};
use mediasoup::worker::{WorkerLogLevel, WorkerLogTag};
use relay_core::ProducerId;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// Owns the worker process and the room's router.
///
/// Dropping the engine closes the worker, which in turn closes every
/// transport, producer and consumer created through it.
pub struct MediasoupEngine {
    _worker_manager: WorkerManager,
    _worker: Worker,
    router: Arc<MediasoupRouter>,
}

impl MediasoupEngine {
    /// Spawn the worker and create the router.
    ///
    /// The returned receiver resolves if the worker process dies.
    pub async fn start(
        options: WorkerOptions,
        media_codecs: Vec<RtpCodecCapability>,
    ) -> Result<(Self, oneshot::Receiver<WorkerDeath>), EngineError> {
        let worker_manager = WorkerManager::new();

        let mut settings = WorkerSettings::default();
        settings.log_level = log_level(options.log_level);
        settings.log_tags = options
            .log_tags
            .iter()
            .filter_map(|tag| log_tag(tag))
            .collect();

        let worker = worker_manager
            .create_worker(settings)
            .await
            .map_err(|e| EngineError::Startup(format!("worker: {e}")))?;

        let (death_tx, death_rx) = oneshot::channel();
        let worker_id = worker.id().to_string();
        worker
            .on_dead(move |reason| {
                let _ = death_tx.send(WorkerDeath {
                    worker_id,
                    reason: format!("{reason:?}"),
                });
            })
            .detach();

        let router = worker
            .create_router(RouterOptions::new(media_codecs))
            .await
            .map_err(|e| EngineError::Startup(format!("router: {e}")))?;

        info!("Media worker {} started, router {}", worker.id(), router.id());

        Ok((
            Self {
                _worker_manager: worker_manager,
                _worker: worker,
                router: Arc::new(MediasoupRouter::new(router)?),
            },
            death_rx,
        ))
    }

    pub fn router(&self) -> Arc<dyn MediaRouter> {
        self.router.clone()
    }
}

fn log_level(level: EngineLogLevel) -> WorkerLogLevel {
    match level {
        EngineLogLevel::Debug => WorkerLogLevel::Debug,
        EngineLogLevel::Warn => WorkerLogLevel::Warn,
        EngineLogLevel::Error => WorkerLogLevel::Error,
        EngineLogLevel::None => WorkerLogLevel::None,
    }
}

fn log_tag(tag: &str) -> Option<WorkerLogTag> {
    let tag = match tag {
        "info" => WorkerLogTag::Info,
        "ice" => WorkerLogTag::Ice,
        "dtls" => WorkerLogTag::Dtls,
        "rtp" => WorkerLogTag::Rtp,
        "srtp" => WorkerLogTag::Srtp,
        "rtcp" => WorkerLogTag::Rtcp,
        "rtx" => WorkerLogTag::Rtx,
        "bwe" => WorkerLogTag::Bwe,
        "score" => WorkerLogTag::Score,
        "simulcast" => WorkerLogTag::Simulcast,
        "svc" => WorkerLogTag::Svc,
        "sctp" => WorkerLogTag::Sctp,
        "message" => WorkerLogTag::Message,
        other => {
            warn!("Ignoring unknown worker log tag '{}'", other);
            return None;
        }
    };
    Some(tag)
}

struct MediasoupRouter {
    router: Router,
    rtp_capabilities: Value,
}

impl MediasoupRouter {
    fn new(router: Router) -> Result<Self, EngineError> {
        let rtp_capabilities = serde_json::to_value(router.rtp_capabilities())
            .map_err(|e| EngineError::Startup(format!("router capabilities: {e}")))?;
        Ok(Self {
            router,
            rtp_capabilities,
        })
    }
}

fn listen_infos(options: &TransportOptions) -> Result<WebRtcTransportListenInfos, EngineError> {
    let mut protocols = Vec::new();
    if options.enable_udp {
        protocols.push(Protocol::Udp);
    }
    if options.enable_tcp {
        protocols.push(Protocol::Tcp);
    }

    let mut infos = options.listen_ips.iter().flat_map(|listen_ip| {
        protocols.iter().map(move |protocol| ListenInfo {
            protocol: *protocol,
            ip: listen_ip.ip,
            announced_address: listen_ip.announced_address.clone(),
            expose_internal_ip: false,
            port: None,
            port_range: Some(options.port_range.clone()),
            flags: None,
            send_buffer_size: None,
            recv_buffer_size: None,
        })
    });

    let first = infos
        .next()
        .ok_or_else(|| EngineError::invalid("transport options", "no listen address enabled"))?;
    Ok(infos.fold(WebRtcTransportListenInfos::new(first), |acc, info| {
        acc.insert(info)
    }))
}

#[async_trait]
impl MediaRouter for MediasoupRouter {
    fn rtp_capabilities(&self) -> Value {
        self.rtp_capabilities.clone()
    }

    fn can_consume(&self, producer_id: &ProducerId, rtp_capabilities: &Value) -> bool {
        let producer_id = match decode("producer id", Value::String(producer_id.0.clone())) {
            Ok(id) => id,
            Err(e) => {
                error!("{}", e);
                return false;
            }
        };
        let rtp_capabilities: RtpCapabilities =
            match decode("rtpCapabilities", rtp_capabilities.clone()) {
                Ok(caps) => caps,
                Err(e) => {
                    debug!("{}", e);
                    return false;
                }
            };
        self.router.can_consume(&producer_id, &rtp_capabilities)
    }

    async fn create_webrtc_transport(
        &self,
        options: &TransportOptions,
    ) -> Result<Box<dyn MediaTransport>, EngineError> {
        let mut transport_options = WebRtcTransportOptions::new(listen_infos(options)?);
        transport_options.enable_udp = options.enable_udp;
        transport_options.enable_tcp = options.enable_tcp;
        transport_options.prefer_udp = options.prefer_udp;
        transport_options.initial_available_outgoing_bitrate =
            options.initial_available_outgoing_bitrate;

        let transport = self
            .router
            .create_webrtc_transport(transport_options)
            .await
            .map_err(EngineError::request)?;

        Ok(Box::new(MediasoupTransport::new(transport)?))
    }
}
