use anyhow::Context;
use clap::Parser;
use relay_server::config::Config;
use relay_server::engine::mediasoup::{MediasoupEngine, media_codecs};
use relay_server::supervisor::await_worker_death;
use relay_server::{COMMAND_BUFFER, Coordinator, SignalingService, coordinator_channel, http};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::parse();
    config.validate()?;

    let (engine, worker_death) = MediasoupEngine::start(config.worker_options(), media_codecs())
        .await
        .context("failed to start media engine")?;

    let (handle, command_rx) = coordinator_channel(COMMAND_BUFFER);
    let signaling = SignalingService::new(handle);
    let coordinator = Coordinator::new(
        engine.router(),
        config.transport_options(),
        command_rx,
        Arc::new(signaling.clone()),
    );
    tokio::spawn(coordinator.run());

    let app = http::router(signaling, &config.static_dir);
    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Relay listening on http://{}", addr);

    tokio::select! {
        res = axum::serve(listener, app).into_future() => res.context("HTTP server failed")?,
        death = await_worker_death(worker_death, config.worker_death_grace()) => {
            error!("Shutting down after worker {} died", death.worker_id);
            std::process::exit(1);
        }
    }

    Ok(())
}
