use crate::http::HttpError;
use crate::signaling::SignalingService;
use axum::extract::State;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use relay_core::{ClientMessage, PeerId, ServerMessage};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Upgrade `/server` to a signaling channel.
///
/// Each accepted socket gets a fresh server-assigned peer id.
pub async fn ws_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(service): State<SignalingService>,
) -> Result<impl IntoResponse, HttpError> {
    let ws = ws.map_err(|e| HttpError::BadRequest(e.body_text()))?;

    if service.coordinator().is_closed() {
        return Err(HttpError::Internal(
            "signaling coordinator is not running".to_string(),
        ));
    }

    let peer_id = PeerId::new();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, peer_id, service)))
}

async fn handle_socket(socket: WebSocket, peer_id: PeerId, service: SignalingService) {
    info!("New WebSocket connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(peer_id, tx);
    service.send_signal(peer_id, &ServerMessage::Welcome { peer_id });

    if let Err(e) = service.coordinator().connected(peer_id).await {
        error!("Coordinator died before {} could join: {}", peer_id, e);
        service.remove_peer(&peer_id);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(ClientMessage { id, request }) => {
                                if let Err(e) = service.dispatch(peer_id, id, request).await {
                                    error!("Coordinator died: {}", e);
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("Invalid request from {}: {}", peer_id, e);
                                service.send_signal(
                                    peer_id,
                                    &ServerMessage::InvalidRequest {
                                        message: e.to_string(),
                                    },
                                );
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&peer_id);
    if let Err(e) = service.coordinator().disconnected(peer_id).await {
        warn!("Could not report disconnect of {}: {}", peer_id, e);
    }
    info!("WebSocket disconnected: {}", peer_id);
}
