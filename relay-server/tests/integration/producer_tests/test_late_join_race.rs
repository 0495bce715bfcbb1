use axum::extract::ws::Message;
use relay_core::{MediaKind, PeerId, SignalReply, SignalRequest};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::integration::{init_tracing, start_signaling};
use crate::utils::{MockEngine, dtls_parameters, vp8_rtp_parameters};

fn count_new_producer(rx: &mut mpsc::UnboundedReceiver<Message>) -> usize {
    let mut count = 0;
    while let Ok(msg) = rx.try_recv() {
        if let Message::Text(text) = msg {
            let frame: Value = serde_json::from_str(text.as_str()).unwrap();
            if frame["op"] == "newProducer" {
                count += 1;
            }
        }
    }
    count
}

#[tokio::test]
async fn test_produce_queued_before_join_notifies_once() {
    init_tracing();

    let engine = MockEngine::new();
    let service = start_signaling(&engine);
    let handle = service.coordinator().clone();

    let publisher = PeerId::new();
    let (publisher_tx, _publisher_rx) = mpsc::unbounded_channel();
    service.add_peer(publisher, publisher_tx);
    handle.connected(publisher).await.unwrap();

    handle
        .request(publisher, SignalRequest::CreateProducerTransport)
        .await
        .unwrap();
    let reply = handle
        .request(
            publisher,
            SignalRequest::ConnectProducerTransport {
                dtls_parameters: dtls_parameters(),
            },
        )
        .await;
    assert_eq!(reply, Ok(SignalReply::Ack));

    // The socket is registered before its connect notice is queued, and the
    // produce lands in between.
    let late = PeerId::new();
    let (late_tx, mut late_rx) = mpsc::unbounded_channel();
    service.add_peer(late, late_tx);

    let pending = handle
        .submit(
            publisher,
            SignalRequest::Produce {
                kind: MediaKind::Video,
                rtp_parameters: vp8_rtp_parameters(),
            },
        )
        .await
        .unwrap();
    handle.connected(late).await.unwrap();

    assert!(matches!(pending.await.unwrap(), Ok(SignalReply::Produced(_))));
    handle.snapshot().await.unwrap();

    assert_eq!(count_new_producer(&mut late_rx), 1);
}

#[tokio::test]
async fn test_peer_gone_before_join_gets_nothing() {
    init_tracing();

    let engine = MockEngine::new();
    let service = start_signaling(&engine);
    let handle = service.coordinator().clone();

    let peer = PeerId::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    service.add_peer(peer, tx);
    service.remove_peer(&peer);
    handle.connected(peer).await.unwrap();
    handle.snapshot().await.unwrap();

    assert_eq!(service.peer_count(), 0);
    assert!(rx.try_recv().is_err());
}
