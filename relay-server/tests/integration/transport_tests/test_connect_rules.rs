use relay_core::{SignalError, SignalRequest};

use crate::integration::{create_test_coordinator, init_tracing};
use crate::utils::{EngineCall, dtls_parameters};

#[tokio::test]
async fn test_double_connect_is_rejected() {
    init_tracing();

    let room = create_test_coordinator();
    let peer = room.connect_peer().await;
    room.connect_producer_transport(peer).await;

    let second = room
        .handle
        .request(
            peer,
            SignalRequest::ConnectProducerTransport {
                dtls_parameters: dtls_parameters(),
            },
        )
        .await;

    assert!(matches!(
        second,
        Err(SignalError::PreconditionViolation { .. })
    ));
    assert_eq!(
        room.engine
            .count(|call| matches!(call, EngineCall::Connect(_))),
        1
    );
}

#[tokio::test]
async fn test_connect_without_transport_is_rejected() {
    init_tracing();

    let room = create_test_coordinator();
    let peer = room.connect_peer().await;

    let reply = room
        .handle
        .request(
            peer,
            SignalRequest::ConnectConsumerTransport {
                dtls_parameters: dtls_parameters(),
            },
        )
        .await;

    assert!(matches!(reply, Err(SignalError::PreconditionViolation { .. })));
    assert!(room.engine.calls().is_empty());
}

#[tokio::test]
async fn test_cannot_connect_another_peers_transport() {
    init_tracing();

    let room = create_test_coordinator();
    let owner = room.connect_peer().await;
    let intruder = room.connect_peer().await;

    room.create_transport(owner, SignalRequest::CreateProducerTransport)
        .await;

    let reply = room
        .handle
        .request(
            intruder,
            SignalRequest::ConnectProducerTransport {
                dtls_parameters: dtls_parameters(),
            },
        )
        .await;

    assert!(matches!(reply, Err(SignalError::PreconditionViolation { .. })));
    assert_eq!(
        room.engine
            .count(|call| matches!(call, EngineCall::Connect(_))),
        0
    );
}
