use relay_core::{ConsumerType, MediaKind, ProducerId, SignalReply, SignalRequest};

use crate::integration::{create_test_coordinator, init_tracing};
use crate::utils::{full_capabilities, router_capabilities};

#[tokio::test]
async fn test_publish_then_subscribe() {
    init_tracing();

    let room = create_test_coordinator();

    let a = room.connect_peer().await;
    let caps = room
        .handle
        .request(a, SignalRequest::GetRouterRtpCapabilities)
        .await;
    assert_eq!(caps, Ok(SignalReply::RtpCapabilities(router_capabilities())));

    let producer_id = room.publish(a, MediaKind::Video).await;
    assert_eq!(producer_id, ProducerId::from("prod-1"));

    let b = room.connect_peer().await;
    room.settle().await;
    assert_eq!(room.signaling.new_producer_count(&b).await, 1);

    room.connect_consumer_transport(b).await;
    let params = room.consume(b, full_capabilities()).await;

    assert_eq!(params.producer_id, producer_id);
    assert_eq!(params.id.to_string(), "cons-1");
    assert_eq!(params.kind, MediaKind::Video);
    assert_eq!(params.consumer_type, ConsumerType::Simple);
    assert!(params.producer_paused);

    let resumed = room.handle.request(b, SignalRequest::Resume).await;
    assert_eq!(resumed, Ok(SignalReply::Ack));

    assert_eq!(room.signaling.new_producer_count(&a).await, 0);
}
