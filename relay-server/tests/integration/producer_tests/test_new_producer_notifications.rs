use relay_core::MediaKind;

use crate::integration::{create_test_coordinator, init_tracing};

#[tokio::test]
async fn test_produce_notifies_every_other_peer_once() {
    init_tracing();

    let room = create_test_coordinator();
    let publisher = room.connect_peer().await;
    let viewer1 = room.connect_peer().await;
    let viewer2 = room.connect_peer().await;

    room.publish(publisher, MediaKind::Video).await;

    assert_eq!(room.signaling.new_producer_count(&publisher).await, 0);
    assert_eq!(room.signaling.new_producer_count(&viewer1).await, 1);
    assert_eq!(room.signaling.new_producer_count(&viewer2).await, 1);
}

#[tokio::test]
async fn test_late_joiner_is_told_about_existing_producer() {
    init_tracing();

    let room = create_test_coordinator();
    let publisher = room.connect_peer().await;
    room.publish(publisher, MediaKind::Audio).await;

    let late = room.connect_peer().await;
    room.settle().await;

    assert_eq!(room.signaling.new_producer_count(&late).await, 1);
    assert_eq!(room.signaling.new_producer_count(&publisher).await, 0);
}

#[tokio::test]
async fn test_no_notification_without_producer() {
    init_tracing();

    let room = create_test_coordinator();
    let peer = room.connect_peer().await;
    room.settle().await;

    assert!(room.signaling.messages_for(&peer).await.is_empty());
}

#[tokio::test]
async fn test_second_produce_replaces_the_first() {
    init_tracing();

    let room = create_test_coordinator();
    let publisher = room.connect_peer().await;
    let viewer = room.connect_peer().await;

    let first = room.publish(publisher, MediaKind::Audio).await;
    let second = room.produce(publisher, MediaKind::Video).await;

    assert_ne!(first, second);
    assert_eq!(room.signaling.new_producer_count(&viewer).await, 2);
    assert!(room.engine.released().contains(&first.to_string()));

    let snapshot = room.handle.snapshot().await.unwrap();
    let producer = snapshot.producer.unwrap();
    assert_eq!(producer.id, second);
    assert_eq!(producer.kind, MediaKind::Video);
}
