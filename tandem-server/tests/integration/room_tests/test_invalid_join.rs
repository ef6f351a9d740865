use tandem_core::ServerMessage;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_invalid_join_reports_to_sender_only() {
    init_tracing();

    let service = create_test_relay();
    let mut alice = TestPeer::connect(&service).await;
    let mut bob = TestPeer::connect(&service).await;
    alice.join(&service, "room1", "Alice").await;
    alice.recv().await;

    bob.join(&service, "room1", "").await;

    let ServerMessage::Error { message } = bob.recv().await else {
        panic!("Expected an error for the empty display name");
    };
    assert!(message.contains("display name"));
    alice.assert_silent();

    bob.join(&service, "", "Bob").await;
    assert!(matches!(bob.recv().await, ServerMessage::Error { .. }));

    assert_eq!(service.rooms().room_count().await, 1);
}

#[tokio::test]
async fn test_malformed_frame_gets_error() {
    init_tracing();

    let service = create_test_relay();
    let mut alice = TestPeer::connect(&service).await;

    service.handle_client_text(alice.id, "not json").await;
    assert!(matches!(alice.recv().await, ServerMessage::Error { .. }));

    service
        .handle_client_text(alice.id, r#"{"type":"join-room","payload":{"roomId":"r"}}"#)
        .await;
    assert!(matches!(alice.recv().await, ServerMessage::Error { .. }));
}
