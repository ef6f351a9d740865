use tandem_core::{ClientMessage, ParticipantId, ServerMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{TestPeer, offer};

#[tokio::test]
async fn test_sender_is_stamped() {
    init_tracing();

    let service = create_test_relay();
    let alice = TestPeer::connect(&service).await;
    let mut bob = TestPeer::connect(&service).await;

    service
        .handle_client_message(
            alice.id,
            ClientMessage::Signal {
                to: bob.id,
                from: ParticipantId::new(),
                signal: offer("v=0"),
            },
        )
        .await;

    assert_eq!(
        bob.recv().await,
        ServerMessage::Signal {
            from: alice.id,
            signal: offer("v=0")
        }
    );
}
