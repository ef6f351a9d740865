use tandem_core::{ParticipantId, SignalEnvelope};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{TestPeer, offer};

#[tokio::test]
async fn test_unroutable_signal_dropped() {
    init_tracing();

    let service = create_test_relay();
    let mut alice = TestPeer::connect(&service).await;

    let delivered = service.route(SignalEnvelope::new(
        alice.id,
        ParticipantId::new(),
        offer("v=0"),
    ));
    assert!(!delivered);

    alice.signal(&service, ParticipantId::new(), offer("v=0")).await;
    alice.assert_silent();
}

#[tokio::test]
async fn test_signal_to_departed_peer_is_dropped() {
    init_tracing();

    let service = create_test_relay();
    let mut alice = TestPeer::connect(&service).await;
    let bob = TestPeer::connect(&service).await;

    service.disconnect(bob.id).await;

    assert!(!service.route(SignalEnvelope::new(alice.id, bob.id, offer("v=0"))));
    alice.assert_silent();
}
