use tandem_core::ServerMessage;
use tandem_core::utils::DEFAULT_STUN_ADDR;

use crate::integration::{create_test_relay, init_tracing};

#[tokio::test]
async fn test_welcome_and_ice_config() {
    init_tracing();

    let service = create_test_relay();
    let (id, mut rx) = service.connect();

    assert_eq!(rx.recv().await, Some(ServerMessage::Welcome { id }));

    let Some(ServerMessage::IceConfig { ice_servers }) = rx.recv().await else {
        panic!("Expected ice-config after welcome");
    };
    assert!(
        ice_servers
            .iter()
            .any(|s| s.urls.iter().any(|u| u == DEFAULT_STUN_ADDR))
    );
    assert!(service.is_connected(&id));
}

#[tokio::test]
async fn test_every_connection_gets_its_own_id() {
    init_tracing();

    let service = create_test_relay();
    let (first, _rx1) = service.connect();
    let (second, _rx2) = service.connect();

    assert_ne!(first, second);
}
