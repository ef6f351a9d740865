use std::time::Duration;
use tandem_client::{ConferenceConfig, Connectivity};

use crate::utils::{TestConference, join_count, participant};

#[tokio::test(start_paused = true)]
async fn test_recovery_within_grace_cancels_rejoin() {
    let mut conf = TestConference::start(ConferenceConfig::new("room1", "Alice"));
    conf.welcome().await;
    let bob = participant("Bob");
    conf.connect_to(&bob).await;
    conf.drain_outbound();

    let connection = conf.connector.latest(bob.id);
    for _ in 0..3 {
        connection.set_connectivity(Connectivity::TransientlyDisconnected);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        connection.set_connectivity(Connectivity::Connected);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(join_count(&conf.drain_outbound()), 0);
    assert!(!connection.is_closed());
}
