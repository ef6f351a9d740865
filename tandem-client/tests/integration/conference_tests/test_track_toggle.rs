use std::time::Duration;

use tandem_client::{ConferenceCommand, ConferenceConfig, ConferenceEvent, MediaKind};
use tandem_core::{ClientMessage, ServerMessage};

use crate::utils::{Call, TestConference, participant};

fn toggles(conf: &TestConference, id: tandem_core::ParticipantId) -> Vec<Call> {
    conf.connector
        .latest(id)
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::SetTrackEnabled(..)))
        .collect()
}

#[tokio::test]
async fn test_mute_reaches_every_connection_without_offer() {
    let mut conf = TestConference::start(ConferenceConfig::new("room1", "Alice"));
    conf.welcome().await;
    let bob = participant("Bob");
    let carol = participant("Carol");
    conf.deliver(ServerMessage::ExistingUsers {
        users: vec![bob.clone(), carol.clone()],
    });
    conf.next_negotiation().await;
    conf.next_negotiation().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    conf.drain_outbound();

    conf.commands
        .send(ConferenceCommand::SetAudioEnabled(false))
        .await
        .unwrap();
    conf.commands
        .send(ConferenceCommand::SetAudioEnabled(false))
        .await
        .unwrap();
    conf.commands
        .send(ConferenceCommand::SetVideoEnabled(false))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    for id in [bob.id, carol.id] {
        assert_eq!(
            toggles(&conf, id),
            vec![
                Call::SetTrackEnabled(MediaKind::Audio, false),
                Call::SetTrackEnabled(MediaKind::Video, false),
            ]
        );
        let offers = conf
            .connector
            .latest(id)
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateOffer { .. }))
            .count();
        assert_eq!(offers, 1);
    }
    assert!(
        !conf
            .drain_outbound()
            .iter()
            .any(|m| matches!(m, ClientMessage::Signal { .. }))
    );
}

#[tokio::test]
async fn test_newcomer_inherits_mute() {
    let mut conf = TestConference::start(ConferenceConfig::new("room1", "Alice"));
    conf.welcome().await;
    conf.deliver(ServerMessage::ExistingUsers { users: vec![] });

    conf.commands
        .send(ConferenceCommand::SetAudioEnabled(false))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let dave = participant("Dave");
    conf.deliver(ServerMessage::UserConnected(dave.clone()));
    conf.expect_event(|e| *e == ConferenceEvent::ParticipantJoined(dave.clone()))
        .await;

    let calls = conf.connector.latest(dave.id).calls();
    assert_eq!(
        calls,
        vec![
            Call::SetLocalMedia(vec!["mic".to_string(), "camera".to_string()]),
            Call::SetTrackEnabled(MediaKind::Audio, false),
        ]
    );

    conf.commands
        .send(ConferenceCommand::SetAudioEnabled(true))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(
        toggles(&conf, dave.id).last(),
        Some(&Call::SetTrackEnabled(MediaKind::Audio, true))
    );
}
