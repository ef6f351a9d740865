use tandem_client::{ConferenceCommand, ConferenceEvent, Connectivity};
use tandem_core::{Participant, RoomId};
use tandem_server::{RelayConfig, spawn_relay};

use crate::integration::init_tracing;
use crate::utils::RelayConference;

#[tokio::test]
async fn test_two_participants_connect_and_part() {
    init_tracing();
    let service = spawn_relay(RelayConfig::default());

    let mut alice = RelayConference::join(&service, "room1", "Alice");
    let joined = alice
        .expect_event(|e| matches!(e, ConferenceEvent::Joined { .. }))
        .await;
    assert_eq!(
        joined,
        ConferenceEvent::Joined {
            local_id: alice.id,
            existing: vec![]
        }
    );

    let mut bob = RelayConference::join(&service, "room1", "Bob");
    let joined = bob
        .expect_event(|e| matches!(e, ConferenceEvent::Joined { .. }))
        .await;
    assert_eq!(
        joined,
        ConferenceEvent::Joined {
            local_id: bob.id,
            existing: vec![Participant::new(alice.id, "Alice")]
        }
    );
    let announced = alice
        .expect_event(|e| matches!(e, ConferenceEvent::ParticipantJoined(_)))
        .await;
    assert_eq!(
        announced,
        ConferenceEvent::ParticipantJoined(Participant::new(bob.id, "Bob"))
    );

    // Bob offers, Alice answers, both connections come up.
    let bob_id = bob.id;
    let alice_id = alice.id;
    alice
        .expect_event(|e| {
            *e == ConferenceEvent::ConnectivityChanged {
                participant_id: bob_id,
                connectivity: Connectivity::Connected,
            }
        })
        .await;
    bob.expect_event(|e| {
        *e == ConferenceEvent::ConnectivityChanged {
            participant_id: alice_id,
            connectivity: Connectivity::Connected,
        }
    })
    .await;

    bob.commands.send(ConferenceCommand::Leave).await.unwrap();
    bob.task.await.unwrap().unwrap();

    let cleared = alice
        .expect_event(|e| matches!(e, ConferenceEvent::RemoteMediaCleared { .. }))
        .await;
    let ConferenceEvent::RemoteMediaCleared {
        participant_id,
        tracks,
    } = cleared
    else {
        unreachable!();
    };
    assert_eq!(participant_id, bob_id);
    assert!(!tracks.is_empty());
    alice
        .expect_event(|e| {
            *e == ConferenceEvent::ParticipantLeft(Participant::new(bob_id, "Bob"))
        })
        .await;
    let connection = alice.connector.latest(bob_id);
    assert!(connection.is_closed());
    assert!(!connection.applied_candidates().is_empty());

    let members = service.rooms().participants(RoomId::from("room1")).await;
    assert_eq!(members, Some(vec![Participant::new(alice_id, "Alice")]));
}
