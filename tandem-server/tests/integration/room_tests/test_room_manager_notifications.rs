use tandem_core::{Participant, ParticipantId};

use crate::integration::{create_test_room_manager, init_tracing};
use crate::utils::Notification;

#[tokio::test]
async fn test_room_manager_notifications() {
    init_tracing();

    let (rooms, mut notification_rx, signaling) = create_test_room_manager();
    let alice = Participant::new(ParticipantId::new(), "Alice");
    let bob = Participant::new(ParticipantId::new(), "Bob");

    let existing = rooms.join("room1".into(), alice.clone()).await.unwrap();
    assert!(existing.is_empty());
    assert_eq!(
        notification_rx.recv().await,
        Some(Notification::ExistingUsers {
            to: alice.id,
            users: vec![]
        })
    );

    let existing = rooms.join("room1".into(), bob.clone()).await.unwrap();
    assert_eq!(existing, vec![alice.clone()]);

    rooms.disconnect(bob.id).await;
    assert_eq!(rooms.room_count().await, 1);

    assert_eq!(
        signaling.notifications_for(&alice.id).await,
        vec![
            Notification::ExistingUsers {
                to: alice.id,
                users: vec![]
            },
            Notification::UserConnected {
                to: alice.id,
                participant: bob.clone()
            },
            Notification::UserDisconnected {
                to: alice.id,
                participant: bob.clone()
            },
        ]
    );
    assert_eq!(
        signaling.notifications_for(&bob.id).await,
        vec![Notification::ExistingUsers {
            to: bob.id,
            users: vec![alice]
        }]
    );
}
