use tandem_client::{ClientError, Connectivity, NegotiationState};

use crate::utils::{Call, candidate, create_session_pair};

#[tokio::test]
async fn test_close_is_idempotent() {
    let (mut a, _b) = create_session_pair();

    a.session.close().await;
    a.session.close().await;

    assert_eq!(a.session.state(), NegotiationState::Closed);
    let closes = a
        .connection
        .calls()
        .iter()
        .filter(|c| **c == Call::Close)
        .count();
    assert_eq!(closes, 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_pending_work() {
    let (mut a, _b) = create_session_pair();
    a.session.create_offer().await.unwrap();
    a.session.renegotiate().await.unwrap();
    a.session.handle_remote_candidate(candidate(1)).await.unwrap();
    a.session.on_connectivity(Connectivity::TransientlyDisconnected);
    assert!(a.session.has_pending_grace());

    a.session.close().await;

    assert!(!a.session.has_deferred_offer());
    assert!(!a.session.has_pending_grace());
    assert_eq!(a.session.pending_candidates(), 0);
}

#[tokio::test]
async fn test_closed_session_refuses_work() {
    let (mut a, _b) = create_session_pair();
    a.session.close().await;

    assert!(matches!(
        a.session.create_offer().await,
        Err(ClientError::NegotiationStateConflict {
            state: NegotiationState::Closed,
            ..
        })
    ));
    assert!(matches!(
        a.session.renegotiate().await,
        Err(ClientError::SessionClosed)
    ));
    assert!(matches!(
        a.session.handle_remote_candidate(candidate(1)).await,
        Err(ClientError::SessionClosed)
    ));
    assert!(a.session.handle_remote_offer("offer".to_string()).await.is_err());
    a.assert_no_signal();
}
