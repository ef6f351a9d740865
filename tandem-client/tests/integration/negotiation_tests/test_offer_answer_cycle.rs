use tandem_client::{ClientError, NegotiationState, SdpKind};

use crate::integration::init_tracing;
use crate::utils::{Call, create_session_pair};

#[tokio::test]
async fn test_offer_answer_reaches_stable() {
    init_tracing();
    let (mut a, mut b) = create_session_pair();

    a.session.create_offer().await.unwrap();
    assert_eq!(a.session.state(), NegotiationState::AwaitingAnswer);
    let offer = a.take_offer();

    b.session.handle_remote_offer(offer.clone()).await.unwrap();
    assert_eq!(b.session.state(), NegotiationState::Stable);
    let answer = b.take_answer();

    a.session.handle_remote_answer(answer.clone()).await.unwrap();
    assert_eq!(a.session.state(), NegotiationState::Stable);

    assert_eq!(
        b.connection.calls(),
        vec![
            Call::SetRemoteDescription(SdpKind::Offer, offer),
            Call::CreateAnswer
        ]
    );
    assert_eq!(
        a.connection.calls(),
        vec![
            Call::CreateOffer { ice_restart: false },
            Call::SetRemoteDescription(SdpKind::Answer, answer)
        ]
    );
}

#[tokio::test]
async fn test_second_offer_rejected_before_stable() {
    let (mut a, mut b) = create_session_pair();

    a.session.create_offer().await.unwrap();
    let result = a.session.create_offer().await;
    assert!(matches!(
        result,
        Err(ClientError::NegotiationStateConflict {
            state: NegotiationState::AwaitingAnswer,
            ..
        })
    ));

    let offer = a.take_offer();
    a.assert_no_signal();

    b.session.handle_remote_offer(offer).await.unwrap();
    a.session
        .handle_remote_answer(b.take_answer())
        .await
        .unwrap();

    // Stable again, so the next offer is allowed.
    a.session.create_offer().await.unwrap();
    a.take_offer();
}

#[tokio::test]
async fn test_answer_in_wrong_state_is_dropped() {
    let (_a, mut b) = create_session_pair();

    let result = b.session.handle_remote_answer("late answer".to_string()).await;
    assert!(matches!(
        result,
        Err(ClientError::NegotiationStateConflict {
            state: NegotiationState::Idle,
            ..
        })
    ));
    assert_eq!(b.session.state(), NegotiationState::Idle);
    assert!(b.connection.calls().is_empty());
}

#[tokio::test]
async fn test_stale_answer_after_stable_is_dropped() {
    let (mut a, mut b) = create_session_pair();

    a.session.create_offer().await.unwrap();
    b.session.handle_remote_offer(a.take_offer()).await.unwrap();
    let answer = b.take_answer();
    a.session.handle_remote_answer(answer.clone()).await.unwrap();

    assert!(a.session.handle_remote_answer(answer).await.is_err());
    assert_eq!(a.session.state(), NegotiationState::Stable);
}

#[tokio::test]
async fn test_failed_offer_returns_to_idle() {
    let (mut a, _b) = create_session_pair();
    a.connection
        .fail_offers
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let result = a.session.create_offer().await;
    assert!(matches!(result, Err(ClientError::Connection(_))));
    assert_eq!(a.session.state(), NegotiationState::Idle);
    a.assert_no_signal();
}
