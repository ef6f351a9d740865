use tandem_client::{ClientError, NegotiationState};

use crate::utils::{Call, create_session_pair};

#[tokio::test]
async fn test_crossed_offers_are_both_dropped() {
    let (mut a, mut b) = create_session_pair();

    a.session.create_offer().await.unwrap();
    b.session.create_offer().await.unwrap();
    let offer_a = a.take_offer();
    let offer_b = b.take_offer();

    let at_b = b.session.handle_remote_offer(offer_a).await;
    let at_a = a.session.handle_remote_offer(offer_b).await;
    assert!(matches!(
        at_b,
        Err(ClientError::NegotiationStateConflict { .. })
    ));
    assert!(matches!(
        at_a,
        Err(ClientError::NegotiationStateConflict { .. })
    ));

    // Neither side answered: no second, interleaved cycle was started.
    a.assert_no_signal();
    b.assert_no_signal();
    assert!(!a.connection.calls().contains(&Call::CreateAnswer));
    assert!(!b.connection.calls().contains(&Call::CreateAnswer));
    assert_eq!(a.session.state(), NegotiationState::AwaitingAnswer);
    assert_eq!(b.session.state(), NegotiationState::AwaitingAnswer);
}

#[tokio::test]
async fn test_first_offer_wins() {
    let (mut a, mut b) = create_session_pair();

    a.session.create_offer().await.unwrap();
    let offer_a = a.take_offer();

    // B sees A's offer before starting its own: it answers instead.
    b.session.handle_remote_offer(offer_a).await.unwrap();
    let answer = b.take_answer();
    b.assert_no_signal();

    // A offering again before the answer lands is refused locally.
    assert!(a.session.create_offer().await.is_err());
    a.session.handle_remote_answer(answer).await.unwrap();

    assert_eq!(a.session.state(), NegotiationState::Stable);
    assert_eq!(b.session.state(), NegotiationState::Stable);
    let offers = a
        .connection
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::CreateOffer { .. }))
        .count();
    assert_eq!(offers, 1);
}
