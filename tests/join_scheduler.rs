//! Integration tests for channel membership and the join scheduler.

mod common;

use std::time::Duration;

use common::{eventually, next_event, session};
use tmichat::config::SessionConfig;
use tmichat::session::JOIN_POLL_INTERVAL;
use tmichat::transport::TransportError;
use tmichat::{SessionError, SessionEvent};
use tokio_util::sync::CancellationToken;

async fn connected(config: SessionConfig) -> (std::sync::Arc<common::MockTransport>, tmichat::Session) {
    let (transport, session) = session(config);
    let mut events = session.subscribe();
    session
        .connect(&CancellationToken::new())
        .await
        .expect("connect failed");
    next_event(&mut events, |e| matches!(e, SessionEvent::Connected { .. }))
        .await
        .expect("no Connected event");
    (transport, session)
}

#[tokio::test]
async fn test_queued_joins_follow_handshake_in_order() {
    let (transport, session) = session(SessionConfig::new("bot"));
    session.join_channel(["Alpha", "#Beta", "gamma"]);
    assert_eq!(session.pending_channels(), vec!["#Alpha", "#Beta", "#gamma"]);

    session
        .connect(&CancellationToken::new())
        .await
        .expect("connect failed");
    assert!(eventually(|| transport.sent_commands("JOIN").len() == 3).await);

    assert_eq!(
        transport.sent_commands("JOIN"),
        vec!["JOIN #alpha", "JOIN #beta", "JOIN #gamma"]
    );
    let sent = transport.sent();
    let last_cap = sent.iter().rposition(|l| l.starts_with("CAP ")).expect("no CAP");
    let first_join = sent.iter().position(|l| l.starts_with("JOIN ")).expect("no JOIN");
    assert!(last_cap < first_join);

    assert_eq!(session.joined_channels(), vec!["#alpha", "#beta", "#gamma"]);
    assert!(session.pending_channels().is_empty());
}

#[tokio::test]
async fn test_joins_wait_for_a_connection() {
    let (transport, session) = session(SessionConfig::new("bot"));
    session.join_channel(["Alpha"]);

    tokio::time::sleep(JOIN_POLL_INTERVAL + Duration::from_millis(100)).await;

    assert_eq!(session.pending_channels(), vec!["#Alpha"]);
    assert!(session.joined_channels().is_empty());
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_duplicate_joins_are_sent_twice() {
    let (transport, session) = connected(SessionConfig::new("bot")).await;

    session.join_channel(["#dup", "#DUP"]);
    assert!(eventually(|| transport.sent_commands("JOIN").len() == 2).await);

    assert_eq!(transport.sent_commands("JOIN"), vec!["JOIN #dup", "JOIN #dup"]);
    assert_eq!(session.joined_channels(), vec!["#dup"]);
}

#[tokio::test]
async fn test_part_removes_and_sends_in_order() {
    let (transport, session) = connected(SessionConfig::new("bot")).await;
    session.join_channel(["a", "b", "c"]);
    assert!(eventually(|| session.joined_channels().len() == 3).await);

    session
        .part_channel(["B", "#c", "never_joined"], &CancellationToken::new())
        .await
        .expect("part failed");

    assert_eq!(
        transport.sent_commands("PART"),
        vec!["PART #B", "PART #c", "PART #never_joined"]
    );
    assert_eq!(session.joined_channels(), vec!["#a"]);
}

#[tokio::test]
async fn test_part_while_disconnected_still_forgets_channel() {
    let (transport, session) = connected(SessionConfig::new("bot")).await;
    session.join_channel(["a"]);
    assert!(eventually(|| session.joined_channels() == vec!["#a"]).await);
    session
        .disconnect(&CancellationToken::new())
        .await
        .expect("disconnect failed");

    let err = session
        .part_channel(["a"], &CancellationToken::new())
        .await
        .expect_err("part without a connection should fail");
    assert!(matches!(
        err,
        SessionError::Transport(TransportError::NotConnected)
    ));
    assert!(session.joined_channels().is_empty());
    assert!(transport.sent_commands("PART").is_empty());
}

#[tokio::test]
async fn test_joined_channels_rejoin_after_reconnect() {
    let (transport, session) = connected(SessionConfig::new("bot")).await;
    let mut events = session.subscribe();
    session.join_channel(["zeta", "alpha"]);
    assert!(eventually(|| session.joined_channels().len() == 2).await);

    transport.drop_connection();
    next_event(&mut events, |e| matches!(e, SessionEvent::Disconnected { .. }))
        .await
        .expect("no Disconnected event");
    transport.clear_sent();

    session
        .connect(&CancellationToken::new())
        .await
        .expect("reconnect failed");
    assert!(eventually(|| transport.sent_commands("JOIN").len() == 2).await);

    assert_eq!(
        transport.sent_commands("JOIN"),
        vec!["JOIN #alpha", "JOIN #zeta"]
    );
    assert_eq!(session.joined_channels(), vec!["#alpha", "#zeta"]);
}

#[tokio::test]
async fn test_cleared_membership_is_not_rejoined() {
    let (transport, session) = connected(SessionConfig::new("bot")).await;
    session.join_channel(["alpha"]);
    assert!(eventually(|| session.joined_channels().len() == 1).await);
    session
        .disconnect(&CancellationToken::new())
        .await
        .expect("disconnect failed");

    session.clear_membership();
    transport.clear_sent();
    session
        .connect(&CancellationToken::new())
        .await
        .expect("reconnect failed");

    tokio::time::sleep(JOIN_POLL_INTERVAL * 2).await;
    assert!(transport.sent_commands("JOIN").is_empty());
    assert!(session.joined_channels().is_empty());
}

#[tokio::test]
async fn test_failed_join_is_reported_and_retried() {
    let (transport, session) = connected(SessionConfig::new("bot")).await;
    let mut events = session.subscribe();
    transport.fail_sends(true);

    session.join_channel(["flaky"]);
    let event = next_event(&mut events, |e| {
        matches!(e, SessionEvent::BackgroundFailure { .. })
    })
    .await
    .expect("no BackgroundFailure event");

    match event {
        SessionEvent::BackgroundFailure { operation, reason } => {
            assert_eq!(operation, "join");
            assert!(!reason.is_empty());
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(session.joined_channels().is_empty());
    assert!(eventually(|| session.pending_channels() == vec!["#flaky"]).await);

    transport.fail_sends(false);
    assert!(eventually(|| session.joined_channels() == vec!["#flaky"]).await);
    assert_eq!(transport.sent_commands("JOIN"), vec!["JOIN #flaky"]);
    assert!(session.pending_channels().is_empty());
}

#[tokio::test]
async fn test_failed_join_survives_reconnect() {
    let (transport, session) = connected(SessionConfig::new("bot")).await;
    let mut events = session.subscribe();
    transport.fail_sends(true);

    session.join_channel(["lost"]);
    next_event(&mut events, |e| {
        matches!(e, SessionEvent::BackgroundFailure { .. })
    })
    .await
    .expect("no BackgroundFailure event");

    transport.drop_connection();
    next_event(&mut events, |e| matches!(e, SessionEvent::Disconnected { .. }))
        .await
        .expect("no Disconnected event");
    transport.fail_sends(false);
    transport.clear_sent();

    session
        .connect(&CancellationToken::new())
        .await
        .expect("reconnect failed");
    assert!(eventually(|| transport.sent_commands("JOIN").len() == 1).await);

    assert_eq!(transport.sent_commands("JOIN"), vec!["JOIN #lost"]);
    assert_eq!(session.joined_channels(), vec!["#lost"]);
}

#[tokio::test]
async fn test_scheduler_stops_on_disconnect() {
    let (transport, session) = connected(SessionConfig::new("bot")).await;
    session
        .disconnect(&CancellationToken::new())
        .await
        .expect("disconnect failed");

    session.join_channel(["later"]);
    tokio::time::sleep(JOIN_POLL_INTERVAL * 2).await;

    assert_eq!(session.pending_channels(), vec!["#later"]);
    assert!(transport.sent_commands("JOIN").is_empty());
}
