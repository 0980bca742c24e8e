//! Integration tests for inbound dispatch and outbound observability.

mod common;

use std::time::Duration;

use common::{drain_events, eventually, next_event, session};
use tmichat::config::SessionConfig;
use tmichat::tmi_proto::{MessageId, TwitchCommand};
use tmichat::SessionEvent;
use tokio_util::sync::CancellationToken;

async fn connected() -> (std::sync::Arc<common::MockTransport>, tmichat::Session) {
    let (transport, session) = session(SessionConfig::new("bot"));
    let mut events = session.subscribe();
    session
        .connect(&CancellationToken::new())
        .await
        .expect("connect failed");
    next_event(&mut events, |e| matches!(e, SessionEvent::Connected { .. }))
        .await
        .expect("no Connected event");
    // handshake frames are published after Connected
    next_event(&mut events, |e| {
        matches!(e, SessionEvent::MessageSent(msg) if msg.params().last().map(String::as_str) == Some("twitch.tv/tags"))
    })
    .await
    .expect("handshake not published");
    transport.clear_sent();
    (transport, session)
}

#[tokio::test]
async fn test_ping_is_answered_with_echoed_params() {
    let (transport, _session) = connected().await;

    transport.receive("PING :tmi.twitch.tv\r\n");
    assert!(eventually(|| transport.sent_commands("PONG").len() == 1).await);

    transport.receive("PING x y\r\n");
    assert!(eventually(|| transport.sent_commands("PONG").len() == 2).await);

    assert_eq!(
        transport.sent_commands("PONG"),
        vec!["PONG tmi.twitch.tv", "PONG :x y"]
    );
}

#[tokio::test]
async fn test_ping_is_published_before_pong() {
    let (transport, session) = connected().await;
    let mut events = session.subscribe();

    transport.receive("PING :keepalive");

    let event = next_event(&mut events, |e| {
        matches!(e, SessionEvent::MessageReceived(_) | SessionEvent::MessageSent(_))
    })
    .await
    .expect("no message event");
    match event {
        SessionEvent::MessageReceived(msg) => assert!(msg.is_ping()),
        other => panic!("unexpected event: {other:?}"),
    }

    let sent = next_event(&mut events, |e| matches!(e, SessionEvent::MessageSent(_)))
        .await
        .expect("no MessageSent event");
    match sent {
        SessionEvent::MessageSent(msg) => {
            assert_eq!(msg.command(), "PONG");
            assert_eq!(msg.params(), ["keepalive"]);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_welcome_authorizes_once_per_reply() {
    let (transport, session) = connected().await;
    let mut events = session.subscribe();

    transport.receive(":tmi.twitch.tv 001 bot :Welcome, GLHF!\r\n:tmi.twitch.tv 002 bot :Your host is tmi.twitch.tv\r\n");

    let event = next_event(&mut events, |e| matches!(e, SessionEvent::Authorized(_)))
        .await
        .expect("no Authorized event");
    match event {
        SessionEvent::Authorized(msg) => {
            assert_eq!(msg.command(), "001");
            assert_eq!(msg.params().last().map(String::as_str), Some("Welcome, GLHF!"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(session.is_authorized());

    let rest = drain_events(&mut events, Duration::from_millis(100)).await;
    let authorized = rest
        .iter()
        .filter(|e| matches!(e, SessionEvent::Authorized(_)))
        .count();
    assert_eq!(authorized, 0);

    // every welcome re-raises it
    transport.receive(":tmi.twitch.tv 001 bot :Welcome, GLHF!");
    next_event(&mut events, |e| matches!(e, SessionEvent::Authorized(_)))
        .await
        .expect("second welcome not raised");
}

#[tokio::test]
async fn test_authorization_is_cleared_when_connection_drops() {
    let (transport, session) = connected().await;
    let mut events = session.subscribe();

    transport.receive(":tmi.twitch.tv 001 bot :Welcome, GLHF!");
    next_event(&mut events, |e| matches!(e, SessionEvent::Authorized(_)))
        .await
        .expect("no Authorized event");

    transport.drop_connection();
    next_event(&mut events, |e| matches!(e, SessionEvent::Disconnected { .. }))
        .await
        .expect("no Disconnected event");
    assert!(!session.is_authorized());
}

#[tokio::test]
async fn test_multi_line_frame_is_dispatched_in_order() {
    let (transport, session) = connected().await;
    let mut events = session.subscribe();

    transport.receive(concat!(
        "@badges=moderator/1;color=#1E90FF;display-name=Ronni;user-id=1337;id=b34ccfc7-4977-403a-8a94-33c6bac34fb8 ",
        ":ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas :Kappa Keepo Kappa\r\n",
        "\r\n",
        ":lonely-prefix\r\n",
        "@msg-id=raid;msg-param-viewerCount=15 :tmi.twitch.tv USERNOTICE #dallas\r\n",
        ":tmi.twitch.tv RECONNECT\r\n",
    ));

    let mut received = Vec::new();
    while received.len() < 3 {
        let event = next_event(&mut events, |e| matches!(e, SessionEvent::MessageReceived(_)))
            .await
            .expect("missing MessageReceived event");
        if let SessionEvent::MessageReceived(msg) = event {
            received.push(msg);
        }
    }

    let privmsg = &received[0];
    assert_eq!(privmsg.command(), "PRIVMSG");
    assert_eq!(privmsg.channel(), Some("#dallas"));
    assert_eq!(privmsg.text(), Some("Kappa Keepo Kappa"));
    assert_eq!(privmsg.display_name().as_deref(), Some("Ronni"));
    assert_eq!(privmsg.user_id(), Some(1337));
    assert_eq!(privmsg.color().map(|c| c.to_string()).as_deref(), Some("#1E90FF"));

    let raid = &received[1];
    assert_eq!(raid.msg_id(), Some(MessageId::Raid));
    assert_eq!(raid.msg_param_viewer_count(), Some(15));

    assert_eq!(received[2].twitch_command(), Some(TwitchCommand::Reconnect));
}

#[tokio::test]
async fn test_sent_frames_are_published() {
    let (transport, session) = session(SessionConfig::new("bot").with_capabilities(["twitch.tv/tags"]));
    let mut events = session.subscribe();
    session
        .connect(&CancellationToken::new())
        .await
        .expect("connect failed");

    let mut commands = Vec::new();
    while commands.len() < 2 {
        let event = next_event(&mut events, |e| matches!(e, SessionEvent::MessageSent(_)))
            .await
            .expect("missing MessageSent event");
        if let SessionEvent::MessageSent(msg) = event {
            commands.push(msg.to_string());
        }
    }
    assert_eq!(commands, vec!["NICK bot", "CAP REQ twitch.tv/tags"]);
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn test_failed_pong_is_reported() {
    let (transport, session) = connected().await;
    let mut events = session.subscribe();
    transport.fail_sends(true);

    transport.receive("PING :tmi.twitch.tv");

    let event = next_event(&mut events, |e| {
        matches!(e, SessionEvent::BackgroundFailure { .. })
    })
    .await
    .expect("no BackgroundFailure event");
    match event {
        SessionEvent::BackgroundFailure { operation, .. } => assert_eq!(operation, "pong"),
        other => panic!("unexpected event: {other:?}"),
    }

    // the pump keeps running
    transport.fail_sends(false);
    transport.receive("PING :again");
    assert!(eventually(|| transport.sent_commands("PONG") == vec!["PONG again"]).await);
}

#[tokio::test]
async fn test_say_and_send_message() {
    let (transport, session) = connected().await;

    session
        .say("Dallas", "hello world", &CancellationToken::new())
        .await
        .expect("say failed");
    session
        .send_message("PRIVMSG #dallas :raw line\r\n", &CancellationToken::new())
        .await
        .expect("send_message failed");

    assert_eq!(
        transport.sent(),
        vec!["PRIVMSG #Dallas :hello world", "PRIVMSG #dallas :raw line"]
    );
}

#[tokio::test]
async fn test_cancelled_send_is_not_written() {
    let (transport, session) = connected().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = session
        .say("dallas", "never", &cancel)
        .await
        .expect_err("cancelled send should fail");
    assert_eq!(err.error_code(), "cancelled");
    assert!(transport.sent().is_empty());
}
