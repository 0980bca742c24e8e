//! tmichat - Twitch chat session client
//!
//! Connects, joins the configured channels and logs every message with its
//! decoded tags. Reconnects when the server asks to or drops the connection.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tmichat::config::validation::{validate, validate_session};
use tmichat::config::{Config, LogConfig, LogFormat};
use tmichat::telemetry::redacted;
use tmichat::tmi_proto::{TwitchCommand, TypedMessage};
use tmichat::transport::WebSocketTransport;
use tmichat::{Session, SessionError, SessionEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const INITIAL_RECONNECT_DELAY: Duration = Duration::from_secs(1);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // running without a config file joins nothing, anonymously
    let config = if config_path == DEFAULT_CONFIG_PATH && !Path::new(&config_path).exists() {
        let mut config = Config::default();
        config.override_token(std::env::var(tmichat::config::TOKEN_ENV).ok());
        config
    } else {
        Config::load(&config_path)
            .with_context(|| format!("failed to load config from {config_path}"))?
    };

    init_tracing(&config.log);

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(path = %config_path, code = e.error_code(), "{e}");
        }
        anyhow::bail!("invalid configuration ({} errors)", errors.len());
    }

    info!(
        nickname = %config.session.login(),
        endpoint = %config.session.endpoint,
        channels = config.channels.len(),
        anonymous = config.session.credential().is_none(),
        "Starting tmichat"
    );

    let transport = Arc::new(WebSocketTransport::new(&config.session.endpoint)?);
    let session = Session::new(transport, config.session.clone());
    let mut events = session.subscribe();

    spawn_reload_task(session.clone(), config_path)?;

    session.connect(&CancellationToken::new()).await?;
    session.join_channel(&config.channels);

    let mut backoff = INITIAL_RECONNECT_DELAY;
    loop {
        let event = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => event,
        };

        let reconnect = match event {
            Ok(event) => handle_event(event, &mut backoff),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event receiver lagged");
                false
            }
            Err(RecvError::Closed) => break,
        };

        if reconnect {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = reconnect_with_backoff(&session, &mut backoff) => {}
            }
        }
    }

    info!("Shutting down");
    match session.disconnect(&CancellationToken::new()).await {
        Ok(()) | Err(SessionError::AlreadyDisconnected) => {}
        Err(e) => warn!(error = %e, code = e.error_code(), "Disconnect failed"),
    }
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log.filter.as_deref().unwrap_or("info")));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Log one event. Returns whether the connection should be re-established.
fn handle_event(event: SessionEvent, backoff: &mut Duration) -> bool {
    match event {
        SessionEvent::Connected { url } => debug!(url = %url, "Handshake sent"),
        SessionEvent::Authorized(msg) => {
            *backoff = INITIAL_RECONNECT_DELAY;
            info!(welcome = msg.params().last().map(String::as_str).unwrap_or_default(), "Logged in");
        }
        SessionEvent::StateChanged { current, previous } => {
            debug!(%current, %previous, "Connection state changed");
        }
        SessionEvent::MessageReceived(msg) => {
            if msg.twitch_command() == Some(TwitchCommand::Reconnect) {
                info!("Server requested reconnect");
                return true;
            }
            log_message(&msg);
        }
        SessionEvent::MessageSent(msg) => debug!(line = %redacted(msg.raw()), "Sent"),
        SessionEvent::BackgroundFailure { operation, reason } => {
            warn!(operation, reason = %reason, "Background operation failed");
        }
        SessionEvent::Disconnected { url } => {
            warn!(url = %url, "Connection lost");
            return true;
        }
    }
    false
}

fn log_message(msg: &TypedMessage) {
    let channel = msg.channel().unwrap_or_default();
    match msg.command() {
        "PRIVMSG" => {
            let display_name = msg.display_name();
            let badges: Vec<String> = msg
                .badges()
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect();
            info!(
                channel,
                user = display_name.as_deref().or(msg.sender()).unwrap_or_default(),
                user_id = ?msg.user_id(),
                badges = ?badges,
                color = ?msg.color().map(|c| c.to_string()),
                bits = ?msg.bits(),
                reply_to = ?msg.reply_parent_user_login(),
                text = msg.text().unwrap_or_default(),
                "Message"
            );
        }
        "USERNOTICE" => {
            let system_msg = msg.system_msg().unwrap_or_default();
            info!(
                channel,
                msg_id = ?msg.msg_id(),
                login = ?msg.login(),
                system_msg = %system_msg,
                text = msg.text().unwrap_or_default(),
                "User notice"
            );
        }
        "NOTICE" => info!(
            channel,
            msg_id = ?msg.msg_id(),
            text = msg.text().unwrap_or_default(),
            "Notice"
        ),
        "CLEARCHAT" => info!(
            channel,
            target_user_id = ?msg.target_user_id(),
            ban_duration_secs = ?msg.ban_duration().map(|d| d.as_secs()),
            "Chat cleared"
        ),
        "CLEARMSG" => info!(
            channel,
            login = ?msg.login(),
            target_msg_id = ?msg.target_msg_id(),
            "Message deleted"
        ),
        "ROOMSTATE" => info!(
            channel,
            room_id = ?msg.room_id(),
            emote_only = ?msg.emote_only(),
            followers_only = ?msg.followers_only(),
            slow = ?msg.slow(),
            subs_only = ?msg.subs_only(),
            "Room state"
        ),
        _ => debug!(line = %msg, "Received"),
    }
}

/// Drop whatever is left of the connection and connect again, doubling the
/// delay after each failed attempt.
async fn reconnect_with_backoff(session: &Session, backoff: &mut Duration) {
    if let Err(e) = session.disconnect(&CancellationToken::new()).await
        && !matches!(e, SessionError::AlreadyDisconnected)
    {
        warn!(error = %e, code = e.error_code(), "Disconnect before reconnect failed");
    }

    loop {
        info!(delay_ms = backoff.as_millis() as u64, "Reconnecting");
        tokio::time::sleep(*backoff).await;
        *backoff = (*backoff * 2).min(MAX_RECONNECT_DELAY);

        match session.connect(&CancellationToken::new()).await {
            Ok(()) => return,
            Err(e) => warn!(error = %e, code = e.error_code(), "Reconnect failed"),
        }
    }
}

/// Reload the session config on SIGHUP; applied on the next connect.
#[cfg(unix)]
fn spawn_reload_task(session: Session, path: String) -> anyhow::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!(path = %path, "SIGHUP received, reloading config");
            let config = match Config::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    warn!(error = %e, code = e.error_code(), "Config reload failed");
                    continue;
                }
            };
            if let Err(errors) = validate_session(&config.session) {
                for e in &errors {
                    warn!(code = e.error_code(), "{e}");
                }
                continue;
            }
            if config.session.endpoint != session.config().endpoint {
                warn!("Endpoint changes require a restart; keeping the current endpoint");
            }
            session.reload_config(config.session);
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn spawn_reload_task(_session: Session, _path: String) -> anyhow::Result<()> {
    Ok(())
}
