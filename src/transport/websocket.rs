//! WebSocket transport over tokio-tungstenite.
//!
//! The socket is split: a reader task forwards text frames as
//! `MessageReceived` and ends the connection on close or error, while the
//! write half sits behind an async mutex shared by every sender.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tmi_proto::{build_message, RawMessage};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    CloseMode, ConnectionState, Observers, Subscription, SubscriptionId, Transport,
    TransportError, TransportEvent,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

/// State shared with the reader task.
struct Shared {
    url: String,
    state: Mutex<ConnectionState>,
    observers: Observers,
}

impl Shared {
    /// Move to `next`, emitting `StateChanged` if it differs.
    fn transition(&self, next: ConnectionState) {
        let mut state = self.state.lock();
        let previous = std::mem::replace(&mut *state, next);
        if previous != next {
            self.observers.emit(TransportEvent::StateChanged {
                current: next,
                previous,
            });
        }
    }

    /// Disconnected -> Connecting, or `AlreadyOpen`.
    fn begin_connect(&self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if *state != ConnectionState::Disconnected {
            return Err(TransportError::AlreadyOpen);
        }
        *state = ConnectionState::Connecting;
        self.observers.emit(TransportEvent::StateChanged {
            current: ConnectionState::Connecting,
            previous: ConnectionState::Disconnected,
        });
        Ok(())
    }

    /// Emits `Disconnected` at most once per connection.
    fn mark_disconnected(&self) {
        let mut state = self.state.lock();
        if *state == ConnectionState::Disconnected {
            return;
        }
        let previous = std::mem::replace(&mut *state, ConnectionState::Disconnected);
        self.observers.emit(TransportEvent::StateChanged {
            current: ConnectionState::Disconnected,
            previous,
        });
        self.observers.emit(TransportEvent::Disconnected {
            url: self.url.clone(),
        });
    }
}

struct Reader {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// A `ws://` or `wss://` connection (TLS via rustls with native roots).
pub struct WebSocketTransport {
    shared: Arc<Shared>,
    writer: tokio::sync::Mutex<Option<WsSink>>,
    reader: Mutex<Option<Reader>>,
}

impl WebSocketTransport {
    /// Create a transport for `url`. Nothing is connected until `open`.
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        let url = url.into();
        let supported = url.split_once("://").is_some_and(|(scheme, _)| {
            scheme.eq_ignore_ascii_case("ws") || scheme.eq_ignore_ascii_case("wss")
        });
        if !supported {
            return Err(TransportError::InvalidUrl(url));
        }

        Ok(Self {
            shared: Arc::new(Shared {
                url,
                state: Mutex::new(ConnectionState::Disconnected),
                observers: Observers::new(),
            }),
            writer: tokio::sync::Mutex::new(None),
            reader: Mutex::new(None),
        })
    }

    async fn stop_reader(&self) {
        let reader = self.reader.lock().take();
        if let Some(Reader { cancel, handle }) = reader {
            cancel.cancel();
            if let Err(e) = handle.await
                && e.is_panic()
            {
                warn!(url = %self.shared.url, "WebSocket reader task panicked");
            }
        }
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    fn url(&self) -> &str {
        &self.shared.url
    }

    fn state(&self) -> ConnectionState {
        *self.shared.state.lock()
    }

    fn subscribe(&self) -> Subscription {
        self.shared.observers.subscribe()
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.shared.observers.unsubscribe(id);
    }

    async fn open(&self, cancel: &CancellationToken) -> Result<(), TransportError> {
        self.shared.begin_connect()?;
        // a reader left over from a dropped connection has already finished
        self.stop_reader().await;

        debug!(url = %self.shared.url, "Opening WebSocket");
        let connected = tokio::select! {
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = connect_async(self.shared.url.as_str()) => result.map_err(TransportError::from),
        };
        let stream = match connected {
            Ok((stream, _response)) => stream,
            Err(e) => {
                self.shared.transition(ConnectionState::Disconnected);
                return Err(e);
            }
        };

        let (sink, stream) = stream.split();
        *self.writer.lock().await = Some(sink);

        self.shared.transition(ConnectionState::Connected);
        info!(url = %self.shared.url, "WebSocket connected");
        self.shared.observers.emit(TransportEvent::Connected {
            url: self.shared.url.clone(),
        });

        let reader_cancel = CancellationToken::new();
        let handle = tokio::spawn(read_loop(
            Arc::clone(&self.shared),
            stream,
            reader_cancel.clone(),
        ));
        *self.reader.lock() = Some(Reader {
            cancel: reader_cancel,
            handle,
        });
        Ok(())
    }

    async fn close(
        &self,
        mode: CloseMode,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        if self.state() == ConnectionState::Disconnected {
            return Err(TransportError::NotConnected);
        }
        self.stop_reader().await;

        let mut writer = tokio::select! {
            _ = cancel.cancelled() => {
                self.shared.mark_disconnected();
                return Err(TransportError::Cancelled);
            }
            writer = self.writer.lock() => writer,
        };

        if let Some(mut sink) = writer.take() {
            if mode == CloseMode::Graceful {
                let quit = build_message(&RawMessage::quit(), false);
                if let Err(e) = sink.send(WsMessage::Text(quit)).await {
                    debug!(error = %e, "QUIT not delivered");
                }
            }
            if let Err(e) = sink.close().await {
                debug!(error = %e, "WebSocket close handshake failed");
            }
        }
        drop(writer);

        self.shared.mark_disconnected();
        info!(url = %self.shared.url, ?mode, "WebSocket closed");
        Ok(())
    }

    async fn send(&self, frame: &str, cancel: &CancellationToken) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }

        // cancellation is honored while queued for the writer, never mid-write
        let mut writer = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            writer = self.writer.lock() => writer,
        };
        let sink = writer.as_mut().ok_or(TransportError::NotConnected)?;
        sink.send(WsMessage::Text(frame.to_owned())).await?;

        self.shared
            .observers
            .emit(TransportEvent::MessageSent(frame.as_bytes().to_vec()));
        Ok(())
    }
}

async fn read_loop(shared: Arc<Shared>, mut stream: SplitStream<WsStream>, cancel: CancellationToken) {
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => return,
            frame = stream.next() => frame,
        };

        match frame {
            Some(Ok(WsMessage::Text(text))) => {
                shared.observers.emit(TransportEvent::MessageReceived(text));
            }
            Some(Ok(WsMessage::Binary(_))) => {
                warn!("Ignoring binary WebSocket frame (chat is text-only)");
            }
            Some(Ok(WsMessage::Close(close))) => {
                info!(url = %shared.url, reason = ?close, "Server closed the connection");
                break;
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!(url = %shared.url, error = %e, "WebSocket read failed");
                break;
            }
            None => break,
        }
    }
    shared.mark_disconnected();
}
