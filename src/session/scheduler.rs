//! Join scheduler: drains the pending queue one JOIN per iteration.
//!
//! While a backlog exists the loop sends back to back. When the queue is
//! empty, the transport is down or a send failed, it waits
//! [`JOIN_POLL_INTERVAL`] before looking again.
//! Flood control beyond one frame per iteration is the caller's concern.

use std::sync::Arc;
use std::time::Duration;

use tmi_proto::RawMessage;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info};

use super::Inner;
use super::task::TaskHandle;
use crate::telemetry::spans;

/// Sleep between checks when there is nothing to send.
pub const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(200);

pub(super) fn spawn(inner: Arc<Inner>) -> TaskHandle {
    let span = spans::scheduler(&inner.id);
    TaskHandle::spawn("join_scheduler", move |cancel| {
        run(inner, cancel).instrument(span)
    })
}

async fn run(inner: Arc<Inner>, cancel: CancellationToken) {
    debug!("Join scheduler started");
    while !cancel.is_cancelled() {
        if inner.transport.is_connected()
            && let Some(channel) = inner.membership.dequeue()
            && join(&inner, channel, &cancel).await
        {
            continue;
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(JOIN_POLL_INTERVAL) => {}
        }
    }
    debug!("Join scheduler stopped");
}

/// Send one JOIN. Returns whether the next channel may follow immediately.
///
/// A JOIN that was not written goes back to the front of the queue, so it is
/// retried on this connection or the next one.
async fn join(inner: &Inner, queued: String, cancel: &CancellationToken) -> bool {
    let channel = queued.to_lowercase();
    match inner.send(&RawMessage::join(&channel), cancel).await {
        Ok(()) => {
            inner.membership.mark_joined(&channel);
            info!(channel = %channel, "Joined channel");
            true
        }
        Err(e) => {
            inner.membership.requeue_front(queued);
            inner.report_failure("join", &e);
            false
        }
    }
}
