//! Future returned by an awaited waterfall publish.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::EmitterError;

/// Resolves when a waterfall publish completes.
///
/// Yields `Ok(())` when every listener resolved its continuation, the first
/// step error otherwise, or [`EmitterError::Stalled`] when the waterfall can
/// no longer complete because every outstanding continuation was dropped.
///
/// The waterfall runs whether or not this future is polled.
#[derive(Debug)]
#[must_use = "dropping the future does not cancel the waterfall, only its result"]
pub struct PendingPublish {
    event: String,
    rx: oneshot::Receiver<Option<anyhow::Error>>,
}

impl PendingPublish {
    pub(crate) fn channel(event: &str) -> (oneshot::Sender<Option<anyhow::Error>>, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                event: event.to_string(),
                rx,
            },
        )
    }

    /// The event being published.
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl Future for PendingPublish {
    type Output = anyhow::Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(None)) => Poll::Ready(Ok(())),
            Poll::Ready(Ok(Some(error))) => Poll::Ready(Err(error)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(EmitterError::Stalled {
                event: self.event.clone(),
            }
            .into())),
        }
    }
}
