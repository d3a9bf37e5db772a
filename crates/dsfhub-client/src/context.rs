//! Per-call deadline and cancellation

use crate::transport::TransportError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation applied to each call a client makes
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail a call that has not completed within `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Abort a call as soon as `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Drive `call` under this context. Cancellation wins over completion
    /// when both are ready, and an already-cancelled token never polls the call.
    pub async fn run<T, F>(&self, call: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout(deadline, call)
                    .await
                    .map_err(|_| TransportError::TimedOut(deadline))?,
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(TransportError::Cancelled),
            result = bounded => result,
        }
    }
}
