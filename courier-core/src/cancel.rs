//! Cooperative cancellation.
//!
//! A [`CancelToken`] is a one-shot broadcast signal: the holder of the paired
//! [`CancelSource`] settles it exactly once with a caller-supplied reason, and
//! every clone of the token observes the transition. The dispatcher checks the
//! token once at pipeline entry ([`CancelToken::throw_if_requested`]) and the
//! transport subscribes ([`CancelToken::cancelled`]) so it can abort in-flight
//! I/O; cancellation is never polled between interceptor links.

use std::fmt;

use tokio::sync::watch;

use crate::error::{Error, Result};

/// Caller-supplied cancellation reason, carried verbatim into
/// [`Error::Cancelled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelReason(String);

impl CancelReason {
    /// Creates a reason from any string-like value.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Returns the reason text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CancelReason {
    fn from(reason: &str) -> Self {
        Self::new(reason)
    }
}

impl From<String> for CancelReason {
    fn from(reason: String) -> Self {
        Self::new(reason)
    }
}

/// The cancel capability paired with a [`CancelToken`].
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<Option<CancelReason>>,
}

impl CancelSource {
    /// Settles the token with `reason`.
    ///
    /// The transition is monotonic: the first call wins and every later call
    /// is a no-op, so a token can never be re-cancelled with a new reason.
    pub fn cancel(&self, reason: impl Into<CancelReason>) {
        let reason = reason.into();
        self.tx.send_if_modified(|state| {
            if state.is_some() {
                return false;
            }
            *state = Some(reason.clone());
            true
        });
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.tx.borrow().is_some()
    }
}

/// One-shot cooperative cancellation signal.
///
/// Cheap to clone; one token may be shared across any number of concurrent
/// requests, and settling it cancels all of them at their respective pending
/// stages.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<Option<CancelReason>>,
}

impl CancelToken {
    /// Creates a token together with the source that can settle it.
    #[must_use]
    pub fn source() -> (CancelSource, CancelToken) {
        let (tx, rx) = watch::channel(None);
        (CancelSource { tx }, CancelToken { rx })
    }

    /// Executor-style construction: the closure receives the
    /// [`CancelSource`] and the token is returned to the caller.
    pub fn with_executor(executor: impl FnOnce(CancelSource)) -> Self {
        let (source, token) = Self::source();
        executor(source);
        token
    }

    /// Returns `true` once the token is settled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Returns the cancellation reason, if the token is settled.
    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        self.rx.borrow().clone()
    }

    /// Fails with [`Error::Cancelled`] iff the token is already settled.
    ///
    /// Called once at the start of the network step, before any I/O.
    pub fn throw_if_requested(&self) -> Result<()> {
        match self.rx.borrow().as_ref() {
            Some(reason) => Err(Error::Cancelled(reason.clone())),
            None => Ok(()),
        }
    }

    /// Resolves with the reason the moment the token settles.
    ///
    /// If the source is dropped without cancelling, the future stays pending
    /// forever; the transport races it against the network exchange, so the
    /// exchange simply wins.
    pub async fn cancelled(&self) -> CancelReason {
        let mut rx = self.rx.clone();
        let reason = match rx.wait_for(Option::is_some).await {
            Ok(state) => state.as_ref().cloned(),
            Err(_) => None,
        };
        match reason {
            Some(reason) => reason,
            None => std::future::pending().await,
        }
    }
}
