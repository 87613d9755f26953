use std::time::Duration;

use tokio::sync::watch;

use crate::error::ConverseError;
use crate::registry::SignalState;

/// A registered observation of one signal key.
///
/// Every waiter for a key holds a receiver on that key's shared channel, so
/// all of them - registered before or after the corresponding `signal` call -
/// observe the identical resolved value. Dropping a waiter, or timing out,
/// never affects the underlying entry or any other waiter.
pub struct Waiter<T> {
    pub(crate) key: String,
    pub(crate) rx: watch::Receiver<SignalState<T>>,
}

impl<T> Waiter<T>
where T: Clone
{
    /// The signal key this waiter observes
    pub fn key(&self) -> &str { &self.key }

    /// Suspend until the key resolves, returning the signaled payload.
    ///
    /// Resolves immediately when the key has already been signaled. If the
    /// entry is evicted while still pending, this future never settles; pair
    /// it with [`wait_timeout`](Self::wait_timeout) when that matters.
    pub async fn wait(mut self) -> Option<T> {
        // Clone the payload and release the watch borrow before any await so
        // the future stays `Send` (the borrow holds a non-`Send` lock guard).
        let resolved = self
            .rx
            .wait_for(|state| matches!(state, SignalState::Resolved(_)))
            .await
            .map(|state| match &*state {
                SignalState::Resolved(data) => data.clone(),
                // wait_for only yields states accepted by the predicate
                SignalState::Pending => unreachable!(),
            });
        match resolved {
            Ok(data) => data,
            // The entry was evicted while pending; nothing can resolve it anymore.
            Err(_) => std::future::pending().await,
        }
    }

    /// Like [`wait`](Self::wait), but fail with [`ConverseError::Timeout`]
    /// if `timeout` elapses first.
    ///
    /// A zero duration means no deadline. The race is local to this caller:
    /// an elapsed deadline leaves the registry entry untouched, and other
    /// waiters still observe the eventual value.
    pub async fn wait_timeout(self, timeout: Duration) -> Result<Option<T>, ConverseError> {
        if timeout.is_zero() {
            return Ok(self.wait().await);
        }
        let key = self.key.clone();
        match tokio::time::timeout(timeout, self.wait()).await {
            Ok(data) => Ok(data),
            Err(_) => Err(ConverseError::Timeout { key }),
        }
    }
}
