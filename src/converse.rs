use std::time::Duration;

use crate::config::ConverseConfig;
use crate::error::ConverseError;
use crate::registry::SignalRegistry;
use crate::topic::{TopicBus, TopicCallback};
use crate::waiter::Waiter;

/// Key used by the zero-argument signal/wait forms, typically as a
/// "system is ready" barrier between independently started components
pub const DEFAULT_KEY: &str = "__default__";

/// Process-local coordination between components that hold no references to
/// one another: one-shot named signals with late observation on one side,
/// synchronous publish/subscribe fan-out on the other.
///
/// `T` is the payload type carried by both signals and publications; pick one
/// per instance (an enum, or something like `serde_json::Value` for
/// free-form hosts). The two layers are independent: signal keys and topics
/// are disjoint namespaces, and only signals are bounded and replayable.
///
/// All operations are callable from multiple threads; `Converse` is intended
/// to be constructed once by the hosting lifecycle and shared (e.g. in an
/// `Arc`) with every component that coordinates through it.
pub struct Converse<T = ()> {
    registry: SignalRegistry<T>,
    topics: TopicBus<T>,
}

impl<T> Converse<T>
where T: Clone + Send + Sync + 'static
{
    /// Fails with [`ConverseError::InvalidConfiguration`] when
    /// `config.max_signals` is zero.
    pub fn new(config: ConverseConfig) -> Result<Self, ConverseError> {
        config.validate()?;
        Ok(Self { registry: SignalRegistry::new(config.max_signals), topics: TopicBus::new() })
    }

    /// Resolve `key` with `data`, waking every waiter registered for it.
    ///
    /// Signaling a key nobody waits for is fine: the value is retained and a
    /// later [`wait`](Self::wait) still observes it. Signaling an
    /// already-resolved key fails with [`ConverseError::DuplicateSignal`].
    pub fn signal(&self, key: &str, data: Option<T>) -> Result<(), ConverseError> {
        self.registry.signal(key, data)
    }

    /// [`signal`](Self::signal) on the reserved default key, with no payload
    pub fn signal_default(&self) -> Result<(), ConverseError> { self.registry.signal(DEFAULT_KEY, None) }

    /// Register an observation of `key` without suspending.
    ///
    /// The returned [`Waiter`] is the suspension point; registering first and
    /// waiting later is how a caller guarantees its entry exists before some
    /// other component signals.
    pub fn waiter(&self, key: &str) -> Waiter<T> { self.registry.waiter(key) }

    /// Suspend until `key` is signaled, returning its payload.
    ///
    /// Returns immediately when the key was already signaled. Never settles
    /// if the key's entry is evicted while pending - use
    /// [`wait_timeout`](Self::wait_timeout) when that liveness hazard matters.
    pub async fn wait(&self, key: &str) -> Option<T> { self.registry.waiter(key).wait().await }

    /// [`wait`](Self::wait) on the reserved default key
    pub async fn wait_default(&self) -> Option<T> { self.wait(DEFAULT_KEY).await }

    /// Suspend until `key` is signaled or `timeout` elapses, whichever comes
    /// first. A zero duration means no deadline.
    pub async fn wait_timeout(&self, key: &str, timeout: Duration) -> Result<Option<T>, ConverseError> {
        self.registry.waiter(key).wait_timeout(timeout).await
    }

    /// Invoke every subscriber of `topic` synchronously, in registration
    /// order, with `data` and one shared per-publication context.
    /// Publications are not replayed to later subscribers.
    pub fn publish(&self, topic: &str, data: T) { self.topics.publish(topic, data) }

    /// Append `callback` to `topic`'s subscriber list
    pub fn subscribe(&self, topic: &str, callback: TopicCallback<T>) { self.topics.subscribe(topic, callback) }

    /// Remove every occurrence of `callback` from `topic`, by `Arc` identity
    pub fn unsubscribe(&self, topic: &str, callback: &TopicCallback<T>) { self.topics.unsubscribe(topic, callback) }

    /// Number of signal entries currently retained
    pub fn signal_count(&self) -> usize { self.registry.len() }

    /// Number of subscribers currently registered for `topic`
    pub fn subscriber_count(&self, topic: &str) -> usize { self.topics.subscriber_count(topic) }
}

impl<T> Default for Converse<T>
where T: Clone + Send + Sync + 'static
{
    /// A converse with the default configuration (`max_signals = 1000`)
    fn default() -> Self {
        Self { registry: SignalRegistry::new(ConverseConfig::default().max_signals), topics: TopicBus::new() }
    }
}
