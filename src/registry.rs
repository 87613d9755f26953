use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::watch;
use tracing::debug;

use crate::error::ConverseError;
use crate::waiter::Waiter;

/// Resolution state of a single signal key.
///
/// A key resolves at most once; `Resolved(None)` is a signal fired without a
/// payload, which is distinct from not having fired at all.
#[derive(Clone)]
pub(crate) enum SignalState<T> {
    Pending,
    Resolved(Option<T>),
}

struct SignalEntry<T> {
    /// Creation time, used only to pick the eviction victim (oldest first)
    timestamp: Instant,
    /// Tie-break for entries created within the clock's resolution
    seq: u64,
    /// Durable record of resolution. Every waiter holds a receiver on this
    /// channel, so waiters registered before or after the signal observe the
    /// identical value.
    tx: watch::Sender<SignalState<T>>,
}

impl<T> SignalEntry<T> {
    fn is_resolved(&self) -> bool { matches!(&*self.tx.borrow(), SignalState::Resolved(_)) }
}

/// Bounded mapping from key to signal state.
///
/// Entries are created on first `signal` or first `waiter` of a key and are
/// removed only by eviction: when the registry is full and a new key arrives,
/// the oldest entry is dropped. Dropping a still-pending entry orphans any
/// waiter built on it - that waiter never settles unless its caller raced a
/// timeout. Callers that need guaranteed delivery must either raise
/// `max_signals` or always wait with a timeout.
pub struct SignalRegistry<T> {
    entries: Mutex<HashMap<String, SignalEntry<T>>>,
    next_seq: AtomicU64,
    max_signals: usize,
}

impl<T> SignalRegistry<T> {
    /// `max_signals` must already be validated (>= 1) by the configuration layer
    pub fn new(max_signals: usize) -> Self {
        Self { entries: Mutex::new(HashMap::new()), next_seq: AtomicU64::new(0), max_signals }
    }

    /// Resolve `key` with `data`, or pre-populate it so a later waiter still
    /// observes the value.
    ///
    /// Fails with [`ConverseError::DuplicateSignal`] if `key` has already been
    /// resolved; a key is signalable at most once while its entry is retained.
    /// After eviction the key behaves as new and may be signaled again.
    pub fn signal(&self, key: &str, data: Option<T>) -> Result<(), ConverseError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) => {
                if entry.is_resolved() {
                    return Err(ConverseError::DuplicateSignal { key: key.to_owned() });
                }
                debug!(key, "resolving pending signal");
                entry.tx.send_replace(SignalState::Resolved(data));
                Ok(())
            }
            None => {
                debug!(key, "recording signal with no waiters");
                self.insert(&mut entries, key, SignalState::Resolved(data));
                Ok(())
            }
        }
    }

    /// Register an observation of `key`, creating a fresh pending entry when
    /// the key is absent. All waiters for the same key share one resolution.
    pub fn waiter(&self, key: &str) -> Waiter<T> {
        let mut entries = self.entries.lock().unwrap();
        let rx = match entries.get(key) {
            Some(entry) => entry.tx.subscribe(),
            None => {
                debug!(key, "creating pending signal entry");
                self.insert(&mut entries, key, SignalState::Pending)
            }
        };
        Waiter { key: key.to_owned(), rx }
    }

    /// Number of entries currently retained
    pub fn len(&self) -> usize { self.entries.lock().unwrap().len() }

    pub fn is_empty(&self) -> bool { self.entries.lock().unwrap().is_empty() }

    /// Insert a fresh entry for `key`, evicting the oldest entry first when
    /// the registry is full. `key` must not be present.
    fn insert(&self, entries: &mut HashMap<String, SignalEntry<T>>, key: &str, state: SignalState<T>) -> watch::Receiver<SignalState<T>> {
        while entries.len() >= self.max_signals {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| (entry.timestamp, entry.seq))
                .map(|(key, _)| key.clone());
            match oldest {
                Some(oldest) => {
                    debug!(key = %oldest, "evicting oldest signal entry");
                    // Dropping the sender orphans any receiver still pending on it
                    entries.remove(&oldest);
                }
                None => break,
            }
        }

        let (tx, rx) = watch::channel(state);
        let entry = SignalEntry { timestamp: Instant::now(), seq: self.next_seq.fetch_add(1, Ordering::Relaxed), tx };
        entries.insert(key.to_owned(), entry);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<T>(registry: &SignalRegistry<T>) -> Vec<String> {
        let mut keys: Vec<String> = registry.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn duplicate_signal_is_rejected() {
        let registry = SignalRegistry::new(10);
        registry.signal("boot", Some(1)).unwrap();

        let err = registry.signal("boot", Some(2)).unwrap_err();
        assert!(matches!(err, ConverseError::DuplicateSignal { ref key } if key == "boot"));
    }

    #[test]
    fn insertion_evicts_the_oldest_entry() {
        let registry = SignalRegistry::new(2);
        registry.signal("a", Some(1)).unwrap();
        registry.signal("b", Some(2)).unwrap();
        registry.signal("c", None).unwrap();

        assert_eq!(keys(&registry), ["b", "c"]);
    }

    #[test]
    fn registry_never_exceeds_capacity() {
        let registry = SignalRegistry::<u32>::new(3);
        for i in 0..10 {
            registry.signal(&format!("key{i}"), Some(i)).unwrap();
            assert!(registry.len() <= 3);
        }
        assert_eq!(keys(&registry), ["key7", "key8", "key9"]);
    }

    #[test]
    fn pending_waiter_counts_toward_capacity() {
        let registry = SignalRegistry::<u32>::new(2);
        let _waiter = registry.waiter("a");
        registry.signal("b", Some(2)).unwrap();
        registry.signal("c", Some(3)).unwrap();

        assert_eq!(keys(&registry), ["b", "c"]);
    }

    #[test]
    fn evicted_key_may_be_signaled_again() {
        let registry = SignalRegistry::new(1);
        registry.signal("a", Some(1)).unwrap();
        registry.signal("b", Some(2)).unwrap();

        // "a" was evicted, so it is signalable as if new
        registry.signal("a", Some(3)).unwrap();
        assert_eq!(keys(&registry), ["a"]);
    }
}
