use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

/// A topic subscriber. Identity (for [`TopicBus::unsubscribe`]) is the `Arc`
/// allocation, so keep a clone of the handle you subscribed with.
pub type TopicCallback<T> = Arc<dyn Fn(&T, &mut PublishContext) + Send + Sync>;

/// Scratch space shared by all callbacks of a single publication.
///
/// A fresh context is created per `publish` call and handed mutably to each
/// subscriber in turn, letting earlier subscribers pass values to later ones.
/// Nothing in it survives the publication.
#[derive(Default)]
pub struct PublishContext {
    values: HashMap<String, Box<dyn Any + Send>>,
}

impl PublishContext {
    pub fn new() -> Self { Self::default() }

    /// Store a value under `key`, replacing any previous value of any type
    pub fn insert<V: Any + Send>(&mut self, key: impl Into<String>, value: V) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Borrow the value stored under `key`, if present and of type `V`
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> { self.values.get(key)?.downcast_ref() }

    pub fn get_mut<V: Any>(&mut self, key: &str) -> Option<&mut V> { self.values.get_mut(key)?.downcast_mut() }

    pub fn contains(&self, key: &str) -> bool { self.values.contains_key(key) }
}

/// Ordered fan-out of publications to per-topic subscriber lists.
///
/// Topics are an independent namespace from signal keys: there is no replay,
/// no capacity bound and no timeout here. A subscriber added after a
/// publication never observes it.
pub struct TopicBus<T> {
    topics: Mutex<HashMap<String, Vec<TopicCallback<T>>>>,
}

impl<T> Default for TopicBus<T> {
    fn default() -> Self { Self::new() }
}

impl<T> TopicBus<T> {
    pub fn new() -> Self { Self { topics: Mutex::new(HashMap::new()) } }

    /// Append `callback` to `topic`'s subscriber list.
    ///
    /// No deduplication: subscribing the same handle twice means it runs twice
    /// per publication.
    pub fn subscribe(&self, topic: &str, callback: TopicCallback<T>) {
        let mut topics = self.topics.lock().unwrap();
        topics.entry(topic.to_owned()).or_default().push(callback);
        debug!(topic, subscribers = topics[topic].len(), "subscribed to topic");
    }

    /// Remove every occurrence of `callback` from `topic`'s list, by `Arc`
    /// identity. A no-op when the topic or the callback is absent.
    pub fn unsubscribe(&self, topic: &str, callback: &TopicCallback<T>) {
        let mut topics = self.topics.lock().unwrap();
        if let Some(callbacks) = topics.get_mut(topic) {
            callbacks.retain(|existing| !Arc::ptr_eq(existing, callback));
            if callbacks.is_empty() {
                topics.remove(topic);
            }
        }
    }

    /// Invoke every subscriber of `topic` with `data`, in registration order,
    /// sharing one fresh [`PublishContext`].
    ///
    /// The list is snapshotted at call time and the lock is released before
    /// any callback runs, so subscribers may themselves subscribe or
    /// unsubscribe without deadlocking. Subscriber panics are not caught: a
    /// panicking subscriber aborts the remaining fan-out for this publication.
    pub fn publish(&self, topic: &str, data: T) {
        // Clone the subscriber list to avoid holding the lock during callbacks
        let callbacks = { self.topics.lock().unwrap().get(topic).cloned() };
        let Some(callbacks) = callbacks else { return };

        trace!(topic, subscribers = callbacks.len(), "publishing to topic");
        let mut context = PublishContext::new();
        for callback in &callbacks {
            callback(&data, &mut context);
        }
    }

    /// Number of subscribers currently registered for `topic`
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.lock().unwrap().get(topic).map_or(0, Vec::len)
    }
}
