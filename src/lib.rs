/*!
In-process coordination for independently started components.

Components that share a process but hold no references to one another
coordinate through a single shared [`Converse`] in two ways:

- **signal / wait** - one-shot named events with a payload. A signal fired
  before anyone waits is retained, so late waiters still observe it, and every
  waiter for a key sees the identical value. The registry is bounded: once
  `max_signals` keys are retained, inserting a new key evicts the oldest.
- **publish / subscribe** - synchronous fan-out of a payload to the current
  subscribers of a topic, in registration order, with a per-publication
  scratch context. No replay, no bound.

# Basic usage

```rust
use converse::Converse;

#[tokio::main]
async fn main() {
    let converse = Converse::<u32>::default();

    // Signal first, wait later: the value is retained
    converse.signal("port", Some(8080)).unwrap();
    assert_eq!(converse.wait("port").await, Some(8080));

    // Wait first, signal later: registering is synchronous, suspension
    // happens on the returned waiter
    let waiter = converse.waiter("ready");
    converse.signal("ready", Some(1)).unwrap();
    assert_eq!(waiter.wait().await, Some(1));
}
```

# Publish/subscribe

```rust
use std::sync::Arc;
use converse::{Converse, TopicCallback};

let converse = Converse::<String>::default();

let greeter: TopicCallback<String> = Arc::new(|data, context| {
    context.insert("greeted", data.clone());
});
converse.subscribe("hello", greeter.clone());
converse.publish("hello", "¿Qué tal?".to_string());
converse.unsubscribe("hello", &greeter);
```
*/

mod config;
mod converse;
mod error;
mod registry;
mod topic;
mod waiter;

pub use config::*;
pub use converse::*;
pub use error::*;
pub use registry::SignalRegistry;
pub use topic::*;
pub use waiter::*;
