use std::sync::{Arc, Mutex};

/// Records events from multiple tasks; `drain` returns everything recorded so
/// far, in order.
#[allow(unused)]
pub fn event_recorder() -> (Arc<dyn Fn(String) + Send + Sync>, Box<dyn Fn() -> Vec<String> + Send + Sync>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let record = {
        let events = events.clone();
        Arc::new(move |event: String| {
            events.lock().unwrap().push(event);
        })
    };

    let drain = Box::new(move || {
        let events: Vec<String> = events.lock().unwrap().drain(..).collect();
        events
    });

    (record, drain)
}
