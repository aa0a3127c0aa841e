//! Event dispatch to presentation services
//!
//! The engine only records [`GameEvent`]s. Haptics, speech, confetti and
//! notifications live behind [`FeedbackSink`] handles that the caller owns
//! and passes in when building the dispatcher.

use tracing::trace;

use crate::models::GameEvent;

/// A presentation service that reacts to engine events
pub trait FeedbackSink: Send {
    fn handle(&mut self, event: &GameEvent);
}

impl<F> FeedbackSink for F
where
    F: FnMut(&GameEvent) + Send,
{
    fn handle(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Fans drained events out to every registered sink, in registration order
///
/// # Example
/// ```
/// use canteen_change_core::events::FeedbackDispatcher;
/// use canteen_change_core::models::GameEvent;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let log = Arc::clone(&seen);
/// let mut dispatcher = FeedbackDispatcher::new(vec![Box::new(move |e: &GameEvent| {
///     log.lock().unwrap().push(e.event_type());
/// })]);
///
/// dispatcher.dispatch_all(vec![GameEvent::Correct { change_target: 5 }]);
/// assert_eq!(*seen.lock().unwrap(), vec!["correct"]);
/// ```
#[derive(Default)]
pub struct FeedbackDispatcher {
    sinks: Vec<Box<dyn FeedbackSink>>,
}

impl FeedbackDispatcher {
    pub fn new(sinks: Vec<Box<dyn FeedbackSink>>) -> Self {
        Self { sinks }
    }

    pub fn add_sink(&mut self, sink: Box<dyn FeedbackSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Hand one event to every sink
    pub fn dispatch(&mut self, event: &GameEvent) {
        trace!(event = event.event_type(), sinks = self.sinks.len(), "dispatching");
        for sink in &mut self.sinks {
            sink.handle(event);
        }
    }

    /// Dispatch a drained batch in order. Returns the number of events sent.
    pub fn dispatch_all(&mut self, events: impl IntoIterator<Item = GameEvent>) -> usize {
        let mut count = 0;
        for event in events {
            self.dispatch(&event);
            count += 1;
        }
        count
    }
}

impl std::fmt::Debug for FeedbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackDispatcher")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
