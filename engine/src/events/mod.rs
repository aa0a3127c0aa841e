//! Presentation feedback
//!
//! Engine events are drained from the navigator and dispatched to sinks.

pub mod dispatch;

pub use dispatch::{FeedbackDispatcher, FeedbackSink};
