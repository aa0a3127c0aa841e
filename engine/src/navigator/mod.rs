//! Navigator - screen state machine and intent handling
//!
//! See `engine.rs` for the intent flow.

pub mod engine;
pub mod screen;
pub mod shared;

pub use engine::Navigator;
pub use screen::Screen;
pub use shared::SharedNavigator;
