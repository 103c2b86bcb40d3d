//! Core engine modules - controller, playback state, ticker, events
//!
//! These modules form the playback engine, independent of rendering.

pub mod controller;
pub mod event_bus;
pub mod playback;
pub mod player_events;
pub mod ticker;

// Re-exports for convenience
pub use controller::TimelineController;
pub use event_bus::EventBus;
pub use playback::PlaybackState;
pub use ticker::Ticker;
