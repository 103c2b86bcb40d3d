//! YEARPLAY - year-indexed animated visualization controller
//!
//! Re-exports all modules for use by the binary target.

// Core engine (controller, playback state, ticker, events)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod entities;
pub mod input;
pub mod render;
pub mod shell;
pub mod visualization;
pub mod widgets;

// Re-export commonly used types from core
pub use core::controller::TimelineController;
pub use core::event_bus::{downcast_event, BoxedEvent, EventBus, EventEmitter, StateEmitter};
pub use core::player_events::{PlaybackChangedEvent, PlaybackCommand};
pub use core::playback::PlaybackState;

// Re-export entities and rendering seam
pub use config::ControllerConfig;
pub use entities::{Dataset, Frame, Item};
pub use render::{FrameView, MarkKey, RenderMode, Surface};
pub use visualization::Visualization;
