//! Input mapping - key presses to playback commands

pub mod hotkeys;

pub use hotkeys::Hotkeys;
