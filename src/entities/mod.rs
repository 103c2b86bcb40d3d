//! Entities module - dataset records and the time-keyed dataset.
//!
//! A record exposes its time key and a stable identity via [`Item`];
//! [`Dataset`] derives the ordered key sequence and per-key frames from it.

pub mod builtin;
pub mod dataset;
pub mod traits;

pub use builtin::{CreativeWork, Milestone, creative_works, personal_timeline};
pub use dataset::{Dataset, Frame};
pub use traits::Item;
