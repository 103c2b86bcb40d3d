//! UI widgets - views that emit requests and refresh from the EventBus

pub mod controls;

pub use controls::{Button, Controls, ControlsHandle};
