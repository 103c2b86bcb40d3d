//! Transport controls as a view over playback state.
//!
//! The widget never reads or writes controller state directly:
//! - user actions become [`PlaybackCommand`]s emitted on the bus
//! - display fields are refreshed only from [`PlaybackChangedEvent`]

use crate::config::{ControllerConfig, format_interval};
use crate::core::event_bus::{EventBus, EventEmitter};
use crate::core::player_events::{PlaybackChangedEvent, PlaybackCommand};
use crate::render::RenderMode;
use log::trace;
use std::sync::{Arc, Mutex};

/// Button that triggers a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Previous,
    PlayPause,
    Next,
    Reset,
    ViewAll,
}

impl Button {
    pub fn command(self) -> PlaybackCommand {
        match self {
            Button::Previous => PlaybackCommand::StepBackward,
            Button::PlayPause => PlaybackCommand::TogglePlayPause,
            Button::Next => PlaybackCommand::StepForward,
            Button::Reset => PlaybackCommand::Reset,
            Button::ViewAll => PlaybackCommand::ShowAll,
        }
    }
}

/// Display state of the control strip
#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
    /// False when there is no controller (empty dataset, missing container)
    pub enabled: bool,
    /// Prefix for the key display, e.g. "Year"
    pub key_name: String,
    pub position: usize,
    pub position_max: usize,
    pub key_display: String,
    pub play_label: &'static str,
    pub speed_slider: u64,
    pub speed_display: String,
    pub show_all_active: bool,
    config: ControllerConfig,
}

impl Controls {
    pub fn new(key_name: impl Into<String>, config: &ControllerConfig) -> Self {
        Self {
            enabled: false,
            key_name: key_name.into(),
            position: 0,
            position_max: 0,
            key_display: String::new(),
            play_label: "Play",
            speed_slider: config.slider_from_interval(config.default_interval_ms),
            speed_display: format_interval(config.default_interval_ms),
            show_all_active: false,
            config: config.clone(),
        }
    }

    /// Refresh from a state notification
    pub fn apply(&mut self, event: &PlaybackChangedEvent) {
        self.enabled = event.len > 0;
        self.position = event.index;
        self.position_max = event.len.saturating_sub(1);
        self.show_all_active = event.mode == RenderMode::All;
        self.key_display = match &event.key_label {
            Some(label) => format!("{}: {}", self.key_name, label),
            None => "All".to_string(),
        };
        self.play_label = if event.playing { "Pause" } else { "Play" };
        self.speed_slider = self.config.slider_from_interval(event.interval_ms);
        self.speed_display = format_interval(event.interval_ms);
        trace!("Controls refreshed: {}", self.status_line());
    }

    /// Command for a button press, None while disabled
    pub fn press(&self, button: Button) -> Option<PlaybackCommand> {
        self.enabled.then(|| button.command())
    }

    /// Command for a position slider move, None while disabled
    pub fn slide_position(&self, value: i64) -> Option<PlaybackCommand> {
        self.enabled.then_some(PlaybackCommand::ScrubTo(value))
    }

    /// Command for a speed slider move, None while disabled
    pub fn slide_speed(&self, value: u64) -> Option<PlaybackCommand> {
        self.enabled.then_some(PlaybackCommand::SetSpeedFromSlider(value))
    }

    /// One-line summary, e.g. `[Pause] Year: 2019 (2/5) speed 1.5s`
    pub fn status_line(&self) -> String {
        if !self.enabled {
            return "[disabled]".to_string();
        }
        format!(
            "[{}] {} ({}/{}) speed {}",
            self.play_label,
            self.key_display,
            self.position + 1,
            self.position_max + 1,
            self.speed_display
        )
    }
}

/// Controls bound to a bus: subscribed for refreshes, emitting requests
#[derive(Clone)]
pub struct ControlsHandle {
    state: Arc<Mutex<Controls>>,
    emitter: EventEmitter,
}

impl ControlsHandle {
    /// Subscribe `controls` to state notifications on `bus`
    pub fn bind(controls: Controls, bus: &EventBus) -> Self {
        let state = Arc::new(Mutex::new(controls));
        let s = Arc::clone(&state);
        bus.subscribe::<PlaybackChangedEvent, _>(move |e| {
            s.lock().unwrap_or_else(|p| p.into_inner()).apply(e);
        });
        Self {
            state,
            emitter: bus.emitter(),
        }
    }

    /// Current display state
    pub fn snapshot(&self) -> Controls {
        self.state.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Emit the command for a button; false if controls are disabled
    pub fn press(&self, button: Button) -> bool {
        let cmd = self.snapshot().press(button);
        self.request(cmd)
    }

    pub fn slide_position(&self, value: i64) -> bool {
        let cmd = self.snapshot().slide_position(value);
        self.request(cmd)
    }

    pub fn slide_speed(&self, value: u64) -> bool {
        let cmd = self.snapshot().slide_speed(value);
        self.request(cmd)
    }

    /// Emit a request; false (and nothing sent) for None
    pub fn request(&self, cmd: Option<PlaybackCommand>) -> bool {
        match cmd {
            Some(cmd) => {
                cmd.emit(&self.emitter);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::downcast_event;
    use crate::core::player_events::StepForwardEvent;

    fn changed(index: usize, playing: bool, mode: RenderMode) -> PlaybackChangedEvent {
        PlaybackChangedEvent {
            index,
            len: 5,
            key_label: (mode == RenderMode::Single).then(|| (2018 + index).to_string()),
            playing,
            interval_ms: 1500,
            mode,
        }
    }

    #[test]
    fn test_starts_disabled() {
        let c = Controls::new("Year", &ControllerConfig::default());
        assert!(!c.enabled);
        assert_eq!(c.press(Button::Next), None);
        assert_eq!(c.status_line(), "[disabled]");
        assert_eq!(c.speed_display, "1.5s");
        assert_eq!(c.speed_slider, 2000);
    }

    #[test]
    fn test_apply_refreshes_labels() {
        let mut c = Controls::new("Year", &ControllerConfig::default());
        c.apply(&changed(1, true, RenderMode::Single));
        assert!(c.enabled);
        assert_eq!(c.key_display, "Year: 2019");
        assert_eq!(c.play_label, "Pause");
        assert_eq!(c.position_max, 4);
        assert_eq!(c.status_line(), "[Pause] Year: 2019 (2/5) speed 1.5s");

        c.apply(&changed(1, false, RenderMode::All));
        assert_eq!(c.speed_slider, 2000);
        assert_eq!(c.key_display, "All");
        assert!(c.show_all_active);
        assert_eq!(c.play_label, "Play");
    }

    #[test]
    fn test_speed_slider_follows_config_mapping() {
        let config = ControllerConfig {
            slider_sum_ms: 5000,
            ..Default::default()
        };
        let mut c = Controls::new("Year", &config);
        assert_eq!(c.speed_slider, config.slider_from_interval(1500));

        let mut event = changed(0, false, RenderMode::Single);
        event.interval_ms = 800;
        c.apply(&event);
        assert_eq!(c.speed_slider, 4200);
        assert_eq!(c.speed_slider, config.slider_from_interval(800));
    }

    #[test]
    fn test_bound_controls_follow_bus() {
        let bus = EventBus::new();
        let handle = ControlsHandle::bind(Controls::new("Year", &ControllerConfig::default()), &bus);
        assert!(!handle.press(Button::Next));

        bus.emit(changed(3, false, RenderMode::Single));
        assert_eq!(handle.snapshot().position, 3);

        bus.poll();
        assert!(handle.press(Button::Next));
        let events = bus.poll();
        assert_eq!(events.len(), 1);
        assert!(downcast_event::<StepForwardEvent>(&events[0]).is_some());
    }
}
