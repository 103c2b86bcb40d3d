//! Player and playback events.
//!
//! Transition requests flow widget -> bus -> controller as the small
//! `*Event` structs below. State changes flow back controller -> bus ->
//! widgets as [`PlaybackChangedEvent`].

use crate::core::event_bus::EventEmitter;
use crate::render::RenderMode;
use anyhow::{Context, bail};
use std::str::FromStr;

// === Playback Control ===

#[derive(Clone, Debug)]
pub struct TogglePlayPauseEvent;

#[derive(Clone, Debug)]
pub struct StepForwardEvent;

#[derive(Clone, Debug)]
pub struct StepBackwardEvent;

/// Position slider moved (raw value, clamped by the controller)
#[derive(Clone, Debug)]
pub struct ScrubToEvent(pub i64);

#[derive(Clone, Debug)]
pub struct ResetEvent;

#[derive(Clone, Debug)]
pub struct ShowAllEvent;

// === Speed Control ===

/// Set autoplay interval in milliseconds
#[derive(Clone, Debug)]
pub struct SetSpeedEvent(pub u64);

/// Speed slider moved (inverted scale: higher value plays faster)
#[derive(Clone, Debug)]
pub struct SetSpeedFromSliderEvent(pub u64);

// === State notifications ===

/// Snapshot of controller state, emitted after every transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackChangedEvent {
    pub index: usize,
    pub len: usize,
    /// Display form of the current key; None in show-all mode
    pub key_label: Option<String>,
    pub playing: bool,
    pub interval_ms: u64,
    pub mode: RenderMode,
}

/// A transition request, independent of where it came from
/// (button, slider, key binding, command line).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackCommand {
    StepForward,
    StepBackward,
    TogglePlayPause,
    ScrubTo(i64),
    SetSpeed(u64),
    SetSpeedFromSlider(u64),
    Reset,
    ShowAll,
}

impl PlaybackCommand {
    /// Publish as the matching bus event
    pub fn emit(self, emitter: &EventEmitter) {
        use PlaybackCommand::*;
        match self {
            StepForward => emitter.emit(StepForwardEvent),
            StepBackward => emitter.emit(StepBackwardEvent),
            TogglePlayPause => emitter.emit(TogglePlayPauseEvent),
            ScrubTo(i) => emitter.emit(ScrubToEvent(i)),
            SetSpeed(ms) => emitter.emit(SetSpeedEvent(ms)),
            SetSpeedFromSlider(v) => emitter.emit(SetSpeedFromSliderEvent(v)),
            Reset => emitter.emit(ResetEvent),
            ShowAll => emitter.emit(ShowAllEvent),
        }
    }
}

/// Parse a typed command: `next`, `prev`, `play`, `scrub 3`, `speed 2000`,
/// `slider 3000`, `reset`, `all` (plus a few aliases).
impl FromStr for PlaybackCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let Some(word) = parts.next() else {
            bail!("empty command");
        };
        let mut arg = |name: &str| -> anyhow::Result<i64> {
            let raw = parts
                .next()
                .with_context(|| format!("`{}` needs a numeric argument", name))?;
            raw.parse::<i64>()
                .with_context(|| format!("invalid number for `{}`: {}", name, raw))
        };

        let cmd = match word.to_ascii_lowercase().as_str() {
            "next" | "n" | "forward" => PlaybackCommand::StepForward,
            "prev" | "p" | "back" => PlaybackCommand::StepBackward,
            "play" | "pause" | "toggle" => PlaybackCommand::TogglePlayPause,
            "scrub" | "seek" => PlaybackCommand::ScrubTo(arg("scrub")?),
            "speed" => PlaybackCommand::SetSpeed(arg("speed")?.max(0) as u64),
            "slider" => PlaybackCommand::SetSpeedFromSlider(arg("slider")?.max(0) as u64),
            "reset" => PlaybackCommand::Reset,
            "all" | "viewall" => PlaybackCommand::ShowAll,
            other => bail!("unknown command: {}", other),
        };
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("next".parse::<PlaybackCommand>().unwrap(), PlaybackCommand::StepForward);
        assert_eq!("PREV".parse::<PlaybackCommand>().unwrap(), PlaybackCommand::StepBackward);
        assert_eq!("scrub -2".parse::<PlaybackCommand>().unwrap(), PlaybackCommand::ScrubTo(-2));
        assert_eq!("speed 800".parse::<PlaybackCommand>().unwrap(), PlaybackCommand::SetSpeed(800));
        assert_eq!(
            "slider 3000".parse::<PlaybackCommand>().unwrap(),
            PlaybackCommand::SetSpeedFromSlider(3000)
        );
        assert_eq!("all".parse::<PlaybackCommand>().unwrap(), PlaybackCommand::ShowAll);
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<PlaybackCommand>().is_err());
        assert!("scrub".parse::<PlaybackCommand>().is_err());
        assert!("scrub x".parse::<PlaybackCommand>().is_err());
        assert!("dance".parse::<PlaybackCommand>().is_err());
    }
}
