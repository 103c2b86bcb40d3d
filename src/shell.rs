//! Shared shell for the terminal front-end.
//!
//! Wires a bus, a mounted visualization, the transport controls and the
//! hotkey map together. Lines typed by the user become requests on the bus;
//! `update()` drains the bus into the controller and pumps autoplay.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::core::event_bus::{EventBus, StateEmitter};
use crate::core::player_events::PlaybackCommand;
use crate::entities::{Dataset, Item};
use crate::input::Hotkeys;
use crate::render::Surface;
use crate::visualization::Visualization;
use crate::widgets::{Controls, ControlsHandle};

pub const HELP: &str = "\
commands:
  next | prev          step one key (stops autoplay)
  play                 toggle play/pause
  scrub N              jump to index N (clamped)
  speed MS             set step interval in milliseconds
  slider N             set speed from slider position
  reset                pause, default speed, first key
  all                  show every key at once
  <Space> / ArrowLeft / ArrowRight / Escape
  help | quit";

/// Result of one line of user input
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    /// Request emitted on the bus
    Command(PlaybackCommand),
    /// Parsed, but controls are disabled
    Ignored(PlaybackCommand),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Common shell state
pub struct Shell<I: Item, S: Surface<I>> {
    pub event_bus: EventBus,
    pub visualization: Visualization<I, S>,
    pub controls: ControlsHandle,
    pub hotkeys: Hotkeys,
}

impl<I: Item, S: Surface<I>> Shell<I, S> {
    /// Mount `dataset` into `container` with controls labelled `key_name`
    pub fn new(
        name: &str,
        key_name: &str,
        container: Option<S>,
        dataset: Dataset<I>,
        config: ControllerConfig,
    ) -> Self {
        let event_bus = EventBus::new();
        // Controls subscribe first so they see the initial notification
        let controls = ControlsHandle::bind(Controls::new(key_name, &config), &event_bus);
        let emitter = StateEmitter::from_emitter(event_bus.emitter());
        let visualization = Visualization::mount(name, container, dataset, config, emitter);
        // Mount-time notifications are already applied by the subscriber
        event_bus.poll();

        Self {
            event_bus,
            visualization,
            controls,
            hotkeys: Hotkeys::with_defaults(),
        }
    }

    /// Translate one input line into a bus request
    pub fn handle_input(&self, line: &str) -> Input {
        let raw = line.trim_end_matches(['\r', '\n']);
        if let Some(cmd) = self.hotkeys.handle_key(raw) {
            return self.request(cmd);
        }

        let text = raw.trim();
        match text {
            "" => return Input::Empty,
            "q" | "quit" | "exit" => return Input::Quit,
            "?" | "h" | "help" => return Input::Help,
            _ => {}
        }

        match text.parse::<PlaybackCommand>() {
            Ok(cmd) => self.request(cmd),
            Err(e) => {
                warn!("Unrecognized input '{}': {}", text, e);
                Input::Unknown(e.to_string())
            }
        }
    }

    /// Emit `cmd` unless controls are disabled
    pub fn request(&self, cmd: PlaybackCommand) -> Input {
        if self.controls.request(self.controls.snapshot().enabled.then_some(cmd)) {
            debug!("Requested {:?}", cmd);
            Input::Command(cmd)
        } else {
            Input::Ignored(cmd)
        }
    }

    /// Drain queued bus events into the visualization.
    /// Returns number of requests the controller handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let events = self.event_bus.poll();
            if events.is_empty() {
                break;
            }
            for event in &events {
                if self.visualization.handle_event(event) {
                    handled += 1;
                }
            }
        }
        handled
    }

    /// One frame: handle pending requests, then pump autoplay
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    /// One frame at `now`. Requests queued by observers of an automatic
    /// step are handled in the same frame.
    pub fn update_at(&mut self, now: Instant) -> bool {
        let handled = self.process_events();
        let stepped = self.visualization.update_at(now);
        let followups = self.process_events();
        handled + followups > 0 || stepped
    }

    /// Status line of the control strip
    pub fn status(&self) -> String {
        self.controls.snapshot().status_line()
    }
}

/// Init logger: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
/// `log_file`: `Some(None)` logs to `yearplay.log`, `Some(Some(path))` to path.
pub fn init_logger(verbosity: u8, log_file: Option<Option<PathBuf>>) -> Result<()> {
    let log_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(path) = log_file {
        let path = path.unwrap_or_else(|| PathBuf::from("yearplay.log"));
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init()?;
        info!("Logging to file: {} (level: {:?})", path.display(), log_level);
    } else {
        // Console logging, RUST_LOG wins if set
        let default_level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .try_init()?;
    }
    Ok(())
}
