//! Timeline controller: play/pause/step/scrub/reset/show-all over time keys.
//!
//! **Ownership**: the controller owns its dataset, its [`PlaybackState`] and
//! its [`Surface`]. Nothing is global, so several visualizations can run
//! side by side without sharing a timer or a position.
//!
//! **Construction**: [`TimelineController::new`] returns `None` for a dataset
//! with no time keys. Every method can therefore assume `len() >= 1`.
//!
//! # Transitions
//!
//! | operation                 | stops autoplay | index                     | render |
//! |---------------------------|----------------|---------------------------|--------|
//! | `step_forward`            | yes            | `(i + 1) mod N`           | frame  |
//! | `step_backward`           | yes            | `(i - 1 + N) mod N`       | frame  |
//! | `scrub_to(i)`             | yes            | `clamp(i, 0, N-1)`        | frame  |
//! | `reset`                   | yes            | `0`, default speed        | frame  |
//! | `show_all`                | yes            | unchanged                 | all    |
//! | `step_forward_automatic`  | no             | `(i + 1) mod N`           | frame  |
//! | `toggle_play_pause`       | toggles        | unchanged                 | none   |
//! | `set_speed`               | no (re-arms)   | unchanged                 | none   |
//!
//! # Autoplay
//!
//! The host loop calls [`TimelineController::update`] (~60Hz). When the armed
//! ticker is due, the controller calls `step_forward_automatic()`, the same
//! index path manual stepping uses.

use crate::config::ControllerConfig;
use crate::core::event_bus::{BoxedEvent, StateEmitter, downcast_event};
use crate::core::playback::PlaybackState;
use crate::core::player_events::*;
use crate::entities::{Dataset, Item};
use crate::render::{FrameView, RenderMode, Surface};
use log::{debug, info, trace, warn};
use std::time::Instant;

pub struct TimelineController<I: Item, S: Surface<I>> {
    dataset: Dataset<I>,
    keys: Vec<I::Key>,
    state: PlaybackState,
    mode: RenderMode,
    config: ControllerConfig,
    surface: S,
    emitter: StateEmitter,
}

impl<I: Item, S: Surface<I>> std::fmt::Debug for TimelineController<I, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineController")
            .field("keys", &self.keys)
            .field("state", &self.state)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<I: Item, S: Surface<I>> TimelineController<I, S> {
    /// Build a controller and render the first frame.
    ///
    /// Returns None when the dataset has no time keys: there is nothing to
    /// play, and the caller should leave its controls disabled.
    pub fn new(
        dataset: Dataset<I>,
        surface: S,
        config: ControllerConfig,
        emitter: StateEmitter,
    ) -> Option<Self> {
        let keys = dataset.time_keys();
        if keys.is_empty() {
            warn!("TimelineController: dataset has no time keys, not starting");
            return None;
        }

        let config = config.normalized();
        let state = PlaybackState::new(keys.len(), config.default_interval_ms, config.speed_bounds());
        info!(
            "TimelineController initialized: {} keys ({:?}..={:?}), interval {}ms",
            keys.len(),
            keys.first(),
            keys.last(),
            state.interval_ms()
        );

        let mut controller = Self {
            dataset,
            keys,
            state,
            mode: RenderMode::Single,
            config,
            surface,
            emitter,
        };
        controller.render();
        controller.notify();
        Some(controller)
    }

    // === Accessors ===

    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    pub fn current_key(&self) -> &I::Key {
        &self.keys[self.state.current_index()]
    }

    pub fn time_keys(&self) -> &[I::Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn interval_ms(&self) -> u64 {
        self.state.interval_ms()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset<I> {
        &self.dataset
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current state as a notification payload
    pub fn snapshot(&self) -> PlaybackChangedEvent {
        PlaybackChangedEvent {
            index: self.current_index(),
            len: self.len(),
            key_label: match self.mode {
                RenderMode::Single => Some(self.current_key().to_string()),
                RenderMode::All => None,
            },
            playing: self.is_playing(),
            interval_ms: self.interval_ms(),
            mode: self.mode,
        }
    }

    // === Transitions ===

    /// Next key (wraps). Interrupts autoplay.
    pub fn step_forward(&mut self) {
        self.stop();
        self.step_by(1);
    }

    /// Previous key (wraps). Interrupts autoplay.
    pub fn step_backward(&mut self) {
        self.stop();
        self.step_by(-1);
    }

    /// Timer tick: next key (wraps) without touching the play state.
    pub fn step_forward_automatic(&mut self) {
        self.step_by(1);
    }

    /// Jump to `index`, clamped to the key range. Interrupts autoplay.
    pub fn scrub_to(&mut self, index: i64) {
        self.stop();
        let applied = self.state.seek(index);
        if applied as i64 != index {
            trace!("scrub_to({}) clamped to {}", index, applied);
        }
        self.mode = RenderMode::Single;
        self.render();
        self.notify();
    }

    /// Flip between playing and paused.
    pub fn toggle_play_pause(&mut self) {
        if self.state.is_playing() {
            self.state.disarm();
            debug!("Paused at {}", self.current_key());
        } else {
            self.state.arm();
            debug!("Playing from {} every {}ms", self.current_key(), self.state.interval_ms());
        }
        self.notify();
    }

    /// Set autoplay interval (clamped). A running timer restarts at the new
    /// interval instead of waiting out the old one.
    pub fn set_speed(&mut self, interval_ms: u64) {
        let applied = self.state.set_interval(interval_ms);
        if self.state.is_playing() {
            self.state.arm();
        }
        trace!("Speed set to {}ms (requested {}ms)", applied, interval_ms);
        self.notify();
    }

    /// Speed slider input, inverted: higher value plays faster
    pub fn set_speed_from_slider(&mut self, value: u64) {
        let interval = self.config.interval_from_slider(value);
        self.set_speed(interval);
    }

    /// Stop, go to the first key, restore the default speed.
    pub fn reset(&mut self) {
        self.stop();
        self.state.seek(0);
        self.state.restore_default_interval();
        self.mode = RenderMode::Single;
        debug!("Reset to {}", self.current_key());
        self.render();
        self.notify();
    }

    /// Stop and draw every frame at once, without the current-key indicator.
    /// The index is kept; the next step continues from it.
    pub fn show_all(&mut self) {
        self.stop();
        self.mode = RenderMode::All;
        debug!("Showing all {} keys", self.len());
        self.render();
        self.notify();
    }

    /// Pump autoplay at the current time. See [`Self::update_at`].
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    /// Pump autoplay at `now`. Returns true if a step happened.
    pub fn update_at(&mut self, now: Instant) -> bool {
        if self.state.poll_timer(now) {
            self.step_forward_automatic();
            true
        } else {
            false
        }
    }

    /// Apply a transition request
    pub fn apply(&mut self, command: PlaybackCommand) {
        use PlaybackCommand::*;
        trace!("apply {:?}", command);
        match command {
            StepForward => self.step_forward(),
            StepBackward => self.step_backward(),
            TogglePlayPause => self.toggle_play_pause(),
            ScrubTo(i) => self.scrub_to(i),
            SetSpeed(ms) => self.set_speed(ms),
            SetSpeedFromSlider(v) => self.set_speed_from_slider(v),
            Reset => self.reset(),
            ShowAll => self.show_all(),
        }
    }

    /// Handle a bus event. Returns true if it was a playback request.
    pub fn handle_event(&mut self, event: &BoxedEvent) -> bool {
        match command_from_event(event) {
            Some(command) => {
                self.apply(command);
                true
            }
            None => false,
        }
    }

    // === Internals ===

    /// Stop autoplay if running (always stops, doesn't toggle)
    fn stop(&mut self) {
        if self.state.disarm() {
            debug!("Autoplay interrupted at {}", self.current_key());
        }
    }

    fn step_by(&mut self, delta: isize) {
        let index = self.state.step(delta);
        self.mode = RenderMode::Single;
        trace!("Step {:+} -> {} ({})", delta, index, self.keys[index]);
        self.render();
        self.notify();
    }

    fn render(&mut self) {
        let view = match self.mode {
            RenderMode::Single => {
                let key = &self.keys[self.state.current_index()];
                let frame = self.dataset.frame(key);
                FrameView::single(key, frame.items)
            }
            RenderMode::All => FrameView::all(self.dataset.all()),
        };
        self.surface.render(&view);
    }

    fn notify(&self) {
        self.emitter.emit(self.snapshot());
    }
}

/// Map a bus event to the transition it requests
pub fn command_from_event(event: &BoxedEvent) -> Option<PlaybackCommand> {
    if downcast_event::<StepForwardEvent>(event).is_some() {
        Some(PlaybackCommand::StepForward)
    } else if downcast_event::<StepBackwardEvent>(event).is_some() {
        Some(PlaybackCommand::StepBackward)
    } else if downcast_event::<TogglePlayPauseEvent>(event).is_some() {
        Some(PlaybackCommand::TogglePlayPause)
    } else if let Some(e) = downcast_event::<ScrubToEvent>(event) {
        Some(PlaybackCommand::ScrubTo(e.0))
    } else if let Some(e) = downcast_event::<SetSpeedEvent>(event) {
        Some(PlaybackCommand::SetSpeed(e.0))
    } else if let Some(e) = downcast_event::<SetSpeedFromSliderEvent>(event) {
        Some(PlaybackCommand::SetSpeedFromSlider(e.0))
    } else if downcast_event::<ResetEvent>(event).is_some() {
        Some(PlaybackCommand::Reset)
    } else if downcast_event::<ShowAllEvent>(event).is_some() {
        Some(PlaybackCommand::ShowAll)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::EventBus;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    struct Work {
        year: i32,
        kind: &'static str,
    }

    impl Item for Work {
        type Key = i32;
        fn time_key(&self) -> i32 {
            self.year
        }
        fn identity(&self) -> String {
            self.kind.to_string()
        }
    }

    /// One recorded render: mode, key label, mark keys
    #[derive(Clone, Debug, PartialEq)]
    struct Rendered {
        mode: RenderMode,
        key: Option<i32>,
        marks: Vec<String>,
    }

    #[derive(Default)]
    struct Recorder {
        renders: Vec<Rendered>,
    }

    impl Surface<Work> for Recorder {
        fn render(&mut self, view: &FrameView<'_, Work>) {
            self.renders.push(Rendered {
                mode: view.mode,
                key: view.current_key.copied(),
                marks: view.entries.iter().map(|e| e.key.0.clone()).collect(),
            });
        }
    }

    fn works() -> Dataset<Work> {
        let mut items = Vec::new();
        for year in [2018, 2019, 2020] {
            for kind in ["Painting", "Writing"] {
                items.push(Work { year, kind });
            }
        }
        Dataset::new(items)
    }

    fn controller() -> TimelineController<Work, Recorder> {
        TimelineController::new(works(), Recorder::default(), ControllerConfig::default(), StateEmitter::dummy())
            .expect("non-empty dataset")
    }

    fn last(c: &TimelineController<Work, Recorder>) -> &Rendered {
        c.surface().renders.last().expect("at least one render")
    }

    #[test]
    fn test_initial_render_at_first_key() {
        let c = controller();
        assert_eq!(c.current_index(), 0);
        assert!(!c.is_playing());
        assert_eq!(c.interval_ms(), 1500);
        assert_eq!(c.surface().renders.len(), 1);
        assert_eq!(last(&c).key, Some(2018));
        assert_eq!(last(&c).marks, vec!["Painting", "Writing"]);
    }

    #[test]
    fn test_empty_dataset_yields_no_controller() {
        let c = TimelineController::new(
            Dataset::<Work>::new(Vec::new()),
            Recorder::default(),
            ControllerConfig::default(),
            StateEmitter::dummy(),
        );
        assert!(c.is_none());
    }

    #[test]
    fn test_example_scenario() {
        let mut c = controller();
        c.step_forward();
        assert_eq!(*c.current_key(), 2019);
        c.step_forward();
        assert_eq!(*c.current_key(), 2020);
        c.step_forward();
        assert_eq!(*c.current_key(), 2018);

        c.scrub_to(5);
        assert_eq!(c.current_index(), 2);

        c.show_all();
        assert_eq!(c.mode(), RenderMode::All);
        assert_eq!(last(&c).key, None);
        assert_eq!(last(&c).marks.len(), 6);
        assert!(last(&c).marks.contains(&"2019_Writing".to_string()));
        assert_eq!(c.snapshot().key_label, None);

        // Leaves show-all and continues from the kept index
        c.step_forward();
        assert_eq!(c.mode(), RenderMode::Single);
        assert_eq!(c.current_index(), 0);
        assert_eq!(last(&c).key, Some(2018));
    }

    #[test]
    fn test_wraparound_closure() {
        for n in 1..=5 {
            let items = (0..n).map(|y| Work { year: 2000 + y, kind: "x" }).collect();
            let mut c = TimelineController::new(
                Dataset::new(items),
                Recorder::default(),
                ControllerConfig::default(),
                StateEmitter::dummy(),
            )
            .expect("non-empty");
            for _ in 0..n {
                c.step_forward();
            }
            assert_eq!(c.current_index(), 0, "n = {}", n);
        }
    }

    #[test]
    fn test_step_backward_inverts_forward() {
        let mut c = controller();
        for start in 0..3 {
            c.scrub_to(start);
            c.step_forward();
            c.step_backward();
            assert_eq!(c.current_index() as i64, start);
            c.step_backward();
            c.step_forward();
            assert_eq!(c.current_index() as i64, start);
        }
    }

    #[test]
    fn test_scrub_always_in_bounds() {
        let mut c = controller();
        for i in [-100, -1, 0, 1, 2, 3, 99, i64::MIN, i64::MAX] {
            c.scrub_to(i);
            assert!(c.current_index() < c.len());
        }
        c.scrub_to(-1);
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn test_manual_navigation_stops_autoplay() {
        let mut c = controller();
        let ops: [fn(&mut TimelineController<Work, Recorder>); 5] = [
            |c| c.step_forward(),
            |c| c.step_backward(),
            |c| c.scrub_to(1),
            |c| c.reset(),
            |c| c.show_all(),
        ];
        for op in ops {
            c.toggle_play_pause();
            assert!(c.is_playing());
            op(&mut c);
            assert!(!c.is_playing());
        }
    }

    #[test]
    fn test_toggle_twice_restores_and_leaks_nothing() {
        let mut c = controller();
        c.toggle_play_pause();
        c.toggle_play_pause();
        assert!(!c.is_playing());
        assert!(c.state().timer().is_none());

        // Many toggles, then a single stream: one step per interval
        for _ in 0..4 {
            c.toggle_play_pause();
        }
        c.toggle_play_pause();
        assert!(c.is_playing());

        let t0 = Instant::now();
        let interval = Duration::from_millis(c.interval_ms());
        assert!(!c.update_at(t0));
        let mut steps = 0;
        for ms in (0..=4 * interval.as_millis() as u64).step_by(10) {
            if c.update_at(t0 + Duration::from_millis(ms)) {
                steps += 1;
            }
        }
        assert_eq!(steps, 4);
        assert!(c.is_playing());
    }

    #[test]
    fn test_autoplay_advances_and_wraps() {
        let mut c = controller();
        c.toggle_play_pause();
        let t0 = Instant::now();
        c.update_at(t0);
        for k in 1..=3 {
            assert!(c.update_at(t0 + Duration::from_millis(1500 * k)));
        }
        // 3 steps over 3 keys: back to the start, still playing
        assert_eq!(c.current_index(), 0);
        assert!(c.is_playing());
    }

    #[test]
    fn test_paused_update_is_noop() {
        let mut c = controller();
        let t0 = Instant::now();
        assert!(!c.update_at(t0));
        assert!(!c.update_at(t0 + Duration::from_secs(60)));
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn test_set_speed_restarts_timer() {
        let mut c = controller();
        c.toggle_play_pause();
        let t0 = Instant::now();
        c.update_at(t0);

        // Most of the old interval passes, then the speed changes
        c.set_speed(600);
        assert!(c.is_playing());
        let t1 = t0 + Duration::from_millis(1400);
        assert!(!c.update_at(t1));
        // New interval counts from the re-armed anchor
        assert!(!c.update_at(t1 + Duration::from_millis(599)));
        assert!(c.update_at(t1 + Duration::from_millis(600)));
    }

    #[test]
    fn test_set_speed_clamps() {
        let mut c = controller();
        c.set_speed(1);
        assert_eq!(c.interval_ms(), 500);
        c.set_speed(100_000);
        assert_eq!(c.interval_ms(), 3000);
        assert!(!c.is_playing());
    }

    #[test]
    fn test_slider_inverts_speed() {
        let mut c = controller();
        c.set_speed_from_slider(3000);
        assert_eq!(c.interval_ms(), 500);
        c.set_speed_from_slider(1000);
        assert_eq!(c.interval_ms(), 2500);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut c = controller();
        c.scrub_to(2);
        c.set_speed(700);
        c.show_all();
        c.toggle_play_pause();
        c.reset();
        assert_eq!(c.current_index(), 0);
        assert!(!c.is_playing());
        assert_eq!(c.interval_ms(), 1500);
        assert_eq!(c.mode(), RenderMode::Single);
        assert_eq!(last(&c).key, Some(2018));
    }

    #[test]
    fn test_toggle_does_not_render() {
        let mut c = controller();
        let before = c.surface().renders.len();
        c.toggle_play_pause();
        c.set_speed(900);
        c.toggle_play_pause();
        assert_eq!(c.surface().renders.len(), before);
    }

    #[test]
    fn test_notifies_bus_on_each_transition() {
        let bus = EventBus::new();
        let seen: Arc<Mutex<Vec<PlaybackChangedEvent>>> = Arc::default();
        let s = Arc::clone(&seen);
        bus.subscribe::<PlaybackChangedEvent, _>(move |e| {
            s.lock().unwrap().push(e.clone());
        });

        let mut c = TimelineController::new(
            works(),
            Recorder::default(),
            ControllerConfig::default(),
            StateEmitter::from_emitter(bus.emitter()),
        )
        .expect("non-empty");
        c.step_forward();
        c.toggle_play_pause();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].key_label.as_deref(), Some("2019"));
        assert!(seen[2].playing);
    }

    #[test]
    fn test_handle_bus_requests() {
        let bus = EventBus::new();
        let mut c = controller();
        PlaybackCommand::ScrubTo(2).emit(&bus.emitter());
        PlaybackCommand::StepForward.emit(&bus.emitter());
        bus.emit(PlaybackChangedEvent {
            index: 0,
            len: 3,
            key_label: None,
            playing: false,
            interval_ms: 1500,
            mode: RenderMode::All,
        });

        let handled: Vec<bool> = bus.poll().iter().map(|e| c.handle_event(e)).collect();
        assert_eq!(handled, vec![true, true, false]);
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn test_automatic_tick_leaves_show_all() {
        let mut c = controller();
        c.scrub_to(2);
        c.show_all();
        c.toggle_play_pause();
        // Toggling alone keeps the all-frames view
        assert_eq!(c.mode(), RenderMode::All);

        let t0 = Instant::now();
        c.update_at(t0);
        assert!(c.update_at(t0 + Duration::from_millis(c.interval_ms())));
        assert_eq!(c.mode(), RenderMode::Single);
        assert_eq!(c.current_index(), 0);
        assert!(c.is_playing());
        assert_eq!(last(&c).key, Some(2018));
    }

    #[test]
    fn test_scrub_leaves_show_all() {
        let mut c = controller();
        c.show_all();
        c.scrub_to(1);
        assert_eq!(c.mode(), RenderMode::Single);
        assert_eq!(last(&c).mode, RenderMode::Single);
        assert_eq!(last(&c).key, Some(2019));
        assert_eq!(last(&c).marks, vec!["Painting", "Writing"]);
    }
}
