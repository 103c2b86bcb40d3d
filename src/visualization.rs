//! A mounted visualization: an optional controller plus its identity.
//!
//! Mounting never fails. A missing container or an empty dataset produces a
//! disabled visualization whose requests are ignored, which is how a page
//! section without its target element behaves.

use crate::config::ControllerConfig;
use crate::core::controller::TimelineController;
use crate::core::event_bus::{BoxedEvent, StateEmitter};
use crate::core::player_events::PlaybackCommand;
use crate::entities::{Dataset, Item};
use crate::render::Surface;
use log::{info, warn};
use std::time::Instant;

pub struct Visualization<I: Item, S: Surface<I>> {
    name: String,
    controller: Option<TimelineController<I, S>>,
}

impl<I: Item, S: Surface<I>> std::fmt::Debug for Visualization<I, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visualization")
            .field("name", &self.name)
            .field("controller", &self.controller)
            .finish()
    }
}

impl<I: Item, S: Surface<I>> Visualization<I, S> {
    /// Mount into `container`. Disabled if the container is missing or the
    /// dataset has no time keys.
    pub fn mount(
        name: impl Into<String>,
        container: Option<S>,
        dataset: Dataset<I>,
        config: ControllerConfig,
        emitter: StateEmitter,
    ) -> Self {
        let name = name.into();
        let Some(surface) = container else {
            warn!("Visualization '{}': no container, nothing to render", name);
            return Self { name, controller: None };
        };

        let controller = TimelineController::new(dataset, surface, config, emitter);
        match &controller {
            Some(c) => info!("Visualization '{}' mounted with {} keys", name, c.len()),
            None => warn!("Visualization '{}': empty dataset, controls disabled", name),
        }
        Self { name, controller }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.controller.is_some()
    }

    pub fn controller(&self) -> Option<&TimelineController<I, S>> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut TimelineController<I, S>> {
        self.controller.as_mut()
    }

    /// Apply a request; ignored when disabled
    pub fn apply(&mut self, command: PlaybackCommand) -> bool {
        match self.controller.as_mut() {
            Some(c) => {
                c.apply(command);
                true
            }
            None => false,
        }
    }

    /// Route a bus event; false when disabled or not a playback request
    pub fn handle_event(&mut self, event: &BoxedEvent) -> bool {
        self.controller
            .as_mut()
            .is_some_and(|c| c.handle_event(event))
    }

    /// Pump autoplay; false when disabled or no step happened
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    pub fn update_at(&mut self, now: Instant) -> bool {
        self.controller.as_mut().is_some_and(|c| c.update_at(now))
    }

    /// Tear down: drops the controller and its timer
    pub fn unmount(&mut self) {
        if self.controller.take().is_some() {
            info!("Visualization '{}' unmounted", self.name);
        }
    }
}
