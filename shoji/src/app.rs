mod dispatch;
mod replay;

pub use dispatch::dispatch_command;
pub use replay::{parse_script, ScriptCommand};

use std::sync::mpsc as std_mpsc;

use shoji_proto::Command;

use crate::core::{Config, ConfigError, State, WindowHandle};
use crate::event::LifecycleEvent;
use crate::event_emitter::EventEmitter;
use crate::platform::HookService;
use crate::subclass::{HookFailure, SubclassingCoordinator, SystemBitness};

/// Wires the workspace model to the subclassing coordinator.
///
/// Commands are applied to the [`State`], whose lifecycle events are then
/// drained from the channel and handed to the coordinator in arrival order.
pub struct App<P: HookService> {
    state: State,
    event_rx: std_mpsc::Receiver<LifecycleEvent>,
    coordinator: SubclassingCoordinator<P>,
}

impl<P: HookService> App<P> {
    pub fn new(
        config: &Config,
        platform: P,
        bitness: SystemBitness,
        manager: WindowHandle,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (event_tx, event_rx) = std_mpsc::channel();
        let state = State::new(config, EventEmitter::new(event_tx));
        let mut coordinator =
            SubclassingCoordinator::new(platform, config.ignore_list()?, bitness, manager);
        coordinator.initialize(config.workspace_count());

        Ok(Self {
            state,
            event_rx,
            coordinator,
        })
    }

    pub fn dispatch(&mut self, cmd: &Command) -> Vec<HookFailure> {
        tracing::debug!("Dispatching command: {:?}", cmd);
        dispatch_command(&mut self.state, cmd);
        self.process_events()
    }

    fn process_events(&mut self) -> Vec<HookFailure> {
        let mut failures = Vec::new();
        for event in self.event_rx.try_iter() {
            tracing::debug!(
                "Received event for workspace {}: {:?}",
                event.workspace().ordinal_id(),
                event
            );
            failures.extend(self.coordinator.handle_event(&event));
        }
        failures
    }

    pub fn shutdown(&mut self) -> Vec<HookFailure> {
        let mut failures = self.process_events();
        failures.extend(self.coordinator.shutdown());
        failures
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn coordinator(&self) -> &SubclassingCoordinator<P> {
        &self.coordinator
    }
}
