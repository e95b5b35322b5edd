//! Recording collaborators for unit tests.
//!
//! Each double stores what the engine asked of it so assertions can inspect
//! the exact sequence of surface commands, hand-offs and app events.

use std::cell::Cell;

use crate::connectivity::{ReachabilityError, ReachabilitySensor};
use crate::events::AppEvent;
use crate::surface::{EventSink, ExternalOpener, HandoffError, Surface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    Load(String),
    GoBack,
    StopLoading,
    Inject(String),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<SurfaceCommand>,
}

impl Surface for RecordingSurface {
    fn load_url(&mut self, url: &str) {
        self.commands.push(SurfaceCommand::Load(url.to_string()));
    }

    fn go_back(&mut self) {
        self.commands.push(SurfaceCommand::GoBack);
    }

    fn stop_loading(&mut self) {
        self.commands.push(SurfaceCommand::StopLoading);
    }

    fn inject_script(&mut self, script: &str) {
        self.commands.push(SurfaceCommand::Inject(script.to_string()));
    }
}

/// Records every URL it was asked to open. A failing opener still records
/// the attempt.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    pub opened: Vec<String>,
    fail: bool,
}

impl RecordingOpener {
    pub fn failing() -> Self {
        Self {
            opened: Vec::new(),
            fail: true,
        }
    }
}

impl ExternalOpener for RecordingOpener {
    fn open(&mut self, url: &str) -> Result<(), HandoffError> {
        self.opened.push(url.to_string());
        if self.fail {
            return Err(HandoffError::NoHandler(url.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: AppEvent) {
        self.events.push(event);
    }
}

/// Sensor returning a scripted answer, or an error when `None`.
#[derive(Debug, Default)]
pub struct FixedSensor {
    answer: Cell<Option<bool>>,
    pub fetches: Cell<usize>,
}

impl FixedSensor {
    pub fn reporting(connected: bool) -> Self {
        Self {
            answer: Cell::new(Some(connected)),
            fetches: Cell::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set(&self, connected: Option<bool>) {
        self.answer.set(connected);
    }
}

impl ReachabilitySensor for FixedSensor {
    fn fetch(&self) -> Result<bool, ReachabilityError> {
        self.fetches.set(self.fetches.get() + 1);
        self.answer.get().ok_or(ReachabilityError::Unavailable)
    }
}
