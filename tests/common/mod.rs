//! Shared collaborators for the integration tests.
//!
//! Each one records what the engine asked of it, so a scenario can assert on
//! the exact surface commands and hand-offs.

use ordershell::connectivity::{ReachabilityError, ReachabilitySensor};
use ordershell::events::AppEvent;
use ordershell::surface::{EventSink, ExternalOpener, HandoffError, Surface};

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

#[derive(Debug, Default)]
pub struct RecordingOpener {
    pub opened: Vec<String>,
}

impl ExternalOpener for RecordingOpener {
    fn open(&mut self, url: &str) -> Result<(), HandoffError> {
        self.opened.push(url.to_string());
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

/// Sensor that always reports the same reachability.
#[derive(Debug)]
pub struct ConstantSensor(pub bool);

impl ReachabilitySensor for ConstantSensor {
    fn fetch(&self) -> Result<bool, ReachabilityError> {
        Ok(self.0)
    }
}
