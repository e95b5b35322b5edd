//! Presentation wiring: the pieces the host's UI layer reads and drives.
//!
//! `Shell` owns the policy engine and the connectivity monitor, mirrors
//! connectivity into [`EngineState`], and exposes what the screen needs:
//! whether to show the offline banner or the loading indicator, the banner's
//! retry action, and the hardware back button.
//!
//! ```text
//! reachability sensor ──notify──▶ ConnectivityMonitor ──listener──▶ EngineState.connected
//! hardware back ───────────────▶ PolicyEngine::request_go_back
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use tracing::debug;

use crate::config::Config;
use crate::connectivity::{ConnectivityMonitor, ReachabilitySensor, Subscription};
use crate::engine::{EngineState, PolicyEngine};
use crate::surface::{EventSink, ExternalOpener, Surface};

pub struct Shell<S, O, E, R> {
    engine: Rc<RefCell<PolicyEngine<S, O, E>>>,
    monitor: ConnectivityMonitor<R>,
    start_url: String,
    _connectivity: Subscription,
}

impl<S, O, E, R> Shell<S, O, E, R>
where
    S: Surface + 'static,
    O: ExternalOpener + 'static,
    E: EventSink + 'static,
    R: ReachabilitySensor,
{
    pub fn new(
        engine: PolicyEngine<S, O, E>,
        monitor: ConnectivityMonitor<R>,
        start_url: impl Into<String>,
    ) -> Self {
        let engine = Rc::new(RefCell::new(engine));
        engine.borrow_mut().set_connected(monitor.connected());

        let weak = Rc::downgrade(&engine);
        let subscription = monitor.subscribe(move |connected| {
            if let Some(engine) = weak.upgrade() {
                engine.borrow_mut().set_connected(connected);
            }
        });

        Self {
            engine,
            monitor,
            start_url: start_url.into(),
            _connectivity: subscription,
        }
    }

    pub fn from_config(config: &Config, surface: S, opener: O, sink: E, sensor: R) -> Self {
        Self::new(
            PolicyEngine::from_config(config, surface, opener, sink),
            ConnectivityMonitor::new(sensor),
            config.site.start_url.clone(),
        )
    }

    /// Loads the start page.
    pub fn start(&self) {
        self.engine.borrow_mut().start(&self.start_url);
    }

    pub fn engine(&self) -> Ref<'_, PolicyEngine<S, O, E>> {
        self.engine.borrow()
    }

    pub fn engine_mut(&self) -> RefMut<'_, PolicyEngine<S, O, E>> {
        self.engine.borrow_mut()
    }

    pub fn monitor(&self) -> &ConnectivityMonitor<R> {
        &self.monitor
    }

    pub fn state(&self) -> EngineState {
        self.engine.borrow().state()
    }

    pub fn offline_banner_visible(&self) -> bool {
        !self.state().connected
    }

    pub fn loading_indicator_visible(&self) -> bool {
        self.state().loading
    }

    /// "Try again" on the offline banner.
    pub fn retry_connectivity(&self) -> bool {
        let connected = self.monitor.recheck();
        debug!(connected, "Connectivity retry");
        connected
    }

    /// Hardware back button. `false` means the caller should fall through to
    /// its default behavior (usually leaving the app).
    pub fn on_hardware_back(&self) -> bool {
        self.engine.borrow_mut().request_go_back()
    }
}
