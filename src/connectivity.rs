//! Connectivity monitor.
//!
//! The platform reachability sensor pushes changes through
//! [`ConnectivityMonitor::notify`]; the offline banner's retry action polls it
//! through [`ConnectivityMonitor::recheck`]. Navigation policy never reads
//! from here.
//!
//! Connectivity is assumed `true` until something says otherwise, and a
//! failing sensor also reads as connected: a false offline banner is worse
//! than a missed one.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ReachabilityError {
    #[error("reachability sensor unavailable")]
    Unavailable,
    #[error("reachability query failed: {0}")]
    Query(String),
}

/// On-demand reachability query provided by the platform.
pub trait ReachabilitySensor {
    fn fetch(&self) -> Result<bool, ReachabilityError>;
}

type Listener = Rc<RefCell<Box<dyn FnMut(bool)>>>;

struct Listeners {
    connected: bool,
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Single-threaded: listeners live behind `Rc<RefCell<..>>` and run on the
/// thread that calls `notify`/`recheck`.
pub struct ConnectivityMonitor<R> {
    sensor: R,
    inner: Rc<RefCell<Listeners>>,
}

impl<R: ReachabilitySensor> ConnectivityMonitor<R> {
    pub fn new(sensor: R) -> Self {
        Self {
            sensor,
            inner: Rc::new(RefCell::new(Listeners {
                connected: true,
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn connected(&self) -> bool {
        self.inner.borrow().connected
    }

    pub fn sensor(&self) -> &R {
        &self.sensor
    }

    /// Registers `on_change`, called on every connectivity transition.
    /// The listener stays registered as long as the returned guard lives.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, on_change: impl FnMut(bool) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let listener: Box<dyn FnMut(bool)> = Box::new(on_change);
        inner.entries.push((id, Rc::new(RefCell::new(listener))));
        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Reachability change reported by the platform. Listeners only run when
    /// the value actually changes.
    ///
    /// A listener may call `notify` or `recheck` itself; the state still
    /// updates, but that listener is not called again for the nested change.
    pub fn notify(&self, connected: bool) {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            if inner.connected == connected {
                return;
            }
            inner.connected = connected;
            inner.entries.iter().map(|(_, l)| Rc::clone(l)).collect()
        };

        info!(connected, "Connectivity changed");
        // Borrow released: listeners may call back into the monitor. A
        // listener already running further up the stack is skipped for the
        // nested transition.
        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut on_change) => on_change(connected),
                Err(_) => debug!(connected, "Listener re-entered, skipping nested call"),
            }
        }
    }

    /// Polls the sensor (retry button). Sensor errors count as connected.
    pub fn recheck(&self) -> bool {
        let connected = match self.sensor.fetch() {
            Ok(connected) => connected,
            Err(e) => {
                warn!(error = %e, "Reachability check failed, assuming connected");
                true
            }
        };
        self.notify(connected);
        connected
    }
}

/// Listener registration guard. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    inner: Weak<RefCell<Listeners>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedSensor;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<bool>>>, impl FnMut(bool) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |c| sink.borrow_mut().push(c))
    }

    #[test]
    fn test_starts_connected_without_polling() {
        let monitor = ConnectivityMonitor::new(FixedSensor::reporting(false));
        assert!(monitor.connected());
        assert_eq!(monitor.sensor().fetches.get(), 0);
    }

    #[test]
    fn test_notify_calls_listeners_on_change_only() {
        let monitor = ConnectivityMonitor::new(FixedSensor::unavailable());
        let (seen, listener) = recorder();
        let _sub = monitor.subscribe(listener);

        monitor.notify(true); // no change
        monitor.notify(false);
        monitor.notify(false); // no change
        monitor.notify(true);

        assert_eq!(*seen.borrow(), vec![false, true]);
        assert!(monitor.connected());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let monitor = ConnectivityMonitor::new(FixedSensor::unavailable());
        let (seen, listener) = recorder();
        let sub = monitor.subscribe(listener);
        monitor.notify(false);
        sub.unsubscribe();
        monitor.notify(true);
        assert_eq!(*seen.borrow(), vec![false]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let monitor = ConnectivityMonitor::new(FixedSensor::unavailable());
        let count = Rc::new(Cell::new(0));
        {
            let c = Rc::clone(&count);
            let _sub = monitor.subscribe(move |_| c.set(c.get() + 1));
            monitor.notify(false);
        }
        monitor.notify(true);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscription_outlives_monitor() {
        let monitor = ConnectivityMonitor::new(FixedSensor::unavailable());
        let sub = monitor.subscribe(|_| {});
        drop(monitor);
        sub.unsubscribe();
    }

    #[test]
    fn test_recheck_reports_sensor_value() {
        let monitor = ConnectivityMonitor::new(FixedSensor::reporting(false));
        let (seen, listener) = recorder();
        let _sub = monitor.subscribe(listener);

        assert!(!monitor.recheck());
        assert!(!monitor.connected());

        monitor.sensor().set(Some(true));
        assert!(monitor.recheck());
        assert_eq!(*seen.borrow(), vec![false, true]);
        assert_eq!(monitor.sensor().fetches.get(), 2);
    }

    #[test]
    fn test_recheck_sensor_failure_fails_open() {
        let monitor = ConnectivityMonitor::new(FixedSensor::reporting(false));
        monitor.recheck();
        assert!(!monitor.connected());

        monitor.sensor().set(None);
        assert!(monitor.recheck());
        assert!(monitor.connected());
    }

    #[test]
    fn test_listener_reentering_notify_does_not_panic() {
        let monitor = Rc::new(ConnectivityMonitor::new(FixedSensor::unavailable()));
        let (seen, mut record) = recorder();
        let weak = Rc::downgrade(&monitor);
        let _sub = monitor.subscribe(move |connected| {
            record(connected);
            // Flap straight back online from inside the callback.
            if !connected && let Some(m) = weak.upgrade() {
                m.notify(true);
            }
        });

        monitor.notify(false);
        assert!(monitor.connected());
        // The nested `true` transition skipped the listener already running.
        assert_eq!(*seen.borrow(), vec![false]);

        monitor.notify(false);
        assert_eq!(*seen.borrow(), vec![false, false]);
    }

    #[test]
    fn test_listener_reentering_recheck_does_not_panic() {
        let monitor = Rc::new(ConnectivityMonitor::new(FixedSensor::reporting(true)));
        let calls = Rc::new(Cell::new(0));
        let weak = Rc::downgrade(&monitor);
        let c = Rc::clone(&calls);
        let _sub = monitor.subscribe(move |_| {
            c.set(c.get() + 1);
            if let Some(m) = weak.upgrade() {
                m.recheck();
            }
        });

        monitor.notify(false);
        assert!(monitor.connected());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_listener_can_read_monitor_state() {
        let monitor = Rc::new(ConnectivityMonitor::new(FixedSensor::unavailable()));
        let observed = Rc::new(Cell::new(None));
        let weak = Rc::downgrade(&monitor);
        let o = Rc::clone(&observed);
        let _sub = monitor.subscribe(move |_| {
            if let Some(m) = weak.upgrade() {
                o.set(Some(m.connected()));
            }
        });
        monitor.notify(false);
        assert_eq!(observed.get(), Some(false));
    }
}
