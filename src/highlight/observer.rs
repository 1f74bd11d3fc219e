//! Debounced resize observation
//!
//! The engine has no event loop, so resize observation is polled: the host
//! calls [`ResizeObserver::notify`] whenever the observed container's size may
//! have changed and [`ResizeObserver::poll`] on its own cadence. A burst of
//! notifications coalesces into a single ripe poll once the debounce window
//! has passed without further notifications.
//!
//! Browsers deliver one observation immediately after `observe()`, before any
//! actual resize. That initial delivery is modelled too: the first ripe poll
//! after [`ResizeObserver::observe`] is swallowed, and only later ones report
//! a real resize.

use std::time::{Duration, Instant};

use crate::dom::NodeId;

/// Debounce window applied between a size notification and the recompute.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Polled stand-in for a DOM `ResizeObserver` with a trailing debounce.
#[derive(Debug)]
pub struct ResizeObserver {
  target: Option<NodeId>,
  is_init_observe: bool,
  deadline: Option<Instant>,
  debounce: Duration,
}

impl ResizeObserver {
  pub fn new(debounce: Duration) -> Self {
    Self {
      target: None,
      is_init_observe: true,
      deadline: None,
      debounce,
    }
  }

  /// Starts observing `target`, replacing any previous target.
  ///
  /// Re-arms the initial-observation suppression and drops any pending
  /// notification for the old target.
  pub fn observe(&mut self, target: NodeId) {
    self.target = Some(target);
    self.is_init_observe = true;
    self.deadline = None;
  }

  /// Stops observing. Pending notifications are discarded.
  pub fn disconnect(&mut self) {
    self.target = None;
    self.deadline = None;
  }

  /// Records that the observed container's size may have changed at `now`.
  ///
  /// Each notification restarts the debounce window, so only the trailing
  /// edge of a burst becomes ripe. Ignored while nothing is observed.
  pub fn notify(&mut self, now: Instant) {
    if self.target.is_some() {
      self.deadline = Some(now + self.debounce);
    }
  }

  /// Returns true when a ripe, non-initial notification is consumed.
  ///
  /// The first ripe poll after [`observe`](Self::observe) consumes the
  /// initial observation and reports false.
  pub fn poll(&mut self, now: Instant) -> bool {
    match self.deadline {
      Some(deadline) if now >= deadline => {
        self.deadline = None;
        if self.is_init_observe {
          self.is_init_observe = false;
          false
        } else {
          true
        }
      }
      _ => false,
    }
  }

  pub fn target(&self) -> Option<NodeId> {
    self.target
  }

  pub fn is_observing(&self) -> bool {
    self.target.is_some()
  }

  /// True while a notification is waiting out its debounce window.
  pub fn is_pending(&self) -> bool {
    self.deadline.is_some()
  }

  pub fn debounce(&self) -> Duration {
    self.debounce
  }
}
