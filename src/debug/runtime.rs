//! Runtime debug toggles
//!
//! Behavior switches sourced from `OVERMARK_*` environment variables, read
//! once per process. Tests install temporary overrides through
//! [`with_runtime_toggles`] instead of mutating the process environment.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::RwLock;

/// Parsed runtime debug/configuration toggles sourced from `OVERMARK_*`
/// environment variables.
///
/// Values are captured once (via [`RuntimeToggles::from_env`]) and then
/// reused for the process lifetime. Callers can also construct instances
/// manually to override environment-derived behavior when embedding the
/// library.
#[derive(Debug, Clone, Default)]
pub struct RuntimeToggles {
  raw: HashMap<String, String>,
}

impl RuntimeToggles {
  /// Parse all `OVERMARK_*` environment variables into a toggle map.
  pub fn from_env() -> Self {
    let raw = std::env::vars()
      .filter(|(k, _)| k.starts_with("OVERMARK_"))
      .collect::<HashMap<_, _>>();
    Self { raw }
  }

  /// Construct a toggle set from a provided map of key/value pairs.
  pub fn from_map(raw: HashMap<String, String>) -> Self {
    Self { raw }
  }

  /// Returns the raw string value for a toggle, if set.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.raw.get(key).map(String::as_str)
  }

  /// Returns true when the toggle is present and truthy (`!= 0`/`false`/`off`).
  pub fn truthy(&self, key: &str) -> bool {
    self
      .get(key)
      .map(|v| !matches_ignore_case(v, &["0", "false", "off"]))
      .unwrap_or(false)
  }

  /// Parse a toggle as `u64`, returning `None` when unset or unparseable.
  pub fn u64(&self, key: &str) -> Option<u64> {
    self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
  }

  /// Skip paint procedure registration and invocation entirely. Highlight
  /// sessions still write their custom properties.
  pub fn no_paint(&self) -> bool {
    self.truthy("OVERMARK_NO_PAINT")
  }

  /// Resize debounce window override, in milliseconds.
  pub fn debounce_ms(&self) -> Option<u64> {
    self.u64("OVERMARK_DEBOUNCE_MS")
  }

  /// Log each highlight recompute triggered by a resize notification.
  pub fn hl_trace(&self) -> bool {
    self.truthy("OVERMARK_HL_TRACE")
  }
}

fn matches_ignore_case(value: &str, candidates: &[&str]) -> bool {
  let lower = value.trim().to_ascii_lowercase();
  candidates.iter().any(|c| lower == *c)
}

static DEFAULT_TOGGLES: OnceLock<Arc<RuntimeToggles>> = OnceLock::new();
static ACTIVE_TOGGLES: OnceLock<RwLock<Arc<RuntimeToggles>>> = OnceLock::new();

/// Returns the currently active runtime toggles.
///
/// Defaults to `RuntimeToggles::from_env()` if no overrides are installed.
pub fn runtime_toggles() -> Arc<RuntimeToggles> {
  ACTIVE_TOGGLES
    .get_or_init(|| RwLock::new(default_toggles()))
    .read()
    .expect("runtime toggles lock poisoned")
    .clone()
}

fn default_toggles() -> Arc<RuntimeToggles> {
  DEFAULT_TOGGLES
    .get_or_init(|| Arc::new(RuntimeToggles::from_env()))
    .clone()
}

/// Guard that restores the previous active toggles when dropped.
pub struct RuntimeTogglesGuard {
  previous: Arc<RuntimeToggles>,
}

impl Drop for RuntimeTogglesGuard {
  fn drop(&mut self) {
    if let Some(lock) = ACTIVE_TOGGLES.get() {
      if let Ok(mut guard) = lock.write() {
        *guard = self.previous.clone();
      }
    }
  }
}

/// Install the provided toggles as the active set for the duration of the
/// returned guard.
pub fn set_runtime_toggles(toggles: Arc<RuntimeToggles>) -> RuntimeTogglesGuard {
  let previous = ACTIVE_TOGGLES
    .get_or_init(|| RwLock::new(default_toggles()))
    .write()
    .expect("runtime toggles lock poisoned")
    .clone();
  if let Some(lock) = ACTIVE_TOGGLES.get() {
    if let Ok(mut guard) = lock.write() {
      *guard = toggles;
    }
  }
  RuntimeTogglesGuard { previous }
}

/// Convenience helper to run a closure with a temporary toggles override.
pub fn with_runtime_toggles<T>(toggles: Arc<RuntimeToggles>, f: impl FnOnce() -> T) -> T {
  let guard = set_runtime_toggles(toggles);
  let result = f();
  drop(guard);
  result
}
