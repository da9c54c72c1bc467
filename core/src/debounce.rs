// core/src/debounce.rs

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Trailing-edge debouncer: `call` schedules the closure to run after the
/// quiet period, and any new call during that period cancels the pending one
/// and restarts the timer. Rapid input therefore coalesces into a single
/// invocation.
///
/// Runs on the ambient tokio runtime; under a paused test clock it is fully
/// deterministic, so no real time is needed in tests.
pub struct Debouncer {
  delay: Duration,
  pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: Mutex::new(None),
    }
  }

  /// Schedules `f` after the quiet period, replacing any pending invocation.
  pub fn call<F>(&self, f: F)
  where
    F: FnOnce() + Send + 'static,
  {
    // Capture the deadline now so the quiet period starts at the call, not at
    // the spawned task's first poll — keeps paused-clock tests deterministic.
    let deadline = tokio::time::Instant::now() + self.delay;
    let task = tokio::spawn(async move {
      tokio::time::sleep_until(deadline).await;
      f();
    });
    if let Some(previous) = self.pending.lock().replace(task) {
      previous.abort();
    }
  }

  /// Drops a pending invocation without running it.
  pub fn cancel(&self) {
    if let Some(previous) = self.pending.lock().take() {
      previous.abort();
    }
  }
}

impl Drop for Debouncer {
  fn drop(&mut self) {
    self.cancel();
  }
}
