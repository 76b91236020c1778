use std::sync::Arc;
use tokio::sync::watch;

/// A single shared integer with three mutators.
///
/// Clones are handles onto the same value, so every view holding one sees
/// mutations immediately. Arithmetic saturates at the `i64` bounds.
#[derive(Debug, Clone)]
pub struct CounterStore {
  tx: Arc<watch::Sender<i64>>,
}

impl Default for CounterStore {
  fn default() -> Self {
    Self::new()
  }
}

impl CounterStore {
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(0);
    Self { tx: Arc::new(tx) }
  }

  pub fn count(&self) -> i64 {
    *self.tx.borrow()
  }

  pub fn increment(&self) {
    self.tx.send_modify(|count| *count = count.saturating_add(1));
  }

  pub fn decrement(&self) {
    self.tx.send_modify(|count| *count = count.saturating_sub(1));
  }

  pub fn reset(&self) {
    self.tx.send_replace(0);
  }

  /// Receiver notified on every mutation
  pub fn subscribe(&self) -> watch::Receiver<i64> {
    self.tx.subscribe()
  }
}
