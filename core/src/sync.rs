// core/src/sync.rs

//! Best-effort mirroring of the client cart into the server session.
//!
//! The mirror is advisory: the checkout endpoint may consult it, but the
//! client copy stays authoritative until an order is actually placed. So the
//! push is fire-and-forget: one attempt, no retry, failures logged and
//! swallowed, and the caller never blocks on it. Overlapping pushes are not
//! ordered; the most recent cart state wins on the next push.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cart::{Cart, CartLine};
use crate::error::Result;

#[async_trait]
pub trait SessionMirror: Send + Sync {
  async fn push(&self, lines: &[CartLine]) -> Result<()>;
}

/// Handle to a spawned best-effort task. Distinct from must-complete work:
/// dropping it is the normal case, and nothing observes its outcome. Tests
/// can await [`BestEffort::finished`] to deflake themselves.
#[derive(Debug)]
pub struct BestEffort(JoinHandle<()>);

impl BestEffort {
  pub async fn finished(self) {
    // The task never panics on mirror failure, but abort during shutdown is
    // indistinguishable from completion for a best-effort push.
    let _ = self.0.await;
  }
}

pub struct CartSyncClient {
  mirror: Arc<dyn SessionMirror>,
}

impl CartSyncClient {
  pub fn new(mirror: Arc<dyn SessionMirror>) -> Self {
    Self { mirror }
  }

  /// Pushes a snapshot of the cart to the session mirror. Returns
  /// immediately; the single attempt happens on a spawned task and its
  /// failure is logged, never surfaced.
  pub fn sync(&self, cart: &Cart) -> BestEffort {
    let mirror = Arc::clone(&self.mirror);
    let lines = cart.lines().to_vec();
    BestEffort(tokio::spawn(async move {
      match mirror.push(&lines).await {
        Ok(()) => debug!(lines = lines.len(), "Cart mirrored to server session"),
        Err(e) => warn!(error = %e, "Cart sync failed; continuing without mirror"),
      }
    }))
  }
}

/// POSTs `{"cart": [...]}` to the session-mirror endpoint. No meaningful
/// response contract; any non-transport status is ignored.
pub struct HttpSessionMirror {
  client: reqwest::Client,
  endpoint: String,
}

impl HttpSessionMirror {
  pub fn new(endpoint: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      endpoint: endpoint.into(),
    }
  }
}

#[async_trait]
impl SessionMirror for HttpSessionMirror {
  async fn push(&self, lines: &[CartLine]) -> Result<()> {
    self
      .client
      .post(&self.endpoint)
      .json(&json!({ "cart": lines }))
      .send()
      .await?;
    Ok(())
  }
}
