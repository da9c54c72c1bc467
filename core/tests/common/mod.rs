// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::Level;

use storefront::{
  CartError, CartLine, CartStore, MemoryStorage, NewLine, PaymentGateway, PaymentReceipt, PaymentSubmission, Result,
  SessionMirror, StockChecker, StockStatus,
};

// --- Store helpers ---

pub fn new_store() -> (MemoryStorage, CartStore<MemoryStorage>) {
  let storage = MemoryStorage::new();
  let store = CartStore::new(storage.clone());
  (storage, store)
}

pub fn widget(id: &str, price_cents: i64) -> NewLine {
  NewLine::new(id, format!("Widget {}", id), price_cents)
}

// --- Session mirror fakes ---

/// Records every pushed snapshot; optionally fails each push.
#[derive(Default)]
pub struct RecordingMirror {
  pub pushes: Mutex<Vec<Vec<CartLine>>>,
  pub fail: bool,
}

impl RecordingMirror {
  pub fn failing() -> Self {
    Self {
      pushes: Mutex::new(Vec::new()),
      fail: true,
    }
  }

  pub fn push_count(&self) -> usize {
    self.pushes.lock().len()
  }
}

#[async_trait]
impl SessionMirror for RecordingMirror {
  async fn push(&self, lines: &[CartLine]) -> Result<()> {
    self.pushes.lock().push(lines.to_vec());
    if self.fail {
      return Err(CartError::Network {
        source: anyhow::anyhow!("mirror endpoint unreachable"),
      });
    }
    Ok(())
  }
}

// --- Stock checker fake ---

/// Answers stock probes from a fixed table; unknown products are available.
#[derive(Default)]
pub struct FixedStockChecker {
  pub stock: HashMap<String, u32>,
  pub calls: AtomicUsize,
}

impl FixedStockChecker {
  pub fn with_stock(entries: &[(&str, u32)]) -> Self {
    Self {
      stock: entries.iter().map(|(id, n)| (id.to_string(), *n)).collect(),
      calls: AtomicUsize::new(0),
    }
  }

  pub fn call_count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl StockChecker for FixedStockChecker {
  async fn check(&self, product_id: &str, quantity: u32) -> Result<StockStatus> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    match self.stock.get(product_id) {
      Some(&available) => Ok(StockStatus {
        available: available >= quantity,
        stock: Some(available),
      }),
      None => Ok(StockStatus {
        available: true,
        stock: None,
      }),
    }
  }
}

// --- Payment gateway fake ---

/// Accepts every submission, recording it, unless constructed as rejecting.
#[derive(Default)]
pub struct MockGateway {
  pub submissions: Mutex<Vec<PaymentSubmission>>,
  pub reject_with: Option<String>,
}

impl MockGateway {
  pub fn rejecting(message: &str) -> Self {
    Self {
      submissions: Mutex::new(Vec::new()),
      reject_with: Some(message.to_string()),
    }
  }

  pub fn submission_count(&self) -> usize {
    self.submissions.lock().len()
  }

  pub fn last_submission(&self) -> Option<PaymentSubmission> {
    self.submissions.lock().last().cloned()
  }
}

#[async_trait]
impl PaymentGateway for MockGateway {
  async fn process(&self, submission: PaymentSubmission) -> Result<PaymentReceipt> {
    self.submissions.lock().push(submission);
    match &self.reject_with {
      Some(message) => Err(CartError::Payment(message.clone())),
      None => Ok(PaymentReceipt {
        redirect: "/confirmation/".to_string(),
      }),
    }
  }
}

pub fn arc<T>(value: T) -> Arc<T> {
  Arc::new(value)
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
