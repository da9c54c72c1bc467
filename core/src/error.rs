// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::payment::stock::StockConflict;
use crate::payment::validate::ValidationReport;

#[derive(Debug, Error)]
pub enum CartError {
  /// A new line could not be added because the product has no purchasable stock.
  #[error("Product '{product_id}' is out of stock")]
  OutOfStock { product_id: String },

  /// A quantity change was rejected because it would exceed the known stock limit.
  #[error("Stock limited to {limit} units for product '{product_id}'")]
  StockExceeded { product_id: String, limit: u32 },

  /// Aggregated client-side validation failures. Submission is blocked while
  /// this is non-empty; all messages are surfaced together.
  #[error("Validation failed: {0}")]
  Validation(ValidationReport),

  /// The server's stock re-validation overrode the client's view of the cart.
  /// This is the one pre-submission case where server state wins.
  #[error("{} line(s) no longer have sufficient stock", conflicts.len())]
  StockConflicts { conflicts: Vec<StockConflict> },

  /// A payment dispatch was rejected with a general (unstructured) message.
  #[error("Payment failed: {0}")]
  Payment(String),

  #[error("Storage backend failure: {source}")]
  Storage {
    #[from]
    source: StorageError,
  },

  /// Transport failure talking to the stock-check or payment endpoint.
  /// Sync-client failures never surface as this; they are logged and dropped.
  #[error("Network error: {source}")]
  Network {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl From<reqwest::Error> for CartError {
  fn from(err: reqwest::Error) -> Self {
    CartError::Network { source: err.into() }
  }
}

// Allow anyhow::Error from helper code to flow into the crate error with `?`.
impl From<AnyhowError> for CartError {
  fn from(err: AnyhowError) -> Self {
    CartError::Internal(err.to_string())
  }
}

/// Failure of the injected key-value storage backend.
///
/// The cart store swallows `ParseError`-class problems itself (a corrupt
/// persisted cart loads as empty); backend failures are the only storage
/// condition callers ever see.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("Storage read failed for key '{key}': {source}")]
  Read {
    key: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Storage write failed for key '{key}': {source}")]
  Write {
    key: String,
    #[source]
    source: AnyhowError,
  },
}

pub type Result<T, E = CartError> = std::result::Result<T, E>;
