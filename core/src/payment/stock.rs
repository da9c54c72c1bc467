// core/src/payment/stock.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cart::Cart;
use crate::error::{CartError, Result};

/// One line the server refused during pre-submission re-validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockConflict {
  pub product: String,
  pub requested: u32,
  pub available: u32,
}

/// Server answer to a per-product stock probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StockStatus {
  pub available: bool,
  #[serde(default)]
  pub stock: Option<u32>,
}

/// Pre-submission stock re-validation. This is the one place where server
/// state overrides the client cart before an order is allowed out the door.
#[async_trait]
pub trait StockChecker: Send + Sync {
  async fn check(&self, product_id: &str, quantity: u32) -> Result<StockStatus>;
}

/// Probes every cart line and gathers the refusals. A transport failure here
/// is a blocking error, unlike the advisory session-mirror sync.
pub async fn revalidate_cart(checker: &dyn StockChecker, cart: &Cart) -> Result<()> {
  let mut conflicts = Vec::new();
  for line in cart.lines() {
    let status = checker.check(&line.id, line.quantity).await?;
    if !status.available {
      conflicts.push(StockConflict {
        product: line.name.clone(),
        requested: line.quantity,
        available: status.stock.unwrap_or(0),
      });
    }
  }
  if conflicts.is_empty() {
    Ok(())
  } else {
    Err(CartError::StockConflicts { conflicts })
  }
}

/// POSTs `{productId, quantity}` to the storefront's stock-check endpoint.
pub struct HttpStockChecker {
  client: reqwest::Client,
  endpoint: String,
}

impl HttpStockChecker {
  pub fn new(endpoint: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      endpoint: endpoint.into(),
    }
  }
}

#[async_trait]
impl StockChecker for HttpStockChecker {
  async fn check(&self, product_id: &str, quantity: u32) -> Result<StockStatus> {
    let response = self
      .client
      .post(&self.endpoint)
      .json(&json!({ "productId": product_id, "quantity": quantity }))
      .send()
      .await?
      .error_for_status()?;
    Ok(response.json::<StockStatus>().await?)
  }
}
