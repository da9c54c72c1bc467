// core/src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::{CartError, Result};

/// Runtime configuration for the storefront engine.
///
/// Endpoint paths, pricing policy, and storage keys all come from the
/// environment with sensible defaults baked in, so an embedding that sets
/// nothing gets the stock storefront policy (20% tax, free shipping, `cart`
/// as the durable key).
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
  pub base_url: String,
  pub cart_sync_path: String,
  pub stock_check_path: String,
  pub payment_path: String,

  /// Fixed tax rate applied by the payment page on top of the cart subtotal.
  pub tax_rate: f64,
  /// Flat shipping cost in minor currency units. 0 = free shipping.
  pub shipping_cost_cents: i64,

  pub cart_storage_key: String,
  pub autosave_storage_key: String,
  pub clear_marker_key: String,

  /// Quiet period for the payment-form autosave debouncer.
  pub autosave_debounce: Duration,
}

impl StorefrontConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| env::var(var_name).ok();

    let base_url = get_env("STOREFRONT_BASE_URL").unwrap_or_else(|| "http://127.0.0.1:8000".to_string());
    let cart_sync_path = get_env("STOREFRONT_CART_SYNC_PATH").unwrap_or_else(|| "/cart/sync/".to_string());
    let stock_check_path = get_env("STOREFRONT_STOCK_CHECK_PATH").unwrap_or_else(|| "/check-stock/".to_string());
    let payment_path = get_env("STOREFRONT_PAYMENT_PATH").unwrap_or_else(|| "/payment/process/".to_string());

    let tax_rate = get_env("STOREFRONT_TAX_RATE")
      .unwrap_or_else(|| "0.20".to_string())
      .parse::<f64>()
      .map_err(|e| CartError::Config(format!("Invalid STOREFRONT_TAX_RATE: {}", e)))?;
    if !(0.0..=1.0).contains(&tax_rate) {
      return Err(CartError::Config(format!(
        "STOREFRONT_TAX_RATE must be within [0, 1], got {}",
        tax_rate
      )));
    }

    let shipping_cost_cents = get_env("STOREFRONT_SHIPPING_COST_CENTS")
      .unwrap_or_else(|| "0".to_string())
      .parse::<i64>()
      .map_err(|e| CartError::Config(format!("Invalid STOREFRONT_SHIPPING_COST_CENTS: {}", e)))?;

    let autosave_debounce_ms = get_env("STOREFRONT_AUTOSAVE_DEBOUNCE_MS")
      .unwrap_or_else(|| "500".to_string())
      .parse::<u64>()
      .map_err(|e| CartError::Config(format!("Invalid STOREFRONT_AUTOSAVE_DEBOUNCE_MS: {}", e)))?;

    let config = Self {
      base_url,
      cart_sync_path,
      stock_check_path,
      payment_path,
      tax_rate,
      shipping_cost_cents,
      cart_storage_key: get_env("STOREFRONT_CART_KEY").unwrap_or_else(|| "cart".to_string()),
      autosave_storage_key: get_env("STOREFRONT_AUTOSAVE_KEY").unwrap_or_else(|| "payment_form_data".to_string()),
      clear_marker_key: get_env("STOREFRONT_CLEAR_MARKER_KEY").unwrap_or_else(|| "clear_cart".to_string()),
      autosave_debounce: Duration::from_millis(autosave_debounce_ms),
    };

    tracing::info!("Storefront configuration loaded successfully.");
    Ok(config)
  }

  pub fn cart_sync_url(&self) -> String {
    format!("{}{}", self.base_url, self.cart_sync_path)
  }

  pub fn stock_check_url(&self) -> String {
    format!("{}{}", self.base_url, self.stock_check_path)
  }

  pub fn payment_url(&self) -> String {
    format!("{}{}", self.base_url, self.payment_path)
  }
}

impl Default for StorefrontConfig {
  fn default() -> Self {
    Self {
      base_url: "http://127.0.0.1:8000".to_string(),
      cart_sync_path: "/cart/sync/".to_string(),
      stock_check_path: "/check-stock/".to_string(),
      payment_path: "/payment/process/".to_string(),
      tax_rate: 0.20,
      shipping_cost_cents: 0,
      cart_storage_key: "cart".to_string(),
      autosave_storage_key: "payment_form_data".to_string(),
      clear_marker_key: "clear_cart".to_string(),
      autosave_debounce: Duration::from_millis(500),
    }
  }
}
