// core/src/cart/store.rs

//! The canonical cart aggregate and its persistence.
//!
//! Every mutation follows the same shape: load the whole cart, change it in
//! memory, then write the whole serialized cart back in a single storage
//! operation. There is no partial write. Mutations are expected to run on a
//! single UI thread, so the store carries no lock of its own; another tab
//! writing the same key is a last-writer-wins race the domain accepts.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::cart::line::{Cart, CartLine, LineKey, Totals, UNBOUNDED_STOCK};
use crate::error::{CartError, Result};
use crate::payment::validate::ValidationReport;
use crate::storage::StorageBackend;

pub const DEFAULT_CART_KEY: &str = "cart";

/// Input to [`CartStore::add_line`], carrying the product data known at
/// add-time. Quantity defaults to 1.
#[derive(Debug, Clone)]
pub struct NewLine {
  pub id: String,
  pub name: String,
  pub unit_price_cents: i64,
  pub image_url: Option<String>,
  pub quantity: u32,
  pub stock_limit: Option<u32>,
  pub options: Option<BTreeMap<String, String>>,
  pub sku: Option<String>,
}

impl NewLine {
  pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price_cents: i64) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      unit_price_cents,
      image_url: None,
      quantity: 1,
      stock_limit: None,
      options: None,
      sku: None,
    }
  }

  pub fn image_url(mut self, url: impl Into<String>) -> Self {
    self.image_url = Some(url.into());
    self
  }

  pub fn quantity(mut self, quantity: u32) -> Self {
    self.quantity = quantity;
    self
  }

  pub fn stock_limit(mut self, limit: u32) -> Self {
    self.stock_limit = Some(limit);
    self
  }

  pub fn options(mut self, options: BTreeMap<String, String>) -> Self {
    self.options = Some(options);
    self
  }

  pub fn sku(mut self, sku: impl Into<String>) -> Self {
    self.sku = Some(sku.into());
    self
  }

  fn key(&self) -> LineKey {
    LineKey::new(&self.id, self.options.as_ref())
  }
}

/// Result of an add: the final quantity of the touched line, and whether the
/// stock limit truncated the requested amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
  /// A new line was appended.
  Added { quantity: u32 },
  /// An existing `(id, options)` line absorbed the full requested quantity.
  Merged { quantity: u32 },
  /// The line grew, but less than requested: it now sits at the stock limit.
  Clamped { quantity: u32, limit: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
  Updated { quantity: u32 },
  /// The target quantity was zero or below, so the line was removed.
  Removed,
  /// No line matched the given `(id, options)` identity.
  NotFound,
}

/// Owner of the persisted cart under a fixed storage key.
pub struct CartStore<S: StorageBackend> {
  storage: S,
  key: String,
}

impl<S: StorageBackend> CartStore<S> {
  pub fn new(storage: S) -> Self {
    Self::with_key(storage, DEFAULT_CART_KEY)
  }

  pub fn with_key(storage: S, key: impl Into<String>) -> Self {
    Self {
      storage,
      key: key.into(),
    }
  }

  /// Reads the persisted cart. Absent or corrupt data loads as an empty cart;
  /// this never errors to the caller.
  pub fn load(&self) -> Cart {
    let raw = match self.storage.get(&self.key) {
      Ok(raw) => raw,
      Err(e) => {
        warn!(key = %self.key, error = %e, "Cart storage unreadable; treating cart as empty");
        return Cart::new();
      }
    };
    let Some(raw) = raw else {
      return Cart::new();
    };
    match serde_json::from_str::<Cart>(&raw) {
      Ok(cart) => cart,
      Err(e) => {
        warn!(key = %self.key, error = %e, "Persisted cart is corrupt; treating cart as empty");
        Cart::new()
      }
    }
  }

  /// Adds a line, merging with an existing `(id, options)` line when present.
  ///
  /// The merged quantity is clamped to the stock limit; a clamp that still
  /// allows some increase is reported as [`AddOutcome::Clamped`], while a
  /// clamp that allows none rejects the add with
  /// [`CartError::StockExceeded`] and leaves the line untouched. Adding an
  /// unknown product whose stock limit is zero fails with
  /// [`CartError::OutOfStock`].
  pub fn add_line(&self, new_line: NewLine) -> Result<AddOutcome> {
    validate_line_input(&new_line)?;

    let mut cart = self.load();
    let key = new_line.key();

    let outcome = match cart.find_mut(&key) {
      Some(existing) => {
        let limit = existing.effective_stock_limit();
        let room = limit.saturating_sub(existing.quantity);
        if room == 0 {
          warn!(product_id = %key.id, limit, "Add rejected: line already at stock limit");
          return Err(CartError::StockExceeded {
            product_id: key.id,
            limit,
          });
        }
        let applied = new_line.quantity.min(room);
        existing.quantity += applied;
        if applied < new_line.quantity {
          AddOutcome::Clamped {
            quantity: existing.quantity,
            limit,
          }
        } else {
          AddOutcome::Merged {
            quantity: existing.quantity,
          }
        }
      }
      None => {
        if new_line.stock_limit == Some(0) {
          warn!(product_id = %key.id, "Add rejected: product out of stock");
          return Err(CartError::OutOfStock { product_id: key.id });
        }
        let limit = new_line.stock_limit.unwrap_or(UNBOUNDED_STOCK);
        let quantity = new_line.quantity.min(limit);
        let clamped = quantity < new_line.quantity;
        cart.push(CartLine {
          id: new_line.id,
          name: new_line.name,
          unit_price_cents: new_line.unit_price_cents,
          image_url: new_line.image_url,
          quantity,
          stock_limit: new_line.stock_limit,
          options: new_line.options,
          sku: new_line.sku,
        });
        if clamped {
          AddOutcome::Clamped { quantity, limit }
        } else {
          AddOutcome::Added { quantity }
        }
      }
    };

    self.persist(&cart)?;
    info!(product_id = %key.id, ?outcome, "Cart line added");
    Ok(outcome)
  }

  /// Sets a line's quantity absolutely. A target of zero or below removes the
  /// line; a target beyond the stock limit is rejected and the prior value
  /// retained.
  pub fn set_quantity(&self, key: &LineKey, new_quantity: i64) -> Result<SetOutcome> {
    let mut cart = self.load();

    if new_quantity <= 0 {
      if !cart.remove(key) {
        debug!(product_id = %key.id, "Zero-quantity update for a line not in the cart; no-op");
        return Ok(SetOutcome::NotFound);
      }
      self.persist(&cart)?;
      info!(product_id = %key.id, "Cart line removed via zero quantity");
      return Ok(SetOutcome::Removed);
    }

    let Some(line) = cart.find_mut(key) else {
      debug!(product_id = %key.id, "Quantity update for a line not in the cart; no-op");
      return Ok(SetOutcome::NotFound);
    };

    let limit = line.effective_stock_limit();
    if new_quantity > i64::from(limit) {
      warn!(product_id = %key.id, limit, requested = new_quantity, "Quantity update rejected: beyond stock limit");
      return Err(CartError::StockExceeded {
        product_id: key.id.clone(),
        limit,
      });
    }

    line.quantity = new_quantity as u32;
    let quantity = line.quantity;
    self.persist(&cart)?;
    info!(product_id = %key.id, quantity, "Cart line quantity updated");
    Ok(SetOutcome::Updated { quantity })
  }

  /// Relative quantity adjustment, expressed through [`Self::set_quantity`].
  pub fn increment_quantity(&self, key: &LineKey, delta: i64) -> Result<SetOutcome> {
    let cart = self.load();
    let Some(line) = cart.find(key) else {
      return Ok(SetOutcome::NotFound);
    };
    self.set_quantity(key, i64::from(line.quantity) + delta)
  }

  /// Deletes the matching line. Removing a line that is not present is a
  /// no-op, not an error.
  pub fn remove_line(&self, key: &LineKey) -> Result<bool> {
    let mut cart = self.load();
    let removed = cart.remove(key);
    if removed {
      self.persist(&cart)?;
      info!(product_id = %key.id, "Cart line removed");
    }
    Ok(removed)
  }

  /// Empties the cart and persists the empty state.
  pub fn clear(&self) -> Result<()> {
    self.persist(&Cart::new())?;
    info!("Cart cleared");
    Ok(())
  }

  pub fn totals(&self, discount_rate: f64) -> Totals {
    self.load().totals(discount_rate)
  }

  pub fn item_count(&self) -> u64 {
    self.load().item_count()
  }

  /// Consumes the short-lived marker the server sets after a successful order
  /// placement. If the marker is present the cart is cleared and the marker
  /// removed, so the signal fires at most once. Returns whether it fired.
  pub fn consume_clear_marker(&self, markers: &dyn StorageBackend, marker_key: &str) -> Result<bool> {
    if markers.take(marker_key)?.is_none() {
      return Ok(false);
    }
    info!(marker = marker_key, "Order placed; clearing cart");
    self.clear()?;
    Ok(true)
  }

  /// Serializes the full line collection and writes it in one operation.
  fn persist(&self, cart: &Cart) -> Result<()> {
    let serialized =
      serde_json::to_string(cart).map_err(|e| CartError::Internal(format!("Cart serialization failed: {}", e)))?;
    self.storage.set(&self.key, &serialized)?;
    Ok(())
  }
}

fn validate_line_input(new_line: &NewLine) -> Result<()> {
  let mut report = ValidationReport::new();
  if new_line.id.trim().is_empty() {
    report.push("id", "Product id must not be blank");
  }
  if new_line.quantity == 0 {
    report.push("quantity", "Quantity must be a positive number");
  }
  if new_line.unit_price_cents < 0 {
    report.push("price", "Unit price must not be negative");
  }
  if report.is_empty() {
    Ok(())
  } else {
    Err(CartError::Validation(report))
  }
}
