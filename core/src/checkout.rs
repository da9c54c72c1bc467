// core/src/checkout.rs

//! Checkout form assembly.
//!
//! The cart lives only in the browser, so immediately before the checkout
//! form is submitted its lines are flattened into hidden fields the
//! order-creation endpoint can read. Serialization is a pure function of the
//! cart: re-running it fully replaces any previously assembled fields, which
//! makes resubmission after a validation failure safe.

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::cart::{Cart, CartLine};
use crate::error::{CartError, Result};

pub const FULL_CART_FIELD: &str = "full_cart_json";
pub const ITEM_COUNT_FIELD: &str = "cart_item_count";
pub const LEGACY_ITEM_FIELD: &str = "cart_items[]";

/// One hidden form field, name and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
  pub name: String,
  pub value: String,
}

impl FormField {
  fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
    }
  }
}

/// Which field set the assembler emits.
///
/// `Modern` is one full-cart JSON blob plus per-line indexed fields and a
/// count. `LegacyCompatible` additionally duplicates every line under the
/// shared `cart_items[]` name that older server readers still consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldEncoding {
  #[default]
  Modern,
  LegacyCompatible,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormAssembler {
  encoding: FieldEncoding,
}

impl FormAssembler {
  pub fn new(encoding: FieldEncoding) -> Self {
    Self { encoding }
  }

  /// Flattens the cart into submittable fields, assigning a synthetic SKU to
  /// every line that has none so downstream systems always receive one.
  pub fn serialize(&self, cart: &Cart) -> Result<Vec<FormField>> {
    let stamped: Vec<CartLine> = cart
      .lines()
      .iter()
      .enumerate()
      .map(|(index, line)| {
        let mut line = line.clone();
        if line.sku.as_deref().map_or(true, str::is_empty) {
          line.sku = Some(synthetic_sku(index));
        }
        line
      })
      .collect();

    let mut fields = Vec::with_capacity(2 + stamped.len() * 2);

    let full_cart = serde_json::to_string(&stamped)
      .map_err(|e| CartError::Internal(format!("Cart field serialization failed: {}", e)))?;
    fields.push(FormField::new(FULL_CART_FIELD, full_cart));

    for (index, line) in stamped.iter().enumerate() {
      let encoded = encode_line(line)?;
      fields.push(FormField::new(format!("cart_items[{}]", index), encoded.clone()));
      if self.encoding == FieldEncoding::LegacyCompatible {
        fields.push(FormField::new(LEGACY_ITEM_FIELD, encoded));
      }
    }

    fields.push(FormField::new(ITEM_COUNT_FIELD, stamped.len().to_string()));

    debug!(lines = stamped.len(), encoding = ?self.encoding, "Checkout fields assembled");
    Ok(fields)
  }
}

/// Per-line field payload: the line reduced to the shape the order endpoint
/// parses, with its normalization applied up front (string id, defaulted
/// name, explicit nulls for absent image/options).
fn encode_line(line: &CartLine) -> Result<String> {
  let name = if line.name.trim().is_empty() {
    "Unnamed product"
  } else {
    line.name.as_str()
  };
  let payload = json!({
    "id": line.id,
    "name": name,
    "price": line.unit_price_cents,
    "quantity": line.quantity,
    "options": line.options,
    "sku": line.sku,
    "image": line.image_url,
  });
  serde_json::to_string(&payload).map_err(|e| CartError::Internal(format!("Line field serialization failed: {}", e)))
}

/// Deterministic stand-in SKU from the line's position and the current time.
fn synthetic_sku(index: usize) -> String {
  format!("SKU-{}-{}", index, Utc::now().timestamp_millis())
}
