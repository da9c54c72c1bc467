// core/src/cart/line.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Effective stock limit for lines whose stock is unknown at add-time.
pub const UNBOUNDED_STOCK: u32 = u32::MAX;

/// One distinct purchasable entry in the cart: a product plus its chosen
/// variant options, with a quantity.
///
/// The serialized field names are the persisted wire layout (durable storage
/// key `cart` and the checkout form fields), so they keep the short wire
/// names: `price`, `image`, `stock`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
  pub id: String,
  pub name: String,
  /// Unit price in minor currency units (currency-agnostic; the display
  /// layer appends the currency suffix).
  #[serde(rename = "price")]
  pub unit_price_cents: i64,
  #[serde(rename = "image", default)]
  pub image_url: Option<String>,
  pub quantity: u32,
  /// Maximum purchasable quantity known to the client, sourced from product
  /// data at add-time. Absent means unbounded.
  #[serde(rename = "stock", default)]
  pub stock_limit: Option<u32>,
  /// Variant attributes (e.g. color, size). Part of line identity: the same
  /// product added with different options yields distinct lines.
  #[serde(default)]
  pub options: Option<BTreeMap<String, String>>,
  #[serde(default)]
  pub sku: Option<String>,
}

impl CartLine {
  /// Identity used for deduplication and lookups.
  pub fn key(&self) -> LineKey {
    LineKey::new(&self.id, self.options.as_ref())
  }

  pub fn effective_stock_limit(&self) -> u32 {
    self.stock_limit.unwrap_or(UNBOUNDED_STOCK)
  }

  pub fn line_total_cents(&self) -> i64 {
    self.unit_price_cents * i64::from(self.quantity)
  }

  /// Human-readable `"name: value, name: value"` summary of the variant
  /// options, or `None` when the line has none.
  pub fn option_summary(&self) -> Option<String> {
    let options = self.options.as_ref().filter(|o| !o.is_empty())?;
    Some(
      options
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join(", "),
    )
  }
}

/// The `(id, options)` pair that identifies a line. `None` options and empty
/// options compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
  pub id: String,
  pub options: BTreeMap<String, String>,
}

impl LineKey {
  pub fn new(id: &str, options: Option<&BTreeMap<String, String>>) -> Self {
    Self {
      id: id.to_string(),
      options: options.cloned().unwrap_or_default(),
    }
  }

  pub fn bare(id: &str) -> Self {
    Self::new(id, None)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
  pub subtotal_cents: i64,
  pub discount_cents: i64,
  pub total_cents: i64,
}

/// Ordered sequence of cart lines. Insertion order is display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cart {
  lines: Vec<CartLine>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn find(&self, key: &LineKey) -> Option<&CartLine> {
    self.lines.iter().find(|line| line.key() == *key)
  }

  pub(crate) fn find_mut(&mut self, key: &LineKey) -> Option<&mut CartLine> {
    self.lines.iter_mut().find(|line| line.key() == *key)
  }

  pub(crate) fn push(&mut self, line: CartLine) {
    self.lines.push(line);
  }

  /// Removes the matching line if present. Returns whether anything changed.
  pub(crate) fn remove(&mut self, key: &LineKey) -> bool {
    let before = self.lines.len();
    self.lines.retain(|line| line.key() != *key);
    self.lines.len() != before
  }

  /// Sum of quantities across all lines, for badge displays.
  pub fn item_count(&self) -> u64 {
    self.lines.iter().map(|line| u64::from(line.quantity)).sum()
  }

  /// Subtotal / discount / total for a promo discount rate in `[0, 1]`.
  /// Tax and shipping are the payment page's concern, not the cart's.
  pub fn totals(&self, discount_rate: f64) -> Totals {
    let subtotal_cents: i64 = self.lines.iter().map(CartLine::line_total_cents).sum();
    let discount_cents = (subtotal_cents as f64 * discount_rate).round() as i64;
    Totals {
      subtotal_cents,
      discount_cents,
      total_cents: subtotal_cents - discount_cents,
    }
  }
}

impl FromIterator<CartLine> for Cart {
  fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
    Self {
      lines: iter.into_iter().collect(),
    }
  }
}
