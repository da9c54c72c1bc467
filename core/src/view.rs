// core/src/view.rs

//! Pure projection of the cart into a renderable page model.
//!
//! Stateless function of store content: the page re-projects the whole cart
//! on every mutation and swaps the result in, no diffing. Markup, classes,
//! and animation stay in the template layer; this module only decides what
//! is shown.

use serde::Serialize;

use crate::cart::{Cart, CartLine, Totals};

/// Fallback asset when a line has no image or its image fails to load.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.jpg";

/// Upper bound shown on the quantity input when a line's stock is unknown.
/// Display concern only; the store's real sentinel is unbounded.
pub const QUANTITY_INPUT_FALLBACK_MAX: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineView {
  pub id: String,
  pub name: String,
  pub image_url: String,
  /// `"color: red, size: M"` style summary, absent for option-less lines.
  pub option_summary: Option<String>,
  pub unit_price_cents: i64,
  pub line_total_cents: i64,
  pub quantity: u32,
  /// Bounds for the quantity input control.
  pub min_quantity: u32,
  pub max_quantity: u32,
}

impl LineView {
  fn project(line: &CartLine) -> Self {
    Self {
      id: line.id.clone(),
      name: line.name.clone(),
      image_url: line
        .image_url
        .clone()
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
      option_summary: line.option_summary(),
      unit_price_cents: line.unit_price_cents,
      line_total_cents: line.line_total_cents(),
      quantity: line.quantity,
      min_quantity: 1,
      max_quantity: line.stock_limit.unwrap_or(QUANTITY_INPUT_FALLBACK_MAX),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartPageView {
  pub lines: Vec<LineView>,
  pub totals: Totals,
  pub item_count: u64,
  /// Checkout affordances are enabled only when the cart has lines.
  pub checkout_enabled: bool,
}

/// What the cart page shows: the line list with totals, or the empty state
/// with checkout disabled and a nudge back to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CartView {
  Empty { checkout_enabled: bool },
  Loaded(CartPageView),
}

impl CartView {
  pub fn project(cart: &Cart, discount_rate: f64) -> Self {
    if cart.is_empty() {
      return CartView::Empty { checkout_enabled: false };
    }
    CartView::Loaded(CartPageView {
      lines: cart.lines().iter().map(LineView::project).collect(),
      totals: cart.totals(discount_rate),
      item_count: cart.item_count(),
      checkout_enabled: true,
    })
  }

  pub fn checkout_enabled(&self) -> bool {
    match self {
      CartView::Empty { checkout_enabled } => *checkout_enabled,
      CartView::Loaded(page) => page.checkout_enabled,
    }
  }
}
