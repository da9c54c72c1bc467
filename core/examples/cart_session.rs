// core/examples/cart_session.rs

use std::sync::Arc;

use async_trait::async_trait;
use storefront::{
  CartLine, CartStore, CartSyncClient, CartView, LineKey, MemoryStorage, NewLine, Result, SessionMirror,
  StorageBackend,
};
use tracing::info;

// A stand-in session mirror that just logs what it receives. The real one is
// `HttpSessionMirror` pointed at the storefront's sync endpoint.
struct LoggingMirror;

#[async_trait]
impl SessionMirror for LoggingMirror {
  async fn push(&self, lines: &[CartLine]) -> Result<()> {
    info!(lines = lines.len(), "session mirror received a cart snapshot");
    Ok(())
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Cart Session Example ---");

  // 1. A profile-scoped storage backend and the cart store over it
  let storage = MemoryStorage::new();
  let store = CartStore::new(storage.clone());

  // 2. Product pages add lines; the same (id, options) identity merges
  store.add_line(NewLine::new("P1", "Woven basket", 12_000).quantity(2).stock_limit(10))?;
  store.add_line(NewLine::new("P2", "Shea butter", 3_500).image_url("/media/shea.jpg"))?;
  store.add_line(NewLine::new("P1", "Woven basket", 12_000).stock_limit(10))?;

  // 3. Cart page controls adjust quantities
  store.set_quantity(&LineKey::bare("P2"), 3)?;
  store.remove_line(&LineKey::bare("P3"))?; // not in the cart, a no-op

  // 4. Project the cart for rendering
  let cart = store.load();
  let view = CartView::project(&cart, 0.1); // WELCOME promo: 10% off
  info!(badge = cart.item_count(), checkout = view.checkout_enabled(), "cart projected");

  // 5. Before navigating to checkout, mirror the cart (fire-and-forget)
  let sync = CartSyncClient::new(Arc::new(LoggingMirror));
  let push = sync.sync(&cart);
  push.finished().await; // only awaited here so the demo prints the log line

  let totals = cart.totals(0.1);
  info!(
    subtotal = totals.subtotal_cents,
    discount = totals.discount_cents,
    total = totals.total_cents,
    "totals"
  );

  // 3 baskets at 12000 plus 3 butters at 3500, minus 10%
  assert_eq!(totals.subtotal_cents, 46_500);
  assert_eq!(totals.total_cents, 41_850);
  assert_eq!(cart.item_count(), 6);
  assert!(storage.get("cart")?.is_some());

  Ok(())
}
