// core/examples/checkout_flow.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use storefront::{
  CartError, CartStore, MemoryStorage, NewLine, PaymentForm, PaymentGateway, PaymentMethod, PaymentPage,
  PaymentReceipt, PaymentSubmission, Result, StockChecker, StockStatus, StorageBackend, StorefrontConfig,
};
use tracing::info;

// In-process doubles for the two must-complete server calls. The HTTP
// implementations (`HttpStockChecker`, `HttpPaymentGateway`) slot in the same
// seams against a real storefront.
struct GenerousStock;

#[async_trait]
impl StockChecker for GenerousStock {
  async fn check(&self, product_id: &str, quantity: u32) -> Result<StockStatus> {
    info!(product_id, quantity, "stock probe");
    Ok(StockStatus {
      available: true,
      stock: Some(quantity + 5),
    })
  }
}

struct AcceptingGateway;

#[async_trait]
impl PaymentGateway for AcceptingGateway {
  async fn process(&self, submission: PaymentSubmission) -> Result<PaymentReceipt> {
    info!(fields = submission.fields.len(), "order dispatched");
    Ok(PaymentReceipt {
      redirect: "/confirmation/".to_string(),
    })
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Checkout Flow Example ---");

  // 1. A cart built up during the session
  let store = CartStore::new(MemoryStorage::new());
  store.add_line(NewLine::new("P1", "Woven basket", 12_000).quantity(2).stock_limit(10))?;
  store.add_line(NewLine::new("P2", "Shea butter", 3_500))?;
  let cart = store.load();

  // 2. The payment page, with server stock re-validation enabled
  let session = Arc::new(MemoryStorage::new());
  let mut page = PaymentPage::new(StorefrontConfig::default(), Arc::clone(&session), Arc::new(AcceptingGateway))
    .with_stock_checker(Arc::new(GenerousStock));

  let layout = page.select_method(PaymentMethod::Card);
  info!(?layout.visible, required = layout.required_fields.len(), "card sub-form shown");

  let prices = page.price_details(&cart);
  info!(
    subtotal = prices.subtotal_cents,
    tax = prices.tax_cents,
    total = prices.total_cents,
    label = %page.submit_label(&cart),
    "price details"
  );

  // 3. The buyer fills the form; every input autosaves (debounced)
  let form = PaymentForm {
    payment_method: "card".to_string(),
    street_address: "12 Market Street".to_string(),
    city: "Dakar".to_string(),
    postal_code: "11000".to_string(),
    country: "SN".to_string(),
    card_number: "4242 4242 4242 4242".to_string(),
    card_expiry_month: "12".to_string(),
    card_expiry_year: "27".to_string(),
    card_cvv: "123".to_string(),
    terms_accepted: true,
    ..PaymentForm::default()
  };
  page.autosave(&form);

  // 4. A submission with validation problems is blocked before any network IO
  let bad_form = PaymentForm {
    card_cvv: "1".to_string(),
    ..form.clone()
  };
  match page.submit(&cart, &bad_form, Utc::now()).await {
    Err(CartError::Validation(report)) => {
      info!(first = ?report.first_invalid_field(), "validation blocked submission: {}", report);
    }
    other => panic!("expected a validation failure, got {:?}", other.map(|r| r.redirect)),
  }

  // 5. The corrected form goes through: stock re-checked, cart flattened
  //    into form fields, order dispatched
  let receipt = page.submit(&cart, &form, Utc::now()).await?;
  info!(redirect = %receipt.redirect, "payment accepted");

  // 6. The server set the clear marker on the confirmation page; consuming it
  //    empties the cart exactly once
  let markers = MemoryStorage::new();
  markers.set("clear_cart", "true")?;
  assert!(store.consume_clear_marker(&markers, "clear_cart")?);
  assert!(store.load().is_empty());

  Ok(())
}
