// tests/cart_store_tests.rs
mod common; // Reference the common module

use common::*;
use std::collections::BTreeMap;
use storefront::{AddOutcome, Cart, CartError, CartStore, LineKey, MemoryStorage, SetOutcome, StorageBackend};

#[test]
fn load_returns_empty_cart_when_nothing_persisted() {
  setup_tracing();
  let (_storage, store) = new_store();

  let cart = store.load();
  assert!(cart.is_empty());
  assert_eq!(store.item_count(), 0);
}

#[test]
fn corrupt_persisted_cart_loads_as_empty() {
  setup_tracing();
  let (storage, store) = new_store();
  storage.set("cart", "{not json").unwrap();

  assert!(store.load().is_empty());
}

#[test]
fn add_line_persists_and_counts() {
  setup_tracing();
  let (storage, store) = new_store();

  let outcome = store
    .add_line(widget("P1", 1000).image_url("img.png").quantity(2).stock_limit(10))
    .unwrap();
  assert_eq!(outcome, AddOutcome::Added { quantity: 2 });

  assert_eq!(store.item_count(), 2);
  let totals = store.totals(0.0);
  assert_eq!(totals.subtotal_cents, 2000);
  assert_eq!(totals.discount_cents, 0);
  assert_eq!(totals.total_cents, 2000);

  // The whole cart was written in one storage operation under the fixed key.
  let raw = storage.get("cart").unwrap().unwrap();
  let persisted: Cart = serde_json::from_str(&raw).unwrap();
  assert_eq!(persisted, store.load());
}

#[test]
fn adding_same_identity_merges_quantities() {
  setup_tracing();
  let (_storage, store) = new_store();

  store.add_line(widget("P1", 1000).quantity(3)).unwrap();
  let outcome = store.add_line(widget("P1", 1000).quantity(4)).unwrap();

  assert_eq!(outcome, AddOutcome::Merged { quantity: 7 });
  assert_eq!(store.load().len(), 1);
}

#[test]
fn same_product_with_different_options_is_a_distinct_line() {
  setup_tracing();
  let (_storage, store) = new_store();

  let red = BTreeMap::from([("color".to_string(), "red".to_string())]);
  let blue = BTreeMap::from([("color".to_string(), "blue".to_string())]);
  store.add_line(widget("P1", 1000).options(red.clone())).unwrap();
  store.add_line(widget("P1", 1000).options(blue)).unwrap();

  let cart = store.load();
  assert_eq!(cart.len(), 2);
  assert!(cart.find(&LineKey::new("P1", Some(&red))).is_some());
}

#[test]
fn cumulative_add_clamps_at_stock_limit() {
  setup_tracing();
  let (_storage, store) = new_store();

  store.add_line(widget("P1", 1000).quantity(2).stock_limit(5)).unwrap();
  let outcome = store.add_line(widget("P1", 1000).quantity(5).stock_limit(5)).unwrap();

  assert_eq!(outcome, AddOutcome::Clamped { quantity: 5, limit: 5 });
  assert_eq!(store.load().lines()[0].quantity, 5);
}

#[test]
fn add_at_limit_is_rejected_and_line_unchanged() {
  setup_tracing();
  let (_storage, store) = new_store();

  store.add_line(widget("P1", 1000).quantity(5).stock_limit(5)).unwrap();
  let err = store.add_line(widget("P1", 1000).stock_limit(5)).unwrap_err();

  match err {
    CartError::StockExceeded { product_id, limit } => {
      assert_eq!(product_id, "P1");
      assert_eq!(limit, 5);
    }
    other => panic!("Expected StockExceeded, got {:?}", other),
  }
  assert_eq!(store.load().lines()[0].quantity, 5);
}

#[test]
fn adding_a_zero_stock_product_is_out_of_stock() {
  setup_tracing();
  let (_storage, store) = new_store();

  let err = store.add_line(widget("P1", 1000).stock_limit(0)).unwrap_err();
  assert!(matches!(err, CartError::OutOfStock { .. }));
  assert!(store.load().is_empty());
}

#[test]
fn blank_id_is_a_validation_error_not_a_coercion() {
  setup_tracing();
  let (_storage, store) = new_store();

  let err = store.add_line(widget("  ", 1000)).unwrap_err();
  assert!(matches!(err, CartError::Validation(_)));
  assert!(store.load().is_empty());
}

#[test]
fn set_quantity_zero_equals_remove_line() {
  setup_tracing();
  let storage_a = MemoryStorage::new();
  let storage_b = MemoryStorage::new();
  let store_a = CartStore::new(storage_a.clone());
  let store_b = CartStore::new(storage_b.clone());

  for store in [&store_a, &store_b] {
    store.add_line(widget("P1", 1000).quantity(2)).unwrap();
    store.add_line(widget("P2", 500).quantity(1)).unwrap();
  }

  assert_eq!(
    store_a.set_quantity(&LineKey::bare("P1"), 0).unwrap(),
    SetOutcome::Removed
  );
  assert!(store_b.remove_line(&LineKey::bare("P1")).unwrap());

  assert_eq!(store_a.load(), store_b.load());
}

#[test]
fn set_quantity_beyond_stock_is_rejected_prior_value_retained() {
  setup_tracing();
  let (_storage, store) = new_store();

  store.add_line(widget("P1", 1000).quantity(2).stock_limit(5)).unwrap();
  let err = store.set_quantity(&LineKey::bare("P1"), 6).unwrap_err();

  assert!(matches!(err, CartError::StockExceeded { limit: 5, .. }));
  assert_eq!(store.load().lines()[0].quantity, 2);
}

#[test]
fn increment_decrement_round_trip() {
  setup_tracing();
  let (_storage, store) = new_store();

  store.add_line(widget("P1", 1000).quantity(2).stock_limit(10)).unwrap();
  let key = LineKey::bare("P1");

  assert_eq!(
    store.increment_quantity(&key, 1).unwrap(),
    SetOutcome::Updated { quantity: 3 }
  );
  assert_eq!(
    store.increment_quantity(&key, -2).unwrap(),
    SetOutcome::Updated { quantity: 1 }
  );
  // Decrementing to zero removes the line.
  assert_eq!(store.increment_quantity(&key, -1).unwrap(), SetOutcome::Removed);
  assert!(store.load().is_empty());
}

#[test]
fn removing_a_missing_line_is_a_no_op() {
  setup_tracing();
  let (_storage, store) = new_store();

  assert!(!store.remove_line(&LineKey::bare("ghost")).unwrap());
  assert_eq!(
    store.increment_quantity(&LineKey::bare("ghost"), 1).unwrap(),
    SetOutcome::NotFound
  );
}

#[test]
fn zero_quantity_for_a_missing_line_is_not_found_and_writes_nothing() {
  setup_tracing();
  let (storage, store) = new_store();

  assert_eq!(
    store.set_quantity(&LineKey::bare("ghost"), 0).unwrap(),
    SetOutcome::NotFound
  );
  assert_eq!(storage.get("cart").unwrap(), None);
}

#[test]
fn clear_persists_the_empty_state() {
  setup_tracing();
  let (storage, store) = new_store();

  store.add_line(widget("P1", 1000)).unwrap();
  store.clear().unwrap();

  assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));
  assert!(store.load().is_empty());
}

#[test]
fn discounted_totals_match_reference_example() {
  setup_tracing();
  let (_storage, store) = new_store();

  store.add_line(widget("P1", 1000).quantity(2)).unwrap();
  store.add_line(widget("P2", 500).quantity(3)).unwrap();

  let totals = store.totals(0.1);
  assert_eq!(totals.subtotal_cents, 3500);
  assert_eq!(totals.discount_cents, 350);
  assert_eq!(totals.total_cents, 3150);
}

#[test]
fn replaying_a_mutation_sequence_is_deterministic() {
  setup_tracing();
  let run = || {
    let (_storage, store) = new_store();
    store.add_line(widget("P1", 1000).quantity(2).stock_limit(5)).unwrap();
    store.add_line(widget("P2", 500)).unwrap();
    let _ = store.add_line(widget("P1", 1000).quantity(9).stock_limit(5));
    store.set_quantity(&LineKey::bare("P2"), 3).unwrap();
    store.remove_line(&LineKey::bare("P3")).unwrap();
    store.load()
  };

  assert_eq!(run(), run());
}

#[test]
fn clear_marker_is_consumed_exactly_once() {
  setup_tracing();
  let (_storage, store) = new_store();
  let markers = MemoryStorage::new();

  store.add_line(widget("P1", 1000).quantity(2)).unwrap();

  // No marker yet: nothing happens.
  assert!(!store.consume_clear_marker(&markers, "clear_cart").unwrap());
  assert_eq!(store.item_count(), 2);

  markers.set("clear_cart", "true").unwrap();
  assert!(store.consume_clear_marker(&markers, "clear_cart").unwrap());
  assert!(store.load().is_empty());

  // Marker was consumed; a refilled cart survives the next check.
  store.add_line(widget("P2", 500)).unwrap();
  assert!(!store.consume_clear_marker(&markers, "clear_cart").unwrap());
  assert_eq!(store.item_count(), 1);
}

#[test]
fn external_writes_from_another_tab_are_visible() {
  setup_tracing();
  let (storage, store) = new_store();
  store.add_line(widget("P1", 1000)).unwrap();

  // Another tab rewrote the shared key; last writer wins.
  let other_tab = CartStore::new(storage.clone());
  other_tab.add_line(widget("P2", 500).quantity(2)).unwrap();

  assert_eq!(store.item_count(), 3);
}
