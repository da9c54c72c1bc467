// tests/checkout_assembler_tests.rs
mod common; // Reference the common module

use common::*;
use storefront::{CartLine, FieldEncoding, FormAssembler};

fn two_line_cart() -> storefront::Cart {
  let (_storage, store) = new_store();
  store.add_line(widget("P1", 1000).quantity(2)).unwrap();
  store.add_line(widget("P2", 500).quantity(1).sku("KEEP-ME")).unwrap();
  store.load()
}

#[test]
fn legacy_encoding_emits_the_full_historical_field_set() {
  setup_tracing();
  let cart = two_line_cart();
  let fields = FormAssembler::new(FieldEncoding::LegacyCompatible).serialize(&cart).unwrap();

  assert_eq!(fields.iter().filter(|f| f.name == "full_cart_json").count(), 1);
  assert_eq!(
    fields
      .iter()
      .filter(|f| f.name.starts_with("cart_items[") && f.name != "cart_items[]")
      .count(),
    2
  );
  assert_eq!(fields.iter().filter(|f| f.name == "cart_items[]").count(), 2);

  let count = fields.iter().find(|f| f.name == "cart_item_count").unwrap();
  assert_eq!(count.value, "2");
}

#[test]
fn modern_encoding_drops_only_the_duplicate_fields() {
  setup_tracing();
  let cart = two_line_cart();
  let fields = FormAssembler::new(FieldEncoding::Modern).serialize(&cart).unwrap();

  assert!(fields.iter().all(|f| f.name != "cart_items[]"));
  assert_eq!(fields.iter().filter(|f| f.name.starts_with("cart_items[")).count(), 2);
  assert_eq!(fields.iter().filter(|f| f.name == "full_cart_json").count(), 1);
}

#[test]
fn every_emitted_sku_is_non_empty_and_existing_skus_survive() {
  setup_tracing();
  let cart = two_line_cart();
  let fields = FormAssembler::default().serialize(&cart).unwrap();

  let full = fields.iter().find(|f| f.name == "full_cart_json").unwrap();
  let lines: Vec<CartLine> = serde_json::from_str(&full.value).unwrap();

  assert!(lines.iter().all(|l| !l.sku.as_deref().unwrap_or("").is_empty()));
  assert_eq!(lines[1].sku.as_deref(), Some("KEEP-ME"));
  assert!(lines[0].sku.as_deref().unwrap().starts_with("SKU-0-"));
}

#[test]
fn indexed_fields_agree_with_the_full_cart_blob() {
  setup_tracing();
  let cart = two_line_cart();
  let fields = FormAssembler::default().serialize(&cart).unwrap();

  let full = fields.iter().find(|f| f.name == "full_cart_json").unwrap();
  let lines: Vec<serde_json::Value> = serde_json::from_str(&full.value).unwrap();

  for (index, line) in lines.iter().enumerate() {
    let indexed = fields
      .iter()
      .find(|f| f.name == format!("cart_items[{}]", index))
      .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&indexed.value).unwrap();
    assert_eq!(parsed["id"], line["id"]);
    assert_eq!(parsed["quantity"], line["quantity"]);
    assert_eq!(parsed["sku"], line["sku"]);
  }
}

#[test]
fn reserialization_fully_replaces_previous_fields() {
  setup_tracing();
  let (_storage, store) = new_store();
  store.add_line(widget("P1", 1000).quantity(2)).unwrap();

  let assembler = FormAssembler::default();
  let first = assembler.serialize(&store.load()).unwrap();

  // The cart shrinks between a failed validation and the resubmission.
  store.set_quantity(&storefront::LineKey::bare("P1"), 1).unwrap();
  let second = assembler.serialize(&store.load()).unwrap();

  assert_eq!(first.len(), second.len());
  let count = second.iter().find(|f| f.name == "cart_item_count").unwrap();
  assert_eq!(count.value, "1");
  let full = second.iter().find(|f| f.name == "full_cart_json").unwrap();
  let lines: Vec<CartLine> = serde_json::from_str(&full.value).unwrap();
  assert_eq!(lines[0].quantity, 1);
}

#[test]
fn empty_cart_serializes_to_an_empty_blob_and_zero_count() {
  setup_tracing();
  let fields = FormAssembler::default().serialize(&storefront::Cart::new()).unwrap();

  let full = fields.iter().find(|f| f.name == "full_cart_json").unwrap();
  assert_eq!(full.value, "[]");
  let count = fields.iter().find(|f| f.name == "cart_item_count").unwrap();
  assert_eq!(count.value, "0");
  assert!(fields.iter().all(|f| !f.name.starts_with("cart_items[")));
}
