// core/src/payment/controller.rs

//! Orchestration of the payment page: method-dependent sub-forms, client
//! validation, totals with the fixed tax and shipping policy, debounced
//! autosave of form state, and the submission flow that re-validates stock
//! server-side before dispatching the order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cart::{Cart, Totals};
use crate::checkout::{FormAssembler, FormField};
use crate::config::StorefrontConfig;
use crate::debounce::Debouncer;
use crate::error::{CartError, Result};
use crate::payment::gateway::{PaymentGateway, PaymentReceipt, PaymentSubmission};
use crate::payment::method::{FormLayout, PaymentMethod, SubForm, ADDRESS_FIELDS};
use crate::payment::stock::{revalidate_cart, StockChecker};
use crate::payment::validate::{
  is_valid_card_number, is_valid_cvv, is_valid_email, is_valid_expiry, is_valid_phone, normalize_card_number,
  ValidationReport,
};
use crate::storage::StorageBackend;

/// All field values of the payment form, as entered. Serializes to the flat
/// name → value object the session-storage autosave key holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentForm {
  #[serde(default)]
  pub payment_method: String,
  #[serde(default)]
  pub street_address: String,
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub postal_code: String,
  #[serde(default)]
  pub country: String,
  #[serde(default)]
  pub card_number: String,
  #[serde(default)]
  pub card_expiry_month: String,
  #[serde(default)]
  pub card_expiry_year: String,
  #[serde(default)]
  pub card_cvv: String,
  #[serde(default)]
  pub mobile_phone: String,
  #[serde(default)]
  pub contact_email: String,
  #[serde(default)]
  pub terms_accepted: bool,
}

impl PaymentForm {
  fn address_value(&self, field: &str) -> &str {
    match field {
      "street_address" => &self.street_address,
      "city" => &self.city,
      "postal_code" => &self.postal_code,
      "country" => &self.country,
      _ => "",
    }
  }
}

/// Derived money lines the payment page shows on top of the cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceDetails {
  pub subtotal_cents: i64,
  pub tax_cents: i64,
  pub shipping_cents: i64,
  pub total_cents: i64,
}

impl PriceDetails {
  fn compute(totals: Totals, tax_rate: f64, shipping_cents: i64) -> Self {
    let subtotal_cents = totals.subtotal_cents;
    let tax_cents = (subtotal_cents as f64 * tax_rate).round() as i64;
    Self {
      subtotal_cents,
      tax_cents,
      shipping_cents,
      total_cents: subtotal_cents + tax_cents + shipping_cents,
    }
  }
}

/// Controller state for one payment page instance.
///
/// Selection, validation, and autosave all run on the single UI thread;
/// `submit` is the only async entry point and guards itself against double
/// dispatch the way the page disables its pay button.
pub struct PaymentPage<S: StorageBackend> {
  config: StorefrontConfig,
  session: Arc<S>,
  assembler: FormAssembler,
  autosave: Debouncer,
  gateway: Arc<dyn PaymentGateway>,
  stock_checker: Option<Arc<dyn StockChecker>>,
  selected: PaymentMethod,
  submitting: bool,
}

impl<S: StorageBackend + 'static> PaymentPage<S> {
  pub fn new(config: StorefrontConfig, session: Arc<S>, gateway: Arc<dyn PaymentGateway>) -> Self {
    let autosave = Debouncer::new(config.autosave_debounce);
    Self {
      config,
      session,
      assembler: FormAssembler::default(),
      autosave,
      gateway,
      stock_checker: None,
      selected: PaymentMethod::Card,
      submitting: false,
    }
  }

  /// Enables pre-submission stock re-validation against the server.
  pub fn with_stock_checker(mut self, checker: Arc<dyn StockChecker>) -> Self {
    self.stock_checker = Some(checker);
    self
  }

  pub fn with_assembler(mut self, assembler: FormAssembler) -> Self {
    self.assembler = assembler;
    self
  }

  pub fn selected_method(&self) -> PaymentMethod {
    self.selected
  }

  /// Selects a payment method: exactly one sub-form becomes visible and its
  /// fields required, all others hidden and un-required.
  pub fn select_method(&mut self, method: PaymentMethod) -> FormLayout {
    self.selected = method;
    info!(method = method.as_str(), "Payment method selected");
    FormLayout::for_method(method)
  }

  pub fn layout(&self) -> FormLayout {
    FormLayout::for_method(self.selected)
  }

  pub fn price_details(&self, cart: &Cart) -> PriceDetails {
    PriceDetails::compute(cart.totals(0.0), self.config.tax_rate, self.config.shipping_cost_cents)
  }

  /// Label for the pay button: the amount for card payments, a plain
  /// order-confirmation label otherwise.
  pub fn submit_label(&self, cart: &Cart) -> String {
    match self.selected {
      PaymentMethod::Card => format!("Pay {}", format_cents(self.price_details(cart).total_cents)),
      _ => "Confirm order".to_string(),
    }
  }

  /// Validates the form for the currently selected method, aggregating every
  /// failure so they render as one block.
  pub fn validate(&self, form: &PaymentForm, now: DateTime<Utc>) -> Result<()> {
    let mut report = ValidationReport::new();

    for field in ADDRESS_FIELDS {
      if form.address_value(field).trim().is_empty() {
        report.push(field, format!("The {} field is required", field.replace('_', " ")));
      }
    }

    match self.selected.sub_form() {
      SubForm::Card => {
        if !is_valid_card_number(&normalize_card_number(&form.card_number)) {
          report.push("card_number", "Invalid card number");
        }
        if !is_valid_expiry(&form.card_expiry_month, &form.card_expiry_year, now) {
          report.push("card_expiry_month", "Invalid expiry date");
        }
        if !is_valid_cvv(&form.card_cvv) {
          report.push("card_cvv", "Invalid security code");
        }
      }
      SubForm::MobileMoney => {
        if !is_valid_phone(&form.mobile_phone) {
          report.push("mobile_phone", "Invalid phone number");
        }
      }
      SubForm::Delivery => {}
    }

    // Contact email is optional but format-checked when present.
    if !form.contact_email.trim().is_empty() && !is_valid_email(&form.contact_email) {
      report.push("contact_email", "Invalid email address");
    }

    if !form.terms_accepted {
      report.push("terms", "You must accept the terms and conditions");
    }

    if report.is_empty() {
      Ok(())
    } else {
      warn!(issues = report.issues().len(), "Payment form validation failed");
      Err(CartError::Validation(report))
    }
  }

  /// Debounced write of the form state to session storage, so navigating away
  /// and back does not lose progress. Best-effort: failures are logged only.
  pub fn autosave(&self, form: &PaymentForm) {
    let session = Arc::clone(&self.session);
    let key = self.config.autosave_storage_key.clone();
    let form = form.clone();
    self.autosave.call(move || match serde_json::to_string(&form) {
      Ok(blob) => {
        if let Err(e) = session.set(&key, &blob) {
          warn!(error = %e, "Payment form autosave failed");
        }
      }
      Err(e) => warn!(error = %e, "Payment form autosave serialization failed"),
    });
  }

  /// Restores autosaved form state on page (re)load. Missing or corrupt data
  /// restores nothing.
  pub fn restore(&self) -> Option<PaymentForm> {
    let blob = match self.session.get(&self.config.autosave_storage_key) {
      Ok(blob) => blob?,
      Err(e) => {
        warn!(error = %e, "Autosaved payment form unreadable");
        return None;
      }
    };
    match serde_json::from_str::<PaymentForm>(&blob) {
      Ok(form) => Some(form),
      Err(e) => {
        warn!(error = %e, "Autosaved payment form corrupt; ignoring");
        None
      }
    }
  }

  /// Everything the payment endpoint will receive: method, address and
  /// contact fields, derived totals, and the assembled cart fields.
  pub fn build_submission(&self, cart: &Cart, form: &PaymentForm) -> Result<PaymentSubmission> {
    let prices = self.price_details(cart);
    let mut fields = vec![
      field("payment_method", self.selected.as_str()),
      field("street_address", &form.street_address),
      field("city", &form.city),
      field("postal_code", &form.postal_code),
      field("country", &form.country),
      field("subtotal", prices.subtotal_cents.to_string()),
      field("tax_amount", prices.tax_cents.to_string()),
      field("shipping_cost", prices.shipping_cents.to_string()),
      field("total_amount", prices.total_cents.to_string()),
    ];
    match self.selected.sub_form() {
      SubForm::Card => {
        fields.push(field("card_number", normalize_card_number(&form.card_number)));
        fields.push(field("card_expiry_month", &form.card_expiry_month));
        fields.push(field("card_expiry_year", &form.card_expiry_year));
        fields.push(field("card_cvv", &form.card_cvv));
      }
      SubForm::MobileMoney => {
        fields.push(field("mobile_phone", &form.mobile_phone));
      }
      SubForm::Delivery => {}
    }
    if !form.contact_email.trim().is_empty() {
      fields.push(field("contact_email", &form.contact_email));
    }
    fields.extend(self.assembler.serialize(cart)?);
    Ok(PaymentSubmission { fields })
  }

  /// Full submission flow: validate, re-check stock server-side when a
  /// checker is configured, assemble the outgoing fields, then dispatch
  /// through the gateway. The submit control stays disabled after success
  /// (the server redirects); any failure re-enables it for another attempt.
  pub async fn submit(&mut self, cart: &Cart, form: &PaymentForm, now: DateTime<Utc>) -> Result<PaymentReceipt> {
    if self.submitting {
      return Err(CartError::Payment("A submission is already in progress".to_string()));
    }
    if cart.is_empty() {
      let mut report = ValidationReport::new();
      report.push("cart", "Your cart is empty");
      return Err(CartError::Validation(report));
    }

    self.validate(form, now)?;

    if let Some(checker) = &self.stock_checker {
      revalidate_cart(checker.as_ref(), cart).await?;
    }

    let submission = self.build_submission(cart, form)?;

    self.submitting = true;
    info!(method = self.selected.as_str(), lines = cart.len(), "Dispatching payment");
    match self.gateway.process(submission).await {
      Ok(receipt) => {
        info!(redirect = %receipt.redirect, "Payment accepted");
        Ok(receipt)
      }
      Err(e) => {
        warn!(error = %e, "Payment dispatch failed");
        self.submitting = false;
        Err(e)
      }
    }
  }

  /// Whether the submit control is currently disabled.
  pub fn is_submitting(&self) -> bool {
    self.submitting
  }
}

fn field(name: &str, value: impl Into<String>) -> FormField {
  FormField {
    name: name.to_string(),
    value: value.into(),
  }
}

/// Minor units to a plain decimal string, e.g. `2400` → `"24.00"`.
pub fn format_cents(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let cents = cents.abs();
  format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn format_cents_pads_minor_units() {
    assert_eq!(format_cents(2400), "24.00");
    assert_eq!(format_cents(5), "0.05");
    assert_eq!(format_cents(-150), "-1.50");
  }
}
