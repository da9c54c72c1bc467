// core/src/payment/validate.rs

//! Client-side field validation for the payment page.
//!
//! Pattern checks mirror what the storefront enforces before letting a form
//! leave the browser; the server re-validates everything, so these exist to
//! give immediate feedback, not to be a security boundary.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static VISA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^4[0-9]{12}(?:[0-9]{3})?$").unwrap());
static MASTERCARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^5[1-5][0-9]{14}$").unwrap());
static AMEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^3[47][0-9]{13}$").unwrap());
static CVV: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,4}$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s+()-]{8,}$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
  Visa,
  Mastercard,
  Amex,
}

impl CardBrand {
  /// Detects the issuer brand from a full card number (digits only).
  pub fn detect(number: &str) -> Option<Self> {
    if VISA.is_match(number) {
      Some(CardBrand::Visa)
    } else if MASTERCARD.is_match(number) {
      Some(CardBrand::Mastercard)
    } else if AMEX.is_match(number) {
      Some(CardBrand::Amex)
    } else {
      None
    }
  }
}

/// Strips the digit-grouping spaces the card input inserts for display.
pub fn normalize_card_number(raw: &str) -> String {
  raw.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn is_valid_card_number(number: &str) -> bool {
  CardBrand::detect(number).is_some()
}

/// The expiry must be a future `(year, month)` pair: a card entered during
/// its printed expiry month is already rejected. Two-digit years are
/// interpreted in the 2000s, as the form collects them.
pub fn is_valid_expiry(month: &str, year: &str, now: DateTime<Utc>) -> bool {
  let Ok(month) = month.trim().parse::<u32>() else {
    return false;
  };
  let Ok(mut year) = year.trim().parse::<i32>() else {
    return false;
  };
  if !(1..=12).contains(&month) {
    return false;
  }
  if year < 100 {
    year += 2000;
  }
  (year, month) > (now.year(), now.month())
}

pub fn is_valid_cvv(cvv: &str) -> bool {
  CVV.is_match(cvv)
}

pub fn is_valid_phone(phone: &str) -> bool {
  PHONE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
  EMAIL.is_match(email)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
  /// Form field the issue belongs to, so the UI can scroll it into view.
  pub field: String,
  pub message: String,
}

/// All validation failures for one submission attempt, collected together so
/// the page can render them as a single block instead of stopping at the
/// first problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
  issues: Vec<ValidationIssue>,
}

impl ValidationReport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.issues.push(ValidationIssue {
      field: field.into(),
      message: message.into(),
    });
  }

  pub fn is_empty(&self) -> bool {
    self.issues.is_empty()
  }

  pub fn issues(&self) -> &[ValidationIssue] {
    &self.issues
  }

  /// The first invalid field, the one the page scrolls to.
  pub fn first_invalid_field(&self) -> Option<&str> {
    self.issues.first().map(|issue| issue.field.as_str())
  }
}

impl fmt::Display for ValidationReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let messages: Vec<&str> = self.issues.iter().map(|issue| issue.message.as_str()).collect();
    write!(f, "{}", messages.join("; "))
  }
}
