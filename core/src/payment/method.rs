// core/src/payment/method.rs

use serde::{Deserialize, Serialize};

/// Mobile-money providers the storefront accepts. The set is configuration in
/// spirit: adding a provider means adding a variant here and a radio button in
/// the template, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobileProvider {
  OrangeMoney,
  Wave,
}

impl MobileProvider {
  pub fn as_str(&self) -> &'static str {
    match self {
      MobileProvider::OrangeMoney => "orange_money",
      MobileProvider::Wave => "wave",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  Card,
  MobileMoney(MobileProvider),
  CashOnDelivery,
}

impl PaymentMethod {
  /// Wire value submitted in the `payment_method` form field.
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::Card => "card",
      PaymentMethod::MobileMoney(provider) => provider.as_str(),
      PaymentMethod::CashOnDelivery => "cash_on_delivery",
    }
  }

  pub fn parse(value: &str) -> Option<Self> {
    match value {
      "card" => Some(PaymentMethod::Card),
      "orange_money" => Some(PaymentMethod::MobileMoney(MobileProvider::OrangeMoney)),
      "wave" => Some(PaymentMethod::MobileMoney(MobileProvider::Wave)),
      "cash_on_delivery" => Some(PaymentMethod::CashOnDelivery),
      _ => None,
    }
  }

  /// The one sub-form shown for this method; all others are hidden and
  /// un-required.
  pub fn sub_form(&self) -> SubForm {
    match self {
      PaymentMethod::Card => SubForm::Card,
      PaymentMethod::MobileMoney(_) => SubForm::MobileMoney,
      PaymentMethod::CashOnDelivery => SubForm::Delivery,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubForm {
  Card,
  MobileMoney,
  Delivery,
}

impl SubForm {
  pub const ALL: [SubForm; 3] = [SubForm::Card, SubForm::MobileMoney, SubForm::Delivery];

  /// Field names that become required while this sub-form is visible.
  pub fn required_fields(&self) -> &'static [&'static str] {
    match self {
      SubForm::Card => &["card_number", "card_expiry_month", "card_expiry_year", "card_cvv"],
      SubForm::MobileMoney => &["mobile_phone"],
      SubForm::Delivery => &[],
    }
  }
}

/// Snapshot of the form layout after a method selection: which sub-form is
/// visible and which fields are currently required. Address fields and the
/// terms checkbox are required regardless of method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
  pub visible: SubForm,
  pub required_fields: Vec<&'static str>,
}

pub const ADDRESS_FIELDS: [&str; 4] = ["street_address", "city", "postal_code", "country"];

impl FormLayout {
  pub fn for_method(method: PaymentMethod) -> Self {
    let visible = method.sub_form();
    let mut required_fields: Vec<&'static str> = ADDRESS_FIELDS.to_vec();
    required_fields.extend_from_slice(visible.required_fields());
    Self {
      visible,
      required_fields,
    }
  }

  pub fn hidden_sub_forms(&self) -> impl Iterator<Item = SubForm> + '_ {
    SubForm::ALL.into_iter().filter(|form| *form != self.visible)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exactly_one_sub_form_visible_per_method() {
    for method in [
      PaymentMethod::Card,
      PaymentMethod::MobileMoney(MobileProvider::Wave),
      PaymentMethod::CashOnDelivery,
    ] {
      let layout = FormLayout::for_method(method);
      assert_eq!(layout.hidden_sub_forms().count(), 2);
    }
  }

  #[test]
  fn card_fields_not_required_for_cash_on_delivery() {
    let layout = FormLayout::for_method(PaymentMethod::CashOnDelivery);
    assert!(!layout.required_fields.contains(&"card_number"));
    assert!(layout.required_fields.contains(&"city"));
  }

  #[test]
  fn wire_values_round_trip() {
    for value in ["card", "orange_money", "wave", "cash_on_delivery"] {
      assert_eq!(PaymentMethod::parse(value).unwrap().as_str(), value);
    }
    assert_eq!(PaymentMethod::parse("paypal"), None);
  }
}
