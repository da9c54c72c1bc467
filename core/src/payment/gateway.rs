// core/src/payment/gateway.rs

use async_trait::async_trait;
use serde::Deserialize;

use crate::checkout::FormField;
use crate::error::{CartError, Result};
use crate::payment::stock::StockConflict;

/// Everything the payment endpoint receives: method/address/contact fields
/// plus the assembled cart fields. Order is preserved as assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSubmission {
  pub fields: Vec<FormField>,
}

impl PaymentSubmission {
  pub fn value_of(&self, name: &str) -> Option<&str> {
    self
      .fields
      .iter()
      .find(|field| field.name == name)
      .map(|field| field.value.as_str())
  }
}

/// Where the client goes after a successful order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentReceipt {
  pub redirect: String,
}

/// Final order dispatch. Must-complete, as opposed to the best-effort sync:
/// failures surface to the user, either as structured stock conflicts or a
/// general message.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn process(&self, submission: PaymentSubmission) -> Result<PaymentReceipt>;
}

#[derive(Debug, Deserialize)]
struct GatewayFailureBody {
  #[serde(default)]
  error: Option<String>,
  #[serde(default)]
  conflicts: Option<Vec<StockConflict>>,
}

/// Form-posts the submission to the payment-processing endpoint.
pub struct HttpPaymentGateway {
  client: reqwest::Client,
  endpoint: String,
}

impl HttpPaymentGateway {
  pub fn new(endpoint: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      endpoint: endpoint.into(),
    }
  }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
  async fn process(&self, submission: PaymentSubmission) -> Result<PaymentReceipt> {
    let form: Vec<(&str, &str)> = submission
      .fields
      .iter()
      .map(|field| (field.name.as_str(), field.value.as_str()))
      .collect();

    let response = self.client.post(&self.endpoint).form(&form).send().await?;

    if response.status().is_success() {
      return Ok(response.json::<PaymentReceipt>().await?);
    }

    // Failed orders come back with either a structured conflict list or a
    // plain message; fall back to the HTTP status when the body is neither.
    let status = response.status();
    match response.json::<GatewayFailureBody>().await {
      Ok(GatewayFailureBody {
        conflicts: Some(conflicts),
        ..
      }) if !conflicts.is_empty() => Err(CartError::StockConflicts { conflicts }),
      Ok(GatewayFailureBody { error: Some(error), .. }) => Err(CartError::Payment(error)),
      _ => Err(CartError::Payment(format!("Payment endpoint returned {}", status))),
    }
  }
}
