// core/src/payment/mod.rs

pub mod controller;
pub mod gateway;
pub mod method;
pub mod stock;
pub mod validate;

pub use controller::{format_cents, PaymentForm, PaymentPage, PriceDetails};
pub use gateway::{HttpPaymentGateway, PaymentGateway, PaymentReceipt, PaymentSubmission};
pub use method::{FormLayout, MobileProvider, PaymentMethod, SubForm};
pub use stock::{HttpStockChecker, StockChecker, StockConflict, StockStatus};
pub use validate::{CardBrand, ValidationIssue, ValidationReport};
