// src/lib.rs

//! Storefront: the headless client-side cart and checkout engine of a
//! server-rendered shop.
//!
//! The engine owns everything a storefront's browser scripts would own,
//! minus the DOM:
//!  - A persistent cart aggregate with stock-aware add/update/remove and
//!    all-or-nothing writes to an injected key-value storage backend.
//!  - A pure view projection of the cart (line list, totals, empty state).
//!  - Best-effort mirroring of the cart into the server session.
//!  - Checkout form assembly that flattens the cart into submittable fields,
//!    with synthetic SKUs and an optional legacy field encoding.
//!  - A payment page controller: method-dependent sub-forms, aggregated
//!    client validation, fixed tax/shipping policy, debounced autosave, and
//!    server-side stock re-validation before dispatch.

// Declare modules according to the planned structure
pub mod cart;
pub mod checkout;
pub mod config;
pub mod debounce;
pub mod error;
pub mod payment;
pub mod storage;
pub mod sync;
pub mod view;

// --- Re-exports for the Public API ---

pub use crate::cart::{AddOutcome, Cart, CartLine, CartStore, LineKey, NewLine, SetOutcome, Totals};
pub use crate::checkout::{FieldEncoding, FormAssembler, FormField};
pub use crate::config::StorefrontConfig;
pub use crate::debounce::Debouncer;
pub use crate::error::{CartError, Result, StorageError};
pub use crate::payment::{
  FormLayout, MobileProvider, PaymentForm, PaymentGateway, PaymentMethod, PaymentPage, PaymentReceipt,
  PaymentSubmission, PriceDetails, StockChecker, StockConflict, StockStatus, SubForm, ValidationIssue,
  ValidationReport,
};
pub use crate::storage::{MemoryStorage, StorageBackend};
pub use crate::sync::{BestEffort, CartSyncClient, HttpSessionMirror, SessionMirror};
pub use crate::view::{CartPageView, CartView, LineView};

/*
    Core Workflow:
    1. Create a `StorageBackend` for the profile-scoped durable store and a
       `CartStore` over it; product pages call `add_line`, cart controls call
       `set_quantity` / `remove_line`.
    2. Re-project the cart with `CartView::project` after every mutation.
    3. Before navigating to checkout, push a snapshot with
       `CartSyncClient::sync` (fire-and-forget).
    4. On the payment page, drive a `PaymentPage`: `select_method`,
       `autosave`/`restore`, then `submit`, which validates, re-checks stock,
       assembles the cart fields, and dispatches through the gateway.
    5. After the server confirms the order it sets a short-lived marker; call
       `CartStore::consume_clear_marker` on the next page load to empty the
       cart exactly once.
*/
