// core/src/cart/mod.rs

pub mod line;
pub mod store;

pub use line::{Cart, CartLine, LineKey, Totals, UNBOUNDED_STOCK};
pub use store::{AddOutcome, CartStore, NewLine, SetOutcome};
