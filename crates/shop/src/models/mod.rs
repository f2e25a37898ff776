//! Record types for the four store collections.
//!
//! Each record type deserializes from a stored document; fields the older
//! web client wrote optionally default to the empty string so no caller has
//! to chain runtime fallbacks. Wire names are camelCase to match the
//! collections as they exist in production.

pub mod customer;
pub mod order;
pub mod shop;

pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use order::{ImageRevision, Order, OrderDraft, OrderPatch};
pub use shop::{NewShop, ProfilePatch, Shop, User};
