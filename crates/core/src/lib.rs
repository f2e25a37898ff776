//! TailorDesk Core - Shared types library.
//!
//! This crate provides common types used across all TailorDesk components:
//! - `shop` - Tenant-scoped data access and aggregation
//! - `integration-tests` - End-to-end repository flows
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, phone numbers, statuses,
//!   and measurement profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
