//! ISP Portal Core - Shared types and validation schemas.
//!
//! This crate provides the types used by the subscriber portal server and
//! any tooling that needs to validate admin input the same way:
//! - `isp-portal` - The portal HTTP server (subscriber + admin API)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Validation is a plain `&Value -> Result<T, ValidationError>`
//! mapping so it can run anywhere a request body shows up.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, closed enumerations, amounts, tri-state fields
//! - [`validation`] - Create/update schemas for locations, payment gateways, payments

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{Issue, Schema, ValidationError};
