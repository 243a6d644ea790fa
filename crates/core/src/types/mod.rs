//! Core types for the subscriber portal.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod amount;
pub mod id;
pub mod nullable;
pub mod status;

pub use amount::{AmountError, PositiveAmount};
pub use id::*;
pub use nullable::Nullable;
pub use status::*;
