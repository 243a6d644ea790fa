//! ISP subscriber portal library.
//!
//! This crate provides the portal server as a library, allowing the router
//! to be built and exercised in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod images;
pub mod middleware;
pub mod routes;
pub mod state;
