//! Booking Console Core - Shared types library.
//!
//! This crate provides common types used across all booking console components:
//! - `admin` - Session store, API client, route guard and screen controllers
//! - `cli` - Command-line front end for the admin console
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no persistent storage. This keeps it lightweight and allows it
//! to be used anywhere, including in tests that pin an arbitrary timezone.
//!
//! # Modules
//!
//! - [`types`] - Civil dates, times of day, numeric input, emails, ids and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
