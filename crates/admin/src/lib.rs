//! Booking console library.
//!
//! Everything the operator-facing console needs except rendering: the
//! session store, the booking API client, the route guard and one screen
//! controller per admin screen. The CLI crate renders these screens.
//!
//! # Security
//!
//! The stored session credential grants full administrative access to the
//! booking API (bookings, prices, discounts, leads). It is held in a
//! `SecretString`, written to a user-only file, and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod guard;
pub mod screens;
pub mod session;
pub mod state;

pub use error::{ScreenError, ValidationErrors};
pub use state::AppState;
