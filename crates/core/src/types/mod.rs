//! Core types for the booking console.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod civil_date;
pub mod email;
pub mod id;
pub mod money;
pub mod number;
pub mod status;

pub use civil_date::{
    CivilDate, CivilDateError, LocalTime, LocalTimeError, combine_in, combine_local,
    parse_wire_instant, to_wire_instant,
};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::Sek;
pub use number::{NumberError, parse_decimal_input};
pub use status::*;
