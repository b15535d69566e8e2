//! Arithmetic over GF(2^w) for `w` in `1..=32`.
//!
//! This crate provides:
//! - [`Field`] — a validated field width with add, multiply, divide, inverse
//!   and power operations.
//! - [`add`], [`multiply`], [`divide`] — width-checked free functions for
//!   callers that carry `w` around as a plain integer.
//!
//! Every width has exactly one fixed primitive polynomial. Widths up to 16
//! multiply through log/antilog tables that are built on first use and
//! shared process-wide; wider fields fall back to shift-and-add
//! multiplication.

mod error;
mod field;
mod tables;

pub use error::FieldError;
pub use field::{Field, MAX_WIDTH, MIN_WIDTH, add, divide, multiply};
