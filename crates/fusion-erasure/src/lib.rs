//! Systematic Reed-Solomon erasure coding over GF(2^w).
//!
//! This crate provides:
//! - [`build_matrix`]: the `code_count × data_count` Vandermonde-derived
//!   coding matrix for a [`CodeConfig`].
//! - [`encode`] / [`update_single`]: compute code symbols from data
//!   symbols, or patch one code symbol after a single data symbol changes.
//! - [`recover`]: rebuild erased data and code symbols from any
//!   `data_count` survivors.
//! - [`Fusion`] and [`FusedNode`]: a cached matrix plus scratch arena, and
//!   an accumulator that fuses one element from each primary into a backup
//!   code symbol.
//! - [`FusedBackup`] and [`recover_lists`]: a stack of fused nodes backing
//!   whole primary lists, with hole filling on removal, and the recovery of
//!   lost lists from fused data and index data.
//! - [`boundary`]: conversion between signed host integers and
//!   [`Symbol`]s, including sentinel-terminated erasure lists.
//!
//! A symbol is one 64-bit word. Coefficients act on each `w`-bit lane of the
//! word independently when `w` divides 64. Other widths carry one field
//! element per symbol, so symbols must stay below `2^w`.

mod backup;
pub mod boundary;
mod config;
mod decoder;
mod encoder;
mod error;
mod fusion;
mod matrix;
mod node;
mod symbol;

pub use backup::{FusedBackup, recover_lists};
pub use config::{CodeConfig, DEFAULT_WIDTH};
pub use decoder::{RecoveryScratch, recover, recover_with};
pub use encoder::{encode, encode_into, update_single};
pub use error::ErasureError;
pub use fusion::{Fusion, Stripe};
pub use matrix::{CodingMatrix, build_matrix};
pub use node::FusedNode;
pub use symbol::{Symbol, WordField};
