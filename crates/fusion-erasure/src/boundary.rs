//! Conversion between host integers and engine types.
//!
//! Hosts exchange symbols as signed 64-bit integers and erasure lists as
//! signed indices terminated by [`ERASURE_SENTINEL`]. This module validates
//! lengths, reinterprets integers as [`Symbol`]s, and exposes the engine
//! operations in that flat form.

use tracing::debug;

use crate::config::CodeConfig;
use crate::decoder::recover;
use crate::encoder::{encode, update_single};
use crate::error::ErasureError;
use crate::matrix::CodingMatrix;
use crate::symbol::Symbol;

/// Terminates an erasure list.
pub const ERASURE_SENTINEL: i64 = -1;

/// Convert host integers to symbols, requiring exactly `expected` of them.
pub fn symbols_from_host(
    what: &'static str,
    values: &[i64],
    expected: usize,
) -> Result<Vec<Symbol>, ErasureError> {
    if values.len() != expected {
        return Err(ErasureError::LengthMismatch {
            what,
            expected,
            got: values.len(),
        });
    }
    Ok(values.iter().copied().map(Symbol::from_i64).collect())
}

/// Convert symbols back to host integers.
pub fn symbols_to_host(symbols: &[Symbol]) -> Vec<i64> {
    symbols.iter().map(|s| s.to_i64()).collect()
}

/// Parse a sentinel-terminated erasure list.
///
/// Reading stops at the first [`ERASURE_SENTINEL`] or at the end of `raw`.
/// Any other negative entry is rejected. Range and duplicate checks happen
/// in recovery.
pub fn parse_erasures(raw: &[i64]) -> Result<Vec<usize>, ErasureError> {
    raw.iter()
        .take_while(|&&i| i != ERASURE_SENTINEL)
        .map(|&i| {
            usize::try_from(i).map_err(|_| ErasureError::InvalidErasure {
                index: i,
                reason: "negative index",
            })
        })
        .collect()
}

/// Build a host erasure list from detected faults, padded with
/// [`ERASURE_SENTINEL`] to `code_count + 1` entries.
pub fn pad_erasures(faults: &[usize], code_count: usize) -> Vec<i64> {
    let mut list: Vec<i64> = faults.iter().map(|&f| f as i64).collect();
    let len = list.len().max(code_count + 1);
    list.resize(len, ERASURE_SENTINEL);
    list
}

/// Marks a primary with no element in a fused node, in host index data.
pub const ABSENT_INDEX: i64 = -1;

/// Index data of a [`FusedBackup`](crate::FusedBackup) as host integers.
pub fn index_data_to_host(index_data: &[Vec<Option<usize>>]) -> Vec<Vec<i64>> {
    index_data
        .iter()
        .map(|row| {
            row.iter()
                .map(|i| i.map_or(ABSENT_INDEX, |i| i as i64))
                .collect()
        })
        .collect()
}

/// Parse host index data; [`ABSENT_INDEX`] becomes `None` and any other
/// negative entry is rejected.
pub fn index_data_from_host(raw: &[Vec<i64>]) -> Result<Vec<Vec<Option<usize>>>, ErasureError> {
    raw.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(primary, &i)| match i {
                    ABSENT_INDEX => Ok(None),
                    i => usize::try_from(i).map(Some).map_err(|_| {
                        ErasureError::InvalidIndexData {
                            primary,
                            reason: "negative index",
                        }
                    }),
                })
                .collect()
        })
        .collect()
}

/// The coding matrix, row-major, as host integers.
pub fn matrix_to_host(matrix: &CodingMatrix) -> Vec<i64> {
    matrix.as_slice().iter().map(|&e| i64::from(e)).collect()
}

/// Build the coding matrix for `config` and flatten it.
pub fn rs_matrix(config: CodeConfig) -> Result<Vec<i64>, ErasureError> {
    Ok(matrix_to_host(&CodingMatrix::build(config)?))
}

/// Encode host data into host code symbols.
pub fn rs_encode(config: CodeConfig, data: &[i64]) -> Result<Vec<i64>, ErasureError> {
    let matrix = CodingMatrix::build(config)?;
    let data = symbols_from_host("data", data, config.data_count)?;
    Ok(symbols_to_host(&encode(&matrix, &data)?))
}

/// Incremental update of one host code symbol.
pub fn rs_code(
    config: CodeConfig,
    code: i64,
    code_index: usize,
    old: i64,
    new: i64,
    position: usize,
) -> Result<i64, ErasureError> {
    let matrix = CodingMatrix::build(config)?;
    let code = update_single(
        &matrix,
        position,
        Symbol::from_i64(old),
        Symbol::from_i64(new),
        code_index,
        Symbol::from_i64(code),
    )?;
    Ok(code.to_i64())
}

/// Recover host data from host code, data and a sentinel-terminated
/// erasure list. Returns the full data vector.
pub fn recover_data(
    config: CodeConfig,
    code: &[i64],
    data: &[i64],
    erasures: &[i64],
) -> Result<Vec<i64>, ErasureError> {
    let matrix = CodingMatrix::build(config)?;
    let mut code = symbols_from_host("code", code, config.code_count)?;
    let mut data = symbols_from_host("data", data, config.data_count)?;
    let erasures = parse_erasures(erasures)?;
    debug!(?erasures, "host recovery request");

    recover(&matrix, &erasures, &mut data, &mut code)?;
    Ok(symbols_to_host(&data))
}
