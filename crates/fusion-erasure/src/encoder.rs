//! Code symbol computation and single-symbol incremental update.

use tracing::trace;

use crate::error::ErasureError;
use crate::matrix::CodingMatrix;
use crate::symbol::{Symbol, WordField};

/// Compute all code symbols for `data`.
///
/// `code[i] = Σ_j matrix[i][j] ⊗ data[j]`.
///
/// # Errors
///
/// [`ErasureError::LengthMismatch`] if `data` is not `data_count` long, or
/// [`ErasureError::SymbolOutOfRange`] if a data symbol does not fit a
/// single-lane width.
pub fn encode(matrix: &CodingMatrix, data: &[Symbol]) -> Result<Vec<Symbol>, ErasureError> {
    let mut code = vec![Symbol::ZERO; matrix.rows()];
    encode_into(matrix, data, &mut code)?;
    Ok(code)
}

/// Compute all code symbols for `data` into a caller-owned buffer.
pub fn encode_into(
    matrix: &CodingMatrix,
    data: &[Symbol],
    code: &mut [Symbol],
) -> Result<(), ErasureError> {
    check_len("data", matrix.cols(), data.len())?;
    check_len("code", matrix.rows(), code.len())?;
    let words = WordField::new(matrix.field());
    words.check("data", data)?;

    for (i, out) in code.iter_mut().enumerate() {
        *out = words.dot(matrix.row(i), data);
    }
    Ok(())
}

/// Recompute code symbol `code_index` after `data[data_index]` changed from
/// `old` to `new`.
///
/// Returns `code ⊕ (c ⊗ old) ⊕ (c ⊗ new)` where `c` is
/// `matrix[code_index][data_index]`. The result equals a full re-encode of
/// the modified data vector for that code symbol. Callers with several code
/// symbols to maintain apply this once per code symbol.
pub fn update_single(
    matrix: &CodingMatrix,
    data_index: usize,
    old: Symbol,
    new: Symbol,
    code_index: usize,
    code: Symbol,
) -> Result<Symbol, ErasureError> {
    let coefficient = coefficient(matrix, code_index, data_index)?;
    let words = WordField::new(matrix.field());

    trace!(data_index, code_index, coefficient, "incremental code update");
    apply_delta(&words, coefficient, code, old, new)
}

/// Fold the change `old -> new` of one data symbol into `code`.
pub(crate) fn apply_delta(
    words: &WordField,
    coefficient: u32,
    code: Symbol,
    old: Symbol,
    new: Symbol,
) -> Result<Symbol, ErasureError> {
    words.check("code", &[code])?;
    words.check("data", &[old, new])?;
    Ok(code ^ words.scale(coefficient, old) ^ words.scale(coefficient, new))
}

pub(crate) fn check_len(
    what: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), ErasureError> {
    if expected != got {
        return Err(ErasureError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

/// `matrix[code_index][data_index]`, naming whichever index is out of range.
pub(crate) fn coefficient(
    matrix: &CodingMatrix,
    code_index: usize,
    data_index: usize,
) -> Result<u32, ErasureError> {
    if data_index >= matrix.cols() {
        return Err(ErasureError::IndexOutOfRange {
            what: "data",
            index: data_index,
            len: matrix.cols(),
        });
    }
    matrix
        .get(code_index, data_index)
        .ok_or(ErasureError::IndexOutOfRange {
            what: "code",
            index: code_index,
            len: matrix.rows(),
        })
}
