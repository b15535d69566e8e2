//! Erasure recovery.
//!
//! Recovery picks the first `data_count` surviving positions of the
//! systematic generator `[I; C]`, inverts that square submatrix over
//! GF(2^w), and multiplies the inverse by the surviving symbols. Erased code
//! symbols are then re-encoded from the completed data vector.

use fusion_field::Field;
use tracing::debug;

use crate::encoder::check_len;
use crate::error::ErasureError;
use crate::matrix::CodingMatrix;
use crate::symbol::{Symbol, WordField};

/// Reusable buffers for [`recover_with`].
///
/// Buffers grow to the largest configuration seen and are reused after
/// that, so repeated recoveries with the same configuration do not allocate.
#[derive(Debug, Default, Clone)]
pub struct RecoveryScratch {
    erased: Vec<bool>,
    survivors: Vec<usize>,
    decoding: Vec<u32>,
    inverse: Vec<u32>,
    values: Vec<Symbol>,
}

impl RecoveryScratch {
    /// Create an empty scratch arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scratch arena pre-sized for `matrix`'s configuration.
    pub fn for_matrix(matrix: &CodingMatrix) -> Self {
        let m = matrix.cols();
        let total = m + matrix.rows();
        Self {
            erased: Vec::with_capacity(total),
            survivors: Vec::with_capacity(m),
            decoding: Vec::with_capacity(m * m),
            inverse: Vec::with_capacity(m * m),
            values: Vec::with_capacity(m),
        }
    }

    fn reset(&mut self, m: usize, total: usize) {
        self.erased.clear();
        self.erased.resize(total, false);
        self.survivors.clear();
        self.decoding.clear();
        self.decoding.resize(m * m, 0);
        self.inverse.clear();
        self.inverse.resize(m * m, 0);
        self.values.clear();
    }
}

/// Recover erased symbols in place.
///
/// `erasures` indexes the combined space: `0..data_count` are data
/// positions, `data_count..data_count + code_count` are code positions.
/// Values at erased positions are ignored on input and overwritten on
/// output. Every data position is recomputed from the survivors, so
/// non-erased data comes back unchanged.
///
/// Allocates a fresh [`RecoveryScratch`]; use [`recover_with`] on hot paths.
///
/// # Errors
///
/// - [`ErasureError::LengthMismatch`] if `data` or `code` has the wrong length.
/// - [`ErasureError::UnrecoverableErasure`] if more than `code_count`
///   positions are erased.
/// - [`ErasureError::InvalidErasure`] for out-of-range or repeated indices.
/// - [`ErasureError::SymbolOutOfRange`] if a surviving symbol does not fit a
///   single-lane width.
/// - [`ErasureError::SingularMatrix`] if the decoding matrix has no inverse.
pub fn recover(
    matrix: &CodingMatrix,
    erasures: &[usize],
    data: &mut [Symbol],
    code: &mut [Symbol],
) -> Result<(), ErasureError> {
    let mut scratch = RecoveryScratch::for_matrix(matrix);
    recover_with(matrix, &mut scratch, erasures, data, code)
}

/// [`recover`] using caller-provided scratch buffers.
pub fn recover_with(
    matrix: &CodingMatrix,
    scratch: &mut RecoveryScratch,
    erasures: &[usize],
    data: &mut [Symbol],
    code: &mut [Symbol],
) -> Result<(), ErasureError> {
    let m = matrix.cols();
    let k = matrix.rows();
    let total = m + k;

    check_len("data", m, data.len())?;
    check_len("code", k, code.len())?;
    if erasures.len() > k {
        return Err(ErasureError::UnrecoverableErasure {
            erased: erasures.len(),
            code_count: k,
        });
    }
    let words = WordField::new(matrix.field());

    scratch.reset(m, total);
    for &index in erasures {
        if index >= total {
            return Err(ErasureError::InvalidErasure {
                index: index as i64,
                reason: "out of range",
            });
        }
        if scratch.erased[index] {
            return Err(ErasureError::InvalidErasure {
                index: index as i64,
                reason: "duplicate",
            });
        }
        scratch.erased[index] = true;
    }

    for (position, &symbol) in data.iter().chain(code.iter()).enumerate() {
        if !scratch.erased[position] {
            words.check("surviving", &[symbol])?;
        }
    }

    let data_erased = scratch.erased[..m].iter().filter(|&&e| e).count();
    debug!(
        data_count = m,
        code_count = k,
        data_erased,
        code_erased = erasures.len() - data_erased,
        "recovering erased symbols"
    );

    if data_erased > 0 {
        scratch
            .survivors
            .extend((0..total).filter(|&i| !scratch.erased[i]).take(m));

        for (r, &position) in scratch.survivors.iter().enumerate() {
            matrix.generator_row(position, &mut scratch.decoding[r * m..(r + 1) * m]);
            let value = if position < m {
                data[position]
            } else {
                code[position - m]
            };
            scratch.values.push(value);
        }

        invert(
            matrix.field(),
            m,
            &mut scratch.decoding,
            &mut scratch.inverse,
        )?;

        for (i, out) in data.iter_mut().enumerate() {
            *out = words.dot(&scratch.inverse[i * m..(i + 1) * m], &scratch.values);
        }
    }

    for i in 0..k {
        if scratch.erased[m + i] {
            code[i] = words.dot(matrix.row(i), data);
        }
    }
    Ok(())
}

/// Gauss-Jordan inversion of the `n × n` matrix `a` into `inverse`.
///
/// `a` is destroyed. Both slices must hold `n * n` elements.
pub(crate) fn invert(
    field: Field,
    n: usize,
    a: &mut [u32],
    inverse: &mut [u32],
) -> Result<(), ErasureError> {
    inverse.fill(0);
    for i in 0..n {
        inverse[i * n + i] = 1;
    }

    for col in 0..n {
        let pivot = (col..n)
            .find(|&r| a[r * n + col] != 0)
            .ok_or(ErasureError::SingularMatrix { column: col })?;
        if pivot != col {
            for j in 0..n {
                a.swap(col * n + j, pivot * n + j);
                inverse.swap(col * n + j, pivot * n + j);
            }
        }

        let e = a[col * n + col];
        if e != 1 {
            let scale = field.inv(e)?;
            for j in 0..n {
                a[col * n + j] = field.mul(a[col * n + j], scale);
                inverse[col * n + j] = field.mul(inverse[col * n + j], scale);
            }
        }

        for r in 0..n {
            let factor = a[r * n + col];
            if r == col || factor == 0 {
                continue;
            }
            for j in 0..n {
                a[r * n + j] ^= field.mul(factor, a[col * n + j]);
                inverse[r * n + j] ^= field.mul(factor, inverse[col * n + j]);
            }
        }
    }
    Ok(())
}
