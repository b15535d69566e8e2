//! Vandermonde-derived coding matrix construction.
//!
//! The coding matrix is built from the `(m + k) × m` extended Vandermonde
//! matrix (rows `[1,0..0]`, `[1, i, i^2, ..]` for `i = 1..m+k-2`, and
//! `[0..0,1]`). Elementary column operations turn its top `m × m` block into
//! the identity, which keeps any `m` rows linearly independent. The bottom
//! `k` rows are then normalized so the first code row and the first column
//! are all ones, which makes code symbol 0 plain XOR parity.

use fusion_field::Field;
use tracing::debug;

use crate::config::CodeConfig;
use crate::error::ErasureError;

/// The `code_count × data_count` coding matrix for one configuration.
///
/// Immutable once built and deterministic in its configuration, so it may be
/// cached and shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingMatrix {
    config: CodeConfig,
    field: Field,
    /// Row-major, `code_count` rows of `data_count` elements.
    elements: Vec<u32>,
}

impl CodingMatrix {
    /// Build the coding matrix for `config`.
    ///
    /// # Errors
    ///
    /// [`ErasureError::Configuration`] if `config` fails
    /// [`CodeConfig::validate`].
    pub fn build(config: CodeConfig) -> Result<Self, ErasureError> {
        config.validate()?;
        let field = config.field()?;
        let rows = config.total();
        let cols = config.data_count;

        let mut dist = extended_vandermonde(field, rows, cols);
        reduce_to_systematic(field, &mut dist, rows, cols)?;

        // Make code row 0 all ones by scaling columns of the code block.
        for j in 0..cols {
            let e = dist[cols * cols + j];
            if e != 1 {
                let scale = field.inv(e)?;
                for r in cols..rows {
                    dist[r * cols + j] = field.mul(scale, dist[r * cols + j]);
                }
            }
        }

        // Make column 0 all ones by scaling the remaining code rows.
        for r in cols + 1..rows {
            let e = dist[r * cols];
            if e != 1 {
                let scale = field.inv(e)?;
                for j in 0..cols {
                    dist[r * cols + j] = field.mul(dist[r * cols + j], scale);
                }
            }
        }

        let elements = dist.split_off(cols * cols);
        debug!(
            data_count = config.data_count,
            code_count = config.code_count,
            w = config.w,
            "built coding matrix"
        );

        Ok(Self {
            config,
            field,
            elements,
        })
    }

    /// The configuration this matrix was built for.
    pub fn config(&self) -> CodeConfig {
        self.config
    }

    /// The field its elements live in.
    pub fn field(&self) -> Field {
        self.field
    }

    /// Number of rows (`code_count`).
    pub fn rows(&self) -> usize {
        self.config.code_count
    }

    /// Number of columns (`data_count`).
    pub fn cols(&self) -> usize {
        self.config.data_count
    }

    /// Element at `(row, col)`, or `None` outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        Some(self.elements[row * self.cols() + col])
    }

    /// Coefficients of code symbol `row`.
    ///
    /// # Panics
    ///
    /// If `row >= code_count`.
    pub fn row(&self, row: usize) -> &[u32] {
        let cols = self.cols();
        &self.elements[row * cols..(row + 1) * cols]
    }

    /// Row-major elements.
    pub fn as_slice(&self) -> &[u32] {
        &self.elements
    }

    /// Write row `index` of the systematic generator `[I; C]` into `out`.
    ///
    /// Indices below `data_count` are unit rows; the rest are code rows.
    pub(crate) fn generator_row(&self, index: usize, out: &mut [u32]) {
        let cols = self.cols();
        if index < cols {
            out.fill(0);
            out[index] = 1;
        } else {
            out.copy_from_slice(self.row(index - cols));
        }
    }
}

/// Build the coding matrix for `data_count` data symbols and `code_count`
/// code symbols over GF(2^w).
pub fn build_matrix(
    data_count: usize,
    code_count: usize,
    w: u32,
) -> Result<CodingMatrix, ErasureError> {
    CodingMatrix::build(CodeConfig::new(data_count, code_count, w))
}

fn extended_vandermonde(field: Field, rows: usize, cols: usize) -> Vec<u32> {
    let mut vdm = vec![0u32; rows * cols];
    vdm[0] = 1;
    if rows == 1 {
        return vdm;
    }
    vdm[rows * cols - 1] = 1;
    for i in 1..rows - 1 {
        let mut power = 1;
        for j in 0..cols {
            vdm[i * cols + j] = power;
            power = field.mul(power, i as u32);
        }
    }
    vdm
}

/// Column-reduce `dist` until its top `cols × cols` block is the identity.
fn reduce_to_systematic(
    field: Field,
    dist: &mut [u32],
    rows: usize,
    cols: usize,
) -> Result<(), ErasureError> {
    for i in 1..cols {
        let pivot = (i..rows)
            .find(|&r| dist[r * cols + i] != 0)
            .ok_or(ErasureError::SingularMatrix { column: i })?;
        if pivot != i {
            for j in 0..cols {
                dist.swap(i * cols + j, pivot * cols + j);
            }
        }

        let e = dist[i * cols + i];
        if e != 1 {
            let scale = field.inv(e)?;
            for r in 0..rows {
                dist[r * cols + i] = field.mul(scale, dist[r * cols + i]);
            }
        }

        // Clear row i outside the diagonal: column j -= row[i][j] * column i.
        for j in 0..cols {
            let factor = dist[i * cols + j];
            if j != i && factor != 0 {
                for r in 0..rows {
                    dist[r * cols + j] ^= field.mul(factor, dist[r * cols + i]);
                }
            }
        }
    }
    Ok(())
}
