//! Cached coding state for one configuration.
//!
//! A [`Fusion`] owns the coding matrix for a configuration together with a
//! recovery scratch arena. Backup structures that fuse elements from several
//! primaries hold one and route every code update and recovery through it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CodeConfig;
use crate::decoder::{RecoveryScratch, recover_with};
use crate::encoder::{self, apply_delta};
use crate::error::ErasureError;
use crate::matrix::CodingMatrix;
use crate::symbol::{Symbol, WordField};

/// One row of fused data: an element from each primary plus the code
/// symbols computed over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripe {
    /// One symbol per primary (`data_count`).
    pub data: Vec<Symbol>,
    /// One symbol per backup (`code_count`).
    pub code: Vec<Symbol>,
}

/// Coding matrix, symbol arithmetic and scratch space for one configuration.
#[derive(Debug, Clone)]
pub struct Fusion {
    matrix: Arc<CodingMatrix>,
    words: WordField,
    scratch: RecoveryScratch,
}

impl Fusion {
    /// Build the coding matrix for `config`.
    pub fn new(config: CodeConfig) -> Result<Self, ErasureError> {
        let matrix = Arc::new(CodingMatrix::build(config)?);
        Ok(Self::with_matrix(matrix))
    }

    /// Reuse an already built (possibly shared) matrix.
    pub fn with_matrix(matrix: Arc<CodingMatrix>) -> Self {
        let words = WordField::new(matrix.field());
        let scratch = RecoveryScratch::for_matrix(&matrix);
        info!(
            data_count = matrix.cols(),
            code_count = matrix.rows(),
            w = matrix.field().width(),
            "fusion ready"
        );
        Self {
            matrix,
            words,
            scratch,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> CodeConfig {
        self.matrix.config()
    }

    /// The shared coding matrix.
    pub fn matrix(&self) -> &Arc<CodingMatrix> {
        &self.matrix
    }

    /// Coefficient linking primary `position` to backup `code_index`.
    pub fn coefficient(&self, code_index: usize, position: usize) -> Result<u32, ErasureError> {
        encoder::coefficient(&self.matrix, code_index, position)
    }

    /// Code symbol `code_index` after primary `position` changed from `old`
    /// to `new`.
    pub fn updated_code(
        &self,
        code: Symbol,
        code_index: usize,
        old: Symbol,
        new: Symbol,
        position: usize,
    ) -> Result<Symbol, ErasureError> {
        let coefficient = self.coefficient(code_index, position)?;
        apply_delta(&self.words, coefficient, code, old, new)
    }

    /// Compute every code symbol for `data`.
    pub fn encode(&self, data: &[Symbol]) -> Result<Vec<Symbol>, ErasureError> {
        encoder::encode(&self.matrix, data)
    }

    /// Recover the data vector from surviving `code` and `data` symbols.
    ///
    /// Inputs are left untouched; the returned vector holds every data
    /// symbol, recovered or not.
    pub fn recover(
        &mut self,
        code: &[Symbol],
        data: &[Symbol],
        erasures: &[usize],
    ) -> Result<Vec<Symbol>, ErasureError> {
        let mut data = data.to_vec();
        let mut code = code.to_vec();
        recover_with(&self.matrix, &mut self.scratch, erasures, &mut data, &mut code)?;
        Ok(data)
    }

    /// Recover many stripes that lost the same positions.
    ///
    /// Stops at the first failing stripe; stripes before it are already
    /// repaired in place.
    pub fn recover_stripes(
        &mut self,
        stripes: &mut [Stripe],
        erasures: &[usize],
    ) -> Result<(), ErasureError> {
        debug!(
            stripes = stripes.len(),
            erased = erasures.len(),
            "recovering stripes"
        );
        for stripe in stripes.iter_mut() {
            recover_with(
                &self.matrix,
                &mut self.scratch,
                erasures,
                &mut stripe.data,
                &mut stripe.code,
            )?;
        }
        Ok(())
    }
}
