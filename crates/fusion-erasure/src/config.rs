//! Code configuration.
//!
//! A [`CodeConfig`] names how many data symbols are protected, how many code
//! symbols protect them, and the field width the arithmetic runs in.

use fusion_field::{Field, MAX_WIDTH, MIN_WIDTH};
use serde::{Deserialize, Serialize};

use crate::error::ErasureError;

/// Field width used when a configuration omits `w`.
pub const DEFAULT_WIDTH: u32 = 16;

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

/// Parameters of a systematic Reed-Solomon code.
///
/// | Field        | Meaning                                  |
/// |--------------|------------------------------------------|
/// | `data_count` | primary symbols protected (`m`)          |
/// | `code_count` | backup symbols derived from them (`k`)   |
/// | `w`          | field width, GF(2^w)                     |
///
/// The code tolerates the loss of any `code_count` of the
/// `data_count + code_count` symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeConfig {
    /// Number of data symbols.
    pub data_count: usize,
    /// Number of code symbols.
    pub code_count: usize,
    /// Field width in bits.
    #[serde(default = "default_width")]
    pub w: u32,
}

impl CodeConfig {
    /// Create a configuration without validating it.
    pub fn new(data_count: usize, code_count: usize, w: u32) -> Self {
        Self {
            data_count,
            code_count,
            w,
        }
    }

    /// Total number of symbols, data and code.
    pub fn total(&self) -> usize {
        self.data_count + self.code_count
    }

    /// Check that the parameters can form an MDS code.
    ///
    /// Requires `data_count, code_count >= 1`, `w` in `1..=32` and
    /// `data_count + code_count <= 2^w`: beyond the field size the
    /// Vandermonde rows stop being distinct.
    pub fn validate(&self) -> Result<(), ErasureError> {
        if self.data_count == 0 {
            return Err(ErasureError::Configuration(
                "data_count must be at least 1".to_string(),
            ));
        }
        if self.code_count == 0 {
            return Err(ErasureError::Configuration(
                "code_count must be at least 1".to_string(),
            ));
        }
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&self.w) {
            return Err(ErasureError::Configuration(format!(
                "w={} outside {MIN_WIDTH}..={MAX_WIDTH}",
                self.w
            )));
        }
        let total = self.data_count as u128 + self.code_count as u128;
        if total > 1u128 << self.w {
            return Err(ErasureError::Configuration(format!(
                "data_count + code_count = {total} exceeds 2^{} field elements",
                self.w
            )));
        }
        Ok(())
    }

    /// The field this configuration computes in.
    pub fn field(&self) -> Result<Field, ErasureError> {
        Field::new(self.w).map_err(|e| ErasureError::Configuration(e.to_string()))
    }
}
