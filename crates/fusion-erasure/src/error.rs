//! Error types for erasure coding operations.

use fusion_field::FieldError;

/// Errors that can occur while building a coding matrix, encoding, or
/// recovering symbols.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErasureError {
    /// The `(data_count, code_count, w)` triple cannot form an MDS code.
    #[error("invalid code configuration: {0}")]
    Configuration(String),

    /// More symbols were erased than there are code symbols.
    #[error("cannot recover {erased} erasures with {code_count} code symbols")]
    UnrecoverableErasure {
        /// Number of erased positions requested.
        erased: usize,
        /// Redundancy available (`k`).
        code_count: usize,
    },

    /// No non-zero pivot was found while inverting the decoding matrix.
    #[error("decoding matrix is singular at column {column}")]
    SingularMatrix {
        /// Column that had no usable pivot.
        column: usize,
    },

    /// Field division by the zero element.
    #[error("division by zero in GF(2^w)")]
    DivisionByZero,

    /// Any other field arithmetic failure.
    #[error(transparent)]
    Field(FieldError),

    /// An erasure index is out of range, negative, or repeated.
    #[error("invalid erasure index {index}: {reason}")]
    InvalidErasure {
        /// The rejected index as the caller supplied it.
        index: i64,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An index into the data or code vector is out of range.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Which vector the index refers to.
        what: &'static str,
        /// The rejected index.
        index: usize,
        /// Length of that vector.
        len: usize,
    },

    /// A caller buffer does not have the length the configuration requires.
    #[error("{what} has {got} symbols, expected {expected}")]
    LengthMismatch {
        /// Which buffer was wrong.
        what: &'static str,
        /// Length the configuration requires.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// A symbol does not fit a single-lane layout (`w` not dividing 64).
    #[error("{what} symbol {value:#x} does not fit in {w} bits")]
    SymbolOutOfRange {
        /// Which buffer held the symbol.
        what: &'static str,
        /// The rejected word.
        value: u64,
        /// The configured width.
        w: u32,
    },

    /// The index data of a fused backup does not describe whole lists.
    #[error("inconsistent index data for primary {primary}: {reason}")]
    InvalidIndexData {
        /// Primary whose column is inconsistent.
        primary: usize,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl From<FieldError> for ErasureError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::DivisionByZero => Self::DivisionByZero,
            other => Self::Field(other),
        }
    }
}
