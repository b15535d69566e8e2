//! Error types for field arithmetic.

/// Errors that can occur during GF(2^w) arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The requested width is outside `1..=32`.
    #[error("unsupported field width {w} (expected 1..=32)")]
    UnsupportedWidth {
        /// The rejected width.
        w: u32,
    },

    /// An operand does not fit in `w` bits.
    #[error("element {value} is outside GF(2^{w})")]
    ElementOutOfRange {
        /// The offending operand.
        value: u32,
        /// Width of the field it was checked against.
        w: u32,
    },

    /// Division (or inversion) by the zero element.
    #[error("division by zero in GF(2^w)")]
    DivisionByZero,
}
