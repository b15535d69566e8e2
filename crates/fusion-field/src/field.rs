//! The [`Field`] handle and width-checked free functions.

use crate::error::FieldError;
use crate::tables::{self, MAX_TABLE_WIDTH, PRIMITIVE_POLY};

/// Narrowest supported field width.
pub const MIN_WIDTH: u32 = 1;
/// Widest supported field width.
pub const MAX_WIDTH: u32 = 32;

/// A validated Galois field GF(2^w).
///
/// `Field` is a `Copy` handle: it holds only the width. The arithmetic
/// tables it dispatches to are shared process-wide, so handles can be passed
/// around and used from any thread freely.
///
/// Operands are expected to lie in `[0, 2^w)`. Bits above `w` are masked off
/// before use so an out-of-range operand can never index past a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    w: u32,
}

impl Field {
    /// Create a handle for GF(2^w).
    pub fn new(w: u32) -> Result<Self, FieldError> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&w) {
            return Err(FieldError::UnsupportedWidth { w });
        }
        Ok(Self { w })
    }

    /// Width `w` in bits.
    pub fn width(self) -> u32 {
        self.w
    }

    /// Number of elements, `2^w`.
    pub fn order(self) -> u64 {
        1u64 << self.w
    }

    /// Mask selecting the low `w` bits.
    pub fn mask(self) -> u32 {
        (self.order() - 1) as u32
    }

    /// The primitive polynomial for this width, `x^w` term included.
    pub fn polynomial(self) -> u64 {
        PRIMITIVE_POLY[self.w as usize]
    }

    /// Whether `a` is an element of this field.
    pub fn contains(self, a: u32) -> bool {
        u64::from(a) < self.order()
    }

    /// Check that `a` is an element of this field.
    pub fn check(self, a: u32) -> Result<u32, FieldError> {
        if self.contains(a) {
            Ok(a)
        } else {
            Err(FieldError::ElementOutOfRange {
                value: a,
                w: self.w,
            })
        }
    }

    /// Field addition (XOR). Subtraction is the same operation.
    #[inline]
    pub fn add(self, a: u32, b: u32) -> u32 {
        (a ^ b) & self.mask()
    }

    /// Field multiplication.
    #[inline]
    pub fn mul(self, a: u32, b: u32) -> u32 {
        debug_assert!(self.contains(a) && self.contains(b));
        let (a, b) = (a & self.mask(), b & self.mask());
        if self.w <= MAX_TABLE_WIDTH {
            tables::tables(self.w).multiply(a, b)
        } else {
            tables::shift_multiply(a, b, self.w)
        }
    }

    /// Field division `a / b`.
    pub fn div(self, a: u32, b: u32) -> Result<u32, FieldError> {
        let (a, b) = (a & self.mask(), b & self.mask());
        if b == 0 {
            return Err(FieldError::DivisionByZero);
        }
        if self.w <= MAX_TABLE_WIDTH {
            Ok(tables::tables(self.w).divide(a, b))
        } else {
            Ok(self.mul(a, self.inv(b)?))
        }
    }

    /// Multiplicative inverse of `a`.
    pub fn inv(self, a: u32) -> Result<u32, FieldError> {
        let a = a & self.mask();
        if a == 0 {
            return Err(FieldError::DivisionByZero);
        }
        if self.w <= MAX_TABLE_WIDTH {
            Ok(tables::tables(self.w).divide(1, a))
        } else {
            // a^(2^w - 2) = a^-1 since the multiplicative group has order 2^w - 1.
            Ok(self.pow(a, self.order() - 2))
        }
    }

    /// `a` raised to the `n`-th power. `pow(0, 0)` is 1.
    pub fn pow(self, a: u32, mut n: u64) -> u32 {
        let mut base = a & self.mask();
        let mut result = 1;
        while n != 0 {
            if n & 1 != 0 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            n >>= 1;
        }
        result
    }
}

/// Field addition. XOR is the same in every width, so this cannot fail.
#[inline]
pub fn add(a: u32, b: u32) -> u32 {
    a ^ b
}

/// Multiply `a` by `b` in GF(2^w).
///
/// # Errors
///
/// [`FieldError::UnsupportedWidth`] for `w` outside `1..=32`, or
/// [`FieldError::ElementOutOfRange`] if an operand does not fit in `w` bits.
pub fn multiply(a: u32, b: u32, w: u32) -> Result<u32, FieldError> {
    let field = Field::new(w)?;
    Ok(field.mul(field.check(a)?, field.check(b)?))
}

/// Divide `a` by `b` in GF(2^w).
///
/// # Errors
///
/// As [`multiply`], plus [`FieldError::DivisionByZero`] when `b == 0`.
pub fn divide(a: u32, b: u32, w: u32) -> Result<u32, FieldError> {
    let field = Field::new(w)?;
    field.div(field.check(a)?, field.check(b)?)
}
