//! Word symbols and lane-wise field arithmetic on them.

use std::fmt;
use std::ops::{BitXor, BitXorAssign};

use fusion_field::Field;

use crate::error::ErasureError;

/// Bits in one symbol.
const SYMBOL_BITS: u32 = u64::BITS;

/// One unit of data or code: a 64-bit word.
///
/// A coding coefficient acts on each little-endian `w`-bit lane of the word
/// independently. With `w = 16`, a value below `2^16` occupies lane 0 alone
/// and behaves exactly like a single field element.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Symbol(pub u64);

impl Symbol {
    /// The all-zero symbol.
    pub const ZERO: Self = Self(0);

    /// Reinterpret a signed host integer as a symbol (two's complement).
    pub fn from_i64(value: i64) -> Self {
        Self(value as u64)
    }

    /// Reinterpret the symbol as a signed host integer (two's complement).
    pub fn to_i64(self) -> i64 {
        self.0 as i64
    }

    /// The raw word.
    pub fn bits(self) -> u64 {
        self.0
    }
}

impl From<u64> for Symbol {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Symbol> for u64 {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl BitXor for Symbol {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Symbol {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:#x})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A field paired with the way its elements are laid out in a symbol.
///
/// When `w` divides 64 the word is packed with `64 / w` lanes. Any other
/// width uses a single lane, and symbols must then be below `2^w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordField {
    field: Field,
    lanes: u32,
    lane_mask: u64,
}

impl WordField {
    /// Wrap `field` for symbol arithmetic.
    pub fn new(field: Field) -> Self {
        let w = field.width();
        let lanes = if SYMBOL_BITS % w == 0 {
            SYMBOL_BITS / w
        } else {
            1
        };
        Self {
            field,
            lanes,
            lane_mask: u64::from(field.mask()),
        }
    }

    /// Check that every symbol fits the lane layout.
    ///
    /// Packed layouts accept any word. A single-lane layout rejects symbols
    /// with bits above `w`.
    pub fn check(&self, what: &'static str, symbols: &[Symbol]) -> Result<(), ErasureError> {
        if self.lanes * self.field.width() == SYMBOL_BITS {
            return Ok(());
        }
        match symbols.iter().find(|s| s.0 > self.lane_mask) {
            Some(s) => Err(ErasureError::SymbolOutOfRange {
                what,
                value: s.0,
                w: self.field.width(),
            }),
            None => Ok(()),
        }
    }

    /// The underlying field.
    pub fn field(&self) -> Field {
        self.field
    }

    /// Number of field elements packed in one symbol.
    pub fn lanes(&self) -> u32 {
        self.lanes
    }

    /// Multiply every lane of `symbol` by `coefficient`.
    pub fn scale(&self, coefficient: u32, symbol: Symbol) -> Symbol {
        match coefficient {
            0 => return Symbol::ZERO,
            1 => return symbol,
            _ => {}
        }
        let w = self.field.width();
        let mut out = 0u64;
        for lane in 0..self.lanes {
            let shift = lane * w;
            let element = ((symbol.0 >> shift) & self.lane_mask) as u32;
            if element != 0 {
                out |= u64::from(self.field.mul(coefficient, element)) << shift;
            }
        }
        Symbol(out)
    }

    /// `Σ row[j] ⊗ symbols[j]` over the shorter of the two slices.
    pub fn dot(&self, row: &[u32], symbols: &[Symbol]) -> Symbol {
        row.iter()
            .zip(symbols)
            .fold(Symbol::ZERO, |acc, (&c, &s)| acc ^ self.scale(c, s))
    }
}
