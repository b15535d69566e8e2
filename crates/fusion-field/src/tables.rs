//! Primitive polynomials and lazily built log/antilog tables.
//!
//! Tables are keyed by width and initialized at most once per process. After
//! initialization they are immutable, so concurrent readers never contend.

use std::sync::OnceLock;

use tracing::debug;

/// Widest field that multiplies through log/antilog tables.
pub(crate) const MAX_TABLE_WIDTH: u32 = 16;

/// Primitive polynomial per width, including the `x^w` term. Index 0 is unused.
///
/// These are fixed for the lifetime of the format: a coding matrix built
/// under one polynomial cannot be decoded under another.
pub(crate) const PRIMITIVE_POLY: [u64; 33] = [
    0,
    0o3,
    0o7,
    0o13,
    0o23,
    0o45,
    0o103,
    0o211,
    0o435,
    0o1021,
    0o2011,
    0o4005,
    0o10123,
    0o20033,
    0o42103,
    0o100003,
    0o210013,
    0o400011,
    0o1000201,
    0o2000047,
    0o4000011,
    0o10000005,
    0o20000003,
    0o40000041,
    0o100000207,
    0o200000011,
    0o400000107,
    0o1000000047,
    0o2000000011,
    0o4000000005,
    0o10040000007,
    0o20000000011,
    0o40020000007,
];

/// Log/antilog tables for one width.
pub(crate) struct LogTables {
    /// `log[a]` for every non-zero `a`; `log[0]` is never read.
    log: Vec<u32>,
    /// `exp[i] = x^i`, stored twice over so sums of two logs need no modulo.
    exp: Vec<u32>,
    /// Size of the multiplicative group, `2^w - 1`.
    group: u32,
}

impl LogTables {
    fn build(w: u32) -> Self {
        let order = 1usize << w;
        let group = order - 1;
        let poly = PRIMITIVE_POLY[w as usize];
        let high_bit = 1u64 << w;

        let mut log = vec![0u32; order];
        let mut exp = vec![0u32; 2 * group];

        let mut b: u64 = 1;
        for i in 0..group {
            exp[i] = b as u32;
            exp[i + group] = b as u32;
            log[b as usize] = i as u32;
            b <<= 1;
            if b & high_bit != 0 {
                b ^= poly;
            }
        }

        Self {
            log,
            exp,
            group: group as u32,
        }
    }

    #[inline]
    pub(crate) fn multiply(&self, a: u32, b: u32) -> u32 {
        if a == 0 || b == 0 {
            return 0;
        }
        let idx = self.log[a as usize] + self.log[b as usize];
        self.exp[idx as usize]
    }

    /// Divide `a` by a non-zero `b`.
    #[inline]
    pub(crate) fn divide(&self, a: u32, b: u32) -> u32 {
        debug_assert_ne!(b, 0);
        if a == 0 {
            return 0;
        }
        let idx = self.log[a as usize] + self.group - self.log[b as usize];
        self.exp[idx as usize]
    }
}

static TABLES: [OnceLock<LogTables>; MAX_TABLE_WIDTH as usize + 1] =
    [const { OnceLock::new() }; MAX_TABLE_WIDTH as usize + 1];

/// Tables for width `w`, building them on first use.
///
/// `w` must be in `1..=MAX_TABLE_WIDTH`.
pub(crate) fn tables(w: u32) -> &'static LogTables {
    TABLES[w as usize].get_or_init(|| {
        debug!(w, "building GF(2^w) log tables");
        LogTables::build(w)
    })
}

/// Carry-less multiply reduced by the width's polynomial after every shift.
pub(crate) fn shift_multiply(a: u32, b: u32, w: u32) -> u32 {
    let poly = PRIMITIVE_POLY[w as usize];
    let high_bit = 1u64 << w;

    let mut a = a as u64;
    let mut b = b;
    let mut product = 0u64;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        b >>= 1;
        a <<= 1;
        if a & high_bit != 0 {
            a ^= poly;
        }
    }
    product as u32
}
