//! A single fused backup cell.
//!
//! A [`FusedNode`] stores one code symbol that fuses at most one element
//! from each primary. Adding an element folds it in as a change from zero;
//! removing folds it back out as a change to zero.

use tracing::warn;

use crate::error::ErasureError;
use crate::fusion::Fusion;
use crate::symbol::Symbol;

/// One backup code symbol fused from up to `data_count` primary elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FusedNode {
    /// Which backup (row of the coding matrix) this node belongs to.
    code_index: usize,
    /// The fused code symbol.
    encoded: Symbol,
    /// Number of primary elements currently folded in.
    ref_count: usize,
}

impl FusedNode {
    /// An empty node for backup `code_index`.
    pub fn new(code_index: usize) -> Self {
        Self {
            code_index,
            encoded: Symbol::ZERO,
            ref_count: 0,
        }
    }

    /// Fold `value` from primary `position` into the node.
    pub fn add_element(
        &mut self,
        fusion: &Fusion,
        position: usize,
        value: Symbol,
    ) -> Result<(), ErasureError> {
        self.encoded =
            fusion.updated_code(self.encoded, self.code_index, Symbol::ZERO, value, position)?;
        self.ref_count += 1;
        Ok(())
    }

    /// Fold `value` from primary `position` back out of the node.
    pub fn remove_element(
        &mut self,
        fusion: &Fusion,
        position: usize,
        value: Symbol,
    ) -> Result<(), ErasureError> {
        self.encoded =
            fusion.updated_code(self.encoded, self.code_index, value, Symbol::ZERO, position)?;
        match self.ref_count.checked_sub(1) {
            Some(n) => self.ref_count = n,
            None => warn!(
                code_index = self.code_index,
                position, "removed element from empty fused node"
            ),
        }
        Ok(())
    }

    /// Swap the element from primary `position` for another one.
    pub fn replace_element(
        &mut self,
        fusion: &Fusion,
        position: usize,
        old: Symbol,
        new: Symbol,
    ) -> Result<(), ErasureError> {
        self.encoded = fusion.updated_code(self.encoded, self.code_index, old, new, position)?;
        Ok(())
    }

    /// Whether no primary element is folded in.
    pub fn is_empty(&self) -> bool {
        self.ref_count == 0
    }

    /// The fused code symbol.
    pub fn encoded(&self) -> Symbol {
        self.encoded
    }

    /// Backup index this node belongs to.
    pub fn code_index(&self) -> usize {
        self.code_index
    }

    /// Number of primary elements folded in.
    pub fn ref_count(&self) -> usize {
        self.ref_count
    }
}
