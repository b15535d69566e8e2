//! Fused backup of a set of primary lists.
//!
//! A [`FusedBackup`] keeps a stack of [`FusedNode`]s for one backup (one row
//! of the coding matrix). Every primary fills the stack from the bottom:
//! its `n` elements occupy nodes `0..n`, in the order the primary stores
//! them on its own element stack. A list index maps to a node through the
//! per-primary slot table.
//!
//! Removing an element from the middle of a list leaves a hole in its node.
//! The primary's element in its topmost node moves into the hole, so every
//! primary still occupies a prefix of the stack and empty nodes only ever
//! appear at the top, where they are popped.
//!
//! [`recover_lists`] rebuilds lost primaries from the fused data and index
//! data of the surviving backups.

use tracing::{debug, trace};

use crate::config::CodeConfig;
use crate::error::ErasureError;
use crate::fusion::{Fusion, Stripe};
use crate::node::FusedNode;
use crate::symbol::Symbol;

/// One backup: fused nodes plus the list index to node mapping of every
/// primary.
#[derive(Debug, Clone)]
pub struct FusedBackup {
    fusion: Fusion,
    code_index: usize,
    nodes: Vec<FusedNode>,
    /// `slots[primary][list_index]` is the node holding that element.
    slots: Vec<Vec<usize>>,
}

impl FusedBackup {
    /// An empty backup for row `code_index` of `fusion`'s matrix.
    pub fn new(fusion: Fusion, code_index: usize) -> Result<Self, ErasureError> {
        let CodeConfig {
            data_count,
            code_count,
            ..
        } = fusion.config();
        if code_index >= code_count {
            return Err(ErasureError::IndexOutOfRange {
                what: "code",
                index: code_index,
                len: code_count,
            });
        }
        Ok(Self {
            fusion,
            code_index,
            nodes: Vec::new(),
            slots: vec![Vec::new(); data_count],
        })
    }

    /// Backup index (row of the coding matrix).
    pub fn code_index(&self) -> usize {
        self.code_index
    }

    /// Number of fused nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no element of any primary is fused in.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of elements the backup tracks for `primary`.
    pub fn primary_len(&self, primary: usize) -> Result<usize, ErasureError> {
        Ok(self.primary_slots(primary)?.len())
    }

    /// Fuse `value`, inserted at `index` of `primary`'s list.
    ///
    /// The value lands in the node just above the primary's current top.
    pub fn insert(
        &mut self,
        primary: usize,
        index: usize,
        value: Symbol,
    ) -> Result<(), ErasureError> {
        let depth = self.primary_slots(primary)?.len();
        if index > depth {
            return Err(ErasureError::IndexOutOfRange {
                what: "list",
                index,
                len: depth,
            });
        }

        if depth == self.nodes.len() {
            self.nodes.push(FusedNode::new(self.code_index));
        }
        self.nodes[depth].add_element(&self.fusion, primary, value)?;
        self.slots[primary].insert(index, depth);

        trace!(
            code_index = self.code_index,
            primary, index, node = depth, "fused element"
        );
        Ok(())
    }

    /// Fuse `value`, appended to `primary`'s list.
    pub fn push(&mut self, primary: usize, value: Symbol) -> Result<(), ErasureError> {
        let len = self.primary_slots(primary)?.len();
        self.insert(primary, len, value)
    }

    /// Replace element `index` of `primary` from `old` to `new`.
    pub fn replace(
        &mut self,
        primary: usize,
        index: usize,
        old: Symbol,
        new: Symbol,
    ) -> Result<(), ErasureError> {
        let slot = self.slot(primary, index)?;
        self.nodes[slot].replace_element(&self.fusion, primary, old, new)
    }

    /// Unfuse element `index` of `primary`.
    ///
    /// `value` is the element being removed and `final_value` the element
    /// at the top of the primary's own stack, which fills the hole. When
    /// the removed element is itself on top, both are the same value.
    pub fn remove(
        &mut self,
        primary: usize,
        index: usize,
        value: Symbol,
        final_value: Symbol,
    ) -> Result<(), ErasureError> {
        let slot = self.slot(primary, index)?;
        let top = self.slots[primary].len() - 1;

        if slot != top {
            let node = &mut self.nodes[slot];
            node.remove_element(&self.fusion, primary, value)?;
            node.add_element(&self.fusion, primary, final_value)?;
            if let Some(moved) = self.slots[primary].iter_mut().find(|s| **s == top) {
                *moved = slot;
            }
            debug!(
                code_index = self.code_index,
                primary,
                index,
                hole = slot,
                from = top,
                "filled hole with top element"
            );
        }

        self.nodes[top].remove_element(&self.fusion, primary, final_value)?;
        self.slots[primary].remove(index);
        while self.nodes.last().is_some_and(FusedNode::is_empty) {
            self.nodes.pop();
        }
        Ok(())
    }

    /// The fused code symbol of every node, bottom of the stack first.
    pub fn fused_data(&self) -> Vec<Symbol> {
        self.nodes.iter().map(FusedNode::encoded).collect()
    }

    /// For every node, the list index each primary keeps there, or `None`
    /// where the primary has no element in that node.
    pub fn index_data(&self) -> Vec<Vec<Option<usize>>> {
        let mut rows = vec![vec![None; self.slots.len()]; self.nodes.len()];
        for (primary, slots) in self.slots.iter().enumerate() {
            for (index, &slot) in slots.iter().enumerate() {
                rows[slot][primary] = Some(index);
            }
        }
        rows
    }

    fn primary_slots(&self, primary: usize) -> Result<&[usize], ErasureError> {
        self.slots
            .get(primary)
            .map(Vec::as_slice)
            .ok_or(ErasureError::IndexOutOfRange {
                what: "primary",
                index: primary,
                len: self.slots.len(),
            })
    }

    fn slot(&self, primary: usize, index: usize) -> Result<usize, ErasureError> {
        let slots = self.primary_slots(primary)?;
        slots
            .get(index)
            .copied()
            .ok_or(ErasureError::IndexOutOfRange {
                what: "list",
                index,
                len: slots.len(),
            })
    }
}

/// Rebuild every primary list.
///
/// `primaries[i]` is `None` for a lost primary, `fused[j]` is `None` for a
/// lost backup, and `index_data` comes from any surviving backup (all
/// backups see the same mutations, so they agree on it). Returns every
/// list, recovered or not.
pub fn recover_lists(
    fusion: &mut Fusion,
    primaries: &[Option<&[Symbol]>],
    fused: &[Option<&[Symbol]>],
    index_data: &[Vec<Option<usize>>],
) -> Result<Vec<Vec<Symbol>>, ErasureError> {
    let CodeConfig {
        data_count,
        code_count,
        ..
    } = fusion.config();
    if primaries.len() != data_count {
        return Err(ErasureError::LengthMismatch {
            what: "primaries",
            expected: data_count,
            got: primaries.len(),
        });
    }
    if fused.len() != code_count {
        return Err(ErasureError::LengthMismatch {
            what: "backups",
            expected: code_count,
            got: fused.len(),
        });
    }
    let rows = index_data.len();
    for codes in fused.iter().flatten() {
        if codes.len() != rows {
            return Err(ErasureError::LengthMismatch {
                what: "fused data",
                expected: rows,
                got: codes.len(),
            });
        }
    }

    let erasures: Vec<usize> = primaries
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_none())
        .map(|(i, _)| i)
        .chain(
            fused
                .iter()
                .enumerate()
                .filter(|(_, f)| f.is_none())
                .map(|(j, _)| data_count + j),
        )
        .collect();

    let mut stripes = Vec::with_capacity(rows);
    for (row, indexes) in index_data.iter().enumerate() {
        if indexes.len() != data_count {
            return Err(ErasureError::LengthMismatch {
                what: "index data row",
                expected: data_count,
                got: indexes.len(),
            });
        }
        let mut data = vec![Symbol::ZERO; data_count];
        for (primary, (out, index)) in data.iter_mut().zip(indexes).enumerate() {
            if let (Some(list), Some(index)) = (primaries[primary], *index) {
                *out = *list.get(index).ok_or(ErasureError::InvalidIndexData {
                    primary,
                    reason: "index past the end of the surviving list",
                })?;
            }
        }
        let code = fused
            .iter()
            .map(|f| f.map_or(Symbol::ZERO, |codes| codes[row]))
            .collect();
        stripes.push(Stripe { data, code });
    }

    debug!(rows, ?erasures, "recovering fused lists");
    fusion.recover_stripes(&mut stripes, &erasures)?;

    let mut lists: Vec<Vec<Option<Symbol>>> = (0..data_count)
        .map(|primary| {
            let len = index_data
                .iter()
                .filter(|row| row[primary].is_some())
                .count();
            vec![None; len]
        })
        .collect();
    for (stripe, indexes) in stripes.iter().zip(index_data) {
        for (primary, index) in indexes.iter().enumerate() {
            let Some(index) = *index else { continue };
            let entry = lists[primary]
                .get_mut(index)
                .ok_or(ErasureError::InvalidIndexData {
                    primary,
                    reason: "index past the list length",
                })?;
            if entry.replace(stripe.data[primary]).is_some() {
                return Err(ErasureError::InvalidIndexData {
                    primary,
                    reason: "index appears twice",
                });
            }
        }
    }

    // Every slot is filled: `len` indexes, each below `len`, none repeated.
    Ok(lists
        .into_iter()
        .map(|list| list.into_iter().flatten().collect())
        .collect())
}
