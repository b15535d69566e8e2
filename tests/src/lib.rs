//! Integration test harness for the erasure coding engine.
//!
//! [`FusedCluster`] models a set of primary lists backed by `code_count`
//! [`FusedBackup`]s. Each primary keeps its elements on a stack as well as in
//! list order; removing from the middle of a list moves the top of that
//! stack into the hole, and every backup mirrors the move. Tests mutate the
//! primaries, drop some of them (and some backups), then rebuild the lost
//! lists from fused data and index data.

use fusion_erasure::{CodeConfig, ErasureError, FusedBackup, Fusion, Symbol, recover_lists};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A primary list: values in list order, each with its stack position.
#[derive(Debug, Clone, Default)]
struct PrimaryList {
    items: Vec<(Symbol, usize)>,
}

impl PrimaryList {
    fn values(&self) -> Vec<Symbol> {
        self.items.iter().map(|&(v, _)| v).collect()
    }

    fn insert(&mut self, index: usize, value: Symbol) {
        let slot = self.items.len();
        self.items.insert(index, (value, slot));
    }

    fn set(&mut self, index: usize, value: Symbol) -> Symbol {
        std::mem::replace(&mut self.items[index].0, value)
    }

    /// Remove `index`; returns the removed value and the value that was on
    /// top of the stack (now moved into the freed position).
    fn remove(&mut self, index: usize) -> (Symbol, Symbol) {
        let (value, slot) = self.items.remove(index);
        let top = self.items.len();
        if slot == top {
            return (value, value);
        }
        let moved = self
            .items
            .iter_mut()
            .find(|(_, s)| *s == top)
            .expect("top of stack belongs to a remaining element");
        moved.1 = slot;
        (value, moved.0)
    }
}

/// Primaries plus fused backups.
pub struct FusedCluster {
    fusion: Fusion,
    primaries: Vec<PrimaryList>,
    backups: Vec<FusedBackup>,
}

impl FusedCluster {
    /// An empty cluster with `data_count` primaries and `code_count` backups.
    pub fn new(data_count: usize, code_count: usize, w: u32) -> Self {
        let fusion = Fusion::new(CodeConfig::new(data_count, code_count, w))
            .expect("cluster configuration should be valid");
        let backups = (0..code_count)
            .map(|j| FusedBackup::new(fusion.clone(), j).expect("backup index in range"))
            .collect();
        Self {
            fusion,
            primaries: vec![PrimaryList::default(); data_count],
            backups,
        }
    }

    pub fn data_count(&self) -> usize {
        self.primaries.len()
    }

    pub fn code_count(&self) -> usize {
        self.backups.len()
    }

    /// Append `value` to `primary`.
    pub fn push(&mut self, primary: usize, value: Symbol) {
        let len = self.primaries[primary].items.len();
        self.insert(primary, len, value);
    }

    /// Insert `value` at `index` of `primary`.
    pub fn insert(&mut self, primary: usize, index: usize, value: Symbol) {
        self.primaries[primary].insert(index, value);
        for backup in &mut self.backups {
            backup
                .insert(primary, index, value)
                .expect("insert should update backup");
        }
    }

    /// Overwrite element `index` of `primary`.
    pub fn set(&mut self, primary: usize, index: usize, value: Symbol) {
        let old = self.primaries[primary].set(index, value);
        for backup in &mut self.backups {
            backup
                .replace(primary, index, old, value)
                .expect("set should update backup");
        }
    }

    /// Remove element `index` of `primary`.
    pub fn remove(&mut self, primary: usize, index: usize) -> Symbol {
        let (value, final_value) = self.primaries[primary].remove(index);
        for backup in &mut self.backups {
            backup
                .remove(primary, index, value, final_value)
                .expect("remove should update backup");
        }
        value
    }

    /// Remove the last element of `primary`.
    pub fn pop(&mut self, primary: usize) -> Option<Symbol> {
        let len = self.primaries[primary].items.len();
        (len > 0).then(|| self.remove(primary, len - 1))
    }

    /// Current contents of `primary`.
    pub fn primary(&self, primary: usize) -> Vec<Symbol> {
        self.primaries[primary].values()
    }

    /// Every primary's contents.
    pub fn snapshot(&self) -> Vec<Vec<Symbol>> {
        self.primaries.iter().map(PrimaryList::values).collect()
    }

    /// The backup at `code_index`.
    pub fn backup(&self, code_index: usize) -> &FusedBackup {
        &self.backups[code_index]
    }

    /// Rebuild every primary after losing `lost_primaries` and
    /// `lost_backups`. Lost primaries contribute nothing, not even their
    /// length; list shapes come from a surviving backup's index data.
    pub fn recover(
        &mut self,
        lost_primaries: &[usize],
        lost_backups: &[usize],
    ) -> Result<Vec<Vec<Symbol>>, ErasureError> {
        let Some(witness) = (0..self.code_count()).find(|j| !lost_backups.contains(j)) else {
            if lost_primaries.is_empty() {
                return Ok(self.snapshot());
            }
            return Err(ErasureError::UnrecoverableErasure {
                erased: lost_primaries.len() + lost_backups.len(),
                code_count: self.code_count(),
            });
        };
        let index_data = self.backups[witness].index_data();

        let values = self.snapshot();
        let primaries: Vec<Option<&[Symbol]>> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (!lost_primaries.contains(&i)).then_some(v.as_slice()))
            .collect();
        let fused_data: Vec<Vec<Symbol>> =
            self.backups.iter().map(FusedBackup::fused_data).collect();
        let fused: Vec<Option<&[Symbol]>> = fused_data
            .iter()
            .enumerate()
            .map(|(j, f)| (!lost_backups.contains(&j)).then_some(f.as_slice()))
            .collect();

        recover_lists(&mut self.fusion, &primaries, &fused, &index_data)
    }
}

/// Random full-width symbols.
pub fn random_symbols(rng: &mut StdRng, count: usize) -> Vec<Symbol> {
    (0..count).map(|_| Symbol(rng.random())).collect()
}

/// Deterministic symbols for a given seed.
pub fn test_symbols_seeded(count: usize, seed: u64) -> Vec<Symbol> {
    random_symbols(&mut StdRng::seed_from_u64(seed), count)
}

/// Every subset of `0..total` with at most `max` elements, in ascending
/// order within each subset.
pub fn erasure_patterns(total: usize, max: usize) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new()];
    for i in 0..total {
        let extended: Vec<Vec<usize>> = out
            .iter()
            .filter(|p| p.len() < max)
            .map(|p| {
                let mut p = p.clone();
                p.push(i);
                p
            })
            .collect();
        out.extend(extended);
    }
    out
}

/// `count` distinct positions from `0..total`, chosen at random.
pub fn random_erasures(rng: &mut StdRng, total: usize, count: usize) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..total).collect();
    for i in 0..count {
        let j = rng.random_range(i..total);
        positions.swap(i, j);
    }
    positions.truncate(count);
    positions
}

/// Zero the erased positions of a stripe, the way a lost symbol reads.
pub fn wipe(data: &mut [Symbol], code: &mut [Symbol], erasures: &[usize]) {
    let m = data.len();
    for &e in erasures {
        if e < m {
            data[e] = Symbol::ZERO;
        } else {
            code[e - m] = Symbol::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erasure_patterns_counts() {
        // C(5,0) + C(5,1) + C(5,2)
        assert_eq!(erasure_patterns(5, 2).len(), 1 + 5 + 10);
        assert!(erasure_patterns(5, 2).iter().all(|p| p.len() <= 2));
    }

    #[test]
    fn test_random_erasures_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let mut e = random_erasures(&mut rng, 9, 4);
            e.sort_unstable();
            e.dedup();
            assert_eq!(e.len(), 4);
            assert!(e.iter().all(|&i| i < 9));
        }
    }
}
