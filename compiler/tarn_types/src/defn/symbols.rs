//! Member symbol tables.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tarn_ir::Name;

use crate::DefnId;

/// Name → declarations map of one scope.
///
/// A name may map to several declarations (overloads). Names are also kept
/// in first-declaration order so enumeration is deterministic.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    entries: FxHashMap<Name, SmallVec<[DefnId; 2]>>,
    order: Vec<Name>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration under `name`, after any existing overloads.
    pub fn insert(&mut self, name: Name, defn: DefnId) {
        let slot = self.entries.entry(name).or_default();
        if slot.is_empty() {
            self.order.push(name);
        }
        if !slot.contains(&defn) {
            slot.push(defn);
        }
    }

    /// All declarations of `name` in this scope; empty if none.
    pub fn get(&self, name: Name) -> &[DefnId] {
        self.entries
            .get(&name)
            .map(|slot| slot.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: Name) -> bool {
        self.entries.contains_key(&name)
    }

    /// Names in first-declaration order.
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.order.iter().copied()
    }

    /// `(name, declarations)` pairs in first-declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Name, &[DefnId])> + '_ {
        self.order.iter().map(|&name| (name, self.get(name)))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
