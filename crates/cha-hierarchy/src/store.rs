//! Thread-safe storage for class declaration records.
//!
//! Uses `DashMap` for concurrent access from multiple checking threads.

use crate::class::{BaseList, ClassFlags, ClassId, ClassNode};
use cha_common::interner::Atom;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Thread-safe storage for class declaration records.
///
/// ## Usage
///
/// ```ignore
/// let store = ClassStore::new();
/// let id = store.register(ClassNode::new(name, bases));
/// let node = store.get(id).expect("class exists");
/// ```
pub struct ClassStore {
    /// Unique instance ID for debugging (tracks which store instance this is)
    instance_id: u64,

    /// `ClassId` -> `ClassNode` mapping
    classes: DashMap<ClassId, ClassNode>,

    /// Next available `ClassId`
    next_id: AtomicU32,
}

impl Default for ClassStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassStore {
    /// Create a new class store.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "ClassStore::new - creating new instance");
        Self {
            instance_id,
            classes: DashMap::new(),
            next_id: AtomicU32::new(ClassId::FIRST_VALID),
        }
    }

    /// Allocate a fresh `ClassId`.
    fn allocate(&self) -> ClassId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        ClassId(id)
    }

    /// Register a new class record and return its `ClassId`.
    pub fn register(&self, node: ClassNode) -> ClassId {
        let id = self.allocate();
        trace!(
            instance_id = self.instance_id,
            class_id = %id,
            name = node.name.index(),
            bases = node.bases.len(),
            "ClassStore::register"
        );
        self.classes.insert(id, node);
        id
    }

    /// Get a class record by `ClassId`.
    pub fn get(&self, id: ClassId) -> Option<ClassNode> {
        self.classes.get(&id).map(|r| r.clone())
    }

    /// Check if a `ClassId` exists.
    pub fn contains(&self, id: ClassId) -> bool {
        self.classes.contains_key(&id)
    }

    /// Get the ordered direct bases of a class.
    pub fn bases_of(&self, id: ClassId) -> Option<BaseList> {
        self.classes.get(&id).map(|r| r.bases.clone())
    }

    /// Get the declaration flags of a class.
    pub fn flags_of(&self, id: ClassId) -> Option<ClassFlags> {
        self.classes.get(&id).map(|r| r.flags)
    }

    /// Get the interned name of a class.
    pub fn name_of(&self, id: ClassId) -> Option<Atom> {
        self.classes.get(&id).map(|r| r.name)
    }

    /// Replace the declared bases of a class.
    ///
    /// Only `ClassHierarchy::amend_bases` calls this; going through the
    /// hierarchy keeps reverse edges and the subclass cache consistent.
    pub(crate) fn set_bases(&self, id: ClassId, bases: BaseList) {
        if let Some(mut entry) = self.classes.get_mut(&id) {
            entry.bases = bases;
        }
    }

    /// Replace the declared flags of a class.
    ///
    /// Only `ClassHierarchy::amend_flags` calls this.
    pub(crate) fn set_flags(&self, id: ClassId, flags: ClassFlags) {
        if let Some(mut entry) = self.classes.get_mut(&id) {
            entry.flags = flags;
        }
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over all registered ids (unordered).
    pub fn ids(&self) -> Vec<ClassId> {
        self.classes.iter().map(|r| *r.key()).collect()
    }

    /// Clear all classes (for testing).
    pub fn clear(&self) {
        self.classes.clear();
        self.next_id.store(ClassId::FIRST_VALID, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
