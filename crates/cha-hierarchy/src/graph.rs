//! The class hierarchy: registration, subclass queries, and amendment.
//!
//! Responsibilities:
//! - Record declarations and keep reverse (child) edges for descendant walks
//! - Answer the reflexive-transitive `is_subclass` relation, with caching
//! - Apply base amendments and hand back the affected class set so the host
//!   can invalidate downstream caches
//!
//! Acyclicity is guaranteed by the upstream linearization pass. Registration
//! cannot create a cycle at all: every base must already be registered, so
//! edges always point at older ids. `amend_bases` is the one operation that
//! could corrupt the graph; callers own that contract and can pre-check with
//! `would_create_cycle`.

use crate::class::{BaseList, ClassFlags, ClassId, ClassNode};
use crate::store::ClassStore;
use cha_common::interner::ShardedInterner;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// The hierarchy snapshot the analyzer runs against.
///
/// Append-only within a checking session apart from `amend_bases`. All
/// queries are safe under worker-pool parallelism.
pub struct ClassHierarchy {
    interner: Arc<ShardedInterner>,
    store: ClassStore,
    /// Reverse edges: base -> direct subclasses.
    children: DashMap<ClassId, SmallVec<[ClassId; 4]>>,
    /// Memoized reflexive-transitive subclass relation.
    subclass_cache: DashMap<(ClassId, ClassId), bool>,
    /// The universal root, once registered.
    root: OnceCell<ClassId>,
}

impl Default for ClassHierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::with_interner(Arc::new(ShardedInterner::new()))
    }

    /// Build a hierarchy sharing the host's interner.
    pub fn with_interner(interner: Arc<ShardedInterner>) -> Self {
        Self {
            interner,
            store: ClassStore::new(),
            children: DashMap::new(),
            subclass_cache: DashMap::new(),
            root: OnceCell::new(),
        }
    }

    /// The interner class names were registered through.
    pub fn interner(&self) -> &Arc<ShardedInterner> {
        &self.interner
    }

    /// Record a class declaration.
    ///
    /// Every base must already be registered; unknown bases are dropped with
    /// an error trace rather than poisoning later traversals. A non-root
    /// class declared with no bases implicitly inherits the universal root,
    /// mirroring the runtime rule that every class descends from it.
    pub fn register(&self, mut node: ClassNode) -> ClassId {
        node.bases.retain(|base| {
            let known = self.store.contains(*base);
            if !known {
                error!(base = %base, "register: dropping unknown base id");
                debug_assert!(false, "register called with an unregistered base");
            }
            known
        });

        let is_root = node.is_universal_root();
        if !is_root
            && node.bases.is_empty()
            && let Some(&root) = self.root.get()
        {
            trace!("register: appending implicit universal root base");
            node.bases.push(root);
        }

        let bases = node.bases.clone();
        let id = self.store.register(node);
        for base in bases {
            self.children.entry(base).or_default().push(id);
        }
        if is_root && self.root.set(id).is_err() {
            error!(id = %id, "register: second universal root ignored for root tracking");
        }
        id
    }

    /// Get a class record.
    pub fn node(&self, id: ClassId) -> Option<ClassNode> {
        self.store.get(id)
    }

    /// Ordered direct bases of a class (empty for unknown ids).
    pub fn bases_of(&self, id: ClassId) -> BaseList {
        self.store.bases_of(id).unwrap_or_default()
    }

    /// Resolve a class id to its qualified name for messages.
    pub fn display_name(&self, id: ClassId) -> Arc<str> {
        match self.store.name_of(id) {
            Some(name) => self.interner.resolve(name),
            None => Arc::from(""),
        }
    }

    /// The universal root, if one has been registered.
    pub fn universal_root(&self) -> Option<ClassId> {
        self.root.get().copied()
    }

    /// Reflexive-transitive subclass test: is `sub` the same class as `sup`
    /// or derived from it?
    pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        if sub == sup {
            return true;
        }
        if let Some(cached) = self.subclass_cache.get(&(sub, sup)) {
            return *cached;
        }

        let mut visited = FxHashSet::default();
        let mut stack: SmallVec<[ClassId; 8]> = SmallVec::new();
        stack.push(sub);
        let mut reached = false;
        while let Some(current) = stack.pop() {
            if current == sup {
                reached = true;
                break;
            }
            if !visited.insert(current) {
                continue;
            }
            for base in self.bases_of(current) {
                stack.push(base);
            }
        }

        self.subclass_cache.insert((sub, sup), reached);
        reached
    }

    /// All transitive subclasses of `id`, excluding `id` itself.
    ///
    /// This is the dependent set for cache invalidation: a class's resolution
    /// depends only on its bases' resolutions, so amending `id` can only
    /// stale `id` and the classes below it.
    pub fn descendants_of(&self, id: ClassId) -> Vec<ClassId> {
        let mut visited = FxHashSet::default();
        let mut queue: Vec<ClassId> = self.direct_children(id);
        let mut out = Vec::new();
        while let Some(current) = queue.pop() {
            if !visited.insert(current) {
                continue;
            }
            out.push(current);
            queue.extend(self.direct_children(current));
        }
        out
    }

    /// Would re-declaring `child`'s bases as `new_bases` create a cycle?
    ///
    /// A cycle appears exactly when one of the new bases is already derived
    /// from `child`. Hosts amending a declaration should check this before
    /// calling `amend_bases`; the hierarchy itself does not re-verify.
    pub fn would_create_cycle(&self, child: ClassId, new_bases: &[ClassId]) -> bool {
        new_bases.iter().any(|&base| self.is_subclass(base, child))
    }

    /// Replace a class's declared bases.
    ///
    /// Rebuilds reverse edges, drops the subclass cache, and returns the
    /// affected set — the class followed by its transitive descendants — so
    /// the host can evict downstream resolution caches before the next query.
    /// Acyclicity is not re-checked here (see `would_create_cycle`).
    pub fn amend_bases(&self, id: ClassId, new_bases: BaseList) -> Vec<ClassId> {
        let old_bases = self.bases_of(id);

        let mut affected = Vec::with_capacity(8);
        affected.push(id);
        affected.extend(self.descendants_of(id));

        for base in old_bases {
            if let Some(mut entry) = self.children.get_mut(&base) {
                entry.retain(|child| *child != id);
            }
        }
        for base in &new_bases {
            self.children.entry(*base).or_default().push(id);
        }
        self.store.set_bases(id, new_bases);

        // Any cached pair may involve the rewired region; a full drop is
        // cheaper than tracking which pairs crossed it.
        self.subclass_cache.clear();

        debug!(id = %id, affected = affected.len(), "amend_bases");
        affected
    }

    /// Replace a class's declaration flags (e.g. an amended solid marking).
    ///
    /// Flags do not participate in the graph structure, so only downstream
    /// resolution caches go stale: the returned affected set is the class
    /// followed by its transitive descendants, same as `amend_bases`.
    pub fn amend_flags(&self, id: ClassId, flags: ClassFlags) -> Vec<ClassId> {
        let mut affected = Vec::with_capacity(8);
        affected.push(id);
        affected.extend(self.descendants_of(id));

        self.store.set_flags(id, flags);

        debug!(id = %id, affected = affected.len(), "amend_flags");
        affected
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if no classes are registered.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn direct_children(&self, id: ClassId) -> Vec<ClassId> {
        self.children
            .get(&id)
            .map(|entry| entry.to_vec())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "tests/graph_tests.rs"]
mod tests;
