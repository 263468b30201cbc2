use super::*;
use cha_hierarchy::{BaseList, ClassFlags, ClassHierarchy, ClassNode};
use smallvec::smallvec;

struct Fixture {
    hierarchy: Arc<ClassHierarchy>,
    resolver: SolidBaseResolver,
    root: ClassId,
}

fn fixture() -> Fixture {
    let hierarchy = Arc::new(ClassHierarchy::new());
    let root = hierarchy.register(
        ClassNode::new(
            hierarchy.interner().intern("builtins.object"),
            BaseList::new(),
        )
        .with_flags(ClassFlags::UNIVERSAL_ROOT),
    );
    let oracle = SolidnessOracle::new(hierarchy.interner());
    let resolver = SolidBaseResolver::new(Arc::clone(&hierarchy), oracle);
    Fixture {
        hierarchy,
        resolver,
        root,
    }
}

impl Fixture {
    fn declare(&self, name: &str, bases: &[ClassId]) -> ClassId {
        self.declare_flagged(name, bases, ClassFlags::empty())
    }

    fn declare_solid(&self, name: &str, bases: &[ClassId]) -> ClassId {
        self.declare_flagged(name, bases, ClassFlags::EXPLICITLY_SOLID)
    }

    fn declare_flagged(&self, name: &str, bases: &[ClassId], flags: ClassFlags) -> ClassId {
        self.hierarchy.register(
            ClassNode::new(
                self.hierarchy.interner().intern(name),
                bases.iter().copied().collect(),
            )
            .with_flags(flags),
        )
    }
}

#[test]
fn test_root_resolves_to_itself() {
    let f = fixture();
    assert_eq!(f.resolver.solid_base_of(f.root), SolidBase::Resolved(f.root));
}

#[test]
fn test_resolution_is_idempotent() {
    let f = fixture();
    let solid = f.declare_solid("m.Solid", &[]);
    let child = f.declare("m.Child", &[solid]);

    let first = f.resolver.solid_base_of(child);
    assert!(f.resolver.is_cached(child));
    let second = f.resolver.solid_base_of(child);
    assert_eq!(first, second);
    assert_eq!(first, SolidBase::Resolved(solid));

    // Eviction forces a recompute that lands on the same result.
    f.resolver.evict(child);
    assert!(!f.resolver.is_cached(child));
    assert_eq!(f.resolver.solid_base_of(child), first);
}

#[test]
fn test_plain_class_resolves_to_root() {
    let f = fixture();
    let c1 = f.declare("m.C1", &[]);
    let c2 = f.declare("m.C2", &[c1]);

    assert_eq!(f.resolver.solid_base_of(c1), SolidBase::Resolved(f.root));
    assert_eq!(f.resolver.solid_base_of(c2), SolidBase::Resolved(f.root));
}

#[test]
fn test_single_base_inherits_base_resolution() {
    let f = fixture();
    let solid = f.declare_solid("m.Solid", &[]);
    let mid = f.declare("m.Mid", &[solid]);
    let leaf = f.declare("m.Leaf", &[mid]);

    assert_eq!(f.resolver.solid_base_of(mid), SolidBase::Resolved(solid));
    assert_eq!(
        f.resolver.solid_base_of(leaf),
        f.resolver.solid_base_of(mid)
    );
}

#[test]
fn test_unrelated_solid_bases_are_invalid() {
    let f = fixture();
    let solid1 = f.declare_solid("m.Solid1", &[]);
    let solid2 = f.declare_solid("m.Solid2", &[]);
    let broken = f.declare("m.Broken", &[solid1, solid2]);

    let result = f.resolver.solid_base_of(broken);
    let conflict = result.conflict().expect("expected an invalid result");
    assert_eq!(conflict.reason, InvalidReason::IncomparableCandidates);
    // Declared order is preserved for diagnostics.
    assert_eq!(conflict.candidates.as_slice(), &[solid1, solid2]);
    assert!(!result.is_internal_error());
}

#[test]
fn test_more_derived_candidate_wins() {
    let f = fixture();
    let solid1 = f.declare_solid("m.Solid1", &[]);
    let solid_child = f.declare_solid("m.SolidChild", &[solid1]);

    let merged = f.declare("m.Merged", &[solid_child, solid1]);
    assert_eq!(
        f.resolver.solid_base_of(merged),
        SolidBase::Resolved(solid_child)
    );

    // Base order must not change the winner.
    let merged_rev = f.declare("m.MergedRev", &[solid1, solid_child]);
    assert_eq!(
        f.resolver.solid_base_of(merged_rev),
        SolidBase::Resolved(solid_child)
    );
}

#[test]
fn test_unique_solid_candidate_dominates_root() {
    let f = fixture();
    let solid1 = f.declare_solid("m.Solid1", &[]);
    let c1 = f.declare("m.C1", &[]);
    let merged = f.declare("m.Merged", &[solid1, c1]);

    assert_eq!(f.resolver.solid_base_of(c1), SolidBase::Resolved(f.root));
    assert_eq!(
        f.resolver.solid_base_of(merged),
        SolidBase::Resolved(solid1)
    );
}

#[test]
fn test_incomparable_pair_poisons_wider_bases() {
    let f = fixture();
    let solid1 = f.declare_solid("m.Solid1", &[]);
    let solid_child = f.declare_solid("m.SolidChild", &[solid1]);
    let solid2 = f.declare_solid("m.Solid2", &[]);

    // SolidChild and Solid1 are comparable, but Solid2 is incomparable to
    // both; no unique most-derived candidate exists.
    let broken = f.declare("m.Broken", &[solid_child, solid1, solid2]);

    let result = f.resolver.solid_base_of(broken);
    let conflict = result.conflict().expect("expected an invalid result");
    assert_eq!(conflict.reason, InvalidReason::IncomparableCandidates);
    assert_eq!(conflict.candidates.as_slice(), &[solid_child, solid1, solid2]);
}

#[test]
fn test_invalid_base_propagates() {
    let f = fixture();
    let solid1 = f.declare_solid("m.Solid1", &[]);
    let solid2 = f.declare_solid("m.Solid2", &[]);
    let broken = f.declare("m.Broken", &[solid1, solid2]);
    let child = f.declare("m.Child", &[broken]);

    let result = f.resolver.solid_base_of(child);
    let conflict = result.conflict().expect("expected an invalid result");
    assert_eq!(
        conflict.reason,
        InvalidReason::BaseWithoutSolidBase { base: broken }
    );
    // The originating candidate list rides along for diagnostics.
    assert_eq!(conflict.candidates.as_slice(), &[solid1, solid2]);
}

#[test]
fn test_intrinsically_solid_class_ignores_broken_bases() {
    let f = fixture();
    let solid1 = f.declare_solid("m.Solid1", &[]);
    let solid2 = f.declare_solid("m.Solid2", &[]);
    let rescued = f.declare_solid("m.Rescued", &[solid1, solid2]);

    // Intrinsic solidity short-circuits: the class is its own solid base
    // regardless of what its bases would have contributed.
    assert_eq!(
        f.resolver.solid_base_of(rescued),
        SolidBase::Resolved(rescued)
    );
}

#[test]
fn test_fixed_layout_builtin_resolution() {
    let f = fixture();
    let int = f.declare("builtins.int", &[]);
    let my_int = f.declare("m.MyInt", &[int]);

    assert_eq!(f.resolver.solid_base_of(int), SolidBase::Resolved(int));
    assert_eq!(f.resolver.solid_base_of(my_int), SolidBase::Resolved(int));
}

#[test]
fn test_rootless_class_is_its_own_base_case() {
    let hierarchy = Arc::new(ClassHierarchy::new());
    let orphan = hierarchy.register(ClassNode::new(
        hierarchy.interner().intern("m.Orphan"),
        BaseList::new(),
    ));
    let resolver = SolidBaseResolver::new(
        Arc::clone(&hierarchy),
        SolidnessOracle::new(hierarchy.interner()),
    );

    assert_eq!(resolver.solid_base_of(orphan), SolidBase::Resolved(orphan));
}

#[test]
fn test_flag_amendment_propagates_after_invalidation() {
    let f = fixture();
    let base = f.declare("m.Base", &[]);
    let child = f.declare("m.Child", &[base]);

    assert_eq!(f.resolver.solid_base_of(child), SolidBase::Resolved(f.root));

    let affected = f.hierarchy.amend_flags(base, ClassFlags::EXPLICITLY_SOLID);
    for id in affected {
        f.resolver.evict(id);
    }

    assert_eq!(f.resolver.solid_base_of(base), SolidBase::Resolved(base));
    assert_eq!(f.resolver.solid_base_of(child), SolidBase::Resolved(base));
}

#[test]
fn test_base_amendment_propagates_after_invalidation() {
    let f = fixture();
    let solid1 = f.declare_solid("m.Solid1", &[]);
    let solid2 = f.declare_solid("m.Solid2", &[]);
    let mid = f.declare("m.Mid", &[solid1]);
    let leaf = f.declare("m.Leaf", &[mid]);

    assert_eq!(f.resolver.solid_base_of(leaf), SolidBase::Resolved(solid1));

    f.hierarchy.amend_bases(mid, smallvec![solid2]);
    f.resolver.invalidate(mid);

    assert_eq!(f.resolver.solid_base_of(mid), SolidBase::Resolved(solid2));
    assert_eq!(f.resolver.solid_base_of(leaf), SolidBase::Resolved(solid2));
}

#[test]
fn test_invalidate_only_touches_descendants() {
    let f = fixture();
    let solid = f.declare_solid("m.Solid", &[]);
    let mid = f.declare("m.Mid", &[solid]);
    let leaf = f.declare("m.Leaf", &[mid]);
    let unrelated = f.declare("m.Unrelated", &[]);

    f.resolver.solid_base_of(leaf);
    f.resolver.solid_base_of(unrelated);

    let removed = f.resolver.invalidate(mid);
    assert_eq!(removed, 2); // mid and leaf
    assert!(!f.resolver.is_cached(mid));
    assert!(!f.resolver.is_cached(leaf));
    assert!(f.resolver.is_cached(unrelated));
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_cycle_defense_reports_internal_error() {
    init_tracing();
    let f = fixture();
    let a = f.declare("m.A", &[]);
    let b = f.declare("m.B", &[a]);

    // Corrupt the hierarchy the way a broken upstream amendment would:
    // A and B now inherit each other.
    assert!(f.hierarchy.would_create_cycle(a, &[b]));
    for id in f.hierarchy.amend_bases(a, smallvec![b]) {
        f.resolver.evict(id);
    }

    let result = f.resolver.solid_base_of(a);
    assert!(result.is_internal_error());
    let conflict = result.conflict().unwrap();
    assert_eq!(conflict.reason, InvalidReason::UnexpectedCycle);

    // The defense terminates for every class on the cycle.
    assert!(f.resolver.solid_base_of(b).is_internal_error());
}

#[test]
fn test_concurrent_resolution_observes_one_result_per_class() {
    use rayon::prelude::*;

    let f = fixture();
    let solid1 = f.declare_solid("m.Solid1", &[]);
    let solid_child = f.declare_solid("m.SolidChild", &[solid1]);
    let solid2 = f.declare_solid("m.Solid2", &[]);

    let mut classes = Vec::new();
    for i in 0..64 {
        let parent = if i % 3 == 0 { solid1 } else { solid_child };
        let mid = f.declare(&format!("m.Mid{i}"), &[parent]);
        classes.push(f.declare(&format!("m.Leaf{i}"), &[mid]));
    }
    classes.push(f.declare("m.Broken", &[solid1, solid2]));

    let parallel: Vec<SolidBase> = classes
        .par_iter()
        .map(|&id| f.resolver.solid_base_of(id))
        .collect();

    // A fresh resolver over the same snapshot must agree with every result
    // the parallel run observed.
    let fresh = SolidBaseResolver::new(
        Arc::clone(&f.hierarchy),
        SolidnessOracle::new(f.hierarchy.interner()),
    );
    for (&id, result) in classes.iter().zip(&parallel) {
        assert_eq!(*result, fresh.solid_base_of(id));
        // And the cache still serves the identical value.
        assert_eq!(*result, f.resolver.solid_base_of(id));
    }
}
