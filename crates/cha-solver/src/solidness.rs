//! Intrinsic solidity: is a class a solid base by its own declaration?
//!
//! A pure lookup over the class record — no recursion, no failure mode. A
//! class is intrinsically solid when it is explicitly marked, declares a
//! non-empty per-instance slot layout, is the universal root, or is one of
//! the configured fixed-layout builtin classes.

use cha_common::interner::{Atom, ShardedInterner};
use cha_hierarchy::{ClassFlags, ClassNode};
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// Builtin classes whose instance layout is fixed by the runtime.
///
/// This is data, not policy: hosts targeting a different runtime hand the
/// oracle their own table via [`SolidnessOracle::with_fixed_layout`].
pub static FIXED_LAYOUT_BUILTINS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "builtins.int",
        "builtins.float",
        "builtins.complex",
        "builtins.bool",
        "builtins.str",
        "builtins.bytes",
        "builtins.bytearray",
        "builtins.tuple",
        "builtins.list",
        "builtins.dict",
        "builtins.set",
        "builtins.frozenset",
        "builtins.range",
        "builtins.slice",
        "builtins.memoryview",
        "builtins.property",
        "builtins.classmethod",
        "builtins.staticmethod",
        "builtins.BaseException",
        "types.FunctionType",
    ]
});

/// Answers `is_intrinsically_solid` for class records.
pub struct SolidnessOracle {
    fixed_layout: FxHashSet<Atom>,
}

impl SolidnessOracle {
    /// Oracle with the default fixed-layout builtin table, interned through
    /// the hierarchy's interner.
    pub fn new(interner: &ShardedInterner) -> Self {
        Self::with_fixed_layout(
            FIXED_LAYOUT_BUILTINS
                .iter()
                .map(|name| interner.intern(name)),
        )
    }

    /// Oracle with a host-supplied fixed-layout class set.
    pub fn with_fixed_layout(fixed_layout: impl IntoIterator<Item = Atom>) -> Self {
        Self {
            fixed_layout: fixed_layout.into_iter().collect(),
        }
    }

    /// Oracle with no fixed-layout builtins at all (flags only).
    pub fn empty() -> Self {
        Self {
            fixed_layout: FxHashSet::default(),
        }
    }

    /// Is this class a solid base by virtue of its own declaration?
    ///
    /// Pure function of the record's declared attributes; always returns a
    /// boolean.
    pub fn is_intrinsically_solid(&self, node: &ClassNode) -> bool {
        node.flags.intersects(
            ClassFlags::EXPLICITLY_SOLID | ClassFlags::NONEMPTY_SLOTS | ClassFlags::UNIVERSAL_ROOT,
        ) || self.fixed_layout.contains(&node.name)
    }
}

#[cfg(test)]
#[path = "tests/solidness_tests.rs"]
mod tests;
