//! Per-class declaration records.
//!
//! A `ClassNode` captures everything declaration extraction reports about one
//! class: its interned qualified name, its ordered direct bases, the layout
//! flags, and (optionally) where it was declared. Records are immutable once
//! stored; the only sanctioned mutation is a whole-bases amendment through
//! `ClassHierarchy::amend_bases`.

use cha_common::interner::Atom;
use cha_common::limits::INLINE_BASE_COUNT;
use smallvec::SmallVec;
use std::fmt;

/// Stable identity of a class within one hierarchy session.
///
/// Ids are dense and allocated by the store in registration order, so every
/// base referenced by a `ClassNode` has a smaller id than the class itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// First id handed out by a store; 0 is reserved as a niche for
    /// uninitialized slots in debug dumps.
    pub const FIRST_VALID: u32 = 1;

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

/// Ordered direct-base list; inline up to the common multiple-inheritance
/// width.
pub type BaseList = SmallVec<[ClassId; INLINE_BASE_COUNT]>;

bitflags::bitflags! {
    /// Declaration-time layout facts about a class.
    ///
    /// These are immutable attributes extracted from the declaration, not
    /// runtime behavior: the explicit solid marking is a decorator-style
    /// boolean flag, and the slot layout bit records whether the class
    /// declares any per-instance slots of its own.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ClassFlags: u8 {
        /// The class is explicitly marked as a solid base.
        const EXPLICITLY_SOLID = 1 << 0;
        /// The class declares a non-empty per-instance slot layout.
        const NONEMPTY_SLOTS = 1 << 1;
        /// The class is the universal root of the hierarchy.
        const UNIVERSAL_ROOT = 1 << 2;
    }
}

/// One class declaration as recorded by declaration extraction.
#[derive(Clone, Debug)]
pub struct ClassNode {
    /// Interned fully qualified name ("myapp.models.User").
    pub name: Atom,
    /// Ordered direct bases, in declaration order.
    pub bases: BaseList,
    /// Declaration-time layout flags.
    pub flags: ClassFlags,
    /// Interned path of the declaring file, for diagnostics.
    pub file: Option<Atom>,
    /// Byte span of the declaration site, for diagnostics.
    pub span: Option<(u32, u32)>,
}

impl ClassNode {
    /// Create a record with no flags and no declaration site.
    pub fn new(name: Atom, bases: BaseList) -> Self {
        Self {
            name,
            bases,
            flags: ClassFlags::empty(),
            file: None,
            span: None,
        }
    }

    /// Set the declaration flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ClassFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the declaring file for diagnostics.
    #[must_use]
    pub const fn with_file(mut self, file: Atom) -> Self {
        self.file = Some(file);
        self
    }

    /// Set the declaration-site span for diagnostics.
    #[must_use]
    pub const fn with_span(mut self, start: u32, end: u32) -> Self {
        self.span = Some((start, end));
        self
    }

    /// Whether this record is the universal root.
    #[inline]
    pub fn is_universal_root(&self) -> bool {
        self.flags.contains(ClassFlags::UNIVERSAL_ROOT)
    }
}
