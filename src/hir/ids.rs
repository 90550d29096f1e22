//! Arena identifiers for scope tree nodes.

use std::fmt;

/// A handle to a node in a [`ScopeTree`](super::ScopeTree).
///
/// These are assigned sequentially as namespaces are discovered while parsing,
/// so the translation unit is always `ScopeId(0)`. A handle is only meaningful
/// for the tree that issued it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The translation-unit scope, root of every tree.
    pub const ROOT: ScopeId = ScopeId(0);

    /// Create a new ScopeId.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

impl From<u32> for ScopeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}
