//! Qualifier resolution: finding the namespace a `a::b::` prefix names.
//!
//! This is an approximation of C++ namespace-name lookup, good enough for the
//! qualifier in front of a completion point:
//!
//! 1. The first segment is looked up outward from the current scope.
//! 2. Each later segment is looked up inside the namespace found so far.
//! 3. Within one namespace, its own children and aliases are searched first,
//!    including those of its inline and anonymous descendants; if none
//!    match, the namespaces nominated by its using directives are searched.
//! 4. More than one distinct match at the same level is ambiguous.

use std::fmt;

use smol_str::SmolStr;
use tracing::trace;

use super::ids::ScopeId;
use super::scope_tree::ScopeTree;
use super::visited::using_closure;

// ============================================================================
// QUALIFIER PATHS
// ============================================================================

/// A parsed qualifier such as `::std::chrono::`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct QualifierPath {
    /// Starts with `::` (lookup begins at the translation unit).
    pub global: bool,
    pub segments: Vec<SmolStr>,
}

impl QualifierPath {
    pub fn new(global: bool, segments: Vec<SmolStr>) -> Self {
        Self { global, segments }
    }

    /// Parse a raw qualifier like `"foo::"`, `"::a::b"` or `"a :: b ::"`.
    ///
    /// Returns `None` if any segment is not an identifier.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut rest = raw.trim();
        let global = rest.starts_with("::");
        if global {
            rest = rest[2..].trim_start();
        }
        if let Some(stripped) = rest.strip_suffix("::") {
            rest = stripped.trim_end();
        }

        if rest.is_empty() {
            return Some(Self::new(global, Vec::new()));
        }

        let segments = rest
            .split("::")
            .map(|segment| {
                let segment = segment.trim();
                is_identifier(segment).then(|| SmolStr::new(segment))
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self::new(global, segments))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && !self.global
    }
}

impl fmt::Display for QualifierPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            f.write_str("::")?;
        }
        for segment in &self.segments {
            write!(f, "{segment}::")?;
        }
        Ok(())
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Result of resolving a qualifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// The qualifier names exactly one namespace.
    Found(ScopeId),
    /// Several namespaces are equally good matches.
    Ambiguous(Vec<ScopeId>),
    /// Nothing by that name is visible.
    NotFound,
}

impl ResolveResult {
    pub fn found(&self) -> Option<ScopeId> {
        match self {
            ResolveResult::Found(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolveResult::Found(_))
    }

    fn from_candidates(mut candidates: Vec<ScopeId>) -> Self {
        candidates.sort_unstable();
        candidates.dedup();
        match candidates.len() {
            0 => ResolveResult::NotFound,
            1 => ResolveResult::Found(candidates[0]),
            _ => ResolveResult::Ambiguous(candidates),
        }
    }
}

/// Resolves qualifiers against a scope tree from a given scope.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    tree: &'a ScopeTree,
    scope: ScopeId,
}

impl<'a> Resolver<'a> {
    /// Create a resolver positioned at the translation unit.
    pub fn new(tree: &'a ScopeTree) -> Self {
        Self {
            tree,
            scope: tree.root(),
        }
    }

    /// Set the scope lookup starts from.
    pub fn with_scope(mut self, scope: ScopeId) -> Self {
        self.scope = scope;
        self
    }

    /// Resolve a qualifier to the namespace it names.
    ///
    /// Nothing is found from a scope issued by another tree.
    pub fn resolve(&self, path: &QualifierPath) -> ResolveResult {
        if !self.tree.contains(self.scope) {
            return ResolveResult::NotFound;
        }
        let mut segments = path.segments.iter();

        let mut current = match (path.global, segments.next()) {
            (true, None) => return ResolveResult::Found(self.tree.root()),
            (false, None) => return ResolveResult::NotFound,
            (true, Some(first)) => self.lookup_in(self.tree.root(), first),
            (false, Some(first)) => self.lookup_unqualified(first),
        };

        for segment in segments {
            current = match current {
                ResolveResult::Found(ns) => self.lookup_in(ns, segment),
                other => return other,
            };
        }

        trace!(%path, result = ?current, "resolved qualifier");
        current
    }

    /// Resolve a single name from the current scope outward.
    pub fn lookup_unqualified(&self, name: &str) -> ResolveResult {
        if !self.tree.contains(self.scope) {
            return ResolveResult::NotFound;
        }
        for scope in self.tree.ancestors(self.scope) {
            match self.lookup_in(scope, name) {
                ResolveResult::NotFound => continue,
                found => return found,
            }
        }
        ResolveResult::NotFound
    }

    /// Look up `name` as a member namespace of `scope`.
    pub fn lookup_in(&self, scope: ScopeId, name: &str) -> ResolveResult {
        if !self.tree.contains(scope) {
            return ResolveResult::NotFound;
        }
        let closure = using_closure(self.tree, scope);

        // Members of the namespace itself (and its transparent children) win
        // over members of nominated namespaces.
        let own: Vec<ScopeId> = closure
            .searched
            .iter()
            .copied()
            .filter(|&ns| self.is_transparently_within(ns, scope))
            .filter_map(|ns| self.tree.member_namespace(ns, name))
            .collect();
        if !own.is_empty() {
            return ResolveResult::from_candidates(own);
        }

        let nominated = closure
            .searched
            .iter()
            .filter_map(|&ns| self.tree.member_namespace(ns, name))
            .collect();
        ResolveResult::from_candidates(nominated)
    }

    /// Whether `ns` is `scope` or reachable from it through inline and
    /// anonymous children only.
    fn is_transparently_within(&self, ns: ScopeId, scope: ScopeId) -> bool {
        for ancestor in self.tree.ancestors(ns) {
            if ancestor == scope {
                return true;
            }
            if !self.tree.kind(ancestor).is_transparent() {
                return false;
            }
        }
        false
    }
}
