//! Scope tree: the lexically nested namespaces of a translation unit.
//!
//! Nodes live in a flat arena owned by [`ScopeTree`] and refer to each other
//! through [`ScopeId`] handles. Parent links are plain handles, so the tree owns
//! its nodes top-down and there are no reference cycles even though using
//! directives may form cycles between namespaces.
//!
//! Reopening a namespace (`namespace a {} namespace a {}`) yields the same node,
//! which is how using directives from every reopened block accumulate on one
//! node. All anonymous namespaces directly inside the same parent are likewise
//! one node.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::ids::ScopeId;

/// Synthetic name segment used when reporting an anonymous namespace.
pub const ANONYMOUS_SEGMENT: &str = "(anonymous)";

/// What kind of namespace-like scope a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The root of the tree (global scope).
    TranslationUnit,
    /// `namespace name { ... }`
    Namespace,
    /// `namespace { ... }`
    AnonymousNamespace,
    /// `inline namespace name { ... }`
    InlineNamespace,
}

impl ScopeKind {
    /// Inline and anonymous namespaces expose their contents through the
    /// enclosing namespace.
    pub fn is_transparent(self) -> bool {
        matches!(self, ScopeKind::AnonymousNamespace | ScopeKind::InlineNamespace)
    }

    /// Whether the scope has a user-written name.
    pub fn is_named(self) -> bool {
        matches!(self, ScopeKind::Namespace | ScopeKind::InlineNamespace)
    }
}

/// One namespace-like lexical scope.
#[derive(Clone, Debug)]
pub struct ScopeNode {
    /// Simple name (`"nns3"`); empty for anonymous namespaces and the root.
    name: SmolStr,
    /// Qualified name (`"ns3::nns3"`); empty for anonymous namespaces and the root.
    qualified_name: SmolStr,
    kind: ScopeKind,
    parent: Option<ScopeId>,
    /// Named child namespaces in declaration order.
    children: IndexMap<SmolStr, ScopeId>,
    /// The anonymous child namespace, if one was declared.
    anonymous: Option<ScopeId>,
    /// `namespace alias = target;`
    aliases: IndexMap<SmolStr, ScopeId>,
    /// Targets of `using namespace` written directly in this namespace.
    using_directives: Vec<ScopeId>,
}

impl ScopeNode {
    fn new(name: SmolStr, qualified_name: SmolStr, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            qualified_name,
            kind,
            parent,
            children: IndexMap::new(),
            anonymous: None,
            aliases: IndexMap::new(),
            using_directives: Vec::new(),
        }
    }

    /// Simple name of the namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored qualified name; empty for anonymous namespaces.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The enclosing scope; `None` only for the translation unit.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Targets of using directives written directly in this namespace, in
    /// source order.
    pub fn using_directives(&self) -> &[ScopeId] {
        &self.using_directives
    }

    /// Named child namespaces, in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, ScopeId)> + '_ {
        self.children.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn anonymous_child(&self) -> Option<ScopeId> {
        self.anonymous
    }
}

/// Arena of namespace nodes for one translation unit.
#[derive(Clone, Debug)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Create a tree holding only the translation unit.
    pub fn new() -> Self {
        Self {
            nodes: vec![ScopeNode::new(
                SmolStr::default(),
                SmolStr::default(),
                ScopeKind::TranslationUnit,
                None,
            )],
        }
    }

    /// The translation-unit scope.
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Get a node, or `None` for a handle from another tree.
    pub fn get(&self, id: ScopeId) -> Option<&ScopeNode> {
        self.nodes.get(id.index())
    }

    /// Whether `id` names a node of this tree.
    pub fn contains(&self, id: ScopeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Get a node.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: ScopeId) -> &ScopeNode {
        &self.nodes[id.index()]
    }

    /// Kind of `id`. Panics like [`node`](Self::node) on a foreign handle.
    pub fn kind(&self, id: ScopeId) -> ScopeKind {
        self.node(id).kind
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.node(id).parent
    }

    /// `id` followed by each enclosing scope up to the translation unit.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Number of nodes, including the translation unit.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the translation unit is always present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Open (or reopen) the named namespace `name` inside `parent`.
    ///
    /// An `inline` reopening marks the namespace inline; a plain reopening of
    /// an inline namespace keeps it inline.
    pub fn open_namespace(&mut self, parent: ScopeId, name: &str, inline: bool) -> ScopeId {
        if let Some(&existing) = self.node(parent).children.get(name) {
            if inline {
                self.nodes[existing.index()].kind = ScopeKind::InlineNamespace;
            }
            return existing;
        }

        let qualified_name = match self.kind(parent) {
            ScopeKind::TranslationUnit => SmolStr::new(name),
            _ => SmolStr::from(format!("{}::{}", self.display_name(parent), name)),
        };
        let kind = if inline {
            ScopeKind::InlineNamespace
        } else {
            ScopeKind::Namespace
        };

        let id = self.push(ScopeNode::new(SmolStr::new(name), qualified_name, kind, Some(parent)));
        self.nodes[parent.index()].children.insert(SmolStr::new(name), id);
        id
    }

    /// Open (or reopen) the anonymous namespace inside `parent`.
    pub fn open_anonymous(&mut self, parent: ScopeId) -> ScopeId {
        if let Some(existing) = self.node(parent).anonymous {
            return existing;
        }

        let id = self.push(ScopeNode::new(
            SmolStr::default(),
            SmolStr::default(),
            ScopeKind::AnonymousNamespace,
            Some(parent),
        ));
        self.nodes[parent.index()].anonymous = Some(id);
        id
    }

    /// Record `namespace alias = target;` written in `scope`.
    pub fn add_alias(&mut self, scope: ScopeId, alias: &str, target: ScopeId) {
        self.nodes[scope.index()]
            .aliases
            .insert(SmolStr::new(alias), target);
    }

    /// Record `using namespace target;` written in `scope`.
    ///
    /// Repeated directives for the same target are kept once.
    pub fn add_using_directive(&mut self, scope: ScopeId, target: ScopeId) {
        let directives = &mut self.nodes[scope.index()].using_directives;
        if !directives.contains(&target) {
            directives.push(target);
        }
    }

    fn push(&mut self, node: ScopeNode) -> ScopeId {
        let id = ScopeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Named child namespace or namespace alias called `name` directly in `scope`.
    pub fn member_namespace(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let node = self.node(scope);
        node.children
            .get(name)
            .or_else(|| node.aliases.get(name))
            .copied()
    }

    /// Inline and anonymous namespaces declared directly in `scope`.
    pub fn transparent_children(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        let node = self.node(scope);
        node.children
            .values()
            .copied()
            .filter(move |&child| self.kind(child) == ScopeKind::InlineNamespace)
            .chain(node.anonymous)
    }

    pub fn using_directives(&self, scope: ScopeId) -> &[ScopeId] {
        &self.node(scope).using_directives
    }

    /// The name a namespace is reported under.
    ///
    /// Anonymous namespaces get the synthetic `(anonymous)` segment appended to
    /// their parent's name; the translation unit is the empty string.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this tree.
    pub fn display_name(&self, id: ScopeId) -> String {
        let node = self.node(id);
        match node.kind {
            ScopeKind::TranslationUnit => String::new(),
            ScopeKind::Namespace | ScopeKind::InlineNamespace => node.qualified_name.to_string(),
            ScopeKind::AnonymousNamespace => match node.parent {
                Some(parent) if self.kind(parent) != ScopeKind::TranslationUnit => {
                    format!("{}::{}", self.display_name(parent), ANONYMOUS_SEGMENT)
                }
                _ => ANONYMOUS_SEGMENT.to_string(),
            },
        }
    }

    /// Find a namespace by its reported name (`"foo::(anonymous)"` works too).
    pub fn find(&self, display_name: &str) -> Option<ScopeId> {
        (1..self.nodes.len())
            .map(|index| ScopeId::new(index as u32))
            .find(|&id| self.display_name(id) == display_name)
    }
}
