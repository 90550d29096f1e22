//! Visited namespaces: which namespaces contribute completion candidates.
//!
//! # Qualified completion (`prefix::^`)
//!
//! The qualifier is resolved to a namespace `N`; the visited set is `N` plus
//! every namespace reachable from it through using directives. Inline and
//! anonymous namespaces directly inside a visited namespace are transparent:
//! their directives count as if written in the parent. Anonymous ones are also
//! reported themselves, under their synthetic `(anonymous)` name. Ordinary
//! nested namespaces are only visited when a directive reaches them.
//!
//! # Unqualified completion (`^`)
//!
//! The enclosing named namespaces, innermost first. Using directives are left
//! to ordinary unqualified lookup in the host.

use std::collections::VecDeque;

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::ids::ScopeId;
use super::resolve::{QualifierPath, ResolveResult, Resolver};
use super::scope_tree::{ScopeKind, ScopeTree};

/// Rendered names of the visited namespaces, without duplicates.
///
/// Iteration follows discovery order: innermost-first for unqualified
/// completion; for qualified completion the order carries no meaning.
pub type VisitedNamespaces = IndexSet<SmolStr>;

/// Result of walking the using-directive graph from one namespace.
#[derive(Clone, Debug, Default)]
pub struct UsingClosure {
    /// Namespaces reported as visited: the seed, directive targets and
    /// anonymous namespaces.
    pub reported: IndexSet<ScopeId>,
    /// Every namespace whose members are reachable, including transparent
    /// inline namespaces that are not reported.
    pub searched: IndexSet<ScopeId>,
}

/// Walk using directives from `seed`, treating inline and anonymous children
/// as transparent.
///
/// Terminates on cyclic directives: each namespace is expanded at most once.
/// A `seed` issued by another tree yields an empty closure.
pub fn using_closure(tree: &ScopeTree, seed: ScopeId) -> UsingClosure {
    let mut closure = UsingClosure::default();
    if !tree.contains(seed) {
        debug!(?seed, "scope is not part of this tree");
        return closure;
    }
    let mut expanded = FxHashSet::default();
    let mut queue = VecDeque::from([seed]);
    closure.reported.insert(seed);

    while let Some(current) = queue.pop_front() {
        if !expanded.insert(current) {
            continue;
        }
        closure.searched.insert(current);

        for &target in tree.using_directives(current) {
            trace!(from = ?current, to = ?target, "following using directive");
            closure.reported.insert(target);
            queue.push_back(target);
        }

        for child in tree.transparent_children(current) {
            if tree.kind(child) == ScopeKind::AnonymousNamespace {
                closure.reported.insert(child);
            }
            queue.push_back(child);
        }
    }

    closure
}

/// Visited namespaces for `qualifier::^` written in `scope`.
///
/// An unresolvable (or ambiguous) qualifier yields the empty set; there is
/// no fallback to unqualified completion. So does a `scope` issued by another
/// tree.
pub fn visited_qualified(
    tree: &ScopeTree,
    scope: ScopeId,
    qualifier: &QualifierPath,
) -> VisitedNamespaces {
    if !tree.contains(scope) {
        debug!(?scope, "scope is not part of this tree");
        return VisitedNamespaces::default();
    }
    let target = match Resolver::new(tree).with_scope(scope).resolve(qualifier) {
        ResolveResult::Found(target) => target,
        ResolveResult::Ambiguous(candidates) => {
            debug!(%qualifier, count = candidates.len(), "ambiguous qualifier");
            return VisitedNamespaces::default();
        }
        ResolveResult::NotFound => {
            debug!(%qualifier, "qualifier does not name a namespace");
            return VisitedNamespaces::default();
        }
    };

    using_closure(tree, target)
        .reported
        .into_iter()
        .filter(|&id| tree.kind(id) != ScopeKind::TranslationUnit)
        .map(|id| SmolStr::from(tree.display_name(id)))
        .collect()
}

/// Visited namespaces for a bare `^` in `scope`: the enclosing named
/// namespaces from innermost to outermost. Empty for a foreign `scope`.
pub fn visited_unqualified(tree: &ScopeTree, scope: ScopeId) -> VisitedNamespaces {
    if !tree.contains(scope) {
        debug!(?scope, "scope is not part of this tree");
        return VisitedNamespaces::default();
    }
    tree.ancestors(scope)
        .filter(|&id| tree.kind(id).is_named())
        .map(|id| SmolStr::from(tree.display_name(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The namespaces of
    ///
    /// ```text
    /// namespace ns1 {}
    /// namespace ns2 {}
    /// namespace ns3 { namespace nns3 {} }
    /// namespace foo {
    ///   using namespace ns1;
    ///   namespace ns4 {}
    ///   namespace { using namespace ns2; }
    ///   inline namespace bar { using namespace ns3::nns3; }
    /// }
    /// namespace ns {}
    /// ```
    fn fixture() -> (ScopeTree, ScopeId) {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let ns1 = tree.open_namespace(root, "ns1", false);
        let ns2 = tree.open_namespace(root, "ns2", false);
        let ns3 = tree.open_namespace(root, "ns3", false);
        let nns3 = tree.open_namespace(ns3, "nns3", false);
        let foo = tree.open_namespace(root, "foo", false);
        tree.add_using_directive(foo, ns1);
        tree.open_namespace(foo, "ns4", false);
        let anon = tree.open_anonymous(foo);
        tree.add_using_directive(anon, ns2);
        let bar = tree.open_namespace(foo, "bar", true);
        tree.add_using_directive(bar, nns3);
        let ns = tree.open_namespace(root, "ns", false);
        (tree, ns)
    }

    fn sorted(visited: VisitedNamespaces) -> Vec<String> {
        let mut names: Vec<String> = visited.into_iter().map(|n| n.to_string()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_qualified_closure_through_inline_and_anonymous() {
        let (tree, ns) = fixture();
        let qualifier = QualifierPath::parse("foo::").unwrap();
        let visited = visited_qualified(&tree, ns, &qualifier);
        assert_eq!(
            sorted(visited),
            vec!["foo", "foo::(anonymous)", "ns1", "ns2", "ns3::nns3"]
        );
    }

    #[test]
    fn test_unresolved_qualifier_is_empty() {
        let (tree, ns) = fixture();
        let qualifier = QualifierPath::parse("nope::").unwrap();
        assert!(visited_qualified(&tree, ns, &qualifier).is_empty());
    }

    #[test]
    fn test_cyclic_directives_terminate() {
        let mut tree = ScopeTree::new();
        let a = tree.open_namespace(tree.root(), "a", false);
        let b = tree.open_namespace(tree.root(), "b", false);
        tree.add_using_directive(a, b);
        tree.add_using_directive(b, a);

        let visited = visited_qualified(&tree, tree.root(), &QualifierPath::parse("a::").unwrap());
        assert_eq!(sorted(visited), vec!["a", "b"]);
    }

    #[test]
    fn test_transitive_directives() {
        let mut tree = ScopeTree::new();
        let a = tree.open_namespace(tree.root(), "a", false);
        let b = tree.open_namespace(tree.root(), "b", false);
        let c = tree.open_namespace(tree.root(), "c", false);
        let c_anon = tree.open_anonymous(c);
        let d = tree.open_namespace(tree.root(), "d", false);
        tree.add_using_directive(a, b);
        tree.add_using_directive(b, c);
        tree.add_using_directive(c_anon, d);

        let visited = visited_qualified(&tree, tree.root(), &QualifierPath::parse("a::").unwrap());
        assert_eq!(sorted(visited), vec!["a", "b", "c", "c::(anonymous)", "d"]);
    }

    #[test]
    fn test_closure_searches_inline_without_reporting() {
        let (tree, _) = fixture();
        let foo = tree.find("foo").unwrap();
        let bar = tree.find("foo::bar").unwrap();
        let closure = using_closure(&tree, foo);
        assert!(closure.searched.contains(&bar));
        assert!(!closure.reported.contains(&bar));
    }

    #[test]
    fn test_unqualified_chain_is_innermost_first() {
        let mut tree = ScopeTree::new();
        let n1 = tree.open_namespace(tree.root(), "n1", false);
        let n2 = tree.open_namespace(n1, "n2", false);
        let anon = tree.open_anonymous(n2);
        let visited = visited_unqualified(&tree, anon);
        let names: Vec<&str> = visited.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["n1::n2", "n1"]);
        assert!(visited_unqualified(&tree, tree.root()).is_empty());
    }

    #[test]
    fn test_foreign_scope_yields_empty_sets() {
        let (big, _) = fixture();
        let foreign = big.find("ns3::nns3").unwrap();

        let small = ScopeTree::new();
        assert!(!small.contains(foreign));
        let qualifier = QualifierPath::parse("a::").unwrap();
        assert!(visited_qualified(&small, foreign, &qualifier).is_empty());
        assert!(visited_unqualified(&small, foreign).is_empty());

        let closure = using_closure(&small, foreign);
        assert!(closure.reported.is_empty());
        assert!(closure.searched.is_empty());
    }

    #[test]
    fn test_out_of_range_scope_id_is_empty() {
        let (tree, _) = fixture();
        let id = ScopeId::new(tree.len() as u32);
        let qualifier = QualifierPath::parse("::foo::").unwrap();
        assert!(visited_qualified(&tree, id, &qualifier).is_empty());
        assert!(visited_unqualified(&tree, ScopeId::new(u32::MAX)).is_empty());
    }
}
