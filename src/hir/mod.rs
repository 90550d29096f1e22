//! High-level IR: the semantic model the completion resolvers work on.
//!
//! - [`ScopeTree`] - arena of namespaces, inline/anonymous markers and using directives
//! - [`Resolver`] - resolves `a::b::` qualifiers against the tree
//! - [`visited_qualified`] / [`visited_unqualified`] - visited-namespace sets
//! - [`TypeDescriptor`] - types, as far as completion cares
//! - [`ExpressionShape`] / [`preferred_type`] - the operator heuristics
//!
//! Nothing here knows about source text; the `syntax` module builds these
//! values from a (possibly broken) translation unit.

mod expr;
mod ids;
mod preferred;
mod resolve;
mod scope_tree;
mod types;
mod visited;

pub use expr::{BinaryOp, CursorSide, ExpressionShape, OperatorClass};
pub use ids::ScopeId;
pub use preferred::{preferred_rhs_type, preferred_type};
pub use resolve::{QualifierPath, ResolveResult, Resolver};
pub use scope_tree::{ANONYMOUS_SEGMENT, ScopeKind, ScopeNode, ScopeTree};
pub use types::{
    BOOLEAN_TYPE, DataModel, FloatWidth, IntWidth, RecordTag, TypeDescriptor, UNKNOWN_TYPE,
};
pub use visited::{
    UsingClosure, VisitedNamespaces, using_closure, visited_qualified, visited_unqualified,
};
