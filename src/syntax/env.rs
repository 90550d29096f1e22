//! Symbol environment: what the parser knows about names while it walks a
//! translation unit.
//!
//! Namespace-level symbols are kept per [`ScopeId`] so that reopened
//! namespaces, qualified names and using directives see them. Record,
//! function and block scopes are a stack of frames that is popped as the
//! parser leaves them.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::hir::{QualifierPath, ResolveResult, Resolver, ScopeId, ScopeTree, TypeDescriptor, using_closure};

/// What a name denotes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// A variable, parameter or enumerator of the given type.
    Value(TypeDescriptor),
    /// A type name: record, enumeration, typedef or alias.
    Type(TypeDescriptor),
    /// A function; carries the return type.
    Function(TypeDescriptor),
}

impl Symbol {
    pub fn is_type(&self) -> bool {
        matches!(self, Symbol::Type(_))
    }
}

/// Kind of a non-namespace lexical scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// A class body; carries the record's own type.
    Record(TypeDescriptor),
    /// A function's parameters and outermost body block.
    Function,
    /// A nested block or `for` header.
    Block,
}

#[derive(Clone, Debug)]
struct Frame {
    kind: FrameKind,
    symbols: FxHashMap<SmolStr, Symbol>,
}

#[derive(Clone, Debug, Default)]
pub struct Environment {
    namespaces: FxHashMap<ScopeId, FxHashMap<SmolStr, Symbol>>,
    frames: Vec<Frame>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self, kind: FrameKind) {
        self.frames.push(Frame {
            kind,
            symbols: FxHashMap::default(),
        });
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Kind of the innermost non-namespace scope, if any.
    pub fn innermost(&self) -> Option<&FrameKind> {
        self.frames.last().map(|frame| &frame.kind)
    }

    /// Frame kinds from innermost to outermost.
    pub fn frame_kinds(&self) -> impl Iterator<Item = &FrameKind> + '_ {
        self.frames.iter().rev().map(|frame| &frame.kind)
    }

    /// Declare `name` in the innermost frame, or in namespace `scope` when no
    /// frame is open.
    pub fn declare(&mut self, scope: ScopeId, name: impl Into<SmolStr>, symbol: Symbol) {
        let table = match self.frames.last_mut() {
            Some(frame) => &mut frame.symbols,
            None => self.namespaces.entry(scope).or_default(),
        };
        table.insert(name.into(), symbol);
    }

    /// Unqualified lookup from `scope`: open frames first, then each enclosing
    /// namespace together with what its using directives nominate.
    pub fn lookup(&self, tree: &ScopeTree, scope: ScopeId, name: &str) -> Option<&Symbol> {
        if let Some(symbol) = self
            .frames
            .iter()
            .rev()
            .find_map(|frame| frame.symbols.get(name))
        {
            return Some(symbol);
        }

        tree.ancestors(scope)
            .find_map(|ns| self.lookup_in_namespace(tree, ns, name))
    }

    /// Lookup of `qualifier::name` from `scope`.
    pub fn lookup_qualified(
        &self,
        tree: &ScopeTree,
        scope: ScopeId,
        qualifier: &QualifierPath,
        name: &str,
    ) -> Option<&Symbol> {
        match Resolver::new(tree).with_scope(scope).resolve(qualifier) {
            ResolveResult::Found(ns) => self.lookup_in_namespace(tree, ns, name),
            ResolveResult::Ambiguous(_) | ResolveResult::NotFound => None,
        }
    }

    /// Members of `ns`, its inline/anonymous children and nominated namespaces.
    fn lookup_in_namespace(&self, tree: &ScopeTree, ns: ScopeId, name: &str) -> Option<&Symbol> {
        using_closure(tree, ns)
            .searched
            .iter()
            .find_map(|member| self.namespaces.get(member)?.get(name))
    }
}
