//! # semcc-base
//!
//! Code-completion context resolution for a C++ front end: which namespaces a
//! completion request visits, and which type the completed token should have.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide     → Completion driver (anchor, query, sink)
//!   ↓
//! syntax  → Lexer + recovering parser (logos, hand-written descent)
//!   ↓
//! hir     → Scope tree, qualifier resolution, type heuristics
//!   ↓
//! base    → Primitives (positions, line index, fixtures)
//! ```

/// Foundation types: positions, line index, annotated fixtures
pub mod base;

/// Completion failures
pub mod error;

/// High-level IR: namespaces, types, operator heuristics
pub mod hir;

/// IDE features: completion context
pub mod ide;

/// Front end: tokens and the recovering parser
pub mod syntax;

pub use base::{LineIndex, SourcePosition, TextRange, TextSize};
pub use error::{CompletionError, NoContextReason};
pub use hir::{DataModel, TypeDescriptor};
pub use ide::{CompletionOptions, CompletionQuery, CompletionResult, CompletionSink, complete};
