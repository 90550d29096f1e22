//! Completion context: visited namespaces and preferred type at a cursor.
//!
//! A [`CompletionQuery`] is anchored in its text, then the two resolvers run
//! on the anchored site:
//!
//! - qualified (`ns::^`, or an explicit qualifier on the query): the namespaces
//!   the qualifier reaches through using directives
//! - unqualified (`^`): the enclosing named namespaces, innermost first
//!
//! and, independently, the preferred type from the operator around the cursor.

use smol_str::SmolStr;
use tracing::debug;

use crate::base::{Annotated, SourcePosition};
use crate::error::{CompletionError, Result};
use crate::hir::{
    DataModel, QualifierPath, TypeDescriptor, VisitedNamespaces, preferred_type,
    visited_qualified, visited_unqualified,
};

use super::anchor::anchor;

/// One completion request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionQuery {
    pub text: String,
    /// Byte offset of the cursor; clamped to the text.
    pub offset: usize,
    /// Raw qualifier such as `"foo::"` or `"::a::b"`; when set it replaces
    /// whatever qualifier precedes the cursor in the text.
    pub qualifier: Option<String>,
}

impl CompletionQuery {
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
            qualifier: None,
        }
    }

    /// Build a query from text with exactly one `^` marker.
    pub fn from_annotated(annotated: &str) -> Option<Self> {
        let fixture = Annotated::parse(annotated);
        let offset = fixture.point()?;
        Some(Self::new(fixture.code, offset))
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }
}

/// Target configuration for completion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Decides the pointer-difference type (`long` on LP64).
    pub data_model: DataModel,
}

impl CompletionOptions {
    pub fn with_data_model(mut self, data_model: DataModel) -> Self {
        self.data_model = data_model;
        self
    }
}

/// What completion knows about the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionResult {
    pub visited_namespaces: VisitedNamespaces,
    /// `Unknown` (rendered `NULL TYPE`) when there is no opinion.
    pub preferred_type: TypeDescriptor,
    pub position: SourcePosition,
}

impl CompletionResult {
    /// The preferred type in its canonical spelling.
    pub fn preferred_type_name(&self) -> String {
        self.preferred_type.to_string()
    }

    /// Visited namespace names, sorted. For comparing qualified results, whose
    /// order carries no meaning.
    pub fn sorted_namespaces(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.visited_namespaces.iter().map(SmolStr::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Receiver of completion outcomes.
pub trait CompletionSink {
    fn accept(&mut self, result: CompletionResult);

    /// The cursor has no completion context; nothing was computed.
    fn no_context(&mut self, error: &CompletionError);
}

/// A sink that keeps everything it is given.
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    pub results: Vec<CompletionResult>,
    pub errors: Vec<CompletionError>,
}

impl CompletionSink for CollectingSink {
    fn accept(&mut self, result: CompletionResult) {
        self.results.push(result);
    }

    fn no_context(&mut self, error: &CompletionError) {
        self.errors.push(error.clone());
    }
}

/// Resolve the completion context for `query`.
pub fn complete(query: &CompletionQuery, options: &CompletionOptions) -> Result<CompletionResult> {
    let anchor = anchor(&query.text, query.offset, options.data_model)?;
    let site = &anchor.site;

    let qualifier = match query.qualifier.as_deref() {
        Some(raw) => match QualifierPath::parse(raw) {
            Some(path) => Some(path).filter(|path| !path.is_empty()),
            None => {
                debug!(qualifier = raw, "malformed qualifier");
                return Ok(CompletionResult {
                    visited_namespaces: VisitedNamespaces::default(),
                    preferred_type: preferred_type(site.shape.as_ref(), options.data_model),
                    position: anchor.position,
                });
            }
        },
        None => site.qualifier.clone(),
    };

    let visited_namespaces = match &qualifier {
        Some(path) => visited_qualified(&anchor.tree, site.scope, path),
        None => visited_unqualified(&anchor.tree, site.scope),
    };
    let preferred_type = preferred_type(site.shape.as_ref(), options.data_model);

    debug!(
        position = %anchor.position,
        qualifier = ?qualifier.as_ref().map(ToString::to_string),
        visited = visited_namespaces.len(),
        preferred = %preferred_type,
        "completion context"
    );
    Ok(CompletionResult {
        visited_namespaces,
        preferred_type,
        position: anchor.position,
    })
}

/// Resolve `query` and hand the outcome to `sink`.
pub fn run_completion(
    query: &CompletionQuery,
    options: &CompletionOptions,
    sink: &mut impl CompletionSink,
) {
    match complete(query, options) {
        Ok(result) => sink.accept(result),
        Err(error) => sink.no_context(&error),
    }
}
