//! Foundation types for the completion resolver.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`SourcePosition`], [`LineIndex`] - 1-based line/column conversion
//! - [`TextRange`], [`TextSize`] - Byte offsets into source text
//! - [`Annotated`] - Source fixtures with `^` cursor markers
//!
//! This module has NO dependencies on other semcc modules.

mod annotations;
mod span;

pub use annotations::Annotated;
pub use span::{LineIndex, SourcePosition, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
