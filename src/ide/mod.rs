//! IDE features: completion context for editor front ends.
//!
//! This module is the boundary between source text and the semantic model
//! (HIR). Callers hand in text and a cursor offset and get plain data back.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take data in, return data out
//! 2. **Request-scoped**: Nothing is cached between queries
//! 3. **Never panics on input**: Broken text degrades to empty results
//!
//! ## Usage
//!
//! ```
//! use semcc::ide::{CompletionOptions, CompletionQuery, complete};
//!
//! let query = CompletionQuery::from_annotated("void f(int *ptr) { ptr + ^10; }").unwrap();
//! let result = complete(&query, &CompletionOptions::default()).unwrap();
//! assert_eq!(result.preferred_type.to_string(), "long");
//! ```

mod anchor;
mod completion;

pub use anchor::{CursorAnchor, anchor};
pub use completion::{
    CollectingSink, CompletionOptions, CompletionQuery, CompletionResult, CompletionSink,
    complete, run_completion,
};
