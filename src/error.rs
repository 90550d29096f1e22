//! Errors surfaced to completion callers.

use std::fmt;

use crate::base::SourcePosition;

/// Why no completion context could be established.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoContextReason {
    /// The cursor is inside a `//`, `/* */` or preprocessor line.
    InsideComment,
    /// The cursor is inside a string or character literal.
    InsideLiteral,
    /// The parser never reached the cursor.
    Unanchored,
}

impl fmt::Display for NoContextReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoContextReason::InsideComment => "cursor is inside a comment",
            NoContextReason::InsideLiteral => "cursor is inside a literal",
            NoContextReason::Unanchored => "cursor is not inside any parsable construct",
        })
    }
}

/// Completion failure.
///
/// Unresolvable qualifiers and unknown types are ordinary results (an empty
/// set, `NULL TYPE`), not errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("no completion context at {position}: {reason}")]
    NoContext {
        position: SourcePosition,
        reason: NoContextReason,
    },
}

impl CompletionError {
    pub fn position(&self) -> SourcePosition {
        match self {
            CompletionError::NoContext { position, .. } => *position,
        }
    }
}

pub type Result<T, E = CompletionError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_position_and_reason() {
        let error = CompletionError::NoContext {
            position: SourcePosition::new(3, 7),
            reason: NoContextReason::InsideComment,
        };
        assert_eq!(
            error.to_string(),
            "no completion context at 3:7: cursor is inside a comment"
        );
        assert_eq!(error.position(), SourcePosition::new(3, 7));
    }
}
