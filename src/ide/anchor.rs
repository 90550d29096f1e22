//! Cursor anchor: ties a text offset to the construct around it.
//!
//! The whole text is lexed, the token being typed at the cursor is dropped
//! and a [`TokenKind::CodeCompletion`] token takes its place. The recovering
//! parser then runs up to that token and reports the completion site.
//!
//! ```text
//! foo::ba^r;     tokens: foo :: <cc> ;     ("bar" is the typed prefix)
//! x += ^10;      tokens: x += <cc> 10 ;
//! // a ^ b       no context: inside a comment
//! ```

use tracing::debug;

use crate::base::{LineIndex, SourcePosition, TextRange, TextSize};
use crate::error::{CompletionError, NoContextReason, Result};
use crate::hir::{DataModel, ScopeTree};
use crate::syntax::{CompletionSite, Lexed, Token, TokenKind, parse_completion, tokenize};

/// A completion point located in its translation unit.
#[derive(Clone, Debug)]
pub struct CursorAnchor {
    /// 1-based position of the cursor.
    pub position: SourcePosition,
    /// Cursor offset after clamping to the text.
    pub offset: TextSize,
    /// Namespaces declared before the cursor.
    pub tree: ScopeTree,
    pub site: CompletionSite,
}

/// Anchor the cursor at byte `offset` of `text`. Offsets past the end are
/// clamped to the end.
///
/// Fails with [`CompletionError::NoContext`] when the cursor sits in a comment
/// or a string/char literal, or when no construct encloses it.
pub fn anchor(text: &str, offset: usize, model: DataModel) -> Result<CursorAnchor> {
    let index = LineIndex::new(text);
    let offset = index.clamp(TextSize::from(u32::try_from(offset).unwrap_or(u32::MAX)));
    let position = index.position(offset);

    let lexed = tokenize(text);
    if let Some(reason) = opaque_region(&lexed, offset) {
        debug!(%position, %reason, "cursor has no completion context");
        return Err(CompletionError::NoContext { position, reason });
    }

    let tokens = completion_stream(&lexed, offset);
    let unit = parse_completion(text, tokens, model);
    let Some(site) = unit.site else {
        debug!(%position, "parser never reached the cursor");
        return Err(CompletionError::NoContext {
            position,
            reason: NoContextReason::Unanchored,
        });
    };

    debug!(
        %position,
        scope = %unit.tree.display_name(site.scope),
        construct = ?site.construct,
        qualified = site.qualifier.is_some(),
        "anchored completion"
    );
    Ok(CursorAnchor {
        position,
        offset,
        tree: unit.tree,
        site,
    })
}

/// Comment or string/char literal containing `offset`, if any.
///
/// A cursor right after an unterminated token, or at the end of a line
/// comment, is still inside it.
fn opaque_region(lexed: &[Lexed], offset: TextSize) -> Option<NoContextReason> {
    lexed.iter().find_map(|lexed| {
        let kind = lexed.kind();
        let reason = match kind {
            kind if kind.is_trivia() => NoContextReason::InsideComment,
            TokenKind::StringLiteral | TokenKind::CharLiteral => NoContextReason::InsideLiteral,
            _ => return None,
        };

        let range = lexed.token.range;
        let open_ended = lexed.is_unterminated()
            || matches!(kind, TokenKind::LineComment | TokenKind::Directive);
        let inside = range.start() < offset
            && (offset < range.end() || (open_ended && offset == range.end()));
        inside.then_some(reason)
    })
}

/// Non-trivia tokens with the completion token spliced in at `offset`.
///
/// A word ending at the cursor and any token straddling it are what the user
/// is typing, so they are left out.
fn completion_stream(lexed: &[Lexed], offset: TextSize) -> Vec<Token> {
    let cursor = Token::new(TokenKind::CodeCompletion, TextRange::empty(offset));
    let mut tokens = Vec::with_capacity(lexed.len() + 1);
    let mut inserted = false;

    for token in lexed
        .iter()
        .map(|lexed| lexed.token)
        .filter(|token| !token.kind.is_trivia())
    {
        let range = token.range;
        if range.end() <= offset {
            if range.end() == offset && token.kind.is_word() {
                continue;
            }
            tokens.push(token);
        } else if range.start() >= offset {
            if !inserted {
                tokens.push(cursor);
                inserted = true;
            }
            tokens.push(token);
        }
    }

    if !inserted {
        tokens.push(cursor);
    }
    tokens
}
