//! Front end for the C++ subset completion understands.
//!
//! - [`lexer`] - `logos` tokenizer that survives broken text
//! - [`parser`] - recovering parser that stops at the completion token
//! - [`env`] - what names mean while parsing, for operand typing

pub mod env;
pub mod lexer;
pub mod parser;

pub use lexer::{Lexed, Token, TokenKind, tokenize};
pub use parser::{CompletionSite, Construct, ParsedUnit, parse_completion};
