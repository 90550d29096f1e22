//! Lexer for the C++ subset the completion front end understands.
//!
//! The lexer never fails: unknown characters become [`TokenKind::Error`],
//! unterminated comments and literals run to the end of the line (literals)
//! or text (block comments).

use logos::{Lexer, Logos};

use crate::base::{TextRange, TextSize};
use crate::hir::BinaryOp;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // ------------------------------------------------------------------
    // Trivia
    // ------------------------------------------------------------------
    #[token("//", line_comment)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,
    /// Preprocessor lines are skipped like comments.
    #[token("#", line_comment)]
    Directive,

    // ------------------------------------------------------------------
    // Keywords
    // ------------------------------------------------------------------
    #[token("namespace")]
    Namespace,
    #[token("inline")]
    Inline,
    #[token("using")]
    Using,
    #[token("typedef")]
    Typedef,
    #[token("enum")]
    Enum,
    #[token("class")]
    Class,
    #[token("struct")]
    Struct,
    #[token("union")]
    Union,
    #[token("template")]
    Template,
    #[token("typename")]
    Typename,
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("virtual")]
    Virtual,
    #[token("friend")]
    Friend,
    #[token("extern")]
    Extern,
    #[token("static")]
    Static,
    #[token("constexpr")]
    Constexpr,
    #[token("const")]
    Const,
    #[token("volatile")]
    Volatile,
    #[token("final")]
    Final,
    #[token("override")]
    Override,
    #[token("noexcept")]
    Noexcept,
    #[token("operator")]
    Operator,
    #[token("auto")]
    Auto,
    #[token("void")]
    Void,
    #[token("bool")]
    Bool,
    #[token("char")]
    Char,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("signed")]
    Signed,
    #[token("unsigned")]
    Unsigned,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nullptr")]
    Nullptr,
    #[token("this")]
    This,
    #[token("sizeof")]
    Sizeof,

    // ------------------------------------------------------------------
    // Literals and names
    // ------------------------------------------------------------------
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"(0[xX][0-9a-fA-F']+|[0-9][0-9']*)[uUlL]*")]
    IntLiteral,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFlL]?")]
    FloatLiteral,
    #[token("\"", |lex| quoted(lex, '"'))]
    StringLiteral,
    #[token("'", |lex| quoted(lex, '\''))]
    CharLiteral,

    // ------------------------------------------------------------------
    // Punctuation
    // ------------------------------------------------------------------
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("?")]
    Question,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,

    #[token("||")]
    PipePipe,
    #[token("&&")]
    AmpAmp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // ------------------------------------------------------------------
    // Synthetic
    // ------------------------------------------------------------------
    /// Anything the lexer does not recognise.
    Error,
    /// Inserted at the cursor offset by the completion anchor.
    CodeCompletion,
    /// End of input.
    Eof,
}

fn line_comment(lex: &mut Lexer<TokenKind>) {
    let end = lex.remainder().find('\n').unwrap_or(lex.remainder().len());
    lex.bump(end);
}

fn block_comment(lex: &mut Lexer<TokenKind>) -> bool {
    let remainder = lex.remainder();
    let len = remainder.find("*/").map_or(remainder.len(), |end| end + 2);
    lex.bump(len);
    remainder.contains("*/")
}

/// Scan a string or char literal body, honouring escapes. Returns whether the
/// closing quote was found before the end of the line.
fn quoted(lex: &mut Lexer<TokenKind>, quote: char) -> bool {
    let mut escaped = false;
    for (index, ch) in lex.remainder().char_indices() {
        match ch {
            '\n' => {
                lex.bump(index);
                return false;
            }
            '\\' if !escaped => escaped = true,
            c if c == quote && !escaped => {
                lex.bump(index + c.len_utf8());
                return true;
            }
            _ => escaped = false,
        }
    }
    let len = lex.remainder().len();
    lex.bump(len);
    false
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::Directive
        )
    }

    /// Identifiers and keywords: tokens a user may be in the middle of typing.
    pub fn is_word(self) -> bool {
        use TokenKind::*;
        match self {
            Ident | Namespace | Inline | Using | Typedef | Enum | Class | Struct | Union
            | Template | Typename | Public | Protected | Private | Virtual | Friend | Extern
            | Static | Constexpr | Const | Volatile | Final | Override | Noexcept | Operator
            | Auto | Void | Bool | Char | Short | Int | Long | Float | Double | Signed
            | Unsigned | Return | If | Else | While | Do | For | Break | Continue | True
            | False | Nullptr | This | Sizeof => true,
            _ => false,
        }
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
        )
    }

    /// Builtin type keywords that may start a declaration.
    pub fn is_builtin_type(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Auto | Void | Bool | Char | Short | Int | Long | Float | Double | Signed | Unsigned
        )
    }

    /// Specifiers that may precede a type without changing it.
    pub fn is_decl_specifier(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Const | Volatile | Static | Extern | Inline | Constexpr | Virtual | Friend | Typename
        )
    }

    /// The binary operator this token spells, if any.
    pub fn binary_op(self) -> Option<BinaryOp> {
        use TokenKind::*;
        let op = match self {
            Comma => BinaryOp::Comma,
            Eq => BinaryOp::Assign,
            PlusEq => BinaryOp::AddAssign,
            MinusEq => BinaryOp::SubAssign,
            StarEq => BinaryOp::MulAssign,
            SlashEq => BinaryOp::DivAssign,
            PercentEq => BinaryOp::RemAssign,
            AmpEq => BinaryOp::AndAssign,
            PipeEq => BinaryOp::OrAssign,
            CaretEq => BinaryOp::XorAssign,
            ShlEq => BinaryOp::ShlAssign,
            ShrEq => BinaryOp::ShrAssign,
            PipePipe => BinaryOp::LogicalOr,
            AmpAmp => BinaryOp::LogicalAnd,
            Pipe => BinaryOp::BitOr,
            Caret => BinaryOp::BitXor,
            Amp => BinaryOp::BitAnd,
            EqEq => BinaryOp::Eq,
            BangEq => BinaryOp::Ne,
            Lt => BinaryOp::Lt,
            LtEq => BinaryOp::Le,
            Gt => BinaryOp::Gt,
            GtEq => BinaryOp::Ge,
            Shl => BinaryOp::Shl,
            Shr => BinaryOp::Shr,
            Plus => BinaryOp::Add,
            Minus => BinaryOp::Sub,
            Star => BinaryOp::Mul,
            Slash => BinaryOp::Div,
            Percent => BinaryOp::Rem,
            _ => return None,
        };
        Some(op)
    }
}

/// A token with its byte range in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        &source[self.range]
    }
}

/// Tokenize `text`, trivia included.
///
/// Unterminated block comments and literals are reported as
/// [`Unterminated`] so the anchor can tell that the cursor is inside one.
pub fn tokenize(text: &str) -> Vec<Lexed> {
    let mut lexer = TokenKind::lexer(text);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        let lexed = match result {
            Ok(kind) => Lexed::complete(kind, range),
            Err(()) => match text[span.clone()].chars().next() {
                // callbacks returning false surface as errors
                Some('"') => Lexed::unterminated(TokenKind::StringLiteral, range),
                Some('\'') => Lexed::unterminated(TokenKind::CharLiteral, range),
                Some('/') => Lexed::unterminated(TokenKind::BlockComment, range),
                _ => Lexed::complete(TokenKind::Error, range),
            },
        };
        tokens.push(lexed);
    }

    tokens
}

/// Whether a token was closed properly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unterminated {
    No,
    Yes,
}

/// A token straight out of the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lexed {
    pub token: Token,
    pub unterminated: Unterminated,
}

impl Lexed {
    fn complete(kind: TokenKind, range: TextRange) -> Self {
        Self {
            token: Token::new(kind, range),
            unterminated: Unterminated::No,
        }
    }

    fn unterminated(kind: TokenKind, range: TextRange) -> Self {
        Self {
            token: Token::new(kind, range),
            unterminated: Unterminated::Yes,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    pub fn is_unterminated(&self) -> bool {
        self.unterminated == Unterminated::Yes
    }
}
