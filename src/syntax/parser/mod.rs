//! Recovering recursive-descent parser for the C++ subset completion needs.
//!
//! The parser reads a token stream that contains exactly one
//! [`TokenKind::CodeCompletion`] token and stops there, recording a
//! [`CompletionSite`]. On the way it builds the [`ScopeTree`] and keeps a
//! symbol [`Environment`] so operands next to the cursor can be typed.
//!
//! Errors never escape: a malformed declaration or statement is skipped up to
//! the next `;` or closing `}` and parsing carries on.
//!
//! ```text
//! namespace ns { int x; void f() { x += ^ } }
//!                                      |
//!                      CompletionSite { scope: ns, shape: (int) += ^ }
//! ```

mod expr;
mod items;
mod stmt;
mod types;

use smol_str::SmolStr;
use tracing::trace;

use crate::hir::{
    CursorSide, DataModel, ExpressionShape, QualifierPath, ScopeId, ScopeTree, TypeDescriptor,
};

use super::env::{Environment, FrameKind, Symbol};
use super::lexer::{Token, TokenKind};

/// Parser outcome for internal control flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Halt {
    /// The completion token was reached and the site recorded.
    Reached,
    /// Syntax error; the nearest statement or declaration recovers.
    Error,
}

pub(crate) type PResult<T> = Result<T, Halt>;

/// Deepest nesting of expressions, statements and namespace items the parser
/// follows. Anything deeper is a syntax error and is recovered like one.
pub(crate) const MAX_NESTING: u32 = 128;

/// The syntactic construct immediately around the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Construct {
    /// Directly inside a namespace or at file scope.
    Namespace,
    /// Inside a class body.
    Record,
    /// Inside a function parameter list.
    Parameters,
    /// Inside a function body.
    Block,
}

/// Where the completion token sits, as far as the resolvers care.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionSite {
    /// Innermost enclosing namespace.
    pub scope: ScopeId,
    /// Qualifier written directly before the cursor (`a::b::^`).
    pub qualifier: Option<QualifierPath>,
    /// Binary or assignment expression the cursor is an operand of.
    pub shape: Option<ExpressionShape>,
    pub construct: Construct,
}

/// Scope tree of the parsed prefix plus the completion site, if reached.
#[derive(Clone, Debug)]
pub struct ParsedUnit {
    pub tree: ScopeTree,
    pub site: Option<CompletionSite>,
}

/// Parse `tokens` (which index into `text`) until the completion token.
///
/// `tokens` must not contain trivia.
pub fn parse_completion(text: &str, tokens: Vec<Token>, model: DataModel) -> ParsedUnit {
    let mut parser = Parser::new(text, tokens, model);
    if let Err(Halt::Error) = parser.translation_unit() {
        trace!(pos = parser.pos, "parse ended on an unrecovered error");
    }
    ParsedUnit {
        tree: parser.tree,
        site: parser.site,
    }
}

/// A `[::] a :: b :: name` id-expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct QualifiedName {
    pub qualifier: Option<QualifierPath>,
    pub name: SmolStr,
}

impl QualifiedName {
    /// The whole name as a qualifier path (`a::b::name`).
    pub fn into_path(self) -> QualifierPath {
        let mut path = self.qualifier.unwrap_or_default();
        path.segments.push(self.name);
        path
    }
}

pub(crate) struct Parser<'t> {
    text: &'t str,
    tokens: Vec<Token>,
    pos: usize,
    model: DataModel,
    tree: ScopeTree,
    env: Environment,
    /// Innermost enclosing namespace.
    scope: ScopeId,
    /// Shape applying to the operand being parsed.
    expected: Option<ExpressionShape>,
    in_params: bool,
    /// Current nesting, bounded by [`MAX_NESTING`].
    depth: u32,
    site: Option<CompletionSite>,
}

impl<'t> Parser<'t> {
    fn new(text: &'t str, tokens: Vec<Token>, model: DataModel) -> Self {
        let tree = ScopeTree::new();
        let scope = tree.root();
        Self {
            text,
            tokens,
            pos: 0,
            model,
            tree,
            env: Environment::new(),
            scope,
            expected: None,
            in_params: false,
            depth: 0,
            site: None,
        }
    }

    fn translation_unit(&mut self) -> PResult<()> {
        loop {
            match self.current() {
                TokenKind::Eof => return Ok(()),
                // stray closer at file scope
                TokenKind::RBrace => self.pos += 1,
                _ => self.declaration_or_recover()?,
            }
        }
    }

    // ------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------

    fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    fn current(&self) -> TokenKind {
        self.nth(0)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    fn nth_text(&self, n: usize) -> &'t str {
        let text = self.text;
        self.tokens
            .get(self.pos + n)
            .map_or("", |token| token.text(text))
    }

    /// Consume the current token. Halts on the completion token and at the end
    /// of input.
    fn bump(&mut self) -> PResult<Token> {
        match self.current() {
            TokenKind::CodeCompletion => Err(self.reach(None)),
            TokenKind::Eof => Err(Halt::Error),
            _ => {
                let token = self.tokens[self.pos];
                self.pos += 1;
                Ok(token)
            }
        }
    }

    /// Consume the current token if it is `kind`.
    fn eat(&mut self, kind: TokenKind) -> PResult<bool> {
        if self.at(TokenKind::CodeCompletion) {
            return Err(self.reach(None));
        }
        if self.at(kind) {
            self.pos += 1;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.at(kind) {
            return self.bump();
        }
        if self.at(TokenKind::CodeCompletion) {
            return Err(self.reach(None));
        }
        trace!(expected = ?kind, found = ?self.current(), pos = self.pos, "unexpected token");
        Err(Halt::Error)
    }

    fn expect_ident(&mut self) -> PResult<SmolStr> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(SmolStr::new(token.text(self.text)))
    }

    // ------------------------------------------------------------------
    // Completion site
    // ------------------------------------------------------------------

    /// Record the site with the current expected shape.
    fn reach(&mut self, qualifier: Option<QualifierPath>) -> Halt {
        let shape = self.expected.clone();
        self.record_site(qualifier, shape)
    }

    /// Record the site for a cursor standing where an operand belongs.
    ///
    /// Without an enclosing operator, a binary operator right after the
    /// cursor makes it the left operand of that operator.
    fn reach_operand(&mut self) -> Halt {
        let shape = match self.expected.clone() {
            Some(shape) => Some(shape),
            None => self.left_operand_shape(),
        };
        self.record_site(None, shape)
    }

    fn left_operand_shape(&self) -> Option<ExpressionShape> {
        let op = self.nth(1).binary_op()?;
        let known = self.token_type(2);
        Some(ExpressionShape::new(op, known, CursorSide::Left))
    }

    fn record_site(&mut self, qualifier: Option<QualifierPath>, shape: Option<ExpressionShape>) -> Halt {
        if self.site.is_none() {
            let construct = self.construct();
            trace!(scope = ?self.scope, ?construct, "reached completion point");
            self.site = Some(CompletionSite {
                scope: self.scope,
                qualifier,
                shape,
                construct,
            });
        }
        Halt::Reached
    }

    fn construct(&self) -> Construct {
        if self.in_params {
            return Construct::Parameters;
        }
        match self.env.innermost() {
            None => Construct::Namespace,
            Some(FrameKind::Record(_)) => Construct::Record,
            Some(FrameKind::Function | FrameKind::Block) => Construct::Block,
        }
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Parse one declaration (or statement-like tolerance at namespace scope),
    /// skipping to a synchronisation point on error.
    fn declaration_or_recover(&mut self) -> PResult<()> {
        self.expected = None;
        let start = self.pos;
        match self.namespace_item() {
            Ok(()) if self.pos == start => self.recover(),
            Err(Halt::Error) => self.recover(),
            other => other,
        }
    }

    /// Skip to just after the next `;`, just after a balanced `{ ... }`, or to
    /// an unbalanced `}`.
    fn recover(&mut self) -> PResult<()> {
        self.expected = None;
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.current() {
                TokenKind::CodeCompletion => return Err(self.reach(None)),
                TokenKind::Eof => break,
                TokenKind::Semi if depth == 0 => {
                    self.pos += 1;
                    break;
                }
                TokenKind::RBrace if depth == 0 => break,
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        break;
                    }
                }
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.pos += 1;
        }
        trace!(from = start, to = self.pos, "recovered");
        Ok(())
    }

    /// Skip a balanced bracketed group starting at the current opener.
    fn skip_balanced(&mut self) -> PResult<()> {
        let mut depth = 0usize;
        loop {
            match self.current() {
                TokenKind::CodeCompletion => return Err(self.reach(None)),
                TokenKind::Eof => return Err(Halt::Error),
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    // ------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------

    /// Parse `[::] a :: b :: name`. The cursor right after a `::` records a
    /// qualified site.
    fn qualified_name(&mut self) -> PResult<QualifiedName> {
        let mut global = false;
        let mut segments = Vec::new();
        if self.at(TokenKind::ColonColon) {
            self.pos += 1;
            global = true;
        }
        loop {
            let qualifier = (global || !segments.is_empty())
                .then(|| QualifierPath::new(global, segments.clone()));
            if self.at(TokenKind::CodeCompletion) {
                return Err(self.reach(qualifier));
            }
            let name = self.expect_ident()?;
            if self.at(TokenKind::ColonColon) {
                self.pos += 1;
                segments.push(name);
                continue;
            }
            return Ok(QualifiedName { qualifier, name });
        }
    }

    fn lookup(&self, name: &QualifiedName) -> Option<&Symbol> {
        match &name.qualifier {
            None => self.env.lookup(&self.tree, self.scope, &name.name),
            Some(qualifier) => {
                self.env
                    .lookup_qualified(&self.tree, self.scope, qualifier, &name.name)
            }
        }
    }

    fn lookup_simple(&self, name: &str) -> Option<&Symbol> {
        self.env.lookup(&self.tree, self.scope, name)
    }

    fn declare(&mut self, name: impl Into<SmolStr>, symbol: Symbol) {
        self.env.declare(self.scope, name, symbol);
    }

    /// Fully qualified spelling for a type declared here.
    fn qualify(&self, name: &str) -> SmolStr {
        for kind in self.env.frame_kinds() {
            match kind {
                FrameKind::Record(TypeDescriptor::Record { name: outer, .. }) => {
                    return SmolStr::from(format!("{outer}::{name}"));
                }
                FrameKind::Record(_) => continue,
                FrameKind::Function | FrameKind::Block => return SmolStr::new(name),
            }
        }
        if self.scope == self.tree.root() {
            SmolStr::new(name)
        } else {
            SmolStr::from(format!("{}::{name}", self.tree.display_name(self.scope)))
        }
    }

    /// Type of the single-token operand `n` tokens ahead, without consuming.
    fn token_type(&self, n: usize) -> TypeDescriptor {
        match self.nth(n) {
            TokenKind::Ident => match self.lookup_simple(self.nth_text(n)) {
                Some(Symbol::Value(ty) | Symbol::Function(ty)) => ty.clone(),
                _ => TypeDescriptor::Unknown,
            },
            kind => types::literal_type(kind, self.nth_text(n)),
        }
    }

    /// Run `f` one nesting level deeper. Past [`MAX_NESTING`] this fails
    /// without consuming anything.
    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_NESTING {
            trace!(pos = self.pos, depth = self.depth, "nesting limit reached");
            return Err(Halt::Error);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run `f` with no enclosing operand shape, restoring it afterwards.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = self.expected.take();
        let result = f(self);
        self.expected = saved;
        result
    }
}
