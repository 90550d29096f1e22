//! Namespace-level items: namespaces, using declarations and declarations.

use tracing::trace;

use crate::hir::{BinaryOp, ExpressionShape, QualifierPath, Resolver, ScopeId, TypeDescriptor};
use crate::syntax::env::{FrameKind, Symbol};
use crate::syntax::lexer::TokenKind;

use super::types::DeclSpec;
use super::{Halt, MAX_NESTING, PResult, Parser, QualifiedName};

impl Parser<'_> {
    pub(super) fn namespace_item(&mut self) -> PResult<()> {
        self.descend(Self::item)
    }

    fn item(&mut self) -> PResult<()> {
        match self.current() {
            TokenKind::Semi => {
                self.pos += 1;
                Ok(())
            }
            TokenKind::Namespace => self.namespace_definition(false),
            TokenKind::Inline if self.nth(1) == TokenKind::Namespace => {
                self.pos += 1;
                self.namespace_definition(true)
            }
            TokenKind::Using => self.using_declaration(),
            TokenKind::Template => {
                self.template_header()?;
                self.namespace_item()
            }
            TokenKind::Extern if self.nth(1) == TokenKind::StringLiteral => {
                self.linkage_specification()
            }
            TokenKind::Public | TokenKind::Protected | TokenKind::Private => {
                self.pos += 1;
                self.expect(TokenKind::Colon)?;
                Ok(())
            }
            _ => self.declaration(),
        }
    }

    /// Items up to (not including) the closing `}` of the current body.
    pub(super) fn items_until_rbrace(&mut self) -> PResult<()> {
        loop {
            match self.current() {
                TokenKind::RBrace | TokenKind::Eof => return Ok(()),
                _ => self.declaration_or_recover()?,
            }
        }
    }

    /// The `}` of a body; a body left open at the end of input is accepted.
    pub(super) fn close_brace(&mut self) -> PResult<()> {
        if self.at(TokenKind::Eof) {
            return Ok(());
        }
        self.expect(TokenKind::RBrace)?;
        Ok(())
    }

    /// `namespace [a::b] { ... }`, `namespace { ... }` or `namespace a = b;`.
    pub(super) fn namespace_definition(&mut self, inline: bool) -> PResult<()> {
        self.expect(TokenKind::Namespace)?;
        if self.at(TokenKind::LBrace) {
            let id = self.tree.open_anonymous(self.scope);
            return self.namespace_body(id);
        }

        let name = self.expect_ident()?;
        if self.eat(TokenKind::Eq)? {
            let target = self.qualified_name()?;
            self.expect(TokenKind::Semi)?;
            match self.resolve_namespace(target) {
                Some(target) => self.tree.add_alias(self.scope, &name, target),
                None => trace!(alias = %name, "alias target is not a namespace"),
            }
            return Ok(());
        }

        let mut id = self.tree.open_namespace(self.scope, &name, inline);
        let mut segments = 1;
        while self.eat(TokenKind::ColonColon)? {
            segments += 1;
            if segments > MAX_NESTING {
                trace!(segments, "nested namespace name too long");
                return Err(Halt::Error);
            }
            let inline = self.eat(TokenKind::Inline)?;
            let name = self.expect_ident()?;
            id = self.tree.open_namespace(id, &name, inline);
        }
        self.namespace_body(id)
    }

    fn namespace_body(&mut self, id: ScopeId) -> PResult<()> {
        self.expect(TokenKind::LBrace)?;
        let saved = self.scope;
        self.scope = id;
        let result = self.items_until_rbrace();
        self.scope = saved;
        result?;
        self.close_brace()
    }

    /// `extern "C" { ... }` or `extern "C" declaration`
    fn linkage_specification(&mut self) -> PResult<()> {
        self.pos += 2;
        if self.eat(TokenKind::LBrace)? {
            self.items_until_rbrace()?;
            return self.close_brace();
        }
        self.namespace_item()
    }

    /// `using namespace N;`, `using T = type;` or `using a::b;`
    pub(super) fn using_declaration(&mut self) -> PResult<()> {
        self.expect(TokenKind::Using)?;

        if self.eat(TokenKind::Namespace)? {
            let target = self.qualified_name()?;
            self.expect(TokenKind::Semi)?;
            match self.resolve_namespace(target) {
                Some(target) if self.env.innermost().is_none() => {
                    self.tree.add_using_directive(self.scope, target);
                }
                Some(_) => trace!("using directive in a local scope is not tracked"),
                None => trace!("using directive names no namespace"),
            }
            return Ok(());
        }

        if self.at(TokenKind::Ident) && self.nth(1) == TokenKind::Eq {
            let name = self.expect_ident()?;
            self.pos += 1;
            let ty = self.type_id()?;
            self.expect(TokenKind::Semi)?;
            self.declare(name, Symbol::Type(ty));
            return Ok(());
        }

        self.eat(TokenKind::Typename)?;
        let target = self.qualified_name()?;
        self.expect(TokenKind::Semi)?;
        if let Some(symbol) = self.lookup(&target).cloned() {
            self.declare(target.name, symbol);
        }
        Ok(())
    }

    fn resolve_namespace(&self, name: QualifiedName) -> Option<ScopeId> {
        Resolver::new(&self.tree)
            .with_scope(self.scope)
            .resolve(&name.into_path())
            .found()
    }

    /// A declaration, or an expression statement when the tokens read as one.
    ///
    /// Expression statements are accepted at namespace scope too, so snippets
    /// like `int x; x += 1;` work without a surrounding function.
    pub(super) fn declaration(&mut self) -> PResult<()> {
        if self.at_expression_start() {
            return self.expression_statement();
        }

        if self.at(TokenKind::Tilde) && self.nth(1) == TokenKind::Ident {
            self.pos += 2;
            return self.function_rest(None, TypeDescriptor::Unknown).map(drop);
        }

        let spec = self.decl_specifiers()?;
        if self.eat(TokenKind::Semi)? {
            return Ok(());
        }
        if self.at(TokenKind::LParen) && spec.ty.is_record() {
            // constructor
            return self.function_rest(None, TypeDescriptor::Unknown).map(drop);
        }
        self.init_declarators(spec, false).map(drop)
    }

    /// Whether the upcoming tokens form an expression rather than a
    /// declaration.
    pub(super) fn at_expression_start(&self) -> bool {
        match self.current() {
            TokenKind::Ident | TokenKind::ColonColon => {
                let Some((name, len)) = self.peek_qualified_name() else {
                    return false;
                };
                match self.lookup(&name) {
                    Some(Symbol::Value(_) | Symbol::Function(_)) => true,
                    Some(Symbol::Type(_)) => false,
                    None => !matches!(
                        self.nth(len),
                        TokenKind::Ident
                            | TokenKind::Star
                            | TokenKind::Amp
                            | TokenKind::AmpAmp
                            | TokenKind::Lt
                            | TokenKind::Tilde
                            | TokenKind::CodeCompletion
                    ),
                }
            }
            TokenKind::CodeCompletion => self.nth(1).binary_op().is_some(),
            TokenKind::Tilde => !matches!(self.env.innermost(), Some(FrameKind::Record(_))),
            kind if kind.is_literal() => true,
            TokenKind::LParen
            | TokenKind::Bang
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::Star
            | TokenKind::Amp
            | TokenKind::This
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nullptr
            | TokenKind::Sizeof => true,
            _ => false,
        }
    }

    /// Look ahead over `[::] a :: b :: name` without consuming it. Returns the
    /// name and its length in tokens.
    fn peek_qualified_name(&self) -> Option<(QualifiedName, usize)> {
        let global = self.at(TokenKind::ColonColon);
        let mut n = usize::from(global);
        let mut segments = Vec::new();
        loop {
            if self.nth(n) != TokenKind::Ident {
                return None;
            }
            let name = self.nth_text(n).into();
            n += 1;
            if self.nth(n) == TokenKind::ColonColon {
                segments.push(name);
                n += 1;
                continue;
            }
            let qualifier =
                (global || !segments.is_empty()).then(|| QualifierPath::new(global, segments));
            return Some((QualifiedName { qualifier, name }, n));
        }
    }

    pub(super) fn expression_statement(&mut self) -> PResult<()> {
        self.expression()?;
        self.expect(TokenKind::Semi)?;
        Ok(())
    }

    /// Declarators after a decl-specifier-seq, through the final `;`.
    ///
    /// With `for_range` set, stops after the `:` of a range-based `for` and
    /// returns `true`.
    pub(super) fn init_declarators(&mut self, spec: DeclSpec, for_range: bool) -> PResult<bool> {
        loop {
            let declarator = self.declarator(spec.ty.clone(), false)?;
            let Some(name) = declarator.name else {
                return Err(Halt::Error);
            };

            if self.at(TokenKind::LParen) {
                if self.function_rest(Some(&name), declarator.ty)? {
                    return Ok(false);
                }
            } else if spec.typedef {
                self.declare(name.name, Symbol::Type(declarator.ty));
            } else if for_range && self.at(TokenKind::Colon) {
                self.pos += 1;
                let ty = if spec.auto {
                    TypeDescriptor::Unknown
                } else {
                    declarator.ty
                };
                self.declare(name.name, Symbol::Value(ty));
                return Ok(true);
            } else {
                self.variable_rest(name, declarator.ty, spec.auto)?;
            }

            if !self.eat(TokenKind::Comma)? {
                self.expect(TokenKind::Semi)?;
                return Ok(false);
            }
        }
    }

    /// Bit-field width and initializer of a variable.
    fn variable_rest(&mut self, name: QualifiedName, ty: TypeDescriptor, auto: bool) -> PResult<()> {
        let name = name.name;
        if !auto {
            self.declare(name.clone(), Symbol::Value(ty.clone()));
        }

        if self.eat(TokenKind::Colon)? {
            self.nested(|p| p.assignment_expression())?;
        }

        let mut deduced = TypeDescriptor::Unknown;
        if self.eat(TokenKind::Eq)? {
            if self.at(TokenKind::LBrace) {
                self.skip_balanced()?;
            } else {
                // `T v = ^` prefers `T`, like an assignment
                let shape = (!auto).then(|| ExpressionShape::right_of(BinaryOp::Assign, ty));
                let saved = std::mem::replace(&mut self.expected, shape);
                let init = self.assignment_expression();
                self.expected = saved;
                deduced = init?;
            }
        } else if self.at(TokenKind::LBrace) {
            self.skip_balanced()?;
        }

        if auto {
            self.declare(name, Symbol::Value(deduced));
        }
        Ok(())
    }

    /// Parameters, trailing specifiers and the optional body of a function.
    /// Returns whether a body was parsed.
    ///
    /// An out-of-line definition `ns::f() { ... }` is parsed in `ns`.
    pub(super) fn function_rest(
        &mut self,
        name: Option<&QualifiedName>,
        ret: TypeDescriptor,
    ) -> PResult<bool> {
        let mut scope = self.scope;
        if let Some(name) = name {
            self.declare(name.name.clone(), Symbol::Function(ret));
            if let Some(qualifier) = &name.qualifier {
                let resolved = Resolver::new(&self.tree)
                    .with_scope(self.scope)
                    .resolve(qualifier)
                    .found();
                scope = resolved.unwrap_or(scope);
            }
        }

        let saved = std::mem::replace(&mut self.scope, scope);
        self.env.push_frame(FrameKind::Function);
        let result = self.function_tail();
        self.env.pop_frame();
        self.scope = saved;
        result
    }

    fn function_tail(&mut self) -> PResult<bool> {
        self.parameters()?;

        loop {
            match self.current() {
                TokenKind::Const
                | TokenKind::Volatile
                | TokenKind::Noexcept
                | TokenKind::Override
                | TokenKind::Final
                | TokenKind::Amp
                | TokenKind::AmpAmp => self.pos += 1,
                TokenKind::Arrow => {
                    self.pos += 1;
                    self.type_id()?;
                }
                _ => break,
            }
        }

        if self.eat(TokenKind::Colon)? {
            self.member_initializers()?;
        }

        if self.eat(TokenKind::LBrace)? {
            self.block_items()?;
            self.close_brace()?;
            return Ok(true);
        }
        // `= 0`, `= default`, `= delete`
        if self.eat(TokenKind::Eq)? {
            self.bump()?;
        }
        Ok(false)
    }

    fn parameters(&mut self) -> PResult<()> {
        self.expect(TokenKind::LParen)?;
        let saved = std::mem::replace(&mut self.in_params, true);
        let result = self.parameter_list();
        self.in_params = saved;
        result
    }

    fn parameter_list(&mut self) -> PResult<()> {
        loop {
            if self.eat(TokenKind::RParen)? {
                return Ok(());
            }
            if self.at(TokenKind::Dot) {
                // `...`
                while self.eat(TokenKind::Dot)? {}
                continue;
            }

            let spec = self.decl_specifiers()?;
            let declarator = self.declarator(spec.ty, true)?;
            if self.at(TokenKind::LParen) {
                self.skip_balanced()?;
            }
            if let Some(name) = declarator.name {
                self.declare(name.name, Symbol::Value(declarator.ty.clone()));
            }
            if self.eat(TokenKind::Eq)? {
                let shape = ExpressionShape::right_of(BinaryOp::Assign, declarator.ty);
                let saved = self.expected.replace(shape);
                let default = self.assignment_expression();
                self.expected = saved;
                default?;
            }

            if !self.eat(TokenKind::Comma)? {
                self.expect(TokenKind::RParen)?;
                return Ok(());
            }
        }
    }

    /// `: a(1), b{2}` before a constructor body.
    fn member_initializers(&mut self) -> PResult<()> {
        loop {
            self.qualified_name()?;
            self.skip_template_args()?;
            match self.current() {
                TokenKind::LParen | TokenKind::LBrace => self.skip_balanced()?,
                TokenKind::CodeCompletion => return Err(self.reach(None)),
                _ => return Err(Halt::Error),
            }
            if !self.eat(TokenKind::Comma)? {
                return Ok(());
            }
        }
    }
}
