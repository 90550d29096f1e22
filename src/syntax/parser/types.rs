//! Type specifiers, declarators and literal types.

use smol_str::SmolStr;

use crate::hir::{FloatWidth, IntWidth, RecordTag, TypeDescriptor};
use crate::syntax::env::{FrameKind, Symbol};
use crate::syntax::lexer::TokenKind;

use super::{Halt, PResult, Parser, QualifiedName};

/// A parsed decl-specifier-seq.
#[derive(Clone, Debug, Default)]
pub(super) struct DeclSpec {
    pub ty: TypeDescriptor,
    pub typedef: bool,
    /// Spelled `auto`; the initializer decides the type.
    pub auto: bool,
}

/// A declarator applied to a [`DeclSpec`].
#[derive(Clone, Debug)]
pub(super) struct Declarator {
    pub name: Option<QualifiedName>,
    pub ty: TypeDescriptor,
}

impl Parser<'_> {
    /// Whether the current token begins a decl-specifier-seq.
    pub(super) fn at_type_start(&self) -> bool {
        self.type_starts_at(0)
    }

    pub(super) fn type_starts_at(&self, n: usize) -> bool {
        match self.nth(n) {
            kind if kind.is_builtin_type() || kind.is_decl_specifier() => true,
            TokenKind::Typedef
            | TokenKind::Enum
            | TokenKind::Class
            | TokenKind::Struct
            | TokenKind::Union => true,
            TokenKind::Ident => self
                .lookup_simple(self.nth_text(n))
                .is_some_and(Symbol::is_type),
            _ => false,
        }
    }

    pub(super) fn decl_specifiers(&mut self) -> PResult<DeclSpec> {
        let mut spec = DeclSpec::default();
        let mut seen_type = false;
        loop {
            match self.current() {
                TokenKind::CodeCompletion => return Err(self.reach(None)),
                TokenKind::Typedef => {
                    self.pos += 1;
                    spec.typedef = true;
                }
                kind if kind.is_decl_specifier() => self.pos += 1,
                kind if kind.is_builtin_type() && !seen_type => {
                    (spec.ty, spec.auto) = self.builtin_type();
                    seen_type = true;
                }
                TokenKind::Enum if !seen_type => {
                    spec.ty = self.enum_specifier()?;
                    seen_type = true;
                }
                TokenKind::Class | TokenKind::Struct | TokenKind::Union if !seen_type => {
                    spec.ty = self.record_specifier()?;
                    seen_type = true;
                }
                TokenKind::Ident | TokenKind::ColonColon if !seen_type => {
                    let name = self.qualified_name()?;
                    self.skip_template_args()?;
                    spec.ty = match self.lookup(&name) {
                        Some(Symbol::Type(ty)) => ty.clone(),
                        _ => TypeDescriptor::Unknown,
                    };
                    seen_type = true;
                }
                _ => break,
            }
        }

        if seen_type { Ok(spec) } else { Err(Halt::Error) }
    }

    /// `unsigned long long int` and friends. Returns the type and whether it
    /// was `auto`.
    pub(super) fn builtin_type(&mut self) -> (TypeDescriptor, bool) {
        let mut signed = None;
        let mut longs = 0u8;
        let mut short = false;
        let mut base = None;

        loop {
            match self.current() {
                TokenKind::Signed => signed = Some(true),
                TokenKind::Unsigned => signed = Some(false),
                TokenKind::Long => longs += 1,
                TokenKind::Short => short = true,
                TokenKind::Const | TokenKind::Volatile => {}
                kind if kind.is_builtin_type() => base = Some(kind),
                _ => break,
            }
            self.pos += 1;
        }

        let signed = signed.unwrap_or(true);
        let ty = match base {
            Some(TokenKind::Auto) => return (TypeDescriptor::Unknown, true),
            Some(TokenKind::Void) => TypeDescriptor::Unknown,
            Some(TokenKind::Bool) => TypeDescriptor::Boolean,
            Some(TokenKind::Float) => TypeDescriptor::FloatingPoint(FloatWidth::Float),
            Some(TokenKind::Double) if longs > 0 => {
                TypeDescriptor::FloatingPoint(FloatWidth::LongDouble)
            }
            Some(TokenKind::Double) => TypeDescriptor::FloatingPoint(FloatWidth::Double),
            Some(TokenKind::Char) => TypeDescriptor::integral(IntWidth::Char, signed),
            _ => {
                let width = match (short, longs) {
                    (true, _) => IntWidth::Short,
                    (false, 0) => IntWidth::Int,
                    (false, 1) => IntWidth::Long,
                    (false, _) => IntWidth::LongLong,
                };
                TypeDescriptor::integral(width, signed)
            }
        };
        (ty, false)
    }

    /// `enum [class] [Name] [: type] [{ enumerators }]`
    fn enum_specifier(&mut self) -> PResult<TypeDescriptor> {
        self.expect(TokenKind::Enum)?;
        let scoped = matches!(self.current(), TokenKind::Class | TokenKind::Struct);
        if scoped {
            self.pos += 1;
        }

        let name = if self.at(TokenKind::Ident) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        let defines = matches!(self.current(), TokenKind::LBrace | TokenKind::Colon);

        let ty = match &name {
            Some(name) => self.named_type(name, defines, |qualified| {
                TypeDescriptor::enumeration(qualified, scoped)
            }),
            None => TypeDescriptor::enumeration("(anonymous)", scoped),
        };

        if self.eat(TokenKind::Colon)? {
            self.type_id()?;
        }
        if self.at(TokenKind::LBrace) {
            self.enumerators(&ty, scoped)?;
        }
        Ok(ty)
    }

    fn enumerators(&mut self, ty: &TypeDescriptor, scoped: bool) -> PResult<()> {
        self.expect(TokenKind::LBrace)?;
        loop {
            if self.eat(TokenKind::RBrace)? {
                return Ok(());
            }
            let name = self.expect_ident()?;
            // scoped enumerators are only reachable as `E::name`
            if !scoped {
                self.declare(name, Symbol::Value(ty.clone()));
            }
            if self.eat(TokenKind::Eq)? {
                self.nested(|p| p.assignment_expression())?;
            }
            if !self.eat(TokenKind::Comma)? {
                self.expect(TokenKind::RBrace)?;
                return Ok(());
            }
        }
    }

    /// `class|struct|union [Name] [final] [: bases] [{ members }]`
    fn record_specifier(&mut self) -> PResult<TypeDescriptor> {
        let tag = match self.bump()?.kind {
            TokenKind::Class => RecordTag::Class,
            TokenKind::Struct => RecordTag::Struct,
            _ => RecordTag::Union,
        };

        let name = if self.at(TokenKind::Ident) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        self.skip_template_args()?;
        let defines = matches!(
            self.current(),
            TokenKind::LBrace | TokenKind::Colon | TokenKind::Final
        );

        let ty = match &name {
            Some(name) => self.named_type(name, defines, |qualified| {
                TypeDescriptor::record(qualified, tag)
            }),
            None => TypeDescriptor::record("(anonymous)", tag),
        };

        self.eat(TokenKind::Final)?;
        if self.eat(TokenKind::Colon)? {
            while !self.at(TokenKind::LBrace) {
                if matches!(self.current(), TokenKind::Semi | TokenKind::Eof) {
                    return Err(Halt::Error);
                }
                self.bump()?;
            }
        }
        if self.at(TokenKind::LBrace) {
            self.record_body(ty.clone())?;
        }
        Ok(ty)
    }

    fn record_body(&mut self, ty: TypeDescriptor) -> PResult<()> {
        self.expect(TokenKind::LBrace)?;
        self.env.push_frame(FrameKind::Record(ty));
        let result = self.items_until_rbrace();
        self.env.pop_frame();
        result?;
        self.close_brace()
    }

    /// Reuse a visible type for an elaborated reference, otherwise declare a
    /// new one here.
    fn named_type(
        &mut self,
        name: &SmolStr,
        defines: bool,
        make: impl FnOnce(SmolStr) -> TypeDescriptor,
    ) -> TypeDescriptor {
        if !defines {
            if let Some(Symbol::Type(ty)) = self.lookup_simple(name) {
                return ty.clone();
            }
        }
        let ty = make(self.qualify(name));
        self.declare(name.clone(), Symbol::Type(ty.clone()));
        ty
    }

    /// Pointer operators, the declared name and array suffixes.
    pub(super) fn declarator(
        &mut self,
        base: TypeDescriptor,
        abstract_ok: bool,
    ) -> PResult<Declarator> {
        let mut ty = base;
        loop {
            match self.current() {
                TokenKind::CodeCompletion => return Err(self.reach(None)),
                TokenKind::Star => {
                    self.pos += 1;
                    ty = TypeDescriptor::pointer_to(ty);
                }
                // references and cv-qualifiers do not change what we track
                TokenKind::Amp | TokenKind::AmpAmp | TokenKind::Const | TokenKind::Volatile => {
                    self.pos += 1
                }
                _ => break,
            }
        }

        let name = match self.current() {
            TokenKind::Ident | TokenKind::ColonColon => Some(self.qualified_name()?),
            TokenKind::Operator => {
                self.pos += 1;
                if self.at(TokenKind::LParen) && self.nth(1) == TokenKind::RParen {
                    self.pos += 2;
                }
                while !self.at(TokenKind::LParen) {
                    if matches!(self.current(), TokenKind::Semi | TokenKind::Eof) {
                        return Err(Halt::Error);
                    }
                    self.bump()?;
                }
                Some(QualifiedName {
                    qualifier: None,
                    name: SmolStr::new_static("operator"),
                })
            }
            TokenKind::Tilde if self.nth(1) == TokenKind::Ident => {
                self.pos += 1;
                Some(self.qualified_name()?)
            }
            _ if abstract_ok => None,
            _ => return Err(Halt::Error),
        };

        // arrays decay
        while self.at(TokenKind::LBracket) {
            self.skip_balanced()?;
            ty = TypeDescriptor::pointer_to(ty);
        }
        Ok(Declarator { name, ty })
    }

    /// A type with an optional abstract declarator, as in `using T = int *;`.
    pub(super) fn type_id(&mut self) -> PResult<TypeDescriptor> {
        let spec = self.decl_specifiers()?;
        Ok(self.declarator(spec.ty, true)?.ty)
    }

    /// `template < ... >`
    pub(super) fn template_header(&mut self) -> PResult<()> {
        self.expect(TokenKind::Template)?;
        self.skip_template_args()
    }

    /// Skip `< ... >` if present. `>>` closes two levels.
    pub(super) fn skip_template_args(&mut self) -> PResult<()> {
        if !self.at(TokenKind::Lt) {
            return Ok(());
        }
        let mut depth = 0i32;
        loop {
            match self.current() {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => depth -= 1,
                TokenKind::Shr => depth -= 2,
                TokenKind::Semi | TokenKind::LBrace | TokenKind::Eof => return Err(Halt::Error),
                _ => {}
            }
            self.bump()?;
            if depth <= 0 {
                return Ok(());
            }
        }
    }
}

/// Type of a literal token; [`TypeDescriptor::Unknown`] for anything else.
pub(super) fn literal_type(kind: TokenKind, text: &str) -> TypeDescriptor {
    match kind {
        TokenKind::IntLiteral => {
            let suffix = text
                .trim_start_matches("0x")
                .trim_start_matches("0X")
                .trim_start_matches(|c: char| c.is_ascii_hexdigit() || c == '\'');
            let signed = !suffix.contains(['u', 'U']);
            let width = match suffix.chars().filter(|c| matches!(c, 'l' | 'L')).count() {
                0 => IntWidth::Int,
                1 => IntWidth::Long,
                _ => IntWidth::LongLong,
            };
            TypeDescriptor::integral(width, signed)
        }
        TokenKind::FloatLiteral => match text.chars().last() {
            Some('f' | 'F') => TypeDescriptor::FloatingPoint(FloatWidth::Float),
            Some('l' | 'L') => TypeDescriptor::FloatingPoint(FloatWidth::LongDouble),
            _ => TypeDescriptor::FloatingPoint(FloatWidth::Double),
        },
        TokenKind::CharLiteral => TypeDescriptor::integral(IntWidth::Char, true),
        TokenKind::StringLiteral => {
            TypeDescriptor::pointer_to(TypeDescriptor::integral(IntWidth::Char, true))
        }
        TokenKind::True | TokenKind::False => TypeDescriptor::Boolean,
        _ => TypeDescriptor::Unknown,
    }
}
