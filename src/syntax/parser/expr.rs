//! Expressions, parsed by precedence climbing.
//!
//! Every operand is typed as it is parsed so that the operand to the left of
//! the cursor is known when the completion token is reached. While the right
//! operand of a binary operator is parsed, `expected` holds the
//! [`ExpressionShape`] for it; parentheses pass it through, while unary
//! operands, call arguments and subscripts start afresh.

use crate::hir::{BinaryOp, ExpressionShape, IntWidth, TypeDescriptor};
use crate::syntax::env::{FrameKind, Symbol};
use crate::syntax::lexer::TokenKind;

use super::types::literal_type;
use super::{Halt, PResult, Parser};

/// A typed primary expression.
struct Operand {
    ty: TypeDescriptor,
    /// Names a function or type, so a call yields `ty`.
    callable: bool,
}

impl Operand {
    fn value(ty: TypeDescriptor) -> Self {
        Self { ty, callable: false }
    }

    fn callable(ty: TypeDescriptor) -> Self {
        Self { ty, callable: true }
    }
}

impl Parser<'_> {
    /// A full expression, comma operator included.
    pub(super) fn expression(&mut self) -> PResult<TypeDescriptor> {
        self.binary(BinaryOp::Comma.precedence())
    }

    /// An expression without a top-level comma.
    pub(super) fn assignment_expression(&mut self) -> PResult<TypeDescriptor> {
        self.binary(BinaryOp::Assign.precedence())
    }

    fn binary(&mut self, min_precedence: u8) -> PResult<TypeDescriptor> {
        self.descend(|p| p.binary_operands(min_precedence))
    }

    fn binary_operands(&mut self, min_precedence: u8) -> PResult<TypeDescriptor> {
        let mut lhs = self.unary()?;
        loop {
            if self.at(TokenKind::Question) && min_precedence <= BinaryOp::Assign.precedence() {
                lhs = self.conditional()?;
                continue;
            }

            let Some(op) = self.current().binary_op() else {
                break;
            };
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.pos += 1;

            let next = if op.is_right_associative() {
                precedence
            } else {
                precedence + 1
            };
            let saved = self
                .expected
                .replace(ExpressionShape::right_of(op, lhs.clone()));
            let rhs = self.binary(next);
            self.expected = saved;
            lhs = op.result_type(&lhs, &rhs?, self.model);
        }
        Ok(lhs)
    }

    /// `? then : else` after the condition.
    fn conditional(&mut self) -> PResult<TypeDescriptor> {
        self.expect(TokenKind::Question)?;
        let then = self.expression()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.assignment_expression()?;
        Ok(if then.is_unknown() { otherwise } else { then })
    }

    fn unary(&mut self) -> PResult<TypeDescriptor> {
        match self.current() {
            TokenKind::CodeCompletion => Err(self.reach_operand()),
            TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus => {
                self.pos += 1;
                self.prefix_operand()
            }
            TokenKind::Bang => {
                self.pos += 1;
                self.prefix_operand()?;
                Ok(TypeDescriptor::Boolean)
            }
            TokenKind::Star => {
                self.pos += 1;
                Ok(self.prefix_operand()?.pointee())
            }
            TokenKind::Amp => {
                self.pos += 1;
                let operand = self.prefix_operand()?;
                Ok(TypeDescriptor::pointer_to(operand))
            }
            TokenKind::Sizeof => {
                self.pos += 1;
                if self.at(TokenKind::LParen) && self.type_starts_at(1) {
                    self.skip_balanced()?;
                } else {
                    self.prefix_operand()?;
                }
                // size_t
                Ok(TypeDescriptor::integral(IntWidth::Long, false))
            }
            _ => self.postfix(),
        }
    }

    /// Operand of a prefix operator or cast, one nesting level down.
    fn prefix_operand(&mut self) -> PResult<TypeDescriptor> {
        self.descend(|p| p.nested(|p| p.unary()))
    }

    fn postfix(&mut self) -> PResult<TypeDescriptor> {
        let mut operand = self.primary()?;
        loop {
            match self.current() {
                TokenKind::LParen => {
                    self.pos += 1;
                    self.nested(|p| p.arguments())?;
                    let ty = if operand.callable {
                        operand.ty
                    } else {
                        TypeDescriptor::Unknown
                    };
                    operand = Operand::value(ty);
                }
                TokenKind::LBracket => {
                    self.pos += 1;
                    self.nested(|p| p.expression())?;
                    self.expect(TokenKind::RBracket)?;
                    operand = Operand::value(operand.ty.pointee());
                }
                TokenKind::Dot | TokenKind::Arrow => {
                    self.pos += 1;
                    self.eat(TokenKind::Tilde)?;
                    self.expect_ident()?;
                    // members are not tracked
                    operand = Operand::callable(TypeDescriptor::Unknown);
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => self.pos += 1,
                _ => break,
            }
        }
        Ok(operand.ty)
    }

    /// Call arguments after the `(`, through the `)`.
    fn arguments(&mut self) -> PResult<()> {
        if self.eat(TokenKind::RParen)? {
            return Ok(());
        }
        loop {
            self.assignment_expression()?;
            if !self.eat(TokenKind::Comma)? {
                self.expect(TokenKind::RParen)?;
                return Ok(());
            }
        }
    }

    fn primary(&mut self) -> PResult<Operand> {
        let kind = self.current();
        match kind {
            TokenKind::CodeCompletion => Err(self.reach_operand()),
            TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::CharLiteral
            | TokenKind::True
            | TokenKind::False => {
                let ty = literal_type(kind, self.nth_text(0));
                self.pos += 1;
                Ok(Operand::value(ty))
            }
            TokenKind::StringLiteral => {
                // adjacent literals concatenate
                while self.at(TokenKind::StringLiteral) {
                    self.pos += 1;
                }
                Ok(Operand::value(literal_type(kind, "")))
            }
            TokenKind::Nullptr => {
                self.pos += 1;
                Ok(Operand::value(TypeDescriptor::Unknown))
            }
            TokenKind::This => {
                self.pos += 1;
                let record = self.env.frame_kinds().find_map(|kind| match kind {
                    FrameKind::Record(ty) => Some(ty.clone()),
                    FrameKind::Function | FrameKind::Block => None,
                });
                Ok(Operand::value(
                    record.map_or(TypeDescriptor::Unknown, TypeDescriptor::pointer_to),
                ))
            }
            TokenKind::LParen => self.parenthesized(),
            TokenKind::LBrace => {
                self.skip_balanced()?;
                Ok(Operand::value(TypeDescriptor::Unknown))
            }
            TokenKind::Ident | TokenKind::ColonColon => {
                let name = self.qualified_name()?;
                Ok(match self.lookup(&name) {
                    Some(Symbol::Value(ty)) => Operand::value(ty.clone()),
                    Some(Symbol::Function(ty) | Symbol::Type(ty)) => Operand::callable(ty.clone()),
                    None => Operand::callable(TypeDescriptor::Unknown),
                })
            }
            kind if kind.is_builtin_type() => {
                // functional cast: `int(x)`, `long{x}`
                let (ty, _) = self.builtin_type();
                Ok(Operand::callable(ty))
            }
            _ => Err(Halt::Error),
        }
    }

    /// `( expression )` or a C-style cast `( type ) operand`.
    fn parenthesized(&mut self) -> PResult<Operand> {
        self.expect(TokenKind::LParen)?;
        if self.at_type_start() && !self.at_expression_start() {
            let ty = self.nested(|p| p.type_id())?;
            self.expect(TokenKind::RParen)?;
            self.prefix_operand()?;
            return Ok(Operand::value(ty));
        }

        let ty = self.expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(Operand::value(ty))
    }
}
