//! Statements inside function bodies.

use crate::syntax::env::FrameKind;
use crate::syntax::lexer::TokenKind;

use super::{Halt, PResult, Parser};

impl Parser<'_> {
    /// Statements up to (not including) the closing `}` of a block.
    pub(super) fn block_items(&mut self) -> PResult<()> {
        loop {
            match self.current() {
                TokenKind::RBrace | TokenKind::Eof => return Ok(()),
                _ => self.statement_or_recover()?,
            }
        }
    }

    fn statement_or_recover(&mut self) -> PResult<()> {
        self.expected = None;
        let start = self.pos;
        match self.statement() {
            Ok(()) if self.pos == start => self.recover(),
            Err(Halt::Error) => self.recover(),
            other => other,
        }
    }

    fn statement(&mut self) -> PResult<()> {
        self.descend(Self::statement_kind)
    }

    fn statement_kind(&mut self) -> PResult<()> {
        match self.current() {
            TokenKind::LBrace => {
                self.pos += 1;
                self.env.push_frame(FrameKind::Block);
                let result = self.block_items();
                self.env.pop_frame();
                result?;
                self.close_brace()
            }
            TokenKind::Semi => {
                self.pos += 1;
                Ok(())
            }
            TokenKind::Return => {
                self.pos += 1;
                if !self.at(TokenKind::Semi) {
                    self.expression()?;
                }
                self.expect(TokenKind::Semi)?;
                Ok(())
            }
            TokenKind::If => {
                self.pos += 1;
                self.eat(TokenKind::Constexpr)?;
                self.condition()?;
                self.statement()?;
                if self.eat(TokenKind::Else)? {
                    self.statement()?;
                }
                Ok(())
            }
            TokenKind::While => {
                self.pos += 1;
                self.condition()?;
                self.statement()
            }
            TokenKind::Do => {
                self.pos += 1;
                self.statement()?;
                self.expect(TokenKind::While)?;
                self.condition()?;
                self.expect(TokenKind::Semi)?;
                Ok(())
            }
            TokenKind::For => {
                self.pos += 1;
                self.expect(TokenKind::LParen)?;
                self.env.push_frame(FrameKind::Block);
                let result = self.for_rest();
                self.env.pop_frame();
                result
            }
            TokenKind::Break | TokenKind::Continue => {
                self.pos += 1;
                self.expect(TokenKind::Semi)?;
                Ok(())
            }
            TokenKind::Using => self.using_declaration(),
            TokenKind::Namespace => self.namespace_definition(false),
            _ => self.declaration(),
        }
    }

    /// `( expression )`
    fn condition(&mut self) -> PResult<()> {
        self.expect(TokenKind::LParen)?;
        self.expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(())
    }

    /// Everything after `for (`.
    fn for_rest(&mut self) -> PResult<()> {
        if self.eat(TokenKind::Semi)? {
            // no init-statement
        } else if self.at_type_start() && !self.at_expression_start() {
            let spec = self.decl_specifiers()?;
            if self.init_declarators(spec, true)? {
                self.expression()?;
                self.expect(TokenKind::RParen)?;
                return self.statement();
            }
        } else {
            self.expression_statement()?;
        }

        if !self.at(TokenKind::Semi) {
            self.expression()?;
        }
        self.expect(TokenKind::Semi)?;
        if !self.at(TokenKind::RParen) {
            self.expression()?;
        }
        self.expect(TokenKind::RParen)?;
        self.statement()
    }
}

#[cfg(test)]
mod tests {
    use crate::hir::{OperatorClass, TypeDescriptor};
    use crate::syntax::parser::tests::site;

    #[test]
    fn test_loop_variables_are_visible() {
        let (_, site) = site("void f() { for (long i = 0; i < 10; ++i) { i + ^ } }");
        let shape = site.shape.unwrap();
        assert_eq!(shape.op.class(), OperatorClass::Additive);
        assert_eq!(shape.known_operand.to_string(), "long");
    }

    #[test]
    fn test_block_locals_go_out_of_scope() {
        let (_, site) = site("void f() { { double d; } d = ^ }");
        assert!(site.shape.unwrap().known_operand.is_unknown());
    }

    #[test]
    fn test_statements_before_cursor_are_skipped_over() {
        let code = "void f(int n) {
            if (n > 0) return; else { while (n) --n; }
            do { n++; } while (n < 3);
            n *= ^
        }";
        let (_, site) = site(code);
        let shape = site.shape.unwrap();
        assert_eq!(shape.known_operand, TypeDescriptor::INT);
    }
}
