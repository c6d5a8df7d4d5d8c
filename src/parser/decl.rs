use super::{trace_rule, ParseError, ParseErrorType, ParseResult, Parser};
use crate::codegen::{CodeGen, Slot};
use crate::lexer::token::TokenType;
use crate::symbols::r#type::Type;

impl<'a, G: CodeGen + ?Sized> Parser<'a, G> {
    pub(super) fn top_declarations(&mut self) -> ParseResult<()> {
        trace_rule!(self, "top_declarations");
        while *self.peek_token_type() == TokenType::KDim {
            self.allocation()?;
            while *self.peek_token_type() == TokenType::Comma {
                self.allocation()?;
            }
            self.semi()?;
        }
        Ok(())
    }

    /// One global, introduced by the `dim` or `,` under the cursor.
    fn allocation(&mut self) -> ParseResult<()> {
        trace_rule!(self, "allocation");
        self.advance()?;
        let (name, token) = self.consume_identifier("variable name")?;
        let ty = self.type_suffix()?;
        self.ctx
            .declare(&name, ty)
            .map_err(|e| ParseError::new(token, e))?;
        let initial = self.initializer()?;
        self.gen.allocate(&name, ty, initial);
        Ok(())
    }

    fn type_suffix(&mut self) -> ParseResult<Type> {
        let ty = match self.peek_token_type() {
            TokenType::Dollar => Type::String,
            TokenType::Hash => Type::Float,
            _ => return Ok(Type::Int),
        };
        self.advance()?;
        Ok(ty)
    }

    /// `= [-] <integer>`, or zero when there is no initializer.
    fn initializer(&mut self) -> ParseResult<i64> {
        if !self.match_(TokenType::Equal)? {
            return Ok(0);
        }
        let negative = self.match_(TokenType::Minus)?;
        let magnitude = match self.peek_token_type() {
            TokenType::Integer(magnitude) => *magnitude,
            _ => return Err(self.expected("integer literal")),
        };
        let value = if negative {
            0i64.checked_sub_unsigned(magnitude)
        } else {
            i64::try_from(magnitude).ok()
        };
        let value = value.ok_or_else(|| self.out_of_range())?;
        self.advance()?;
        Ok(value)
    }

    pub(super) fn subroutine(&mut self) -> ParseResult<()> {
        trace_rule!(self, "subroutine");
        if let Some(outer) = self.ctx.in_subroutine() {
            let outer = outer.to_string();
            return Err(self.error_at_current(ParseErrorType::NestedSubroutine(outer)));
        }

        let skip = self.ctx.new_label();
        self.gen.branch(skip);
        self.advance()?;

        let (name, token) = self.consume_identifier("subroutine name")?;
        self.ctx
            .enter_subroutine(&name)
            .map_err(|e| ParseError::new(token, e))?;
        self.formal_list()?;

        let locals = self.local_declarations()?;
        self.gen.subroutine_prologue(&name, locals.len());
        for (slot, initial) in &locals {
            self.gen.load_constant(*initial);
            self.gen.store_parameter(*slot);
        }
        self.block()?;
        self.gen.subroutine_epilogue(locals.len());
        self.gen.post_label(skip);

        self.consume(TokenType::KEndSub, "`endsub`")?;
        self.ctx.leave_subroutine();
        Ok(())
    }

    fn formal_list(&mut self) -> ParseResult<usize> {
        trace_rule!(self, "formal_list");
        self.consume(TokenType::LParen, "`(`")?;
        if *self.peek_token_type() != TokenType::RParen {
            self.formal_parameter()?;
            while self.match_(TokenType::Comma)? {
                self.formal_parameter()?;
            }
        }
        self.consume(TokenType::RParen, "`)`")?;
        self.ctx.end_formals().map_err(|e| self.error_at_current(e))
    }

    fn formal_parameter(&mut self) -> ParseResult<()> {
        let (name, token) = self.consume_identifier("parameter name")?;
        self.ctx
            .add_formal(&name)
            .map_err(|e| ParseError::new(token, e))?;
        Ok(())
    }

    fn local_declarations(&mut self) -> ParseResult<Vec<(Slot, i64)>> {
        trace_rule!(self, "local_declarations");
        let mut locals = Vec::new();
        while *self.peek_token_type() == TokenType::KDim {
            locals.push(self.local_declaration()?);
            while *self.peek_token_type() == TokenType::Comma {
                locals.push(self.local_declaration()?);
            }
            self.semi()?;
        }
        Ok(locals)
    }

    fn local_declaration(&mut self) -> ParseResult<(Slot, i64)> {
        self.advance()?;
        let (name, token) = self.consume_identifier("variable name")?;
        let ty = self.type_suffix()?;
        let slot = self
            .ctx
            .add_local(&name, ty)
            .map_err(|e| ParseError::new(token, e))?;
        let initial = self.initializer()?;
        Ok((slot, initial))
    }
}
