use super::{trace_rule, ParseError, ParseErrorType, ParseResult, Parser};
use crate::codegen::{CodeGen, STACK_WORD};
use crate::lexer::token::TokenType;
use crate::symbols::r#type::Type;
use crate::symbols::Binding;

impl<'a, G: CodeGen + ?Sized> Parser<'a, G> {
    /// Parses statements until one of them cannot start a statement. The
    /// terminator (`endif`, `else`, `wend`, `endsub`, `endmain`, eof or
    /// anything else) is left for the caller.
    pub(super) fn block(&mut self) -> ParseResult<()> {
        trace_rule!(self, "block");
        loop {
            match self.peek_token_type() {
                TokenType::KIf => self.if_statement()?,
                TokenType::KWhile => self.while_statement()?,
                TokenType::KRead => self.read_statement()?,
                TokenType::KWrite => self.write_statement()?,
                TokenType::KSub => self.subroutine()?,
                TokenType::Identifier(_) => self.assignment_or_call()?,
                _ => break,
            }
            self.semi()?;
        }
        Ok(())
    }

    fn if_statement(&mut self) -> ParseResult<()> {
        trace_rule!(self, "if_statement");
        self.advance()?;
        self.bool_expression()?;

        let skip_then = self.ctx.new_label();
        let mut end = skip_then;
        self.gen.branch_if_false(skip_then);
        self.block()?;

        if self.match_(TokenType::KElse)? {
            end = self.ctx.new_label();
            self.gen.branch(end);
            self.gen.post_label(skip_then);
            self.block()?;
        }
        self.gen.post_label(end);
        self.consume(TokenType::KEndIf, "`endif`")?;
        Ok(())
    }

    fn while_statement(&mut self) -> ParseResult<()> {
        trace_rule!(self, "while_statement");
        self.advance()?;

        let top = self.ctx.new_label();
        let exit = self.ctx.new_label();
        self.gen.post_label(top);
        self.bool_expression()?;
        self.gen.branch_if_false(exit);
        self.block()?;
        self.consume(TokenType::KWend, "`wend`")?;
        self.gen.branch(top);
        self.gen.post_label(exit);
        Ok(())
    }

    fn read_statement(&mut self) -> ParseResult<()> {
        trace_rule!(self, "read_statement");
        self.advance()?;
        self.consume(TokenType::LParen, "`(`")?;
        self.read_variable()?;
        while self.match_(TokenType::Comma)? {
            self.read_variable()?;
        }
        self.consume(TokenType::RParen, "`)`")?;
        Ok(())
    }

    fn read_variable(&mut self) -> ParseResult<()> {
        let (name, token) = self.consume_identifier("identifier")?;
        match self.ctx.resolve(&name) {
            Ok(Binding::Parameter(slot)) => self.gen.read_into_parameter(slot),
            Ok(Binding::Global(ty)) if ty.is_variable() => self.gen.read_into(&name),
            Ok(Binding::Global(_)) => {
                return Err(ParseError::new(
                    token,
                    ParseErrorType::InvalidUseOfIdentifier(name),
                ))
            }
            Err(e) => return Err(ParseError::new(token, e)),
        }
        Ok(())
    }

    fn write_statement(&mut self) -> ParseResult<()> {
        trace_rule!(self, "write_statement");
        self.advance()?;
        self.consume(TokenType::LParen, "`(`")?;
        self.expression()?;
        self.gen.write_value();
        while self.match_(TokenType::Comma)? {
            self.expression()?;
            self.gen.write_value();
        }
        self.consume(TokenType::RParen, "`)`")?;
        Ok(())
    }

    /// A leading identifier is a call when it names a subroutine and an
    /// assignment otherwise. Parameters shadow globals of the same name.
    fn assignment_or_call(&mut self) -> ParseResult<()> {
        trace_rule!(self, "assignment_or_call");
        let name = match self.peek_token_type() {
            TokenType::Identifier(name) => name.clone(),
            _ => return Err(self.expected("identifier")),
        };

        match self.ctx.resolve(&name) {
            Ok(Binding::Global(Type::Subroutine { arity })) => self.call(name, arity),
            Ok(Binding::Global(ty)) if !ty.is_variable() => {
                Err(self.error_at_current(ParseErrorType::InvalidUseOfIdentifier(name)))
            }
            Ok(binding) => self.assignment(binding),
            Err(e) => Err(self.error_at_current(e)),
        }
    }

    fn assignment(&mut self, target: Binding) -> ParseResult<()> {
        trace_rule!(self, "assignment");
        let (name, _) = self.consume_identifier("identifier")?;
        self.consume(TokenType::Equal, "`=`")?;
        self.bool_expression()?;
        match target {
            Binding::Parameter(slot) => self.gen.store_parameter(slot),
            Binding::Global(_) => self.gen.store_variable(&name),
        }
        Ok(())
    }

    fn call(&mut self, name: String, arity: usize) -> ParseResult<()> {
        trace_rule!(self, "call");
        let token = self.advance()?;
        let count = self.param_list()?;
        if count != arity {
            return Err(ParseError::new(
                token,
                ParseErrorType::WrongArgumentCount {
                    name,
                    expected: arity,
                    got: count,
                },
            ));
        }
        self.gen.call_subroutine(&name);
        self.gen.clean_stack(STACK_WORD * count);
        Ok(())
    }

    /// Actuals are evaluated and pushed left to right; the caller pops them
    /// again after the call.
    fn param_list(&mut self) -> ParseResult<usize> {
        self.consume(TokenType::LParen, "`(`")?;
        let mut count = 0;
        if *self.peek_token_type() != TokenType::RParen {
            self.param()?;
            count += 1;
            while self.match_(TokenType::Comma)? {
                self.param()?;
                count += 1;
            }
        }
        self.consume(TokenType::RParen, "`)`")?;
        Ok(count)
    }

    fn param(&mut self) -> ParseResult<()> {
        self.expression()?;
        self.gen.push_accumulator();
        Ok(())
    }
}
