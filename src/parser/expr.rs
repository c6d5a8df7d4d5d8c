use super::{trace_rule, ParseErrorType, ParseResult, Parser};
use crate::codegen::CodeGen;
use crate::lexer::token::TokenType;
use crate::symbols::Binding;

// Left operand is pushed, the right one is parsed into the accumulator and
// the pop-combine folds them, which keeps every level left associative.
macro_rules! parse_binary_tail {
    ( $self: ident, $nextp: ident; $( $ops: pat => $pop: ident ),+ $(,)? ) => {{
        loop {
            match $self.peek_token_type() {
                $(
                    $ops => {
                        $self.gen.push_accumulator();
                        $self.advance()?;
                        $self.$nextp()?;
                        $self.gen.$pop();
                    }
                )+
                _ => break,
            }
        }
        Ok(())
    }};
}

impl<'a, G: CodeGen + ?Sized> Parser<'a, G> {
    pub(super) fn bool_expression(&mut self) -> ParseResult<()> {
        trace_rule!(self, "bool_expression");
        self.bool_term()?;
        parse_binary_tail!(self, bool_term;
            TokenType::Pipe => pop_or,
            TokenType::Bang => pop_xor,
        )
    }

    fn bool_term(&mut self) -> ParseResult<()> {
        trace_rule!(self, "bool_term");
        self.not_factor()?;
        parse_binary_tail!(self, not_factor; TokenType::Amp => pop_and)
    }

    fn not_factor(&mut self) -> ParseResult<()> {
        trace_rule!(self, "not_factor");
        if self.match_(TokenType::Tilde)? {
            self.relation()?;
            self.gen.negate_boolean();
            Ok(())
        } else {
            self.relation()
        }
    }

    // `<=`, `<>` and `>=` are two operator tokens; the second one is
    // checked right after the first is consumed.
    pub(super) fn relation(&mut self) -> ParseResult<()> {
        trace_rule!(self, "relation");
        self.expression()?;

        let relop = match self.peek_token_type() {
            tt @ (TokenType::Equal | TokenType::Lesser | TokenType::Greater) => tt.clone(),
            _ => return Ok(()),
        };
        self.gen.push_accumulator();
        self.advance()?;

        match relop {
            TokenType::Equal => {
                self.compare_expression()?;
                self.gen.set_equal();
            }
            TokenType::Lesser => {
                if self.match_(TokenType::Equal)? {
                    self.compare_expression()?;
                    self.gen.set_less_or_equal();
                } else if self.match_(TokenType::Greater)? {
                    self.compare_expression()?;
                    self.gen.set_not_equal();
                } else {
                    self.compare_expression()?;
                    self.gen.set_less();
                }
            }
            _ => {
                if self.match_(TokenType::Equal)? {
                    self.compare_expression()?;
                    self.gen.set_greater_or_equal();
                } else {
                    self.compare_expression()?;
                    self.gen.set_greater();
                }
            }
        }
        Ok(())
    }

    fn compare_expression(&mut self) -> ParseResult<()> {
        self.expression()?;
        self.gen.pop_compare();
        Ok(())
    }

    /// A leading sign is unary: the accumulator starts at zero and the
    /// first term is then added or subtracted like any other.
    pub(super) fn expression(&mut self) -> ParseResult<()> {
        trace_rule!(self, "expression");
        match self.peek_token_type() {
            TokenType::Plus | TokenType::Minus => self.gen.clear_accumulator(),
            _ => self.term()?,
        }
        parse_binary_tail!(self, term;
            TokenType::Plus => pop_add,
            TokenType::Minus => pop_sub,
        )
    }

    fn term(&mut self) -> ParseResult<()> {
        trace_rule!(self, "term");
        self.factor()?;
        parse_binary_tail!(self, factor;
            TokenType::Star => pop_mul,
            TokenType::Slash => pop_div,
        )
    }

    fn factor(&mut self) -> ParseResult<()> {
        trace_rule!(self, "factor");
        match self.peek_token_type() {
            TokenType::LParen => {
                self.advance()?;
                self.bool_expression()?;
                self.consume(TokenType::RParen, "`)`")?;
            }
            TokenType::Identifier(name) => {
                let name = name.clone();
                match self.ctx.resolve(&name) {
                    Ok(Binding::Parameter(slot)) => self.gen.load_parameter(slot),
                    Ok(Binding::Global(ty)) if ty.is_variable() => self.gen.load_variable(&name),
                    Ok(Binding::Global(_)) => {
                        return Err(
                            self.error_at_current(ParseErrorType::InvalidUseOfIdentifier(name))
                        )
                    }
                    Err(e) => return Err(self.error_at_current(e)),
                }
                self.advance()?;
            }
            TokenType::Integer(magnitude) => {
                let value = i64::try_from(*magnitude).map_err(|_| self.out_of_range())?;
                self.gen.load_constant(value);
                self.advance()?;
            }
            _ => return Err(self.expected("math factor")),
        }
        Ok(())
    }
}
