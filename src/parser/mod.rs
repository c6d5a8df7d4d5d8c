mod decl;
mod expr;
mod stmt;


use crate::codegen::CodeGen;
use crate::lexer::token::{Token, TokenType};
use crate::lexer::{Lexer, LexerError, LexerErrorType};
use crate::symbols::{Context, SymbolError};
use thiserror::Error;

// <program>      ::= [";"] <top-decls> [";"] <block> ["endmain"] [";"] <eof>
// <top-decls>    ::= ( "dim" <alloc> ( "," <alloc> )* [";"] )*
// <alloc>        ::= <ident> [ "$" | "#" ] [ "=" ["-"] <integer> ]
// <block>        ::= ( <statement> [";"] )*
// <statement>    ::= <if> | <while> | <read> | <write> | <sub> | <assign> | <call>
// <if>           ::= "if" <bool-expr> <block> [ "else" <block> ] "endif"
// <while>        ::= "while" <bool-expr> <block> "wend"
// <read>         ::= "read" "(" <ident> ( "," <ident> )* ")"
// <write>        ::= "write" "(" <expr> ( "," <expr> )* ")"
// <sub>          ::= "sub" <ident> "(" [ <ident> ( "," <ident> )* ] ")" <loc-decls> <block> "endsub"
// <assign>       ::= <ident> "=" <bool-expr>
// <call>         ::= <ident> "(" [ <expr> ( "," <expr> )* ] ")"
// <bool-expr>    ::= <bool-term> ( ( "|" | "!" ) <bool-term> )*
// <bool-term>    ::= <not-factor> ( "&" <not-factor> )*
// <not-factor>   ::= [ "~" ] <relation>
// <relation>     ::= <expr> [ <relop> <expr> ]
// <expr>         ::= [ "+" | "-" ] <term> ( ( "+" | "-" ) <term> )*
// <term>         ::= <factor> ( ( "*" | "/" ) <factor> )*
// <factor>       ::= "(" <bool-expr> ")" | <ident> | <integer>

macro_rules! trace_rule {
    ( $self: ident, $rule: literal ) => {
        log::trace!("{} <- {}", $rule, $self.token)
    };
}
pub(crate) use trace_rule;

#[derive(Error, Debug)]
#[error("ParseError at {token}: {error}")]
pub struct ParseError {
    pub token: Token,
    #[source]
    pub error: ParseErrorType,
}

impl ParseError {
    pub fn new(token: Token, error: impl Into<ParseErrorType>) -> Self {
        Self {
            token,
            error: error.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("expected {exp}, got {got:?}")]
    Expected { exp: &'static str, got: String },

    #[error("undefined identifier `{0}`")]
    UndefinedIdentifier(String),

    #[error("duplicate identifier `{0}`")]
    DuplicateIdentifier(String),

    #[error("identifier `{0}` cannot be used here")]
    InvalidUseOfIdentifier(String),

    #[error("subroutine `{name}` takes {expected} parameter(s), got {got}")]
    WrongArgumentCount {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("subroutine definition inside subroutine `{0}`")]
    NestedSubroutine(String),

    #[error(transparent)]
    Lexer(#[from] LexerErrorType),
}

impl From<SymbolError> for ParseErrorType {
    fn from(error: SymbolError) -> Self {
        match error {
            SymbolError::Undefined(name) => ParseErrorType::UndefinedIdentifier(name),
            SymbolError::Duplicate(name) => ParseErrorType::DuplicateIdentifier(name),
            SymbolError::NotASubroutine(name) => ParseErrorType::InvalidUseOfIdentifier(name),
        }
    }
}

impl From<LexerError> for ParseError {
    fn from(error: LexerError) -> Self {
        ParseError::new(error.token, error.error)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent translator. Each grammar rule is a method that checks
/// the source and emits code through `gen` as it goes; nothing is built
/// in between.
pub struct Parser<'a, G: CodeGen + ?Sized> {
    lexer: Lexer<'a>,
    token: Token,
    ctx: &'a mut Context,
    gen: &'a mut G,
}

impl<'a, G: CodeGen + ?Sized> Parser<'a, G> {
    pub fn new(input: &'a str, ctx: &'a mut Context, gen: &'a mut G) -> ParseResult<Self> {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token()?;
        Ok(Self {
            lexer,
            token,
            ctx,
            gen,
        })
    }

    fn peek_token_type(&self) -> &TokenType {
        &self.token.tok_type
    }

    fn advance(&mut self) -> ParseResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.token, next))
    }

    fn match_(&mut self, tok_type: TokenType) -> ParseResult<bool> {
        if *self.peek_token_type() == tok_type {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn consume(&mut self, tok_type: TokenType, exp: &'static str) -> ParseResult<Token> {
        if *self.peek_token_type() == tok_type {
            self.advance()
        } else {
            Err(self.expected(exp))
        }
    }

    fn consume_identifier(&mut self, exp: &'static str) -> ParseResult<(String, Token)> {
        match self.peek_token_type() {
            TokenType::Identifier(name) => {
                let name = name.clone();
                Ok((name, self.advance()?))
            }
            _ => Err(self.expected(exp)),
        }
    }

    fn semi(&mut self) -> ParseResult<()> {
        self.match_(TokenType::Semicolon).map(|_| ())
    }

    fn error_at_current(&self, error: impl Into<ParseErrorType>) -> ParseError {
        ParseError::new(self.token.clone(), error)
    }

    fn out_of_range(&self) -> ParseError {
        let literal = self.token.lexeme.clone();
        self.error_at_current(LexerErrorType::IntegerOverflow(literal))
    }

    fn expected(&self, exp: &'static str) -> ParseError {
        let got = match self.peek_token_type() {
            TokenType::EOF => String::from("<eof>"),
            _ => self.token.lexeme.clone(),
        };
        self.error_at_current(ParseErrorType::Expected { exp, got })
    }
}

impl<'a, G: CodeGen + ?Sized> Parser<'a, G> {
    pub fn program(&mut self) -> ParseResult<()> {
        trace_rule!(self, "program");
        self.semi()?;
        self.gen.emit_header();
        self.top_declarations()?;
        self.semi()?;

        self.gen.emit_program_prologue();
        self.block()?;
        if self.match_(TokenType::KEndMain)? {
            self.semi()?;
        }
        if *self.peek_token_type() != TokenType::EOF {
            return Err(self.expected("statement or end of input"));
        }
        self.gen.emit_program_epilogue();
        Ok(())
    }
}
