pub mod token;

#[cfg(test)]
mod test;

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::str::Chars;
use thiserror::Error;
use token::{Span, Token, TokenType};

// Tables are ordered. When a lexeme appears twice, the entry closest to
// the end of its table wins, so maps are filled front to back and later
// inserts overwrite earlier ones.
const KEYWORD_TABLE: [(&str, TokenType); 11] = [
    ("if", TokenType::KIf),
    ("else", TokenType::KElse),
    ("endif", TokenType::KEndIf),
    ("while", TokenType::KWhile),
    ("wend", TokenType::KWend),
    ("read", TokenType::KRead),
    ("write", TokenType::KWrite),
    ("dim", TokenType::KDim),
    ("sub", TokenType::KSub),
    ("endsub", TokenType::KEndSub),
    ("endmain", TokenType::KEndMain),
];

const OPERATOR_TABLE: [(char, TokenType); 17] = [
    ('=', TokenType::Equal),
    ('<', TokenType::Lesser),
    ('>', TokenType::Greater),
    ('+', TokenType::Plus),
    ('-', TokenType::Minus),
    ('*', TokenType::Star),
    ('/', TokenType::Slash),
    ('&', TokenType::Amp),
    ('|', TokenType::Pipe),
    ('!', TokenType::Bang),
    ('~', TokenType::Tilde),
    (',', TokenType::Comma),
    ('(', TokenType::LParen),
    (')', TokenType::RParen),
    (';', TokenType::Semicolon),
    ('$', TokenType::Dollar),
    ('#', TokenType::Hash),
];

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = KEYWORD_TABLE
        .iter()
        .cloned()
        .collect();
    static ref OPERATORS: HashMap<char, TokenType> = OPERATOR_TABLE
        .iter()
        .cloned()
        .collect();
}

/// Resolves an identifier lexeme against the keyword table. `None` means
/// the lexeme stays a plain identifier.
pub fn classify_keyword(lexeme: &str) -> Option<TokenType> {
    KEYWORDS.get(lexeme).cloned()
}

pub fn classify_operator(c: char) -> Option<TokenType> {
    OPERATORS.get(&c).cloned()
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerErrorType {
    #[error("expected start of token, found {0:?}")]
    UnexpectedChar(char),

    #[error("integer literal {0} is out of range")]
    IntegerOverflow(String),
}

pub type LexerResult = Result<Token, LexerError>;

#[derive(Error, Debug)]
#[error("LexerError at {token}: {error}")]
pub struct LexerError {
    pub token: Token,
    #[source]
    pub error: LexerErrorType,
}

/// Character scanner with a single character of lookahead (`look`).
pub struct Lexer<'a> {
    input_str: &'a str,
    input: Chars<'a>,
    look: Option<char>,
    line: usize,
    start: usize,
    current: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input_str: &'a str) -> Self {
        let mut input = input_str.chars();
        let look = input.next();
        Self {
            input_str,
            input,
            look,
            line: 1,
            start: 0,
            current: 0,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn advance(&mut self) {
        if let Some(c) = self.look {
            self.current += c.len_utf8();
        }
        self.look = self.input.next();
    }

    fn get_lexeme(&self) -> &'a str {
        &self.input_str[self.start..self.current]
    }

    fn make_token(&self, tok_type: TokenType) -> Token {
        Token {
            span: Span(self.start, self.current),
            line: self.line,
            lexeme: self.get_lexeme().to_string(),
            tok_type,
        }
    }

    fn make_error(&self, error: LexerErrorType) -> LexerError {
        LexerError {
            token: self.make_token(TokenType::Error),
            error,
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.look {
                Some(' ' | '\t' | '\r') => self.advance(),
                Some('\n') => {
                    self.line += 1;
                    self.advance();
                }
                Some('\'') => self.skip_comment(),
                _ => break,
            };
        }
    }

    // A quote inside a comment opens a nested comment, which ends at the
    // same line break as its parent. The line break itself is left for
    // skip_whitespace so the line counter stays right.
    fn skip_comment(&mut self) {
        let mut depth = 0;
        while let Some(c) = self.look {
            match c {
                '\n' | '\r' => break,
                '\'' => {
                    depth += 1;
                    self.advance();
                }
                _ => self.advance(),
            }
        }
        log::trace!("skipped comment (nesting {}) on line {}", depth, self.line);
    }

    fn identifier(&mut self) -> LexerResult {
        while let Some(c) = self.look {
            if !c.is_ascii_alphanumeric() {
                break;
            }
            self.advance();
        }
        let lexeme = self.get_lexeme().to_ascii_lowercase();
        let tok_type =
            classify_keyword(&lexeme).unwrap_or_else(|| TokenType::Identifier(lexeme.clone()));

        let mut token = self.make_token(tok_type);
        token.lexeme = lexeme;
        Ok(token)
    }

    fn number(&mut self) -> LexerResult {
        while let Some('0'..='9') = self.look {
            self.advance();
        }
        let lexeme = self.get_lexeme();
        match lexeme.parse::<u64>() {
            Ok(n) => Ok(self.make_token(TokenType::Integer(n))),
            Err(_) => Err(self.make_error(LexerErrorType::IntegerOverflow(lexeme.to_string()))),
        }
    }

    fn operator(&mut self, c: char) -> LexerResult {
        self.advance();
        match classify_operator(c) {
            Some(tok_type) => Ok(self.make_token(tok_type)),
            None => Err(self.make_error(LexerErrorType::UnexpectedChar(c))),
        }
    }
}

impl<'a> Lexer<'a> {
    #[cfg(test)]
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.tok_type == TokenType::EOF {
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }

    pub fn next_token(&mut self) -> LexerResult {
        self.skip_whitespace();

        self.start = self.current;
        match self.look {
            None => Ok(self.make_token(TokenType::EOF)),
            Some(c) if c.is_ascii_alphabetic() => self.identifier(),
            Some(c) if c.is_ascii_digit() => self.number(),
            Some(c) => self.operator(c),
        }
    }
}
