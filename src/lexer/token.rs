use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    Comma,
    Equal,
    Greater,
    LParen,
    Lesser,
    RParen,
    Semicolon,

    Amp,
    Bang,
    Minus,
    Pipe,
    Plus,
    Slash,
    Star,
    Tilde,

    // type suffixes
    Dollar,
    Hash,

    KDim,
    KElse,
    KEndIf,
    KEndMain,
    KEndSub,
    KIf,
    KRead,
    KSub,
    KWend,
    KWhile,
    KWrite,

    /// Magnitude of an integer literal. The sign is a separate token.
    Integer(u64),
    Identifier(String),

    Error,
    EOF,
}

impl TokenType {
    /// Short name of the token kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenType::Integer(_) => "integer",
            TokenType::Identifier(_) => "identifier",
            TokenType::EOF => "eof",
            TokenType::Error => "error",
            TokenType::KDim
            | TokenType::KElse
            | TokenType::KEndIf
            | TokenType::KEndMain
            | TokenType::KEndSub
            | TokenType::KIf
            | TokenType::KRead
            | TokenType::KSub
            | TokenType::KWend
            | TokenType::KWhile
            | TokenType::KWrite => "keyword",
            _ => "operator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span(pub usize, pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub span: Span,
    pub line: usize,
    pub lexeme: String,
    pub tok_type: TokenType,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tok_type {
            TokenType::EOF => write!(f, "<eof> (line {})", self.line),
            _ => write!(
                f,
                "{:?} ({} on line {})",
                self.lexeme,
                self.tok_type.kind(),
                self.line
            ),
        }
    }
}
