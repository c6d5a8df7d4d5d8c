use super::*;

fn match_expected(input: &str, expected: Vec<TokenType>) {
    let mut lexer = Lexer::new(input);
    let tokens = lexer.tokenize().unwrap();
    assert_eq!(tokens.len(), expected.len());

    tokens
        .iter()
        .zip(expected.iter())
        .for_each(|(t, e)| assert_eq!(t.tok_type, *e));
}

#[test]
fn test_simple_syntax() {
    let input = "dim x\n' a comment\nx = 5;";
    let mut lexer = Lexer::new(input);
    let tokens = lexer.tokenize().unwrap();
    let expected = vec![
        Token {
            tok_type: TokenType::KDim,
            span: Span(0, 3),
            line: 1,
            lexeme: "dim".to_string(),
        },
        Token {
            tok_type: TokenType::Identifier("x".to_string()),
            span: Span(4, 5),
            line: 1,
            lexeme: "x".to_string(),
        },
        Token {
            tok_type: TokenType::Identifier("x".to_string()),
            span: Span(18, 19),
            line: 3,
            lexeme: "x".to_string(),
        },
        Token {
            tok_type: TokenType::Equal,
            span: Span(20, 21),
            line: 3,
            lexeme: "=".to_string(),
        },
        Token {
            tok_type: TokenType::Integer(5),
            span: Span(22, 23),
            line: 3,
            lexeme: "5".to_string(),
        },
        Token {
            tok_type: TokenType::Semicolon,
            span: Span(23, 24),
            line: 3,
            lexeme: ";".to_string(),
        },
    ];

    assert_eq!(tokens, expected);
}

#[test]
fn test_operators_are_single_chars() {
    let input = "= < > <> <= >= + - * / & | ! ~ , ( ) ; $ #";
    let expected = vec![
        TokenType::Equal,
        TokenType::Lesser,
        TokenType::Greater,
        TokenType::Lesser,
        TokenType::Greater,
        TokenType::Lesser,
        TokenType::Equal,
        TokenType::Greater,
        TokenType::Equal,
        TokenType::Plus,
        TokenType::Minus,
        TokenType::Star,
        TokenType::Slash,
        TokenType::Amp,
        TokenType::Pipe,
        TokenType::Bang,
        TokenType::Tilde,
        TokenType::Comma,
        TokenType::LParen,
        TokenType::RParen,
        TokenType::Semicolon,
        TokenType::Dollar,
        TokenType::Hash,
    ];

    match_expected(input, expected);
}

#[test]
fn test_keywords_and_case_folding() {
    let input = "DIM If ELSE endif While WEND sub EndSub Read WRITE endmain Counter1";
    let expected = vec![
        TokenType::KDim,
        TokenType::KIf,
        TokenType::KElse,
        TokenType::KEndIf,
        TokenType::KWhile,
        TokenType::KWend,
        TokenType::KSub,
        TokenType::KEndSub,
        TokenType::KRead,
        TokenType::KWrite,
        TokenType::KEndMain,
        TokenType::Identifier("counter1".to_string()),
    ];

    match_expected(input, expected);
}

#[test]
fn test_identifier_stops_at_non_alphanumeric() {
    let expected = vec![
        TokenType::Identifier("name".to_string()),
        TokenType::Dollar,
        TokenType::Identifier("a1b2".to_string()),
        TokenType::LParen,
    ];

    match_expected("name$ a1b2(", expected);
}

#[test]
fn test_numbers() {
    match_expected(
        "0 42 007 9223372036854775807 9223372036854775808",
        vec![
            TokenType::Integer(0),
            TokenType::Integer(42),
            TokenType::Integer(7),
            TokenType::Integer(i64::MAX as u64),
            TokenType::Integer(1 << 63),
        ],
    );

    let err = Lexer::new("99999999999999999999").tokenize().unwrap_err();
    assert_eq!(
        err.error,
        LexerErrorType::IntegerOverflow("99999999999999999999".to_string())
    );
}

#[test]
fn test_comments_and_line_counting() {
    let input = "a ' first ' nested 'deeper\r\n' whole line\n\nb";
    let tokens = Lexer::new(input).tokenize().unwrap();

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].tok_type, TokenType::Identifier("b".to_string()));
    assert_eq!(tokens[1].line, 4);
}

#[test]
fn test_comment_at_end_of_input() {
    match_expected("x ' no newline after this", vec![TokenType::Identifier("x".to_string())]);
    match_expected("'", vec![]);
}

#[test]
fn test_eof_is_repeatable() {
    let mut lexer = Lexer::new("  \n ");
    assert_eq!(lexer.next_token().unwrap().tok_type, TokenType::EOF);
    assert_eq!(lexer.next_token().unwrap().tok_type, TokenType::EOF);
    assert_eq!(lexer.line(), 2);
}

#[test]
fn test_unexpected_char() {
    let mut lexer = Lexer::new("x = 1 @");
    let err = lexer.tokenize().unwrap_err();
    assert_eq!(err.error, LexerErrorType::UnexpectedChar('@'));
    assert_eq!(err.token.span, Span(6, 7));
}

#[test]
fn test_classifier_tables() {
    assert_eq!(classify_keyword("wend"), Some(TokenType::KWend));
    assert_eq!(classify_keyword("x"), None);
    assert_eq!(classify_operator('$'), Some(TokenType::Dollar));
    assert_eq!(classify_operator('#'), Some(TokenType::Hash));
    assert_eq!(classify_operator('%'), None);
}
