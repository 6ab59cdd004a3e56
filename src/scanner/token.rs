use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Illegal,
    Eof,
    Newline,

    // Literals
    Identifier,
    Int,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    BitwiseAnd,
    BitwiseOr,
    Equal,
    NotEqual,
    And,
    Or,
    Less,
    Greater,

    // Delimiters
    Comma,
    Semicolon,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Illegal => write!(f, "ILLEGAL"),
            Self::Eof => write!(f, "EOF"),
            Self::Newline => write!(f, "NEWLINE"),
            Self::Identifier => write!(f, "IDENT"),
            Self::Int => write!(f, "INT"),
            Self::Assign => write!(f, "="),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Bang => write!(f, "!"),
            Self::Asterisk => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::BitwiseAnd => write!(f, "&"),
            Self::BitwiseOr => write!(f, "|"),
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::Function => write!(f, "fn"),
            Self::Let => write!(f, "let"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::If => write!(f, "if"),
            Self::Else => write!(f, "else"),
            Self::Return => write!(f, "return"),
        }
    }
}

/// Reserved words and the kinds they scan to. Matching is exact and
/// case-sensitive.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("fn", TokenKind::Function),
    ("let", TokenKind::Let),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("return", TokenKind::Return),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.offset.into(), span.len)
    }
}

/// A classified lexeme together with where it started in the source.
///
/// `line` and `column` are 1-based and count code points; `span` is in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        line: usize,
        column: usize,
        span: Span,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} '{}' @{}:{}",
            self.kind,
            self.lexeme.escape_debug(),
            self.line,
            self.column
        )
    }
}

pub fn keyword_kind(ident: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|&&(word, _)| word == ident)
        .map(|&(_, kind)| kind)
}

/// Resolve a completed identifier-like lexeme to a keyword or a plain
/// identifier. Never fails.
pub fn classify(lexeme: String) -> (TokenKind, String) {
    let kind = keyword_kind(&lexeme).unwrap_or(TokenKind::Identifier);
    (kind, lexeme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fn", TokenKind::Function)]
    #[case("let", TokenKind::Let)]
    #[case("true", TokenKind::True)]
    #[case("false", TokenKind::False)]
    #[case("if", TokenKind::If)]
    #[case("else", TokenKind::Else)]
    #[case("return", TokenKind::Return)]
    fn keywords_classify_to_their_kind(#[case] word: &str, #[case] expected: TokenKind) {
        let (kind, lexeme) = classify(word.to_string());
        assert_eq!(kind, expected);
        assert_eq!(lexeme, word);
    }

    #[rstest]
    #[case("five")]
    #[case("Let")]
    #[case("fnord")]
    #[case("returns")]
    #[case("x_1")]
    fn non_keywords_are_identifiers(#[case] word: &str) {
        let (kind, lexeme) = classify(word.to_string());
        assert_eq!(kind, TokenKind::Identifier);
        assert_eq!(lexeme, word);
    }

    #[test]
    fn keyword_table_drives_lookup() {
        for &(word, kind) in KEYWORDS {
            assert_eq!(keyword_kind(word), Some(kind));
            assert_eq!(kind.to_string(), word);
        }
        assert_eq!(keyword_kind("FN"), None);
        assert_eq!(keyword_kind(""), None);
    }

    #[rstest]
    #[case(TokenKind::Illegal, "ILLEGAL")]
    #[case(TokenKind::Eof, "EOF")]
    #[case(TokenKind::Newline, "NEWLINE")]
    #[case(TokenKind::Identifier, "IDENT")]
    #[case(TokenKind::Int, "INT")]
    #[case(TokenKind::Assign, "=")]
    #[case(TokenKind::Plus, "+")]
    #[case(TokenKind::Minus, "-")]
    #[case(TokenKind::Bang, "!")]
    #[case(TokenKind::Asterisk, "*")]
    #[case(TokenKind::Slash, "/")]
    #[case(TokenKind::BitwiseAnd, "&")]
    #[case(TokenKind::BitwiseOr, "|")]
    #[case(TokenKind::Equal, "==")]
    #[case(TokenKind::NotEqual, "!=")]
    #[case(TokenKind::And, "&&")]
    #[case(TokenKind::Or, "||")]
    #[case(TokenKind::Less, "<")]
    #[case(TokenKind::Greater, ">")]
    #[case(TokenKind::Comma, ",")]
    #[case(TokenKind::Semicolon, ";")]
    #[case(TokenKind::LeftParen, "(")]
    #[case(TokenKind::RightParen, ")")]
    #[case(TokenKind::LeftBrace, "{")]
    #[case(TokenKind::RightBrace, "}")]
    #[case(TokenKind::Function, "fn")]
    #[case(TokenKind::Let, "let")]
    #[case(TokenKind::True, "true")]
    #[case(TokenKind::False, "false")]
    #[case(TokenKind::If, "if")]
    #[case(TokenKind::Else, "else")]
    #[case(TokenKind::Return, "return")]
    fn kind_displays_as_source_text(#[case] kind: TokenKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[test]
    fn token_display_escapes_lexeme() {
        let token = Token::new(TokenKind::Newline, "\n", 2, 7, Span::new(12, 1));
        assert_eq!(token.to_string(), "Newline '\\n' @2:7");
    }

    #[test]
    fn span_converts_to_source_span() {
        let span: miette::SourceSpan = Span::new(4, 3).into();
        assert_eq!(span.offset(), 4);
        assert_eq!(span.len(), 3);
    }
}
