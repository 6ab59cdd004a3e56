use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::scanner::token::{Token, TokenKind};

#[derive(Error, Debug, Diagnostic)]
pub enum LexError {
    /// The underlying reader failed. Scanning cannot continue.
    #[error("failed to read source: {0}")]
    #[diagnostic(code(monkey::io))]
    Io(#[from] std::io::Error),

    #[error("illegal token '{lexeme}' at line {line}, column {column}")]
    #[diagnostic(code(monkey::lex))]
    Illegal {
        lexeme: String,
        line: usize,
        column: usize,
        #[label("not a valid token")]
        span: SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },
}

impl LexError {
    /// Build a diagnostic for a token the scanner tagged as illegal.
    pub fn illegal(token: &Token) -> Self {
        debug_assert_eq!(token.kind, TokenKind::Illegal);
        Self::Illegal {
            lexeme: token.lexeme.clone(),
            line: token.line,
            column: token.column,
            span: token.span.into(),
            src: miette::NamedSource::new("input", String::new()),
        }
    }

    /// Attach source code for fancy miette diagnostics
    pub fn with_source_code(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        match self {
            Self::Illegal {
                lexeme,
                line,
                column,
                span,
                ..
            } => Self::Illegal {
                lexeme,
                line,
                column,
                span,
                src: miette::NamedSource::new(name.into(), source.into()),
            },
            other => other,
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
