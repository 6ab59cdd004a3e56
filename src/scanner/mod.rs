pub mod lexer;
pub mod options;
pub mod printer;
pub mod token;

use std::io::Read;

use crate::error::LexError;
use lexer::Scanner;
use options::ScanOptions;
use token::{Token, TokenKind};

/// Scan a whole reader, illegal tokens included, through the `Eof` token.
pub fn tokenize<R: Read>(reader: R, options: ScanOptions) -> Result<Vec<Token>, LexError> {
    Scanner::from_reader(reader).with_options(options).collect()
}

/// Scan source code into a list of tokens, or one diagnostic per illegal
/// token with the source attached.
pub fn scan(source: &str) -> Result<Vec<Token>, Vec<LexError>> {
    let tokens = Scanner::for_source(source)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| vec![e])?;

    let errors: Vec<LexError> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Illegal)
        .map(|t| LexError::illegal(t).with_source_code("input", source))
        .collect();

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}
