use std::io::{self, BufRead, BufReader, Read};

use tracing::{debug, trace};
use unicode_xid::UnicodeXID;

use crate::error::LexError;
use crate::scanner::options::{NewlinePolicy, ScanOptions};
use crate::scanner::token::{Span, Token, TokenKind, classify};

/// Position of the next code point to be consumed.
#[derive(Debug, Clone, Copy)]
struct Mark {
    line: usize,
    column: usize,
    offset: usize,
}

/// Pull-based scanner over a buffered byte source.
///
/// Each call to [`Scanner::next_token`] consumes exactly one token's worth of
/// input. Once the `Eof` token has been produced, further calls return the
/// same `Eof` token again without touching the reader.
pub struct Scanner<R> {
    source: R,
    options: ScanOptions,
    /// One code point of lookahead and its encoded width in bytes.
    peeked: Option<(char, usize)>,
    line: usize,
    column: usize,
    offset: usize,
    exhausted: bool,
    failed: bool,
}

impl<'a> Scanner<&'a [u8]> {
    pub fn for_source(source: &'a str) -> Self {
        Self::new(source.as_bytes())
    }
}

impl<T: Read> Scanner<BufReader<T>> {
    pub fn from_reader(reader: T) -> Self {
        Self::new(BufReader::new(reader))
    }
}

impl<R: BufRead> Scanner<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            options: ScanOptions::default(),
            peeked: None,
            line: 1,
            column: 1,
            offset: 0,
            exhausted: false,
            failed: false,
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.exhausted {
            return Ok(self.eof_token());
        }

        let token = self.scan_token().inspect_err(|e| {
            debug!(line = self.line, column = self.column, error = %e, "read failed");
        })?;
        trace!(
            kind = ?token.kind,
            lexeme = %token.lexeme.escape_debug(),
            line = token.line,
            column = token.column,
            "token"
        );
        Ok(token)
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        let Some(c) = self.skip_whitespace()? else {
            self.exhausted = true;
            debug!(line = self.line, column = self.column, "end of input");
            return Ok(self.eof_token());
        };

        let start = self.mark();
        self.advance();

        let token = match c {
            '\n' => self.token(TokenKind::Newline, "\n", start),
            '=' => self.one_or_two(c, '=', TokenKind::Equal, TokenKind::Assign, start)?,
            '!' => self.one_or_two(c, '=', TokenKind::NotEqual, TokenKind::Bang, start)?,
            '&' => self.one_or_two(c, '&', TokenKind::And, TokenKind::BitwiseAnd, start)?,
            '|' => self.one_or_two(c, '|', TokenKind::Or, TokenKind::BitwiseOr, start)?,
            '+' => self.single(TokenKind::Plus, c, start),
            '-' => self.single(TokenKind::Minus, c, start),
            '*' => self.single(TokenKind::Asterisk, c, start),
            '/' => self.single(TokenKind::Slash, c, start),
            '<' => self.single(TokenKind::Less, c, start),
            '>' => self.single(TokenKind::Greater, c, start),
            ',' => self.single(TokenKind::Comma, c, start),
            ';' => self.single(TokenKind::Semicolon, c, start),
            '(' => self.single(TokenKind::LeftParen, c, start),
            ')' => self.single(TokenKind::RightParen, c, start),
            '{' => self.single(TokenKind::LeftBrace, c, start),
            '}' => self.single(TokenKind::RightBrace, c, start),
            c if is_identifier_start(c) => self.identifier(c, start)?,
            c if c.is_ascii_digit() => self.integer(c, start)?,
            c => self.single(TokenKind::Illegal, c, start),
        };
        Ok(token)
    }

    /// Consume insignificant whitespace and return the next code point
    /// without consuming it.
    fn skip_whitespace(&mut self) -> Result<Option<char>, LexError> {
        while let Some(c) = self.peek()? {
            if !self.is_insignificant(c) {
                return Ok(Some(c));
            }
            self.advance();
        }
        Ok(None)
    }

    fn is_insignificant(&self, c: char) -> bool {
        match c {
            '\n' => self.options.newline == NewlinePolicy::Skip,
            c => c.is_whitespace(),
        }
    }

    fn one_or_two(
        &mut self,
        first: char,
        second: char,
        double: TokenKind,
        single: TokenKind,
        start: Mark,
    ) -> Result<Token, LexError> {
        if self.peek()? == Some(second) {
            self.advance();
            let lexeme: String = [first, second].iter().collect();
            Ok(self.token(double, lexeme, start))
        } else {
            Ok(self.single(single, first, start))
        }
    }

    fn identifier(&mut self, first: char, start: Mark) -> Result<Token, LexError> {
        let mut lexeme = String::from(first);
        while let Some(c) = self.peek()? {
            if !is_identifier_continue(c) {
                break;
            }
            lexeme.push(c);
            self.advance();
        }
        let (kind, lexeme) = classify(lexeme);
        Ok(self.token(kind, lexeme, start))
    }

    // No fractional part: `1.5` scans as Int, Illegal('.'), Int.
    fn integer(&mut self, first: char, start: Mark) -> Result<Token, LexError> {
        let mut lexeme = String::from(first);
        while let Some(c) = self.peek()? {
            if !c.is_ascii_digit() {
                break;
            }
            lexeme.push(c);
            self.advance();
        }
        Ok(self.token(TokenKind::Int, lexeme, start))
    }

    fn single(&self, kind: TokenKind, c: char, start: Mark) -> Token {
        self.token(kind, c.to_string(), start)
    }

    fn token(&self, kind: TokenKind, lexeme: impl Into<String>, start: Mark) -> Token {
        Token::new(
            kind,
            lexeme,
            start.line,
            start.column,
            Span::new(start.offset, self.offset - start.offset),
        )
    }

    fn eof_token(&self) -> Token {
        Token::new(
            TokenKind::Eof,
            "",
            self.line,
            self.column,
            Span::new(self.offset, 0),
        )
    }

    fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    /// Look at the next code point, filling the pushback slot if it is empty.
    fn peek(&mut self) -> io::Result<Option<char>> {
        if self.peeked.is_none() {
            self.peeked = self.read_char()?;
        }
        Ok(self.peeked.map(|(c, _)| c))
    }

    /// Consume the code point in the pushback slot, if any. Counters move
    /// here and only here, so a peeked code point is counted once.
    fn advance(&mut self) {
        if let Some((c, width)) = self.peeked.take() {
            self.offset += width;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Decode one code point from the reader. Malformed UTF-8 decodes to
    /// U+FFFD covering the bytes that were consumed.
    fn read_char(&mut self) -> io::Result<Option<(char, usize)>> {
        let Some(lead) = self.peek_byte()? else {
            return Ok(None);
        };
        self.source.consume(1);

        let width = utf8_width(lead);
        match width {
            1 => return Ok(Some((char::from(lead), 1))),
            0 => return Ok(Some((char::REPLACEMENT_CHARACTER, 1))),
            _ => {}
        }

        let mut bytes = [lead, 0, 0, 0];
        for (read, slot) in bytes.iter_mut().enumerate().take(width).skip(1) {
            match self.peek_byte()? {
                Some(b) if b & 0xC0 == 0x80 => {
                    *slot = b;
                    self.source.consume(1);
                }
                _ => return Ok(Some((char::REPLACEMENT_CHARACTER, read))),
            }
        }

        let c = std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        Ok(Some((c, width)))
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.source.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = Result<Token, LexError>;

    /// Yields `Eof` once, then `None`. Stops after the first read failure.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.failed {
            return None;
        }
        let result = self.next_token();
        self.failed = result.is_err();
        Some(result)
    }
}

// Letters (and letter numbers such as `Ⅻ`) start an identifier; marks,
// digits and connector punctuation may follow.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || (!c.is_ascii() && c.is_xid_start())
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || (!c.is_ascii() && c.is_xid_continue())
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}
