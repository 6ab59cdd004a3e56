//! Scanner configuration.
//!
//! The only knob is how a line feed is treated. Grammars that terminate
//! statements with `;` want newlines skipped like any other whitespace;
//! newline-significant grammars want them as tokens.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewlinePolicy {
    /// `\n` is insignificant whitespace.
    #[default]
    Skip,
    /// `\n` is emitted as a `Newline` token.
    Emit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub newline: NewlinePolicy,
}

impl ScanOptions {
    pub fn with_newline(mut self, newline: NewlinePolicy) -> Self {
        self.newline = newline;
        self
    }
}
