use std::fmt::Write;

use crate::scanner::token::Token;

/// One token per line, in `Display` form.
pub fn to_lines(tokens: &[Token]) -> String {
    let mut buf = String::new();
    for token in tokens {
        let _ = writeln!(buf, "{token}");
    }
    buf
}

pub fn to_json(tokens: &[Token]) -> String {
    serde_json::to_string_pretty(tokens).expect("tokens should be serializable")
}
