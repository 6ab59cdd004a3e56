pub mod error;
pub mod scanner;

pub use error::LexError;
pub use scanner::lexer::Scanner;
pub use scanner::options::{NewlinePolicy, ScanOptions};
pub use scanner::token::{Token, TokenKind};
