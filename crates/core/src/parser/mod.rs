//! Token source boundary and the built-in content stream lexer.

use std::collections::VecDeque;

use smol_str::SmolStr;

use crate::error::Result;
use crate::model::PdfObject;

pub mod lexer;

pub use lexer::ContentLexer;

/// One token pulled from a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentToken {
    /// An operand value; accumulated until an operator arrives.
    Operand(PdfObject),
    /// An operator token (symbolic name, e.g. `Tf`, `re`, `b*`).
    Operator(SmolStr),
}

/// Pull-based source of content stream tokens.
///
/// `Ok(None)` is the end-of-stream sentinel. The preprocessor never looks
/// ahead more than the single next token.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Option<ContentToken>>;
}

/// Scripted token source, mainly for tests and tools that synthesize
/// streams without going through the lexer.
impl TokenSource for VecDeque<ContentToken> {
    fn next_token(&mut self) -> Result<Option<ContentToken>> {
        Ok(self.pop_front())
    }
}
