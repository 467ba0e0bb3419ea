use super::CursorId;
use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Literal,
    Punctuation,
    Comment,
}

/// A raw lexical token of the header, annotated with its owning declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub spelling: String,
    /// Byte span in the original (un-erased) source
    pub span: Range<usize>,
    /// Innermost declaration whose extent contains this token
    pub cursor: Option<CursorId>,
    /// Token belongs to a `#` preprocessor directive line
    pub in_directive: bool,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        spelling: impl Into<String>,
        span: Range<usize>,
        in_directive: bool,
    ) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            span,
            cursor: None,
            in_directive,
        }
    }

    pub fn is_identifier(&self, id: &str) -> bool {
        self.kind == TokenKind::Identifier && self.spelling == id
    }

    pub fn is_comment_or_punctuation(&self) -> bool {
        matches!(self.kind, TokenKind::Comment | TokenKind::Punctuation)
    }
}
