//! Parsing front-end
//!
//! Turns a header into a [`TranslationUnit`]: a token stream where every
//! token points back at its owning declaration, and a cursor tree with
//! kinds, simple names and semantic parents. The scanner only ever talks
//! to the trait, so tests can hand-assemble units with a
//! [`CursorTreeBuilder`].

pub mod cursor;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod token;
pub mod unit;

pub use cursor::{CursorData, CursorId, CursorKind, CursorTree, CursorTreeBuilder};
pub use parser::HeaderParser;
pub use token::{Token, TokenKind};
pub use unit::SourceUnit;

/// Read-only view of a parsed translation unit
pub trait TranslationUnit {
    /// Cursor of the translation unit itself
    fn root(&self) -> CursorId;

    /// Every token of the unit in lexical order
    fn tokens(&self) -> &[Token];

    /// Tokens lexically inside the extent of `cursor`
    fn tokens_of(&self, cursor: CursorId) -> &[Token];

    fn declaration_of(&self, token: &Token) -> Option<CursorId>;

    fn kind_of(&self, cursor: CursorId) -> Option<CursorKind>;

    fn simple_name_of(&self, cursor: CursorId) -> Option<&str>;

    /// Semantic parent, `None` for the root
    fn enclosing_scope_of(&self, cursor: CursorId) -> Option<CursorId>;

    fn children_of(&self, cursor: CursorId) -> &[CursorId];
}
