use super::{CursorId, CursorKind, CursorTree, Token, TranslationUnit};
use std::path::{Path, PathBuf};

/// A parsed header: original text, annotated tokens and declaration cursors
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: PathBuf,
    source: String,
    tokens: Vec<Token>,
    tree: CursorTree,
    syntax_errors: usize,
}

impl SourceUnit {
    /// Assemble a unit and annotate every token with the innermost cursor
    /// whose extent contains it.
    pub fn from_parts(
        path: impl Into<PathBuf>,
        source: String,
        mut tokens: Vec<Token>,
        tree: CursorTree,
    ) -> Self {
        for token in &mut tokens {
            token.cursor = Some(tree.innermost_at(token.span.start));
        }
        Self {
            path: path.into(),
            source,
            tokens,
            tree,
            syntax_errors: 0,
        }
    }

    pub fn with_syntax_errors(mut self, count: usize) -> Self {
        self.syntax_errors = count;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &CursorTree {
        &self.tree
    }

    pub fn syntax_errors(&self) -> usize {
        self.syntax_errors
    }
}

impl TranslationUnit for SourceUnit {
    fn root(&self) -> CursorId {
        self.tree.root()
    }

    fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn tokens_of(&self, cursor: CursorId) -> &[Token] {
        let Some(data) = self.tree.get(cursor) else {
            return &[];
        };
        let start = self
            .tokens
            .partition_point(|t| t.span.start < data.extent.start);
        let end = self
            .tokens
            .partition_point(|t| t.span.start < data.extent.end);
        &self.tokens[start..end.max(start)]
    }

    fn declaration_of(&self, token: &Token) -> Option<CursorId> {
        token.cursor
    }

    fn kind_of(&self, cursor: CursorId) -> Option<CursorKind> {
        self.tree.get(cursor).map(|c| c.kind)
    }

    fn simple_name_of(&self, cursor: CursorId) -> Option<&str> {
        self.tree.get(cursor).map(|c| c.name.as_str())
    }

    fn enclosing_scope_of(&self, cursor: CursorId) -> Option<CursorId> {
        self.tree.get(cursor).and_then(|c| c.parent)
    }

    fn children_of(&self, cursor: CursorId) -> &[CursorId] {
        self.tree
            .get(cursor)
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{CursorTreeBuilder, lexer};

    #[test]
    fn test_tokens_of_is_bounded_by_extent() {
        let source = "int a; struct S { int b; }; int c;".to_string();
        let start = source.find("struct").unwrap();
        let end = source.find("};").unwrap() + 1;
        let mut builder = CursorTreeBuilder::new(source.len());
        let s = builder.open(CursorKind::StructDecl, "S", start..end);
        builder.close();
        let unit = SourceUnit::from_parts(
            "s.h",
            source.clone(),
            lexer::tokenize(&source),
            builder.finish(),
        );

        let spellings: Vec<_> = unit
            .tokens_of(s)
            .iter()
            .map(|t| t.spelling.as_str())
            .collect();
        assert_eq!(spellings, vec!["struct", "S", "{", "int", "b", ";", "}"]);
        assert_eq!(unit.declaration_of(&unit.tokens()[0]), Some(unit.root()));
        assert_eq!(unit.tokens_of(CursorId(99)).len(), 0);
    }
}
