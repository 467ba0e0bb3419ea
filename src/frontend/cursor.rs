//! Declaration cursors and the arena that owns them
//!
//! A cursor is the front-end's view of one declaration: its kind, simple
//! name, semantic parent and byte extent in the header. Cursors live in a
//! flat arena and refer to each other by [`CursorId`].

use serde::Serialize;
use std::ops::Range;

/// Index of a cursor inside a [`CursorTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CursorId(pub u32);

impl CursorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declaration kinds the scanner cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CursorKind {
    TranslationUnit,
    Namespace,
    ClassDecl,
    StructDecl,
    UnionDecl,
    EnumDecl,
    EnumConstantDecl,
    FieldDecl,
    Method,
    Function,
    Variable,
    ClassTemplate,
    Other,
}

impl CursorKind {
    /// Class or struct declaration, the two kinds a class marker attaches to
    pub fn is_class_or_struct(self) -> bool {
        matches!(self, CursorKind::ClassDecl | CursorKind::StructDecl)
    }

    /// Kinds that own data members
    pub fn is_record(self) -> bool {
        matches!(
            self,
            CursorKind::ClassDecl
                | CursorKind::StructDecl
                | CursorKind::UnionDecl
                | CursorKind::ClassTemplate
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CursorKind::TranslationUnit => "translation unit",
            CursorKind::Namespace => "namespace",
            CursorKind::ClassDecl => "class",
            CursorKind::StructDecl => "struct",
            CursorKind::UnionDecl => "union",
            CursorKind::EnumDecl => "enum",
            CursorKind::EnumConstantDecl => "enumerator",
            CursorKind::FieldDecl => "field",
            CursorKind::Method => "method",
            CursorKind::Function => "function",
            CursorKind::Variable => "variable",
            CursorKind::ClassTemplate => "class template",
            CursorKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CursorData {
    pub kind: CursorKind,
    pub name: String,
    pub parent: Option<CursorId>,
    pub children: Vec<CursorId>,
    pub extent: Range<usize>,
}

/// Arena of cursors rooted at a translation-unit cursor
#[derive(Debug, Clone)]
pub struct CursorTree {
    cursors: Vec<CursorData>,
}

impl CursorTree {
    pub fn root(&self) -> CursorId {
        CursorId(0)
    }

    pub fn get(&self, id: CursorId) -> Option<&CursorData> {
        self.cursors.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Innermost cursor whose extent contains `offset`.
    ///
    /// Falls back to the root for offsets outside every declaration.
    pub fn innermost_at(&self, offset: usize) -> CursorId {
        let mut current = self.root();
        loop {
            let children = &self.cursors[current.index()].children;
            // Children are sorted by start offset, so only the last child
            // starting at or before `offset` can contain it.
            let candidates =
                children.partition_point(|c| self.cursors[c.index()].extent.start <= offset);
            let next = candidates
                .checked_sub(1)
                .map(|last| children[last])
                .filter(|c| self.cursors[c.index()].extent.contains(&offset));
            match next {
                Some(child) => current = child,
                None => return current,
            }
        }
    }
}

/// Incremental builder used while walking a syntax tree in source order.
///
/// `open` pushes a scope that subsequent cursors nest under until the
/// matching `close`; `leaf` adds a cursor without entering it.
#[derive(Debug)]
pub struct CursorTreeBuilder {
    cursors: Vec<CursorData>,
    stack: Vec<CursorId>,
}

impl CursorTreeBuilder {
    pub fn new(source_len: usize) -> Self {
        let root = CursorData {
            kind: CursorKind::TranslationUnit,
            name: String::new(),
            parent: None,
            children: Vec::new(),
            extent: 0..source_len,
        };
        Self {
            cursors: vec![root],
            stack: vec![CursorId(0)],
        }
    }

    pub fn current(&self) -> CursorId {
        self.stack.last().copied().unwrap_or(CursorId(0))
    }

    pub fn current_kind(&self) -> CursorKind {
        self.cursors[self.current().index()].kind
    }

    pub fn open(
        &mut self,
        kind: CursorKind,
        name: impl Into<String>,
        extent: Range<usize>,
    ) -> CursorId {
        let id = self.leaf(kind, name, extent);
        self.stack.push(id);
        id
    }

    pub fn leaf(
        &mut self,
        kind: CursorKind,
        name: impl Into<String>,
        extent: Range<usize>,
    ) -> CursorId {
        let parent = self.current();
        let id = CursorId(self.cursors.len() as u32);
        self.cursors.push(CursorData {
            kind,
            name: name.into(),
            parent: Some(parent),
            children: Vec::new(),
            extent,
        });
        self.cursors[parent.index()].children.push(id);
        id
    }

    /// Leave the innermost open scope. The root is never closed.
    pub fn close(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn finish(mut self) -> CursorTree {
        let starts: Vec<usize> = self.cursors.iter().map(|c| c.extent.start).collect();
        for cursor in &mut self.cursors {
            cursor.children.sort_by_key(|c| (starts[c.index()], *c));
        }
        CursorTree {
            cursors: self.cursors,
        }
    }
}
