//! Fully-qualified names from the semantic scope chain

use super::QualifiedPath;
use crate::error::ScanError;
use crate::frontend::{CursorId, CursorKind, TranslationUnit};

/// Longest scope chain walked before giving up
pub const MAX_SCOPE_DEPTH: usize = 256;

/// Qualified path of `cursor`: its own name when it is a class, struct or
/// enum, prefixed by every enclosing namespace and class/struct up to the
/// first scope of any other kind.
///
/// Anonymous scopes contribute no segment.
pub fn resolve<U: TranslationUnit + ?Sized>(
    unit: &U,
    cursor: CursorId,
) -> Result<QualifiedPath, ScanError> {
    let kind = unit
        .kind_of(cursor)
        .ok_or(ScanError::DanglingCursor(cursor))?;

    let mut segments = Vec::new();
    if kind.is_class_or_struct() || kind == CursorKind::EnumDecl {
        push_named(unit, cursor, &mut segments);
    }

    let mut current = cursor;
    let mut depth = 0;
    while let Some(parent) = unit.enclosing_scope_of(current) {
        depth += 1;
        if depth > MAX_SCOPE_DEPTH {
            return Err(ScanError::ScopeChainTooDeep {
                cursor,
                limit: MAX_SCOPE_DEPTH,
            });
        }
        match unit.kind_of(parent) {
            Some(CursorKind::Namespace | CursorKind::ClassDecl | CursorKind::StructDecl) => {
                push_named(unit, parent, &mut segments);
            }
            Some(_) => break,
            None => return Err(ScanError::DanglingCursor(parent)),
        }
        current = parent;
    }

    segments.reverse();
    Ok(QualifiedPath::new(segments))
}

fn push_named<U: TranslationUnit + ?Sized>(unit: &U, cursor: CursorId, segments: &mut Vec<String>) {
    if let Some(name) = unit.simple_name_of(cursor).filter(|name| !name.is_empty()) {
        segments.push(name.to_string());
    }
}
