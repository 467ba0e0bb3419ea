//! Positional binding of property markers to data members

use crate::frontend::{CursorId, CursorKind, TranslationUnit};

/// Names of the data members annotated by `marker` inside `class`.
///
/// For every occurrence of the marker, the tokens that follow it are
/// scanned (comments and punctuation skipped) until one belongs to a field
/// declaration. Markers named on directive lines are not occurrences. Only the class's own tokens are considered, so a trailing
/// marker with nothing after it contributes nothing. Repeated markers on
/// the same member yield repeated names.
pub fn find_members<U: TranslationUnit + ?Sized>(
    unit: &U,
    class: CursorId,
    marker: &str,
) -> Vec<String> {
    let tokens = unit.tokens_of(class);
    let mut members = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if !token.is_identifier(marker) || token.in_directive {
            continue;
        }
        let field = tokens[index + 1..]
            .iter()
            .filter(|t| !t.is_comment_or_punctuation())
            .find_map(|t| unit.declaration_of(t).and_then(|c| enclosing_field(unit, c)));

        match field.and_then(|f| unit.simple_name_of(f)) {
            Some(name) => members.push(name.to_string()),
            None => tracing::trace!(
                "{marker} at byte {} is not followed by a data member",
                token.span.start
            ),
        }
    }

    members
}

/// `cursor` itself or its nearest ancestor that is a field
fn enclosing_field<U: TranslationUnit + ?Sized>(unit: &U, cursor: CursorId) -> Option<CursorId> {
    let mut current = Some(cursor);
    let mut depth = 0;
    while let Some(id) = current {
        if unit.kind_of(id)? == CursorKind::FieldDecl {
            return Some(id);
        }
        depth += 1;
        if depth > super::MAX_SCOPE_DEPTH {
            return None;
        }
        current = unit.enclosing_scope_of(id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{CursorTreeBuilder, SourceUnit, lexer};

    /// Hand-assembled unit for `source` with one class spanning the whole
    /// text and a field cursor for every `(name, extent-text)` pair.
    fn class_with_fields(source: &str, fields: &[(&str, &str)]) -> (SourceUnit, CursorId) {
        let mut builder = CursorTreeBuilder::new(source.len());
        let class = builder.open(CursorKind::ClassDecl, "Foo", 0..source.len());
        for (name, text) in fields {
            let start = source.find(text).unwrap();
            builder.leaf(CursorKind::FieldDecl, *name, start..start + text.len());
        }
        let unit = SourceUnit::from_parts(
            "foo.h",
            source.to_string(),
            lexer::tokenize(source),
            builder.finish(),
        );
        (unit, class)
    }

    #[test]
    fn test_marker_binds_to_following_field() {
        let source = "class Foo { REGISTER_PROPERTY int x; int y; };";
        let (unit, class) = class_with_fields(source, &[("x", "int x"), ("y", "int y")]);
        assert_eq!(find_members(&unit, class, "REGISTER_PROPERTY"), vec!["x"]);
    }

    #[test]
    fn test_comments_between_marker_and_field_are_skipped() {
        let source = "class Foo { REGISTER_PROPERTY /* speed */ // units\n float v; };";
        let (unit, class) = class_with_fields(source, &[("v", "float v")]);
        assert_eq!(find_members(&unit, class, "REGISTER_PROPERTY"), vec!["v"]);
    }

    #[test]
    fn test_trailing_marker_contributes_nothing() {
        let source = "class Foo { REGISTER_PROPERTY int x; REGISTER_PROPERTY };";
        let (unit, class) = class_with_fields(source, &[("x", "int x")]);
        assert_eq!(find_members(&unit, class, "REGISTER_PROPERTY"), vec!["x"]);
    }

    #[test]
    fn test_duplicate_markers_duplicate_members() {
        let source = "class Foo { REGISTER_PROPERTY REGISTER_PROPERTY int x; };";
        let (unit, class) = class_with_fields(source, &[("x", "int x")]);
        assert_eq!(
            find_members(&unit, class, "REGISTER_PROPERTY"),
            vec!["x", "x"]
        );
    }

    #[test]
    fn test_other_markers_are_ignored() {
        let source = "class Foo { REGISTER_READONLY_PROPERTY int x; };";
        let (unit, class) = class_with_fields(source, &[("x", "int x")]);
        assert!(find_members(&unit, class, "REGISTER_PROPERTY").is_empty());
        assert_eq!(
            find_members(&unit, class, "REGISTER_READONLY_PROPERTY"),
            vec!["x"]
        );
    }
}
