//! tree-sitter backed header parser
//!
//! Lexes the header, erases empty marker macros, parses the erased text with
//! the C or C++ grammar and lowers the syntax tree into a [`CursorTree`].

use super::cursor::{CursorKind, CursorTreeBuilder};
use super::macros::harvest_empty_macros;
use super::{SourceUnit, Token, TokenKind, TranslationUnit, lexer};
use crate::config::{FrontendConfig, LanguageStandard};
use crate::error::{GenError, GenResult, ParseError, ParseResult};
use crate::reflect::MarkerSet;
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Deepest syntax node the lowering pass descends into
const MAX_AST_DEPTH: usize = 512;

pub struct HeaderParser {
    parser: Parser,
    standard: LanguageStandard,
    include_paths: Vec<PathBuf>,
    markers: Vec<String>,
    fail_on_syntax_errors: bool,
}

impl std::fmt::Debug for HeaderParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderParser")
            .field("language", &self.standard.language_name())
            .field("standard", &self.standard.as_str())
            .finish()
    }
}

impl HeaderParser {
    pub fn new(config: &FrontendConfig, markers: &MarkerSet) -> ParseResult<Self> {
        let standard = config.language_standard;

        if let Some(library_path) = &config.library_path {
            if !library_path.exists() {
                return Err(ParseError::ParserInit {
                    language: standard.language_name().to_string(),
                    reason: format!("library path '{}' does not exist", library_path.display()),
                });
            }
            tracing::debug!(
                "Grammars are linked statically, library path '{}' is only validated",
                library_path.display()
            );
        }

        let mut parser = Parser::new();
        let language: tree_sitter::Language = if standard.is_cxx() {
            tree_sitter_cpp::LANGUAGE.into()
        } else {
            tree_sitter_c::LANGUAGE.into()
        };
        parser
            .set_language(&language)
            .map_err(|e| ParseError::ParserInit {
                language: standard.language_name().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            parser,
            standard,
            include_paths: config.include_paths.clone(),
            markers: markers.names().map(str::to_string).collect(),
            fail_on_syntax_errors: config.fail_on_syntax_errors,
        })
    }

    /// Read and parse a header from disk
    pub fn parse_file(&mut self, path: &Path) -> GenResult<SourceUnit> {
        let bytes = std::fs::read(path).map_err(|source| GenError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8(bytes).map_err(|_| self.parse_error(path, ParseError::InvalidUtf8))?;
        self.parse_source(path, source)
    }

    /// Parse header text. `path` anchors relative includes and labels errors.
    pub fn parse_source(&mut self, path: impl Into<PathBuf>, source: String) -> GenResult<SourceUnit> {
        let path = path.into();
        let tokens = lexer::tokenize(&source);

        let mut erased_names =
            harvest_empty_macros(&mut self.parser, &source, &path, &self.include_paths);
        erased_names.extend(self.markers.iter().cloned());
        let erased = erase_identifiers(&source, &tokens, &erased_names)
            .map_err(|e| self.parse_error(&path, e))?;

        let tree = self.parser.parse(&erased, None).ok_or_else(|| {
            self.parse_error(
                &path,
                ParseError::SyntaxError {
                    line: 1,
                    column: 1,
                    reason: "parser produced no syntax tree".to_string(),
                },
            )
        })?;

        let syntax_errors = self.check_syntax(&tree, &path)?;

        let mut builder = CursorTreeBuilder::new(source.len());
        lower_children(tree.root_node(), &erased, &mut builder, 0);
        let unit = SourceUnit::from_parts(path, source, tokens, builder.finish())
            .with_syntax_errors(syntax_errors);

        tracing::debug!(
            "Parsed '{}' as {}: {} tokens, {} cursors, {} syntax errors",
            unit.path().display(),
            self.standard.as_str(),
            unit.tokens().len(),
            unit.tree().len(),
            syntax_errors
        );
        Ok(unit)
    }

    fn check_syntax(&self, tree: &Tree, path: &Path) -> GenResult<usize> {
        let root = tree.root_node();
        if !root.has_error() {
            return Ok(0);
        }
        let mut errors = Vec::new();
        collect_errors(root, &mut errors);
        let Some(first) = errors.first().copied() else {
            return Ok(0);
        };
        let line = first.start_position().row as u32 + 1;
        let column = first.start_position().column as u32 + 1;

        if self.fail_on_syntax_errors {
            return Err(self.parse_error(
                path,
                ParseError::SyntaxError {
                    line,
                    column,
                    reason: if first.is_missing() {
                        format!("missing '{}'", first.kind())
                    } else {
                        "unexpected tokens".to_string()
                    },
                },
            ));
        }
        tracing::warn!(
            "'{}' has {} syntax error(s), first at line {line}, column {column}; scanning anyway",
            path.display(),
            errors.len()
        );
        Ok(errors.len())
    }

    fn parse_error(&self, path: &Path, source: ParseError) -> GenError {
        GenError::Parse {
            path: path.to_path_buf(),
            language: self.standard.language_name().to_string(),
            source,
        }
    }
}

/// Blank every identifier in `names` outside preprocessor directives.
///
/// Byte offsets are preserved so spans of the original tokens stay valid
/// against the erased text.
fn erase_identifiers(
    source: &str,
    tokens: &[Token],
    names: &HashSet<String>,
) -> ParseResult<String> {
    let mut bytes = source.as_bytes().to_vec();
    for token in tokens {
        if token.kind == TokenKind::Identifier
            && !token.in_directive
            && names.contains(&token.spelling)
        {
            bytes[token.span.clone()].fill(b' ');
        }
    }
    String::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8)
}

/// Error and missing nodes in source order, found without recursion
fn collect_errors<'t>(root: Node<'t>, errors: &mut Vec<Node<'t>>) {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if node.is_error() || node.is_missing() {
            errors.push(node);
            continue;
        }
        if !node.has_error() {
            continue;
        }
        let start = pending.len();
        let mut cursor = node.walk();
        pending.extend(node.children(&mut cursor));
        pending[start..].reverse();
    }
}

fn lower_children(node: Node, code: &str, builder: &mut CursorTreeBuilder, depth: usize) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        lower_node(child, code, builder, depth + 1);
    }
}

fn lower_node(node: Node, code: &str, builder: &mut CursorTreeBuilder, depth: usize) {
    if depth > MAX_AST_DEPTH {
        tracing::warn!(
            "Syntax tree deeper than {MAX_AST_DEPTH} levels at byte {}, skipping subtree",
            node.start_byte()
        );
        return;
    }

    match node.kind() {
        "namespace_definition" => {
            let names = node
                .child_by_field_name("name")
                .map(|n| split_scope(&code[n.byte_range()]))
                .unwrap_or_else(|| vec![String::new()]);
            for name in &names {
                builder.open(CursorKind::Namespace, name.as_str(), node.byte_range());
            }
            if let Some(body) = node.child_by_field_name("body") {
                lower_children(body, code, builder, depth);
            }
            for _ in &names {
                builder.close();
            }
        }
        "class_specifier" | "struct_specifier" | "union_specifier" => {
            lower_record(node, code, builder, depth);
        }
        "enum_specifier" => lower_enum(node, code, builder, depth),
        "field_declaration" | "declaration" => lower_declaration(node, code, builder, depth),
        "function_definition" => {
            let name = node
                .child_by_field_name("declarator")
                .and_then(|d| declarator_name(d, code))
                .map(|(name, _)| name)
                .unwrap_or_default();
            let kind = if builder.current_kind().is_record() {
                CursorKind::Method
            } else {
                CursorKind::Function
            };
            builder.open(kind, name, node.byte_range());
            if let Some(body) = node.child_by_field_name("body") {
                lower_children(body, code, builder, depth);
            }
            builder.close();
        }
        // Friends name other declarations, they never declare members
        "friend_declaration" => {}
        _ => lower_children(node, code, builder, depth),
    }
}

fn lower_record(node: Node, code: &str, builder: &mut CursorTreeBuilder, depth: usize) {
    let name_node = node.child_by_field_name("name");
    let mut segments = name_node
        .map(|n| class_name_segments(n, code))
        .unwrap_or_default();
    let name = segments.pop().unwrap_or_default();

    let templated = node
        .parent()
        .is_some_and(|p| p.kind() == "template_declaration")
        || name_node.is_some_and(|n| n.kind() == "template_type");
    let kind = match node.kind() {
        _ if templated => CursorKind::ClassTemplate,
        "class_specifier" => CursorKind::ClassDecl,
        "struct_specifier" => CursorKind::StructDecl,
        _ => CursorKind::UnionDecl,
    };

    for qualifier in &segments {
        builder.open(CursorKind::Namespace, qualifier.as_str(), node.byte_range());
    }
    builder.open(kind, name, node.byte_range());
    if let Some(body) = node.child_by_field_name("body") {
        lower_children(body, code, builder, depth);
    }
    builder.close();
    for _ in &segments {
        builder.close();
    }
}

fn lower_enum(node: Node, code: &str, builder: &mut CursorTreeBuilder, depth: usize) {
    let mut segments = node
        .child_by_field_name("name")
        .map(|n| class_name_segments(n, code))
        .unwrap_or_default();
    let name = segments.pop().unwrap_or_default();

    for qualifier in &segments {
        builder.open(CursorKind::Namespace, qualifier.as_str(), node.byte_range());
    }
    builder.open(CursorKind::EnumDecl, name, node.byte_range());
    if let Some(body) = node.child_by_field_name("body") {
        lower_enumerators(body, code, builder, depth + 1);
    }
    builder.close();
    for _ in &segments {
        builder.close();
    }
}

fn lower_enumerators(node: Node, code: &str, builder: &mut CursorTreeBuilder, depth: usize) {
    if depth > MAX_AST_DEPTH {
        return;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "enumerator" => {
                if let Some(name_node) = child.child_by_field_name("name") {
                    builder.leaf(
                        CursorKind::EnumConstantDecl,
                        &code[name_node.byte_range()],
                        child.byte_range(),
                    );
                }
            }
            "comment" => {}
            // Enumerators wrapped in #if blocks or error recovery
            _ => lower_enumerators(child, code, builder, depth + 1),
        }
    }
}

/// Member declarations inside class bodies and plain declarations elsewhere.
///
/// Each declarator becomes its own cursor, like `int a, b;` declaring two
/// fields. A type specifier with a body (`struct { .. } s;`) is lowered as
/// a sibling that precedes the declarators.
fn lower_declaration(node: Node, code: &str, builder: &mut CursorTreeBuilder, depth: usize) {
    let mut cursor = node.walk();
    let declarators: Vec<Node> = node
        .children_by_field_name("declarator", &mut cursor)
        .collect();

    let mut declarators_start = node.start_byte();
    if let Some(type_node) = node.child_by_field_name("type") {
        let is_type_definition = matches!(
            type_node.kind(),
            "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier"
        );
        if is_type_definition
            && (type_node.child_by_field_name("body").is_some() || declarators.is_empty())
        {
            lower_node(type_node, code, builder, depth + 1);
            declarators_start = type_node.end_byte();
        }
    }

    let in_record = builder.current_kind().is_record();
    let is_static = has_storage_class(node, code, "static");

    for (index, declarator) in declarators.iter().enumerate() {
        let Some((name, callable)) = declarator_name(*declarator, code) else {
            continue;
        };
        let kind = match (callable, in_record) {
            (true, true) => CursorKind::Method,
            (true, false) => CursorKind::Function,
            (false, true) if !is_static => CursorKind::FieldDecl,
            (false, _) => CursorKind::Variable,
        };
        // The first declarator also owns the leading specifiers
        let start = if index == 0 {
            declarators_start
        } else {
            declarator.start_byte()
        };
        builder.leaf(kind, name, extent(start, declarator.end_byte()));
    }
}

fn extent(start: usize, end: usize) -> Range<usize> {
    start..end.max(start)
}

fn has_storage_class(node: Node, code: &str, specifier: &str) -> bool {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .any(|c| c.kind() == "storage_class_specifier" && code[c.byte_range()].trim() == specifier)
}

/// Simple name declared by a declarator and whether it declares a function.
///
/// `int (*callback)(int)` is a data member even though a function
/// declarator appears in it: the outermost function declarator decides.
fn declarator_name(node: Node, code: &str) -> Option<(String, bool)> {
    let mut node = node;
    let mut callable = None;
    for _ in 0..MAX_AST_DEPTH {
        match node.kind() {
            "field_identifier" | "identifier" | "type_identifier" | "destructor_name"
            | "operator_name" => {
                return Some((code[node.byte_range()].to_string(), callable.unwrap_or(false)));
            }
            "qualified_identifier" => node = node.child_by_field_name("name")?,
            "template_function" => {
                return node
                    .child_by_field_name("name")
                    .map(|n| (code[n.byte_range()].to_string(), callable.unwrap_or(true)));
            }
            "function_declarator" => {
                let inner = node.child_by_field_name("declarator")?;
                callable.get_or_insert(inner.kind() != "parenthesized_declarator");
                node = inner;
            }
            _ => {
                node = node.child_by_field_name("declarator").or_else(|| {
                    let mut cursor = node.walk();
                    node.named_children(&mut cursor).find(|c| {
                        c.kind().ends_with("declarator")
                            || matches!(
                                c.kind(),
                                "field_identifier"
                                    | "identifier"
                                    | "qualified_identifier"
                                    | "destructor_name"
                                    | "operator_name"
                            )
                    })
                })?;
            }
        }
    }
    tracing::debug!("Declarator nested deeper than {MAX_AST_DEPTH} levels");
    None
}

/// Scope segments of a class or enum name, `A::B<int>::C` → `[A, B, C]`
fn class_name_segments(node: Node, code: &str) -> Vec<String> {
    match node.kind() {
        "template_type" => node
            .child_by_field_name("name")
            .map(|n| vec![code[n.byte_range()].to_string()])
            .unwrap_or_default(),
        _ => split_scope(&code[node.byte_range()]),
    }
}

/// Split on `::` outside template arguments, dropping template arguments
/// and the empty leading segment of globally qualified names.
fn split_scope(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut angle_depth = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => angle_depth += 1,
            '>' => angle_depth = angle_depth.saturating_sub(1),
            ':' if angle_depth == 0 && chars.peek() == Some(&':') => {
                chars.next();
                segments.push(std::mem::take(&mut current));
            }
            c if angle_depth == 0 && !c.is_whitespace() => current.push(c),
            _ => {}
        }
    }
    segments.push(current);

    if segments.len() > 1 && segments[0].is_empty() {
        segments.remove(0);
    }
    segments
}
