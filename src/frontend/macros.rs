//! Discovery of empty object-like macros.
//!
//! Marker macros are normally defined empty in a helper header
//! (`#define REGISTER_CLASS`). The syntax tree never sees a preprocessor
//! expansion, so every such name is collected here and later erased from
//! the text before parsing. Quoted includes are resolved next to the
//! including file first, then against the configured include paths;
//! angle-bracket includes only against the include paths.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

const MAX_INCLUDE_DEPTH: usize = 16;
const MAX_HEADERS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
struct IncludeDirective {
    path: String,
    quoted: bool,
}

/// Names of `#define NAME` macros with an empty body, found in `source` and
/// in the headers it includes (transitively).
pub fn harvest_empty_macros(
    parser: &mut Parser,
    source: &str,
    origin: &Path,
    include_paths: &[PathBuf],
) -> HashSet<String> {
    let mut names = HashSet::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    visited.insert(canonical(origin));

    let mut queue: VecDeque<(PathBuf, String, usize)> = VecDeque::new();
    queue.push_back((origin.to_path_buf(), source.to_string(), 0));

    while let Some((path, text, depth)) = queue.pop_front() {
        let Some(tree) = parser.parse(&text, None) else {
            tracing::debug!("Skipping macro discovery for '{}'", path.display());
            continue;
        };
        let mut includes = Vec::new();
        collect_directives(tree.root_node(), &text, &mut names, &mut includes);

        if depth >= MAX_INCLUDE_DEPTH {
            continue;
        }
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        for include in includes {
            let Some(resolved) = resolve_include(&include, &base_dir, include_paths) else {
                tracing::trace!("Include '{}' not found on search path", include.path);
                continue;
            };
            if visited.len() >= MAX_HEADERS || !visited.insert(canonical(&resolved)) {
                continue;
            }
            match std::fs::read_to_string(&resolved) {
                Ok(content) => queue.push_back((resolved, content, depth + 1)),
                Err(e) => {
                    tracing::debug!("Cannot read include '{}': {e}", resolved.display());
                }
            }
        }
    }

    names
}

/// Iterative walk, expression nesting in the tree is unbounded.
fn collect_directives(
    root: Node,
    code: &str,
    names: &mut HashSet<String>,
    includes: &mut Vec<IncludeDirective>,
) {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        match node.kind() {
            "preproc_def" => {
                if node.child_by_field_name("value").is_none() {
                    if let Some(name_node) = node.child_by_field_name("name") {
                        names.insert(code[name_node.byte_range()].to_string());
                    }
                }
                continue;
            }
            "preproc_include" => {
                if let Some(path_node) = node.child_by_field_name("path") {
                    let path_text = &code[path_node.byte_range()];
                    let quoted = path_text.starts_with('"');
                    let clean_path =
                        path_text.trim_matches(|c| c == '"' || c == '<' || c == '>');
                    includes.push(IncludeDirective {
                        path: clean_path.to_string(),
                        quoted,
                    });
                }
                continue;
            }
            _ => {}
        }

        // Reversed so children pop in source order
        let start = pending.len();
        let mut cursor = node.walk();
        pending.extend(node.named_children(&mut cursor));
        pending[start..].reverse();
    }
}

fn resolve_include(
    include: &IncludeDirective,
    base_dir: &Path,
    include_paths: &[PathBuf],
) -> Option<PathBuf> {
    let local = include.quoted.then(|| base_dir.join(&include.path));
    local
        .into_iter()
        .chain(include_paths.iter().map(|dir| dir.join(&include.path)))
        .find(|candidate| candidate.is_file())
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cpp_parser() -> Parser {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .unwrap();
        parser
    }

    #[test]
    fn test_only_empty_object_like_macros_are_collected() {
        let source = "#define EMPTY\n#define VALUE 42\n#define CALL(x) x\nint a;\n";
        let names = harvest_empty_macros(&mut cpp_parser(), source, Path::new("a.h"), &[]);
        assert!(names.contains("EMPTY"));
        assert!(!names.contains("VALUE"));
        assert!(!names.contains("CALL"));
    }

    #[test]
    fn test_follows_quoted_and_search_path_includes() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("local.h");
        let search_dir = temp_dir.path().join("include");
        fs::create_dir_all(search_dir.join("reg")).unwrap();
        fs::write(&local, "#define LOCAL_API\n").unwrap();
        fs::write(
            search_dir.join("reg/markers.h"),
            "#pragma once\n#define REGISTER_THING\n#include \"nested.h\"\n",
        )
        .unwrap();
        fs::write(search_dir.join("reg/nested.h"), "#define NESTED_API\n").unwrap();

        let origin = temp_dir.path().join("main.h");
        let source = "#include \"local.h\"\n#include <reg/markers.h>\n";
        let names = harvest_empty_macros(&mut cpp_parser(), source, &origin, &[search_dir]);

        assert!(names.contains("LOCAL_API"));
        assert!(names.contains("REGISTER_THING"));
        assert!(names.contains("NESTED_API"));
    }

    #[test]
    fn test_include_cycles_terminate() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.h");
        let b = temp_dir.path().join("b.h");
        fs::write(&a, "#include \"b.h\"\n#define FROM_A\n").unwrap();
        fs::write(&b, "#include \"a.h\"\n#define FROM_B\n").unwrap();

        let source = fs::read_to_string(&a).unwrap();
        let names = harvest_empty_macros(&mut cpp_parser(), &source, &a, &[]);
        assert!(names.contains("FROM_A"));
        assert!(names.contains("FROM_B"));
    }

    #[test]
    fn test_deeply_nested_initializer() {
        let depth = 100_000;
        let source = format!(
            "#define BEFORE\nint x = {}1{};\n#define AFTER\n",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let names = harvest_empty_macros(&mut cpp_parser(), &source, Path::new("deep.h"), &[]);
        assert!(names.contains("BEFORE"));
        assert!(names.contains("AFTER"));
    }
}
