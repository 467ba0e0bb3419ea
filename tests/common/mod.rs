#![allow(dead_code)]

use autoreg::{FrontendConfig, HeaderParser, MarkerSet, ScanResult, Scanner, SourceUnit};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}

/// Parse `code` as a C++17 header with the default markers
pub fn parse_header(code: &str) -> SourceUnit {
    parse_with(code, &FrontendConfig::default())
}

pub fn parse_with(code: &str, config: &FrontendConfig) -> SourceUnit {
    let mut parser =
        HeaderParser::new(config, &MarkerSet::default()).expect("Failed to create parser");
    parser
        .parse_source("test.h", code.to_string())
        .expect("Failed to parse header")
}

/// Parse and scan `code` with the default markers
pub fn scan_header(code: &str) -> ScanResult {
    Scanner::default().scan_header(&parse_header(code))
}

/// Text with all whitespace removed, for layout-insensitive comparisons
pub fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Marker definitions normally shipped in a helper header
pub const MARKERS_HEADER: &str = r#"#pragma once
#define REGISTER_CLASS
#define REGISTER_PROPERTY
#define REGISTER_READONLY_PROPERTY
#define REGISTER_ENUM
"#;
