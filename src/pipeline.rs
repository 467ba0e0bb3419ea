//! Parse → Scan → Emit driver
//!
//! One run parses every input header, scans it for markers and writes a
//! single registration artifact at the end. Nothing is written unless every
//! header parsed.

use crate::config::Settings;
use crate::emit::RegistrationEmitter;
use crate::error::{ErrorContext, GenError, GenResult};
use crate::frontend::HeaderParser;
use crate::io::{absolutize, expand_user, relative_to};
use crate::reflect::{ScanDiagnostic, ScanResult, Scanner};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub output: PathBuf,
    pub headers_scanned: usize,
    pub classes: usize,
    pub enums: usize,
    /// Include paths written into the artifact, relative to its directory
    pub includes: Vec<String>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

#[derive(Debug, Clone)]
pub struct Generator {
    settings: Settings,
}

impl Generator {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Generate the registration source for `input` (a header or a
    /// directory of headers) into `output`
    pub fn run(&self, input: &Path, output: &Path) -> GenResult<GenerationReport> {
        let input = absolutize(&expand_user(input)).context("Cannot resolve input path")?;
        let output = absolutize(&expand_user(output)).context("Cannot resolve output path")?;

        if !input.exists() {
            return Err(GenError::InputNotFound { path: input });
        }

        let single_file = !input.is_dir();
        let headers = if single_file {
            vec![input.clone()]
        } else {
            self.collect_headers(&input)
        };
        tracing::info!(
            "Scanning {} header(s) from '{}'",
            headers.len(),
            input.display()
        );

        let mut parser = HeaderParser::new(&self.settings.frontend, &self.settings.markers)
            .map_err(|source| GenError::FrontendInit { source })?;
        let scanner = Scanner::new(self.settings.markers.clone());
        let output_dir = output.parent().unwrap_or(Path::new("/"));

        let mut records = ScanResult::default();
        let mut includes = Vec::new();
        for header in &headers {
            let unit = parser.parse_file(header)?;
            let scanned = scanner.scan_header(&unit);

            if single_file || !scanned.is_empty() {
                includes.push(relative_to(header, output_dir));
            }
            tracing::debug!(
                "'{}': {} classes, {} enums",
                header.display(),
                scanned.classes.len(),
                scanned.enums.len()
            );
            records.merge(scanned);
        }

        let emitter = RegistrationEmitter::new(&self.settings.output);
        emitter.emit(&records, &includes, &output)?;

        Ok(GenerationReport {
            output,
            headers_scanned: headers.len(),
            classes: records.classes.len(),
            enums: records.enums.len(),
            includes,
            diagnostics: records.diagnostics,
        })
    }

    /// Every file below `dir` with a configured header extension, sorted
    fn collect_headers(&self, dir: &Path) -> Vec<PathBuf> {
        let extensions = &self.settings.frontend.header_extensions;
        WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under '{}': {e}", dir.display());
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
            })
            .collect()
    }
}
