//! Entity scanner
//!
//! Walks the token stream of a translation unit looking for class and enum
//! markers and turns every hit into a record. A marker that cannot be
//! processed is reported as a diagnostic and the scan moves on.

use super::{
    ClassRecord, EnumRecord, MAX_SCOPE_DEPTH, MarkerSet, ScanDiagnostic, ScanResult, find_members,
    resolve,
};
use crate::error::ScanError;
use crate::frontend::{CursorId, CursorKind, SourceUnit, Token, TranslationUnit};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    markers: MarkerSet,
}

impl Scanner {
    pub fn new(markers: MarkerSet) -> Self {
        Self { markers }
    }

    /// Scan a parsed header, tagging diagnostics with its path
    pub fn scan_header(&self, unit: &SourceUnit) -> ScanResult {
        self.scan_unit(unit, unit.path())
    }

    /// Scan any translation unit
    pub fn scan<U: TranslationUnit + ?Sized>(&self, unit: &U) -> ScanResult {
        self.scan_unit(unit, Path::new(""))
    }

    fn scan_unit<U: TranslationUnit + ?Sized>(&self, unit: &U, header: &Path) -> ScanResult {
        let mut result = ScanResult::default();

        for token in marker_tokens(unit, &self.markers.class) {
            match self.class_record(unit, token) {
                Ok(Some(record)) => {
                    tracing::debug!(
                        "Found class {} with {} properties and {} read-only properties",
                        record.path,
                        record.properties.len(),
                        record.readonly_properties.len()
                    );
                    result.classes.push(record);
                }
                Ok(None) => {}
                Err(error) => result.diagnostics.push(diagnostic(header, token, error)),
            }
        }

        for token in marker_tokens(unit, &self.markers.enum_) {
            match self.enum_record(unit, token) {
                Ok(Some(record)) => {
                    tracing::debug!(
                        "Found enum {} with {} elements",
                        record.path,
                        record.elements.len()
                    );
                    result.enums.push(record);
                }
                Ok(None) => {}
                Err(error) => result.diagnostics.push(diagnostic(header, token, error)),
            }
        }

        result
    }

    fn class_record<U: TranslationUnit + ?Sized>(
        &self,
        unit: &U,
        token: &Token,
    ) -> Result<Option<ClassRecord>, ScanError> {
        let Some(class) = enclosing(unit, token, CursorKind::is_class_or_struct)? else {
            tracing::trace!(
                "{} at byte {} is not inside a class or struct",
                token.spelling,
                token.span.start
            );
            return Ok(None);
        };
        let name = declared_name(unit, class)?;

        Ok(Some(ClassRecord {
            name,
            path: resolve(unit, class)?,
            properties: find_members(unit, class, &self.markers.property),
            readonly_properties: find_members(unit, class, &self.markers.readonly_property),
        }))
    }

    fn enum_record<U: TranslationUnit + ?Sized>(
        &self,
        unit: &U,
        token: &Token,
    ) -> Result<Option<EnumRecord>, ScanError> {
        let Some(decl) = enclosing(unit, token, |kind| kind == CursorKind::EnumDecl)? else {
            tracing::trace!(
                "{} at byte {} is not inside an enum",
                token.spelling,
                token.span.start
            );
            return Ok(None);
        };
        let name = declared_name(unit, decl)?;

        let elements = unit
            .children_of(decl)
            .iter()
            .filter(|child| unit.kind_of(**child) == Some(CursorKind::EnumConstantDecl))
            .filter_map(|child| unit.simple_name_of(*child))
            .map(str::to_string)
            .collect();

        Ok(Some(EnumRecord {
            name,
            path: resolve(unit, decl)?,
            elements,
        }))
    }
}

fn marker_tokens<'u, U: TranslationUnit + ?Sized>(
    unit: &'u U,
    marker: &'u str,
) -> impl Iterator<Item = &'u Token> {
    unit.tokens()
        .iter()
        .filter(move |token| token.is_identifier(marker) && !token.in_directive)
}

/// Nearest declaration at or above the token's owner whose kind matches
fn enclosing<U: TranslationUnit + ?Sized>(
    unit: &U,
    token: &Token,
    wanted: impl Fn(CursorKind) -> bool,
) -> Result<Option<CursorId>, ScanError> {
    let Some(start) = unit.declaration_of(token) else {
        return Ok(None);
    };
    let mut current = Some(start);
    let mut depth = 0;
    while let Some(cursor) = current {
        let kind = unit
            .kind_of(cursor)
            .ok_or(ScanError::DanglingCursor(cursor))?;
        if wanted(kind) {
            return Ok(Some(cursor));
        }
        depth += 1;
        if depth > MAX_SCOPE_DEPTH {
            return Err(ScanError::ScopeChainTooDeep {
                cursor: start,
                limit: MAX_SCOPE_DEPTH,
            });
        }
        current = unit.enclosing_scope_of(cursor);
    }
    Ok(None)
}

fn declared_name<U: TranslationUnit + ?Sized>(
    unit: &U,
    cursor: CursorId,
) -> Result<String, ScanError> {
    let kind = unit
        .kind_of(cursor)
        .ok_or(ScanError::DanglingCursor(cursor))?;
    match unit.simple_name_of(cursor) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ScanError::UnnamedDeclaration {
            kind: kind.as_str(),
            offset: unit.tokens_of(cursor).first().map_or(0, |t| t.span.start),
        }),
    }
}

fn diagnostic(header: &Path, token: &Token, error: ScanError) -> ScanDiagnostic {
    tracing::warn!(
        "Skipping {} at byte {} in '{}': {error}",
        token.spelling,
        token.span.start,
        header.display()
    );
    ScanDiagnostic {
        header: PathBuf::from(header),
        marker: token.spelling.clone(),
        offset: token.span.start,
        message: error.to_string(),
        error,
    }
}
