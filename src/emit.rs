//! Registration source emitter
//!
//! Renders scanned records into a single C++ translation unit that
//! registers them with the reflection registry. Rendering is pure and
//! order-preserving, so identical records always produce identical bytes.

use crate::config::OutputConfig;
use crate::error::{GenError, GenResult};
use crate::reflect::{ClassRecord, EnumRecord, ScanResult};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RegistrationEmitter {
    registry_header: String,
    banner: String,
}

impl Default for RegistrationEmitter {
    fn default() -> Self {
        Self::new(&OutputConfig::default())
    }
}

impl RegistrationEmitter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            registry_header: config.registry_header.clone(),
            banner: config.banner.clone(),
        }
    }

    /// Full text of the artifact. `includes` are the header paths as they
    /// should appear between the quotes.
    pub fn render(&self, records: &ScanResult, includes: &[String]) -> String {
        Registration {
            emitter: self,
            records,
            includes,
        }
        .to_string()
    }

    /// Write a rendered artifact in one go, replacing any previous file
    pub fn write_to(&self, path: &Path, text: &str) -> GenResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| GenError::FileWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, text).map_err(|source| GenError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Wrote {} bytes to '{}'", text.len(), path.display());
        Ok(())
    }

    /// Render and write
    pub fn emit(&self, records: &ScanResult, includes: &[String], path: &Path) -> GenResult<String> {
        let text = self.render(records, includes);
        self.write_to(path, &text)?;
        Ok(text)
    }
}

struct Registration<'a> {
    emitter: &'a RegistrationEmitter,
    records: &'a ScanResult,
    includes: &'a [String],
}

impl fmt::Display for Registration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "// {}", self.emitter.banner)?;
        writeln!(f, "#include <{}>", self.emitter.registry_header)?;
        for include in self.includes {
            writeln!(f, "#include \"{include}\"")?;
        }
        writeln!(f, "using namespace rttr;")?;
        writeln!(f)?;
        writeln!(f, "RTTR_REGISTRATION")?;
        writeln!(f, "{{")?;
        writeln!(f, "  using namespace rttr;")?;
        writeln!(f)?;

        for class in &self.records.classes {
            write_class(f, class)?;
        }
        for enumeration in &self.records.enums {
            write_enum(f, enumeration)?;
        }

        writeln!(f, "}}")
    }
}

fn write_class(f: &mut fmt::Formatter<'_>, class: &ClassRecord) -> fmt::Result {
    let path = &class.path;
    write!(f, "  registration::class_<{path}>(\"{}\")", class.name)?;
    for property in &class.properties {
        write!(f, "\n      .property(\"{property}\", &{path}::{property})")?;
    }
    for property in &class.readonly_properties {
        write!(f, "\n      .property_readonly(\"{property}\", &{path}::{property})")?;
    }
    writeln!(f, ";")?;
    writeln!(f)
}

fn write_enum(f: &mut fmt::Formatter<'_>, enumeration: &EnumRecord) -> fmt::Result {
    let path = &enumeration.path;
    writeln!(f, "  registration::enumeration<{path}>(\"{}\")", enumeration.name)?;
    write!(f, "     (")?;
    for (index, element) in enumeration.elements.iter().enumerate() {
        let separator = if index + 1 < enumeration.elements.len() { "," } else { "" };
        write!(f, "\n            value(\"{element}\", {path}::{element}){separator}")?;
    }
    writeln!(f, "\n     );")?;
    writeln!(f)
}
