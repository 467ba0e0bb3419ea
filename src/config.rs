//! Configuration module for the registration generator.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `AUTOREG_` and use double
//! underscores to separate nested levels:
//! - `AUTOREG_FRONTEND__LANGUAGE_STANDARD=c++20` sets `frontend.language_standard`
//! - `AUTOREG_OUTPUT__BANNER="Generated"` sets `output.banner`
//! - `AUTOREG_DEBUG=true` sets `debug`

use crate::error::{GenError, GenResult};
use crate::reflect::MarkerSet;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Name of the configuration file looked up in the working directory and
/// its ancestors
pub const CONFIG_FILE_NAME: &str = "autoreg.toml";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Parsing front-end settings
    #[serde(default)]
    pub frontend: FrontendConfig,

    /// Marker identifiers recognized in headers
    #[serde(default)]
    pub markers: MarkerSet,

    /// Generated artifact settings
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FrontendConfig {
    /// Directories searched for `#include`d headers
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,

    /// Location of an external front-end library. Grammars are bundled, so
    /// this is only checked for existence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_path: Option<PathBuf>,

    /// Language dialect the headers are written in
    #[serde(default)]
    pub language_standard: LanguageStandard,

    /// Extensions treated as headers when the input is a directory
    #[serde(default = "default_header_extensions")]
    pub header_extensions: Vec<String>,

    /// Abort on the first syntax error instead of scanning what parsed
    #[serde(default = "default_false")]
    pub fail_on_syntax_errors: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Header of the reflection registry, included with angle brackets
    #[serde(default = "default_registry_header")]
    pub registry_header: String,

    /// Text of the leading `//` comment
    #[serde(default = "default_banner")]
    pub banner: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum LanguageStandard {
    #[serde(rename = "c99")]
    C99,
    #[serde(rename = "c11")]
    C11,
    #[serde(rename = "c17")]
    C17,
    #[serde(rename = "c++11")]
    Cxx11,
    #[serde(rename = "c++14")]
    Cxx14,
    #[default]
    #[serde(rename = "c++17")]
    Cxx17,
    #[serde(rename = "c++20")]
    Cxx20,
    #[serde(rename = "c++23")]
    Cxx23,
}

impl LanguageStandard {
    pub const ALL: [LanguageStandard; 8] = [
        LanguageStandard::C99,
        LanguageStandard::C11,
        LanguageStandard::C17,
        LanguageStandard::Cxx11,
        LanguageStandard::Cxx14,
        LanguageStandard::Cxx17,
        LanguageStandard::Cxx20,
        LanguageStandard::Cxx23,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageStandard::C99 => "c99",
            LanguageStandard::C11 => "c11",
            LanguageStandard::C17 => "c17",
            LanguageStandard::Cxx11 => "c++11",
            LanguageStandard::Cxx14 => "c++14",
            LanguageStandard::Cxx17 => "c++17",
            LanguageStandard::Cxx20 => "c++20",
            LanguageStandard::Cxx23 => "c++23",
        }
    }

    pub fn is_cxx(self) -> bool {
        !matches!(
            self,
            LanguageStandard::C99 | LanguageStandard::C11 | LanguageStandard::C17
        )
    }

    /// Grammar used for this dialect
    pub fn language_name(self) -> &'static str {
        if self.is_cxx() { "C++" } else { "C" }
    }
}

impl fmt::Display for LanguageStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageStandard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace("cxx", "c++");
        Self::ALL
            .into_iter()
            .find(|standard| standard.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!(
                    "unknown language standard '{s}', expected one of: {}",
                    known.join(", ")
                )
            })
    }
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_header_extensions() -> Vec<String> {
    ["h", "hh", "hpp", "hxx"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_registry_header() -> String {
    "rttr/registration".to_string()
}
fn default_banner() -> String {
    "Auto-generated code".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            debug: false,
            frontend: FrontendConfig::default(),
            markers: MarkerSet::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            include_paths: Vec::new(),
            library_path: None,
            language_standard: LanguageStandard::default(),
            header_extensions: default_header_extensions(),
            fail_on_syntax_errors: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            registry_header: default_registry_header(),
            banner: default_banner(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources, discovering `autoreg.toml`
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path =
            Self::find_config_file().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(path.as_ref()))
            // Double underscore separates nested levels, single underscores
            // stay part of the field name
            .merge(Env::prefixed("AUTOREG_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Search the current directory and its ancestors for `autoreg.toml`
    pub fn find_config_file() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Reject settings the generator cannot work with
    pub fn validate(&self) -> GenResult<()> {
        let invalid = |reason: String| Err(GenError::ConfigError { reason });

        for (role, name) in self.markers.roles() {
            if !is_identifier(name) {
                return invalid(format!(
                    "markers.{role} = '{name}' is not a valid C/C++ identifier"
                ));
            }
        }
        let mut names: Vec<&str> = self.markers.names().collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return invalid(format!("marker '{}' is assigned to more than one role", pair[0]));
        }

        if self.frontend.header_extensions.is_empty() {
            return invalid("frontend.header_extensions must not be empty".to_string());
        }
        if self.output.registry_header.trim().is_empty() {
            return invalid("output.registry_header must not be empty".to_string());
        }
        if self.output.banner.contains('\n') {
            return invalid("output.banner must be a single line".to_string());
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
