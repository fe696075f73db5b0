//! Run configuration and exporter settings
//!
//! [`RunConfig`] holds what the option mini-language can change (output
//! format and resolution). [`ExporterSettings`] describes how the external
//! exporter is invoked and is loaded from an optional TOML file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Output format produced by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Eps,
    Png,
}

impl ExportFormat {
    /// Lowercase name, also used as the Inkscape `--export-type`
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Eps => "eps",
            ExportFormat::Png => "png",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    /// Case-sensitive: only `PDF`, `EPS` and `PNG` are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PDF" => Ok(ExportFormat::Pdf),
            "EPS" => Ok(ExportFormat::Eps),
            "PNG" => Ok(ExportFormat::Png),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Eps => "EPS",
            ExportFormat::Png => "PNG",
        };
        f.write_str(name)
    }
}

/// Default export resolution in dots per inch
pub const DEFAULT_RESOLUTION: u32 = 90;

/// Settings the option mini-language can change
///
/// Options are applied from every option layer first and from the command
/// line last, so the value seen by the renderer is the last one written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Output format (`-e`)
    pub format: ExportFormat,
    /// Export resolution in dpi (`-r`), only used for PNG
    pub resolution: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl RunConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the export resolution
    pub fn with_resolution(mut self, dpi: u32) -> Self {
        self.resolution = dpi;
        self
    }
}

/// Errors that can occur when loading exporter settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read exporter settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse exporter settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Command line dialect of the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExporterInterface {
    /// Inkscape 0.x: `--export-pdf=FILE --without-gui`
    #[default]
    Legacy,
    /// Inkscape 1.x: `--export-type=pdf --export-filename=FILE`
    Modern,
}

/// How the external exporter is invoked
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExporterSettings {
    /// Program to run, looked up on `PATH` unless it is a path
    pub program: String,
    /// Command line dialect
    pub interface: ExporterInterface,
    /// Extra arguments placed before the input document
    pub extra_args: Vec<String>,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            program: "inkscape".to_string(),
            interface: ExporterInterface::default(),
            extra_args: Vec::new(),
        }
    }
}

impl ExporterSettings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string; missing keys keep their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the exporter program
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the command line dialect
    pub fn with_interface(mut self, interface: ExporterInterface) -> Self {
        self.interface = interface;
        self
    }
}
