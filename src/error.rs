//! Error types for the option mini-language

use std::fmt;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in an option line
pub type Span = std::ops::Range<usize>;

/// Where a list of option tokens came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    /// A layer whose label starts with `-`
    Layer { label: String },
    /// Arguments following the input and template on the command line
    CommandLine,
}

impl OptionSource {
    /// Short name used as the file name in diagnostics
    pub fn describe(&self) -> String {
        match self {
            OptionSource::Layer { label } => format!("layer \"{}\"", label),
            OptionSource::CommandLine => "command line".to_string(),
        }
    }
}

impl fmt::Display for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSource::Layer { label } => write!(f, " (in layer \"{}\")", label),
            OptionSource::CommandLine => Ok(()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionErrorKind {
    #[error("no output type given")]
    MissingFormat,
    #[error("unknown output format '{0}'")]
    UnknownFormat(String),
    #[error("no resolution given")]
    MissingResolution,
    #[error("wrong resolution '{0}'")]
    BadResolution(String),
    #[error("unknown option {0}")]
    UnknownOption(String),
}

/// A flag or flag value the option mini-language rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}{origin}")]
pub struct OptionError {
    pub kind: OptionErrorKind,
    pub origin: OptionSource,
    /// Tokens joined by single spaces
    pub line: String,
    /// Offending token within `line`
    pub span: Span,
}

impl OptionError {
    /// Format the error with the option line as context using ariadne
    pub fn format(&self) -> String {
        self.format_with_color(false)
    }

    /// Like [`OptionError::format`], optionally with terminal colors
    pub fn format_with_color(&self, color: bool) -> String {
        let name = self.origin.describe();
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, name.as_str(), self.span.start)
            .with_config(Config::default().with_color(color))
            .with_message(self.kind.to_string())
            .with_label(
                Label::new((name.as_str(), self.span.clone()))
                    .with_message(self.kind.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .write((name.as_str(), Source::from(self.line.as_str())), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}
