//! Running the external exporter for one overlay

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::config::{ExportFormat, ExporterInterface, ExporterSettings};

/// A failed export of a single overlay
///
/// The driver logs these and carries on with the next overlay.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to run '{program}' (is it installed and on PATH?): {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}{}", format_stderr(.stderr))]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{0}")]
    Other(String),
}

fn format_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// One export job: a serialized document and where its rendering goes
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// Serialized document with this overlay's visibility applied
    pub source: &'a Path,
    /// Expanded output path
    pub target: &'a Path,
    pub format: ExportFormat,
    /// Resolution in dpi, used for PNG only
    pub resolution: u32,
}

/// Renders a serialized document into an output file
pub trait Exporter {
    fn export(&self, request: &ExportRequest<'_>) -> Result<(), ExportError>;
}

impl<E: Exporter + ?Sized> Exporter for &E {
    fn export(&self, request: &ExportRequest<'_>) -> Result<(), ExportError> {
        (**self).export(request)
    }
}

/// Exports through the Inkscape command line
#[derive(Debug, Clone, Default)]
pub struct InkscapeExporter {
    settings: ExporterSettings,
}

impl InkscapeExporter {
    pub fn new(settings: ExporterSettings) -> Self {
        Self { settings }
    }

    /// Arguments for one export, input document last
    pub fn arguments(&self, request: &ExportRequest<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match self.settings.interface {
            ExporterInterface::Legacy => {
                let mut target = OsString::from(format!("--export-{}=", request.format.extension()));
                target.push(request.target);
                args.push(target);
                if request.format == ExportFormat::Png {
                    args.push("--export-dpi".into());
                    args.push(request.resolution.to_string().into());
                }
                args.push("--export-area-drawing".into());
                args.push("--without-gui".into());
            }
            ExporterInterface::Modern => {
                args.push(format!("--export-type={}", request.format.extension()).into());
                let mut target = OsString::from("--export-filename=");
                target.push(request.target);
                args.push(target);
                if request.format == ExportFormat::Png {
                    args.push(format!("--export-dpi={}", request.resolution).into());
                }
                args.push("--export-area-drawing".into());
            }
        }
        args.extend(self.settings.extra_args.iter().map(OsString::from));
        args.push(request.source.into());
        args
    }

    /// The full command for one export
    pub fn command(&self, request: &ExportRequest<'_>) -> Command {
        let mut cmd = Command::new(&self.settings.program);
        cmd.args(self.arguments(request))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Exporter for InkscapeExporter {
    fn export(&self, request: &ExportRequest<'_>) -> Result<(), ExportError> {
        let mut cmd = self.command(request);
        tracing::debug!(command = ?cmd, "running exporter");

        let program = self.settings.program.clone();
        let output = cmd.output().map_err(|source| ExportError::Spawn {
            program: program.clone(),
            source,
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(ExportError::Failed {
                program,
                status: output.status,
                stderr,
            });
        }
        if !stderr.trim().is_empty() {
            tracing::debug!(stderr = %stderr.trim(), "exporter diagnostics");
        }
        Ok(())
    }
}
