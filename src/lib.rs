//! SVG Overlays - slide frames from a layered drawing
//!
//! Each layer of an Inkscape drawing names the overlays it appears on in its
//! label, e.g. `[1-3,5] Arrows`. This library renders one output file per
//! overlay with exactly those layers shown.
//!
//! # Example
//!
//! ```rust
//! use svg_overlays::{LayerCatalog, OverlayPlan, SvgDocument};
//!
//! let doc = SvgDocument::parse(r#"<svg>
//!     <g groupmode="layer" id="a" label="[1-2] Boxes"/>
//!     <g groupmode="layer" id="b" label="[2-3] Arrows"/>
//! </svg>"#).unwrap();
//!
//! let catalog = LayerCatalog::from_document(&doc);
//! let bounds = OverlayPlan::new(&catalog).bounds().unwrap();
//! assert_eq!((bounds.min, bounds.max), (1, 3));
//! ```

pub mod catalog;
pub mod config;
pub mod document;
pub mod driver;
pub mod error;
pub mod export;
pub mod label;
pub mod planner;
pub mod template;

use std::io::Write;
use std::path::PathBuf;

pub use catalog::{Layer, LayerCatalog};
pub use config::{ExportFormat, ExporterInterface, ExporterSettings, RunConfig, SettingsError};
pub use document::{DocumentError, NodeId, SvgDocument};
pub use driver::{RenderDriver, RenderSummary, Stage};
pub use error::{OptionError, OptionErrorKind, OptionSource};
pub use export::{ExportError, ExportRequest, Exporter, InkscapeExporter};
pub use label::{is_help_flag, Applied, OverlayRange, RangeSequence};
pub use planner::{OverlayBounds, OverlayPlan};
pub use template::{OutputTemplate, TemplateError};

use thiserror::Error;

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Missing or malformed command line arguments
    #[error("{0}")]
    Usage(String),

    /// Rejected option, from the command line or from an option layer
    #[error(transparent)]
    Options(#[from] OptionError),

    /// No layer label carries an overlay range
    #[error("No overlay specification found.")]
    NoOverlays,

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Export of one overlay failed; the driver recovers from this one
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OverlayError {
    /// Whether the full usage text should accompany this error
    pub fn prints_usage(&self) -> bool {
        matches!(
            self,
            OverlayError::Usage(_) | OverlayError::NoOverlays | OverlayError::Template(_)
        )
    }
}

/// Arguments of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Drawing to read
    pub input: PathBuf,
    /// Output path template with a `#` run
    pub template: String,
    /// Option tokens following the positional arguments
    pub options: Vec<String>,
}

impl Invocation {
    pub fn new(input: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            template: template.into(),
            options: Vec::new(),
        }
    }

    /// Append command line option tokens
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }
}

/// What the positional arguments ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Render(Invocation),
    Help,
}

impl Request {
    /// Interpret the positional arguments and the trailing option tokens
    ///
    /// A help flag in either positional asks for the usage text. A missing
    /// positional is a usage error.
    pub fn from_args(
        input: Option<String>,
        template: Option<String>,
        options: Vec<String>,
    ) -> Result<Self, OverlayError> {
        let is_help = |arg: &Option<String>| arg.as_deref().is_some_and(is_help_flag);
        if is_help(&input) || is_help(&template) {
            return Ok(Request::Help);
        }
        match (input, template) {
            (Some(input), Some(template)) => Ok(Request::Render(
                Invocation::new(input, template).with_options(options),
            )),
            (None, _) => Err(OverlayError::Usage("missing input drawing".to_string())),
            (Some(_), None) => Err(OverlayError::Usage("missing output template".to_string())),
        }
    }
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Rendered(RenderSummary),
    /// A help flag was given; nothing was rendered
    HelpRequested,
}

/// Process exit status for the result of a run
///
/// Only a rendered run succeeds; help and every fatal error exit with 1.
/// Failed exports of single overlays do not change the status.
pub fn exit_status(result: &Result<RunOutcome, OverlayError>) -> u8 {
    match result {
        Ok(RunOutcome::Rendered(_)) => 0,
        Ok(RunOutcome::HelpRequested) | Err(_) => 1,
    }
}

/// Render every overlay of a drawing
///
/// The template is checked first, then the drawing is read, options are
/// applied (option layers first, command line last), bounds are computed
/// and each overlay is exported in turn. Progress lines go to `out`.
pub fn run<E: Exporter, W: Write>(
    invocation: &Invocation,
    exporter: E,
    out: &mut W,
) -> Result<RunOutcome, OverlayError> {
    let template = OutputTemplate::parse(invocation.template.as_str())?;
    let document = SvgDocument::open(&invocation.input)?;

    let mut driver = RenderDriver::new(document, template, exporter);
    if driver.apply_options(&invocation.options)? == Applied::HelpRequested {
        return Ok(RunOutcome::HelpRequested);
    }
    driver.compute_bounds()?;
    let summary = driver.render(out)?;
    Ok(RunOutcome::Rendered(summary))
}

/// Usage text for the command line tool
pub fn usage(program: &str) -> String {
    format!(
        r#"usage: {program} input.svg template [options]

  -e [ PDF | EPS | PNG] : export format (default is PDF)
  -r <resolution>       : export resolution in dpi (default is 90, PNG only)
  -h, -?, --help        : show this help

Layers labelled "[1-3,5] ..." are shown on overlays 1, 2, 3 and 5.
Layers labelled "-e PNG ..." carry options; command line options win.
The first run of # in the template is replaced by the overlay number.

example: {program} drawing.svg figure-##.pdf"#
    )
}
