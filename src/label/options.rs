//! Option mini-language shared by option layers and the command line
//!
//! A layer whose label starts with `-` carries command line flags, e.g. a
//! layer labelled `-e PNG -r 150` renders PNG frames at 150 dpi.

use crate::config::{ExportFormat, RunConfig};
use crate::error::{OptionError, OptionErrorKind, OptionSource, Span};

/// Whether a token asks for the usage text
pub fn is_help_flag(token: &str) -> bool {
    matches!(token, "-h" | "-?" | "--help")
}

/// Whether a label carries options rather than an overlay specification
pub fn is_option_label(label: &str) -> bool {
    label.starts_with('-')
}

/// Split an option label into argument tokens
///
/// Only the space character separates tokens. Runs of spaces never produce
/// empty tokens; there is no quoting.
pub fn tokenize_options(label: &str) -> Vec<String> {
    label
        .split(' ')
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect()
}

/// Result of applying a token list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Every token was consumed
    Complete,
    /// A help flag was found; tokens after it were not looked at
    HelpRequested,
}

/// Apply option tokens to `config`, in order
///
/// Each flag takes effect as soon as it is read, so on error the flags
/// before the offending one stay applied.
pub fn apply_options<S: AsRef<str>>(
    config: &mut RunConfig,
    tokens: &[S],
    source: &OptionSource,
) -> Result<Applied, OptionError> {
    let line = tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let spans = token_spans(tokens);
    let fail = |kind: OptionErrorKind, at: usize| OptionError {
        kind,
        origin: source.clone(),
        line: line.clone(),
        span: spans[at].clone(),
    };

    let mut i = 0;
    while i < tokens.len() {
        let flag = tokens[i].as_ref();
        match flag {
            _ if is_help_flag(flag) => return Ok(Applied::HelpRequested),
            "-e" => {
                let Some(value) = tokens.get(i + 1).map(AsRef::as_ref) else {
                    return Err(fail(OptionErrorKind::MissingFormat, i));
                };
                config.format = value
                    .parse::<ExportFormat>()
                    .map_err(|v| fail(OptionErrorKind::UnknownFormat(v), i + 1))?;
                i += 2;
            }
            "-r" => {
                let Some(value) = tokens.get(i + 1).map(AsRef::as_ref) else {
                    return Err(fail(OptionErrorKind::MissingResolution, i));
                };
                config.resolution = value
                    .parse::<u32>()
                    .map_err(|_| fail(OptionErrorKind::BadResolution(value.to_string()), i + 1))?;
                i += 2;
            }
            other => return Err(fail(OptionErrorKind::UnknownOption(other.to_string()), i)),
        }
        tracing::debug!(flag, source = %source.describe(), "applied option");
    }
    Ok(Applied::Complete)
}

/// Byte spans of each token within the tokens joined by single spaces
fn token_spans<S: AsRef<str>>(tokens: &[S]) -> Vec<Span> {
    let mut offset = 0;
    tokens
        .iter()
        .map(|tok| {
            let len = tok.as_ref().len();
            let span = offset..offset + len;
            offset += len + 1;
            span
        })
        .collect()
}
