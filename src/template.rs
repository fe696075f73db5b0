//! Output file name templates
//!
//! The first run of `#` characters in a template is replaced by the
//! zero-padded overlay index: `slide-##.pdf` becomes `slide-07.pdf` for
//! overlay 7. Any later `#` is literal text.

use std::fmt;

use thiserror::Error;

/// Character marking the index placeholder
pub const PLACEHOLDER: char = '#';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template must contain #.")]
    MissingPlaceholder { template: String },

    #[error(
        "Overlay specification longer than template: overlay {index} needs {digits} digits, \
         template has {width}"
    )]
    TooNarrow { index: u32, digits: usize, width: usize },
}

/// A file path with one placeholder run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    raw: String,
    run_start: usize,
    run_len: usize,
}

impl OutputTemplate {
    /// Locate the first maximal placeholder run in `template`
    pub fn parse(template: impl Into<String>) -> Result<Self, TemplateError> {
        let raw = template.into();
        let Some(run_start) = raw.find(PLACEHOLDER) else {
            return Err(TemplateError::MissingPlaceholder { template: raw });
        };
        let run_len = raw[run_start..]
            .chars()
            .take_while(|&c| c == PLACEHOLDER)
            .count();
        Ok(Self {
            raw,
            run_start,
            run_len,
        })
    }

    /// Byte offset of the placeholder run
    pub fn run_start(&self) -> usize {
        self.run_start
    }

    /// Number of placeholder characters, the minimum index width
    pub fn run_len(&self) -> usize {
        self.run_len
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check that `max_index` fits into the placeholder run
    pub fn ensure_fits(&self, max_index: u32) -> Result<(), TemplateError> {
        let digits = decimal_width(max_index);
        if digits > self.run_len {
            return Err(TemplateError::TooNarrow {
                index: max_index,
                digits,
                width: self.run_len,
            });
        }
        Ok(())
    }

    /// Substitute the zero-padded `index` for the placeholder run
    pub fn expand(&self, index: u32) -> Result<String, TemplateError> {
        self.ensure_fits(index)?;
        // `#` is one byte, so the run's byte length is its character count
        let tail = &self.raw[self.run_start + self.run_len..];
        Ok(format!(
            "{}{:0width$}{}",
            &self.raw[..self.run_start],
            index,
            tail,
            width = self.run_len
        ))
    }
}

impl fmt::Display for OutputTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn decimal_width(n: u32) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locates_run() {
        let t = OutputTemplate::parse("out-##.pdf").unwrap();
        assert_eq!(t.run_start(), 4);
        assert_eq!(t.run_len(), 2);
    }

    #[test]
    fn test_missing_placeholder() {
        assert_eq!(
            OutputTemplate::parse("out.pdf"),
            Err(TemplateError::MissingPlaceholder {
                template: "out.pdf".to_string()
            })
        );
    }

    #[test]
    fn test_expand_pads() {
        let t = OutputTemplate::parse("out-##.pdf").unwrap();
        assert_eq!(t.expand(7).unwrap(), "out-07.pdf");
        assert_eq!(t.expand(42).unwrap(), "out-42.pdf");
    }

    #[test]
    fn test_expand_too_wide() {
        let t = OutputTemplate::parse("out-##.pdf").unwrap();
        assert_eq!(
            t.expand(123),
            Err(TemplateError::TooNarrow {
                index: 123,
                digits: 3,
                width: 2
            })
        );
    }

    #[test]
    fn test_only_first_run_is_substituted() {
        let t = OutputTemplate::parse("frames#/slide-###.png").unwrap();
        assert_eq!(t.run_len(), 1);
        assert_eq!(t.expand(3).unwrap(), "frames3/slide-###.png");
    }

    #[test]
    fn test_ensure_fits() {
        let t = OutputTemplate::parse("#").unwrap();
        assert!(t.ensure_fits(0).is_ok());
        assert!(t.ensure_fits(9).is_ok());
        assert!(t.ensure_fits(10).is_err());
    }

    #[test]
    fn test_decimal_width() {
        assert_eq!(decimal_width(0), 1);
        assert_eq!(decimal_width(9), 1);
        assert_eq!(decimal_width(10), 2);
        assert_eq!(decimal_width(u32::MAX), 10);
    }

    #[test]
    fn test_error_messages() {
        let err = OutputTemplate::parse("x").unwrap_err();
        assert_eq!(err.to_string(), "Template must contain #.");
    }
}
