//! Overlay ranges parsed from a layer label
//!
//! A label such as `[1-3,5] Arrows` makes its layer visible on overlays
//! 1, 2, 3 and 5. Each comma separated token is either `<n>` or `<lo>-<hi>`;
//! the first token that is neither ends the sequence.

use std::fmt;

use super::lexer::{bracket_body, lex, SpecToken};

/// Inclusive span of overlay indices during which a layer is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayRange {
    pub lo: u32,
    pub hi: u32,
}

impl OverlayRange {
    /// Build a range, swapping reversed bounds so that `lo <= hi` always holds
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    /// A range covering exactly one overlay
    pub fn single(index: u32) -> Self {
        Self {
            lo: index,
            hi: index,
        }
    }

    pub fn contains(&self, index: u32) -> bool {
        self.lo <= index && index <= self.hi
    }
}

impl fmt::Display for OverlayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lo == self.hi {
            write!(f, "{}", self.lo)
        } else {
            write!(f, "{}-{}", self.lo, self.hi)
        }
    }
}

/// Lazy sequence of [`OverlayRange`] values for one label
///
/// Every sequence owns its cursor, so sequences over different labels can be
/// interleaved freely. Iteration returns `None` once the tokens are
/// exhausted or an unparseable token is reached; [`RangeSequence::restart`]
/// rewinds to the first range.
#[derive(Debug)]
pub struct RangeSequence<'a> {
    body: Option<&'a str>,
    tokens: Vec<SpecToken>,
    cursor: usize,
    finished: bool,
}

impl<'a> RangeSequence<'a> {
    /// Start a sequence over the bracketed specification of `label`
    pub fn new(label: &'a str) -> Self {
        let body = bracket_body(label);
        Self {
            body,
            tokens: body.map(|b| lex(b).map(|(t, _)| t).collect()).unwrap_or_default(),
            cursor: 0,
            finished: body.is_none(),
        }
    }

    /// Rewind to the first range
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.finished = self.body.is_none();
    }

    fn next_token(&mut self) -> Option<SpecToken> {
        let tok = self.tokens.get(self.cursor).copied();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    /// Consume the end of the current token: a comma or the end of input
    fn at_token_end(&mut self) -> bool {
        matches!(self.next_token(), None | Some(SpecToken::Comma))
    }

    fn finish(&mut self) -> Option<OverlayRange> {
        self.finished = true;
        None
    }
}

impl Iterator for RangeSequence<'_> {
    type Item = OverlayRange;

    fn next(&mut self) -> Option<OverlayRange> {
        if self.finished {
            return None;
        }
        loop {
            match self.next_token() {
                // Separator runs collapse, so `[1,,2]` reads as `[1,2]`
                Some(SpecToken::Comma) => continue,
                Some(SpecToken::Number(lo)) => {
                    return match self.next_token() {
                        None | Some(SpecToken::Comma) => Some(OverlayRange::single(lo)),
                        Some(SpecToken::Dash) => match self.next_token() {
                            Some(SpecToken::Number(hi)) if self.at_token_end() => {
                                Some(OverlayRange::new(lo, hi))
                            }
                            _ => self.finish(),
                        },
                        _ => self.finish(),
                    };
                }
                _ => return self.finish(),
            }
        }
    }
}

/// Parse the overlay ranges of a label
pub fn parse_ranges(label: &str) -> RangeSequence<'_> {
    RangeSequence::new(label)
}

/// Whether the label yields at least one overlay range
pub fn has_overlay_spec(label: &str) -> bool {
    parse_ranges(label).next().is_some()
}
