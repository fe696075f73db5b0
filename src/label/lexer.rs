//! Lexer for the bracketed overlay specification using logos

use logos::Logos;

/// Byte range in the bracket body
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecToken {
    /// Unsigned overlay index; values that overflow `u32` are lex errors
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Number(u32),

    #[token("-")]
    Dash,

    #[token(",")]
    Comma,

    /// Anything the lexer does not recognize, whitespace included
    Invalid,
}

/// Lex a bracket body into tokens with spans
///
/// Unlike a tolerant lexer, unrecognized input is kept as
/// [`SpecToken::Invalid`] so the range parser can stop there.
pub fn lex(body: &str) -> impl Iterator<Item = (SpecToken, Span)> + '_ {
    SpecToken::lexer(body)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(SpecToken::Invalid), span))
}

/// Extract the text between a leading `[` and the first `]`
///
/// A missing `]` extends the body to the end of the label. Labels that do
/// not start with `[` carry no overlay specification.
pub fn bracket_body(label: &str) -> Option<&str> {
    let rest = label.strip_prefix('[')?;
    Some(match rest.find(']') {
        Some(end) => &rest[..end],
        None => rest,
    })
}
