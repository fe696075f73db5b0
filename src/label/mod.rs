//! Mini-languages embedded in layer labels
//!
//! Labels starting with `[` carry overlay ranges; labels starting with `-`
//! carry command line options.

pub mod lexer;
pub mod options;
pub mod ranges;

pub use options::{apply_options, is_help_flag, is_option_label, tokenize_options, Applied};
pub use ranges::{has_overlay_spec, parse_ranges, OverlayRange, RangeSequence};
