//! Lexical primitives used by every grammar: digit runs, whitespace,
//! macro detection and macro context scanning.

pub mod context;
pub mod detector;
pub mod scanner;

pub use context::{scan_quoted_context, scan_unquoted_context};
pub use detector::{detect_macro, MacroKind};
pub use scanner::{
    is_whitespace, peek, scan_digits, scan_digits_limited, scan_while, skip_whitespace,
    starts_with_at,
};
