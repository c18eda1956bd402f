//! Parse contract shared by every grammar in the crate.

pub mod error;
pub mod outcome;

pub use error::{Subject, SyntaxError, SyntaxResult};
pub use outcome::{ParseOutcome, Parsed, Parser, Scanned};
