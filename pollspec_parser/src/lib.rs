// Internal modules
#[macro_use]
pub mod logging;
pub mod address;
pub mod config;
pub mod formula;
pub mod interval;
pub mod lexical;
pub mod macros;
pub mod pipeline;
pub mod rules;
pub mod syntax;
pub mod time;
pub mod utils;
pub mod validation;

// Re-export the parse contract for library consumers
pub use syntax::{ParseOutcome, Parsed, Parser, SyntaxError};

// Re-export the single-call front door used by the CLI
pub use pipeline::{run, GrammarKind, ParseReport, ParseRequest};
