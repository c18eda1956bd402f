//! Shared types and utilities used by the parser family.

pub mod span;

pub use span::{Position, Span};
