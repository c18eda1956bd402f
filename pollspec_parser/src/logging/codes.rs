//! Error and success codes with their classification metadata
//!
//! Every failure the parsers or the validation pass can report maps to one
//! code here, so log consumers can filter by category and severity.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Code {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Runtime configuration error codes
pub mod config {
    use super::Code;

    pub const CONFIG_IO_ERROR: Code = Code::new("E005");
    pub const CONFIG_PARSE_ERROR: Code = Code::new("E006");
}

/// Syntax error codes shared by every parser
pub mod syntax {
    use super::Code;

    pub const INCORRECT_SYNTAX: Code = Code::new("E040");
    pub const UNEXPECTED_END: Code = Code::new("E041");
    pub const NESTING_TOO_DEEP: Code = Code::new("E042");
    pub const TRAILING_INPUT: Code = Code::new("E043");
}

/// Deferred semantic checks on parsed structures
pub mod semantic {
    use super::Code;

    pub const VALUE_OUT_OF_RANGE: Code = Code::new("E180");
    pub const INVERTED_RANGE: Code = Code::new("E181");
    pub const DELAY_TOO_LARGE: Code = Code::new("E182");
    pub const MISSING_ACTIVE_INTERVAL: Code = Code::new("E183");
    pub const DELAY_EXCEEDS_PERIOD: Code = Code::new("W184");
    pub const UNRESOLVED_MACRO: Code = Code::new("W185");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const PARSE_COMPLETE: Code = Code::new("I040");
    pub const PARSE_PARTIAL: Code = Code::new("I041");
    pub const VALIDATION_PASSED: Code = Code::new("I070");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal error",
                "File a bug report with the input that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "Logging or configuration initialization failed",
                "Check environment variables and configuration files",
            ),
            ErrorMetadata::new(
                "E005",
                "Configuration",
                Severity::High,
                true,
                "Runtime configuration file could not be read",
                "Check the configuration path and file permissions",
            ),
            ErrorMetadata::new(
                "E006",
                "Configuration",
                Severity::High,
                true,
                "Runtime configuration file is not valid TOML",
                "Fix the TOML syntax or remove unknown value types",
            ),
            ErrorMetadata::new(
                "E040",
                "Syntax",
                Severity::Medium,
                true,
                "Input does not match the grammar at the reported offset",
                "Correct the text starting at the quoted fragment",
            ),
            ErrorMetadata::new(
                "E041",
                "Syntax",
                Severity::Medium,
                true,
                "Input ends in the middle of a token",
                "Complete the truncated expression",
            ),
            ErrorMetadata::new(
                "E042",
                "Syntax",
                Severity::High,
                true,
                "Parenthesis nesting exceeds the configured limit",
                "Flatten the expression",
            ),
            ErrorMetadata::new(
                "E043",
                "Syntax",
                Severity::Medium,
                true,
                "Valid prefix followed by text outside the grammar",
                "Remove the trailing text",
            ),
            ErrorMetadata::new(
                "E180",
                "Semantic",
                Severity::Medium,
                true,
                "Numeric value outside its allowed range",
                "Use a value within the documented bounds",
            ),
            ErrorMetadata::new(
                "E181",
                "Semantic",
                Severity::Medium,
                true,
                "Range start is greater than range end",
                "Swap the range bounds",
            ),
            ErrorMetadata::new(
                "E182",
                "Semantic",
                Severity::Medium,
                true,
                "Update interval exceeds the maximum delay",
                "Use a shorter update interval",
            ),
            ErrorMetadata::new(
                "E183",
                "Semantic",
                Severity::Medium,
                true,
                "Zero update interval without an active custom interval",
                "Add a flexible interval with non-zero delay or a scheduling interval",
            ),
            ErrorMetadata::new(
                "W184",
                "Semantic",
                Severity::Low,
                true,
                "Flexible interval delay is longer than its active period",
                "Shorten the delay or widen the period",
            ),
            ErrorMetadata::new(
                "W185",
                "Semantic",
                Severity::Low,
                true,
                "Value is a macro and cannot be checked before expansion",
                "No action required",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
