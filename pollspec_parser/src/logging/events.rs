//! Log events emitted by the parser pipeline

use super::codes::Code;
use crate::utils::Span;
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn new(level: LogLevel, code: Code, message: &str) -> Self {
        let limit = super::config::get_max_log_message_length();
        let message = match message.char_indices().nth(limit) {
            Some((cut, _)) => format!("{}...", &message[..cut]),
            None => message.to_string(),
        };

        Self {
            timestamp: SystemTime::now(),
            level,
            code,
            message,
            span: None,
            context: BTreeMap::new(),
        }
    }

    /// Create a new error event
    pub fn error(error_code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, error_code, message)
    }

    /// Create a new warning event without a specific code
    pub fn warning(message: &str) -> Self {
        Self::new(LogLevel::Warning, Code::new("W000"), message)
    }

    /// Create warning with specific code
    pub fn warning_with_code(warning_code: Code, message: &str) -> Self {
        Self::new(LogLevel::Warning, warning_code, message)
    }

    /// Create a new info event
    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, Code::new("I000"), message)
    }

    /// Create a success event (info with success code)
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, success_code, message)
    }

    /// Create a debug event
    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, Code::new("D000"), message)
    }

    /// Add span information
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Add context data
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn is_debug(&self) -> bool {
        self.level == LogLevel::Debug
    }

    /// Get severity from error code
    pub fn severity(&self) -> &'static str {
        super::codes::get_severity(self.code.as_str()).as_str()
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        super::codes::get_category(self.code.as_str())
    }

    /// Format for display
    pub fn format(&self) -> String {
        let span_str = self
            .span
            .as_ref()
            .map(|s| format!(" at offset {}..{}", s.start().offset, s.end().offset))
            .unwrap_or_default();

        let mut line = format!(
            "[{}] {} - {}{}",
            self.level.as_str(),
            self.code.as_str(),
            self.message,
            span_str
        );

        for (key, value) in &self.context {
            line.push_str(&format!(" {}={}", key, value));
        }

        line
    }

    /// Format as JSON for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let timestamp = self
            .timestamp
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut json = serde_json::json!({
            "timestamp": timestamp,
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if let Some(span) = &self.span {
            json["span"] = serde_json::json!({
                "start": span.start().offset,
                "end": span.end().offset,
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::to_value(&self.context)?;
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::syntax::INCORRECT_SYNTAX, "incorrect syntax near \"x\"");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E040");
        assert_eq!(event.category(), "Syntax");
    }

    #[test]
    fn test_success_event_creation() {
        let event = LogEvent::success(codes::success::PARSE_COMPLETE, "Parsed");

        assert!(event.is_info());
        assert_eq!(event.code.as_str(), "I040");
    }

    #[test]
    fn test_event_formatting_includes_span_and_context() {
        let event = LogEvent::error(codes::syntax::UNEXPECTED_END, "unexpected end of interval")
            .with_span(Span::from_offsets(4, 4))
            .with_context("grammar", "flexible");
        let formatted = event.format();

        assert!(formatted.contains("[ERROR]"));
        assert!(formatted.contains("E041"));
        assert!(formatted.contains("at offset 4..4"));
        assert!(formatted.contains("grammar=flexible"));
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::warning_with_code(codes::semantic::DELAY_EXCEEDS_PERIOD, "slow")
            .with_context("interval", "2");

        let json = event.format_json().unwrap();
        assert!(json.contains("\"level\":\"WARN\""));
        assert!(json.contains("\"code\":\"W184\""));
        assert!(json.contains("\"interval\":\"2\""));
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let limit = crate::logging::config::get_max_log_message_length();
        let long = "x".repeat(limit + 10);
        let event = LogEvent::info(&long);
        assert!(event.message.ends_with("..."));
        assert_eq!(event.message.chars().count(), limit + 3);
    }
}
