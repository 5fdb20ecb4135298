use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of diagnostics stored per collection.
pub const MAX_ERRORS: usize = 20;

/// Diagnostic severity.
///
/// Only structural problems are errors. Malformed expressions are reported
/// as warnings because they surface later, when the generated code runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic category, determined by code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lexical,
    Syntax,
    Structure,
}

/// Numeric diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lexical (E100–E149) ──
    pub const UNKNOWN_CHARACTER: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);

    // ── Syntax (E150–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(150);
    pub const MISSING_OPERAND: Self = Self(151);
    pub const EXPECTED_BLOCK: Self = Self(152);
    pub const ORPHAN_ELSE: Self = Self(153);
    pub const MALFORMED_FOR: Self = Self(154);
    pub const NESTING_TOO_DEEP: Self = Self(155);

    // ── Structure (E200–E249) ──
    pub const UNBALANCED_BRACES: Self = Self(200);
    pub const UNEXPECTED_CLOSE_BRACE: Self = Self(201);

    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=149 => ErrorCategory::Lexical,
            200..=249 => ErrorCategory::Structure,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Syntax => write!(f, "syntax"),
            Self::Structure => write!(f, "structure"),
        }
    }
}

/// A structured RoverScript diagnostic.
///
/// The mission editor renders these fields directly, so the JSON shape is
/// part of the contract with the web client.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{span}: {code} [{category}] {message}")]
pub struct RoverError {
    pub file: String,
    pub code: ErrorCode,
    pub severity: Severity,
    pub category: ErrorCategory,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The source line the span starts on.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl RoverError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Same as [`RoverError::new`] but with [`Severity::Warning`].
    pub fn warning(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        let mut diag = Self::new(file, code, message, span, source_line);
        diag.severity = Severity::Warning;
        diag
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Errors and warnings collected by one compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<RoverError>,
    pub warnings: Vec<RoverError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CompileErrors {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add a diagnostic to the list matching its severity. At most
    /// [`MAX_ERRORS`] of each are stored; the totals keep counting.
    pub fn push(&mut self, diag: RoverError) {
        match diag.severity {
            Severity::Error => {
                if self.errors.len() < MAX_ERRORS {
                    self.errors.push(diag);
                }
                self.total_errors += 1;
            }
            Severity::Warning => {
                if self.warnings.len() < MAX_ERRORS {
                    self.warnings.push(diag);
                }
                self.total_warnings += 1;
            }
        }
    }

    /// Move every diagnostic of `other` into `self`.
    pub fn extend(&mut self, other: CompileErrors) {
        let dropped_errors = other.total_errors.saturating_sub(other.errors.len());
        let dropped_warnings = other.total_warnings.saturating_sub(other.warnings.len());
        for diag in other.errors.into_iter().chain(other.warnings) {
            self.push(diag);
        }
        self.total_errors += dropped_errors;
        self.total_warnings += dropped_warnings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(code: ErrorCode) -> RoverError {
        RoverError::new("mission.cos", code, "boom", Span::new(2, 3, 2, 9), "d Move(")
    }

    #[test]
    fn codes_map_to_categories() {
        assert_eq!(ErrorCode::UNKNOWN_CHARACTER.category(), ErrorCategory::Lexical);
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::ORPHAN_ELSE.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::UNBALANCED_BRACES.category(), ErrorCategory::Structure);
    }

    #[test]
    fn code_display() {
        assert_eq!(ErrorCode::UNBALANCED_BRACES.to_string(), "E200");
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.to_string(), "E150");
    }

    #[test]
    fn error_display_includes_location_and_category() {
        let text = diag(ErrorCode::UNBALANCED_BRACES).to_string();
        assert_eq!(text, "2:3: E200 [structure] boom");
    }

    #[test]
    fn json_uses_editor_field_names() {
        let err = diag(ErrorCode::UNEXPECTED_TOKEN).with_suggestion("close the call");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"line\":2"));
        assert!(json.contains("\"column\":3"));
        assert!(json.contains("\"end_column\":9"));
        assert!(json.contains("\"severity\":\"error\""));
        assert!(json.contains("\"suggestion\":\"close the call\""));

        let back: RoverError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, err.code);
        assert_eq!(back.span, err.span);
    }

    #[test]
    fn warnings_are_kept_apart_from_errors() {
        let mut errs = CompileErrors::empty();
        errs.push(RoverError::warning(
            "mission.cos",
            ErrorCode::MISSING_OPERAND,
            "missing operand",
            Span::point(1, 1),
            "",
        ));
        assert!(!errs.has_errors());
        assert_eq!(errs.total_warnings, 1);
        errs.push(diag(ErrorCode::UNBALANCED_BRACES));
        assert!(errs.has_errors());
    }

    #[test]
    fn storage_is_capped() {
        let mut errs = CompileErrors::empty();
        for _ in 0..25 {
            errs.push(diag(ErrorCode::UNEXPECTED_CLOSE_BRACE));
        }
        assert_eq!(errs.errors.len(), MAX_ERRORS);
        assert_eq!(errs.total_errors, 25);
    }

    #[test]
    fn extend_keeps_overflow_totals() {
        let mut inner = CompileErrors::empty();
        for _ in 0..22 {
            inner.push(diag(ErrorCode::UNEXPECTED_TOKEN));
        }
        let mut outer = CompileErrors::empty();
        outer.extend(inner);
        assert_eq!(outer.errors.len(), MAX_ERRORS);
        assert_eq!(outer.total_errors, 22);
    }
}
