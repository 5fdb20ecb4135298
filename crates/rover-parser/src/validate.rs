//! Structural pre-check over the token stream.

use std::cmp::Ordering;

use rover_lexer::{Token, TokenKind};
use rover_types::{ErrorCode, RoverError, SourceFile, Span};
use thiserror::Error;

/// Brace structure that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The stream ended with `{` left open. `span` is the innermost one.
    #[error("unbalanced braces: {open} '{{' never closed")]
    Unclosed { open: usize, span: Span },
    /// A `}` with no matching `{`.
    #[error("'}}' at {span} has no matching '{{'")]
    UnexpectedClose { span: Span },
}

impl StructuralError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StructuralError::Unclosed { .. } => ErrorCode::UNBALANCED_BRACES,
            StructuralError::UnexpectedClose { .. } => ErrorCode::UNEXPECTED_CLOSE_BRACE,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            StructuralError::Unclosed { span, .. } | StructuralError::UnexpectedClose { span } => {
                *span
            }
        }
    }

    /// Convert into an editor diagnostic quoting the offending line.
    pub fn to_diagnostic(&self, file: &SourceFile) -> RoverError {
        let span = self.span();
        let diag = RoverError::new(
            file.name.as_str(),
            self.code(),
            self.to_string(),
            span,
            file.line(span.start_line).unwrap_or(""),
        );
        match self {
            StructuralError::Unclosed { .. } => diag.with_suggestion("add the missing '}'"),
            StructuralError::UnexpectedClose { .. } => {
                diag.with_suggestion("remove the '}' or open the block it closes")
            }
        }
    }
}

/// Check that braces balance.
///
/// Keeps a running sum of `+1` per `{` and `-1` per `}`; only a non-zero
/// sum at the end of the stream fails. A negative sum is reported at the
/// first `}` that had no open block, a positive one at the innermost
/// unclosed `{`.
pub fn validate(tokens: &[Token]) -> Result<(), StructuralError> {
    let mut open: Vec<Span> = Vec::new();
    let mut stray: Vec<Span> = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::LBrace => open.push(token.span),
            TokenKind::RBrace => {
                if open.pop().is_none() {
                    stray.push(token.span);
                }
            }
            _ => {}
        }
    }
    match open.len().cmp(&stray.len()) {
        Ordering::Equal => Ok(()),
        Ordering::Less => Err(StructuralError::UnexpectedClose { span: stray[0] }),
        Ordering::Greater => Err(StructuralError::Unclosed {
            open: open.len() - stray.len(),
            span: open[open.len() - 1],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_lexer::tokenize;

    #[test]
    fn balanced_input_passes() {
        assert!(validate(&tokenize("i x { d Move() } e { q }")).is_ok());
        assert!(validate(&tokenize("")).is_ok());
    }

    #[test]
    fn braces_in_strings_do_not_count() {
        assert!(validate(&tokenize(r#"w "{{""#)).is_ok());
    }

    #[test]
    fn unclosed_brace_is_reported() {
        let err = validate(&tokenize("i x {\n  f i=1:2 {\n}")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UNBALANCED_BRACES);
        assert!(matches!(err, StructuralError::Unclosed { open: 1, .. }));
        assert_eq!(err.span().start_line, 1);
    }

    #[test]
    fn early_close_passes_when_total_balances() {
        assert!(validate(&tokenize("} {")).is_ok());
        assert!(validate(&tokenize("q }\ni x { d Move() } {")).is_ok());
    }

    #[test]
    fn extra_close_is_reported_at_first_stray() {
        let err = validate(&tokenize("} i x { q } }")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UNEXPECTED_CLOSE_BRACE);
        assert_eq!(err, StructuralError::UnexpectedClose { span: Span::new(1, 1, 1, 1) });
    }

    #[test]
    fn net_open_count_ignores_early_closes() {
        let err = validate(&tokenize("} { {")).unwrap_err();
        assert!(matches!(err, StructuralError::Unclosed { open: 1, .. }));
    }

    #[test]
    fn diagnostic_quotes_the_line() {
        let file = SourceFile::new("mission.cos", "s x=1\ni x {");
        let err = validate(&tokenize(&file.source)).unwrap_err();
        let diag = err.to_diagnostic(&file);
        assert_eq!(diag.source_line, "i x {");
        assert_eq!(diag.code, ErrorCode::UNBALANCED_BRACES);
        assert!(diag.suggestion.is_some());
    }
}
