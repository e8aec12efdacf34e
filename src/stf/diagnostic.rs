//! Recoverable conditions reported while reading.

use std::fmt;

/// Kind of recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A name matched no handler in the current block; its unit was skipped
    UnknownToken,
    /// A value could not be coerced to the requested type
    TypeMismatch,
    /// A value lacked a unit suffix that the read required
    MissingUnit,
    /// A value carried a suffix where a plain number was expected
    UnexpectedUnit,
    /// A value carried a suffix from the wrong unit category
    UnitMismatch,
    /// Tokens followed the root block and were ignored
    TrailingContent,
    /// The root statement was never found
    MissingRoot,
    /// A ')' appeared outside any block
    UnbalancedParen,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnknownToken => "unknown token",
            Self::TypeMismatch => "type mismatch",
            Self::MissingUnit => "missing unit",
            Self::UnexpectedUnit => "unexpected unit",
            Self::UnitMismatch => "unit mismatch",
            Self::TrailingContent => "trailing content",
            Self::MissingRoot => "missing root statement",
            Self::UnbalancedParen => "unbalanced parenthesis",
        };
        f.write_str(name)
    }
}

/// A recoverable condition with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Name of the source being read (usually a file path)
    pub source: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Human-readable detail
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.source, self.line, self.column, self.kind, self.message
        )
    }
}

/// A value read successfully, with the diagnostics recorded on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    /// The value read
    pub value: T,
    /// Recoverable conditions met while reading, in source order
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    /// Whether anything was reported while reading.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Drop the diagnostics and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Count diagnostics of one kind.
pub fn count_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> usize {
    diagnostics.iter().filter(|d| d.kind == kind).count()
}
