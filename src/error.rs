//! Error types for the world sound reader.
//!
//! This module provides [`WorldSoundError`], which covers every condition
//! that aborts the read of a file. Conditions a reader can recover from
//! (unknown block names, badly typed values, unit problems) are not errors;
//! they are reported as [`Diagnostic`](crate::stf::Diagnostic)s and the
//! parse continues.

use thiserror::Error;

/// Result type alias using [`WorldSoundError`].
pub type Result<T> = std::result::Result<T, WorldSoundError>;

/// Fatal error raised while reading a structured text file.
#[derive(Error, Debug)]
pub enum WorldSoundError {
    // ============ Token Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    Lexer {
        line: usize,
        column: usize,
        message: String,
    },

    // ============ Structural Errors ============
    /// A mandatory literal (paren or keyword) did not match
    #[error("Expected '{expected}' at line {line}, column {column}, found {found}")]
    Structural {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    /// End of input reached while a block was still open
    #[error("Unterminated block: end of file at line {line}, column {column} before closing ')'")]
    UnterminatedBlock { line: usize, column: usize },

    /// Block nesting exceeded the configured limit
    #[error("Blocks nested deeper than {limit} levels at line {line}, column {column}")]
    NestingTooDeep {
        limit: usize,
        line: usize,
        column: usize,
    },

    // ============ I/O Errors ============
    /// Error reading a source file
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl WorldSoundError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Lexer {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a structural error
    pub fn structural(
        expected: impl Into<String>,
        found: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Structural {
            expected: expected.into(),
            found: found.into(),
            line,
            column,
        }
    }

    /// Create an unterminated block error
    pub fn unterminated(line: usize, column: usize) -> Self {
        Self::UnterminatedBlock { line, column }
    }

    /// Line and column the error points at, if it has a source position.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::Lexer { line, column, .. }
            | Self::Structural { line, column, .. }
            | Self::UnterminatedBlock { line, column }
            | Self::NestingTooDeep { line, column, .. } => Some((*line, *column)),
            Self::FileRead { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_message() {
        let err = WorldSoundError::structural("(", "'filename'", 3, 14);
        assert_eq!(
            err.to_string(),
            "Expected '(' at line 3, column 14, found 'filename'"
        );
        assert_eq!(err.position(), Some((3, 14)));
    }

    #[test]
    fn test_file_read_has_no_position() {
        let err = WorldSoundError::FileRead {
            path: "missing.ws".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.position(), None);
        assert!(err.to_string().starts_with("Failed to read file 'missing.ws'"));
    }
}
