//! Stateful cursor over the token stream.
//!
//! The [`Reader`] owns the lexer, a single token of lookahead and an
//! explicit nesting depth. It provides the block-matching primitives
//! ([`Reader::match_exact`], [`Reader::parse_block`],
//! [`Reader::skip_rest_of_block`]) and typed value reads.
//!
//! Failures come in two classes. Structural desynchronisation (a mandatory
//! paren or keyword is missing, or input ends inside a block) returns a
//! [`WorldSoundError`] and aborts the read. Content problems (an unknown
//! name, a badly typed value, a unit problem) are recorded as
//! [`Diagnostic`]s, the offending unit is skipped or defaulted, and the
//! read continues.

use tracing::{trace, warn};

use super::diagnostic::{Diagnostic, DiagnosticKind};
use super::dispatch::DispatchTable;
use super::lexer::{Lexer, Token, TokenKind};
use super::units::{Unit, UnitSpec};
use crate::error::{Result, WorldSoundError};

/// Default limit on block nesting for [`Reader::parse_block`].
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Names skipped silently, together with their block.
const IGNORED_NAMES: [&str; 2] = ["comment", "skip"];

/// Configuration for a [`Reader`].
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Deepest block nesting accepted by `parse_block`.
    pub max_depth: usize,
    /// Whether content after the root block is reported.
    pub warn_on_trailing_content: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            warn_on_trailing_content: true,
        }
    }
}

impl ReaderConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deepest block nesting accepted by `parse_block`.
    ///
    /// Each nested handler adds stack frames, so this bounds recursion on
    /// hostile input. Skipping unknown blocks is iterative and not limited.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable the trailing-content warning.
    pub fn with_trailing_content_warning(mut self, enabled: bool) -> Self {
        self.warn_on_trailing_content = enabled;
        self
    }
}

/// Reader for one structured text source.
///
/// A reader is single-use: it walks its input once, front to back.
pub struct Reader<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
    source: String,
    depth: usize,
    config: ReaderConfig,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Reader<'a> {
    /// Create a reader over `input`; `source` names it in diagnostics.
    pub fn new(input: &'a str, source: impl Into<String>) -> Self {
        Self::with_config(input, source, ReaderConfig::default())
    }

    /// Create a reader with an explicit configuration.
    pub fn with_config(input: &'a str, source: impl Into<String>, config: ReaderConfig) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
            source: source.into(),
            depth: 0,
            config,
            diagnostics: Vec::new(),
        }
    }

    /// Name of the source, as given at construction.
    pub fn source_name(&self) -> &str {
        &self.source
    }

    /// Net count of `(` minus `)` consumed so far.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The reader's configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Diagnostics recorded so far, in order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the reader, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Consume the next token, updating the nesting depth.
    ///
    /// At end of input this keeps returning [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Result<Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        match token.kind {
            TokenKind::OpenParen => self.depth += 1,
            TokenKind::CloseParen => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        Ok(token)
    }

    /// Consume the next token, which must case-insensitively equal `expected`.
    ///
    /// Quoted strings never match: a keyword or paren must appear bare.
    pub fn match_exact(&mut self, expected: &str) -> Result<()> {
        let token = self.next_token()?;
        let matches = match token.kind {
            TokenKind::Eof | TokenKind::String => false,
            _ => token.text.to_lowercase() == expected.to_lowercase(),
        };
        if matches {
            Ok(())
        } else {
            Err(WorldSoundError::structural(
                expected,
                token.describe(),
                token.line,
                token.column,
            ))
        }
    }

    /// Dispatch the contents of the current block until its closing `)`.
    ///
    /// Call after the block's `(` has been consumed. Each name found in
    /// `table` has its handler invoked; anything else is skipped as one unit
    /// and reported. Returns once the matching `)` has been consumed.
    pub fn parse_block(&mut self, table: &mut DispatchTable<'_, 'a>) -> Result<()> {
        let entry_depth = self.depth;
        let limit = self.config.max_depth;
        if entry_depth > limit {
            let token = self.peek()?;
            return Err(WorldSoundError::NestingTooDeep {
                limit,
                line: token.line,
                column: token.column,
            });
        }

        loop {
            let token = self.peek()?;
            match token.kind {
                TokenKind::Eof => {
                    return Err(WorldSoundError::unterminated(token.line, token.column));
                }
                TokenKind::CloseParen => {
                    self.next_token()?;
                    return Ok(());
                }
                _ => {}
            }

            self.dispatch_one(table)?;
            debug_assert_eq!(
                self.depth, entry_depth,
                "handler left the block at a different depth"
            );
        }
    }

    /// Top-level entry: find a root statement from `root` and parse it.
    ///
    /// Units before the root are skipped and reported. Content after the
    /// root is ignored. A source without any root statement is not an
    /// error; it is reported and the call returns normally.
    pub fn parse_file(&mut self, root: &mut DispatchTable<'_, 'a>) -> Result<()> {
        loop {
            let token = self.peek()?.clone();
            match token.kind {
                TokenKind::Eof => {
                    let names = root.names().join(", ");
                    self.report(
                        DiagnosticKind::MissingRoot,
                        &token,
                        format!("no root statement ({names}) found"),
                    );
                    return Ok(());
                }
                TokenKind::CloseParen => {
                    self.next_token()?;
                    self.report(
                        DiagnosticKind::UnbalancedParen,
                        &token,
                        "')' outside any block",
                    );
                    continue;
                }
                _ => {}
            }

            if self.dispatch_one(root)? {
                break;
            }
        }

        if !self.config.warn_on_trailing_content {
            return Ok(());
        }
        // Only the first trailing token is looked at. A lexer error there is
        // reported like any other junk, so it cannot fail a good file.
        match self.peek() {
            Ok(token) if token.kind == TokenKind::Eof => {}
            Ok(token) => {
                let token = token.clone();
                self.report(
                    DiagnosticKind::TrailingContent,
                    &token,
                    format!("ignoring content after the root block, from {}", token.describe()),
                );
            }
            Err(err) => {
                let (line, column) = err.position().unwrap_or((0, 0));
                self.report_at(
                    DiagnosticKind::TrailingContent,
                    line,
                    column,
                    format!("ignoring unreadable content after the root block: {err}"),
                );
            }
        }
        Ok(())
    }

    /// Discard tokens until the enclosing block's `)` has been consumed.
    ///
    /// Nested blocks are skipped whole. Outside any block this discards the
    /// rest of the input.
    pub fn skip_rest_of_block(&mut self) -> Result<()> {
        let target = self.depth;
        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::Eof if target == 0 => return Ok(()),
                TokenKind::Eof => {
                    return Err(WorldSoundError::unterminated(token.line, token.column));
                }
                TokenKind::CloseParen if self.depth < target => return Ok(()),
                _ => {}
            }
        }
    }

    // ============ Value reads ============

    /// Read one value as text; identifiers and numbers are returned as written.
    pub fn read_string(&mut self, default: &str) -> Result<String> {
        Ok(match self.take_value("a string")? {
            Some(token) => token.text,
            None => default.to_string(),
        })
    }

    /// Read one signed integer.
    pub fn read_int(&mut self, default: i32) -> Result<i32> {
        let Some(token) = self.take_value("an integer")? else {
            return Ok(default);
        };
        Ok(self
            .integer_from(&token)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or_else(|| self.mismatch(&token, "an integer", default)))
    }

    /// Read one unsigned integer.
    pub fn read_uint(&mut self, default: u32) -> Result<u32> {
        let Some(token) = self.take_value("an unsigned integer")? else {
            return Ok(default);
        };
        Ok(self
            .integer_from(&token)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_else(|| self.mismatch(&token, "an unsigned integer", default)))
    }

    /// Read one hexadecimal value, with or without a `0x` prefix.
    pub fn read_hex(&mut self, default: u32) -> Result<u32> {
        let Some(token) = self.take_value("a hexadecimal value")? else {
            return Ok(default);
        };
        // `0x1f` lexes as number 0 with suffix `x1f`, so the suffix is not a unit here.
        let digits = token
            .text
            .strip_prefix("0x")
            .or_else(|| token.text.strip_prefix("0X"))
            .unwrap_or(&token.text);
        Ok(match u32::from_str_radix(digits, 16) {
            Ok(value) if token.kind != TokenKind::String => value,
            _ => self.mismatch(&token, "a hexadecimal value", default),
        })
    }

    /// Read one boolean: `true`/`false` or an integer (non-zero is true).
    pub fn read_bool(&mut self, default: bool) -> Result<bool> {
        let Some(token) = self.take_value("a boolean")? else {
            return Ok(default);
        };
        let value = match (token.kind, token.canonical.as_str()) {
            (TokenKind::Identifier, "true") => Some(true),
            (TokenKind::Identifier, "false") => Some(false),
            (TokenKind::Number, _) if token.unit.is_none() => {
                token.canonical.parse::<i64>().ok().map(|v| v != 0)
            }
            _ => None,
        };
        Ok(value.unwrap_or_else(|| self.mismatch(&token, "a boolean", default)))
    }

    /// Read one float in the canonical unit of `unit`.
    pub fn read_float(&mut self, unit: impl Into<UnitSpec>, default: f32) -> Result<f32> {
        Ok(self.read_optional_float(unit)?.unwrap_or(default))
    }

    /// Read one float, or `None` when no usable value is present.
    pub fn read_optional_float(&mut self, unit: impl Into<UnitSpec>) -> Result<Option<f32>> {
        let spec = unit.into();
        let Some(token) = self.take_value("a number")? else {
            return Ok(None);
        };
        Ok(self.float_from(&token, spec))
    }

    // ============ Block-wrapped reads ============

    /// Run `read` inside a `( ... )` block, skipping anything after the value.
    pub fn read_block<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.match_exact("(")?;
        let value = read(self)?;
        self.skip_rest_of_block()?;
        Ok(value)
    }

    /// `( string )`
    pub fn read_string_block(&mut self, default: &str) -> Result<String> {
        self.read_block(|r| r.read_string(default))
    }

    /// `( int )`
    pub fn read_int_block(&mut self, default: i32) -> Result<i32> {
        self.read_block(|r| r.read_int(default))
    }

    /// `( uint )`
    pub fn read_uint_block(&mut self, default: u32) -> Result<u32> {
        self.read_block(|r| r.read_uint(default))
    }

    /// `( hex )`
    pub fn read_hex_block(&mut self, default: u32) -> Result<u32> {
        self.read_block(|r| r.read_hex(default))
    }

    /// `( bool )`
    pub fn read_bool_block(&mut self, default: bool) -> Result<bool> {
        self.read_block(|r| r.read_bool(default))
    }

    /// `( float )`
    pub fn read_float_block(&mut self, unit: impl Into<UnitSpec>, default: f32) -> Result<f32> {
        let spec = unit.into();
        self.read_block(|r| r.read_float(spec, default))
    }

    /// `( float )`, or `None` when the block holds no usable value.
    pub fn read_optional_float_block(&mut self, unit: impl Into<UnitSpec>) -> Result<Option<f32>> {
        let spec = unit.into();
        self.read_block(|r| r.read_optional_float(spec))
    }

    // ============ Internals ============

    /// Handle one unit at the current level. Returns whether a handler ran.
    fn dispatch_one(&mut self, table: &mut DispatchTable<'_, 'a>) -> Result<bool> {
        let token = self.peek()?.clone();

        if token.kind == TokenKind::Identifier {
            if let Some(handler) = table.lookup(&token.canonical) {
                self.next_token()?;
                trace!(name = %token.canonical, line = token.line, "dispatching block");
                (handler)(self)?;
                return Ok(true);
            }
            if is_ignored(&token.canonical) {
                trace!(name = %token.canonical, line = token.line, "skipping ignored block");
                self.skip_unit()?;
                return Ok(false);
            }
        }

        self.report(
            DiagnosticKind::UnknownToken,
            &token,
            format!("{} is not recognised here; skipped", token.describe()),
        );
        self.skip_unit()?;
        Ok(false)
    }

    /// Skip one value, one anonymous block, or a name with its block.
    fn skip_unit(&mut self) -> Result<()> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::OpenParen => self.skip_rest_of_block(),
            TokenKind::Identifier if self.peek()?.kind == TokenKind::OpenParen => {
                self.next_token()?;
                self.skip_rest_of_block()
            }
            _ => Ok(()),
        }
    }

    /// Consume one value token; parens and end of input are left in place.
    fn take_value(&mut self, expected: &str) -> Result<Option<Token>> {
        let token = self.peek()?.clone();
        match token.kind {
            TokenKind::OpenParen | TokenKind::CloseParen | TokenKind::Eof => {
                self.report(
                    DiagnosticKind::TypeMismatch,
                    &token,
                    format!("expected {expected}, found {}", token.describe()),
                );
                Ok(None)
            }
            _ => self.next_token().map(Some),
        }
    }

    /// Integer value of a number token, tolerating `3.0` and reporting suffixes.
    fn integer_from(&mut self, token: &Token) -> Option<i64> {
        if token.kind != TokenKind::Number {
            return None;
        }
        let value = match token.canonical.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                let float = token.canonical.parse::<f64>().ok()?;
                if !float.is_finite() || float.fract() != 0.0 || float.abs() > i64::MAX as f64 {
                    return None;
                }
                float as i64
            }
        };
        if let Some(suffix) = &token.unit {
            self.report(
                DiagnosticKind::UnexpectedUnit,
                token,
                format!("integer {} does not take a unit suffix '{suffix}'", token.canonical),
            );
        }
        Some(value)
    }

    fn float_from(&mut self, token: &Token, spec: UnitSpec) -> Option<f32> {
        let value = match token.kind {
            TokenKind::Number => token.canonical.parse::<f32>().ok(),
            _ => None,
        };
        let Some(value) = value else {
            return self.mismatch(token, "a number", None);
        };

        match (&token.unit, spec.unit) {
            (None, unit) if spec.required => {
                self.report(
                    DiagnosticKind::MissingUnit,
                    token,
                    format!("{} needs a {unit} unit suffix", token.text),
                );
                None
            }
            (None, _) => Some(value),
            (Some(suffix), Unit::None) => {
                self.report(
                    DiagnosticKind::UnexpectedUnit,
                    token,
                    format!("unit suffix '{suffix}' is not expected here; using {value}"),
                );
                Some(value)
            }
            (Some(suffix), unit) => match unit.scale(suffix) {
                Some(factor) => Some(value * factor),
                None => {
                    self.report(
                        DiagnosticKind::UnitMismatch,
                        token,
                        format!("'{suffix}' is not a {unit} unit"),
                    );
                    None
                }
            },
        }
    }

    fn mismatch<T>(&mut self, token: &Token, expected: &str, default: T) -> T {
        self.report(
            DiagnosticKind::TypeMismatch,
            token,
            format!("expected {expected}, found {}", token.describe()),
        );
        default
    }

    fn report(&mut self, kind: DiagnosticKind, token: &Token, message: impl Into<String>) {
        self.report_at(kind, token.line, token.column, message);
    }

    fn report_at(
        &mut self,
        kind: DiagnosticKind,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            source: self.source.clone(),
            line,
            column,
            message: message.into(),
        };
        warn!(
            source = %diagnostic.source,
            line = diagnostic.line,
            column = diagnostic.column,
            kind = %kind,
            "{}",
            diagnostic.message
        );
        self.diagnostics.push(diagnostic);
    }
}

fn is_ignored(name: &str) -> bool {
    name.starts_with('_') || IGNORED_NAMES.contains(&name)
}
