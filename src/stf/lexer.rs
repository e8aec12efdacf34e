//! Lexer (tokenizer) for structured text files.

use crate::error::{Result, WorldSoundError};

/// Signature word that opens text files written by the original toolchain.
const HEADER_SIGNATURE: &str = "SIMISA@";

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text as written (strings are unquoted and unescaped)
    pub text: String,
    /// Canonical form used for matching: lowercase for identifiers, the
    /// numeric part (without unit suffix) for numbers, `text` otherwise
    pub canonical: String,
    /// Lowercase unit suffix of a number token, e.g. `m` for `10m`
    pub unit: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in a structured text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word (block name, unquoted value, file name, etc.)
    Identifier,
    /// A quoted string literal
    String,
    /// A number, possibly carrying a unit suffix
    Number,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// End of file
    Eof,
}

impl Token {
    fn new(kind: TokenKind, text: String, line: usize, column: usize) -> Self {
        let canonical = match kind {
            TokenKind::Identifier => text.to_lowercase(),
            _ => text.clone(),
        };
        Self {
            kind,
            text,
            canonical,
            unit: None,
            line,
            column,
        }
    }

    /// An end-of-file token at the given position.
    pub fn eof(line: usize, column: usize) -> Self {
        Self::new(TokenKind::Eof, String::new(), line, column)
    }

    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::String => format!("string \"{}\"", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Lexer for tokenizing structured text input.
///
/// The lexer is lazy: each call to [`Lexer::next_token`] scans just far
/// enough to produce one token. Once the end of input is reached every
/// further call yields another [`TokenKind::Eof`]; as an [`Iterator`] it
/// stops after the first `Eof` or error.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    started: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            started: false,
            finished: false,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        if !self.started {
            self.started = true;
            self.skip_header();
        }

        self.skip_whitespace_and_comments();

        let start_line = self.line;
        let start_column = self.column;

        let ch = match self.peek_char() {
            Some(ch) => ch,
            None => return Ok(Token::eof(start_line, start_column)),
        };

        let token = match ch {
            '(' => {
                self.advance();
                Token::new(TokenKind::OpenParen, "(".to_string(), start_line, start_column)
            }
            ')' => {
                self.advance();
                Token::new(TokenKind::CloseParen, ")".to_string(), start_line, start_column)
            }
            '"' => {
                let text = self.read_concatenated_string(start_line, start_column)?;
                Token::new(TokenKind::String, text, start_line, start_column)
            }
            _ => {
                let word = self.read_word();
                classify_word(word, start_line, start_column)
            }
        };

        Ok(token)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_header(&mut self) {
        if self.peek_char() == Some('\u{feff}') {
            // A BOM is invisible to the author, so it does not count as a column.
            self.pos += '\u{feff}'.len_utf8();
        }
        self.skip_whitespace_and_comments();
        if self.rest().starts_with(HEADER_SIGNATURE) {
            self.read_word();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.rest().starts_with("//") => {
                    while let Some(ch) = self.peek_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek_char() {
            if is_delimiter(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    /// Read a string literal, joining `"a" + "b"` continuations.
    fn read_concatenated_string(&mut self, line: usize, column: usize) -> Result<String> {
        let mut text = self.read_string(line, column)?;

        loop {
            let saved = (self.pos, self.line, self.column);
            self.skip_whitespace_and_comments();
            if self.peek_char() == Some('+') {
                self.advance();
                self.skip_whitespace_and_comments();
                if self.peek_char() == Some('"') {
                    let (next_line, next_column) = (self.line, self.column);
                    text.push_str(&self.read_string(next_line, next_column)?);
                    continue;
                }
            }
            // Not a continuation: leave everything after the literal untouched.
            (self.pos, self.line, self.column) = saved;
            return Ok(text);
        }
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<String> {
        // Opening quote
        self.advance();

        let mut text = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(WorldSoundError::lexer(
                        line,
                        column,
                        "unterminated string literal",
                    ));
                }
                Some('"') => return Ok(text),
                Some('\\') => match self.advance() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => {
                        return Err(WorldSoundError::lexer(
                            line,
                            column,
                            "unterminated string literal",
                        ));
                    }
                },
                Some(ch) => text.push(ch),
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        match &token {
            Ok(tok) if tok.kind == TokenKind::Eof => self.finished = true,
            Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(token)
    }
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '"')
}

fn classify_word(word: String, line: usize, column: usize) -> Token {
    match number_prefix_len(&word) {
        Some(len) if is_unit_suffix(&word[len..]) => {
            let numeric = word[..len].to_string();
            let suffix = &word[len..];
            let mut token = Token::new(TokenKind::Number, word.clone(), line, column);
            token.canonical = numeric;
            token.unit = (!suffix.is_empty()).then(|| suffix.to_lowercase());
            token
        }
        _ => Token::new(TokenKind::Identifier, word, line, column),
    }
}

/// Length of the leading numeric literal in `text`, if it starts with one.
///
/// Accepts `[+-]? digits? [. digits?] ([eE] [+-]? digits)?` with at least
/// one mantissa digit. All accepted characters are ASCII, so the char count
/// is also the byte length.
fn number_prefix_len(text: &str) -> Option<usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    let mut has_digits = false;

    // Sign
    if i < chars.len() && (chars[i] == '-' || chars[i] == '+') {
        i += 1;
    }

    // Integer part
    while i < chars.len() && chars[i].is_ascii_digit() {
        has_digits = true;
        i += 1;
    }

    // Decimal part
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            has_digits = true;
            i += 1;
        }
    }

    if !has_digits {
        return None;
    }

    // Exponent, only when digits follow; otherwise the 'e' starts a suffix
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '-' || chars[j] == '+') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    Some(i)
}

fn is_unit_suffix(suffix: &str) -> bool {
    let mut chars = suffix.chars();
    match chars.next() {
        None => true,
        Some(first) if first.is_alphabetic() => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '/' | '_' | '^'))
        }
        Some(_) => false,
    }
}
