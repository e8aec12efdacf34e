//! Reader for the structured text format (STF).
//!
//! STF is a parenthesis-delimited, schema-free text format. Any bare word
//! may name a block; what a name means is decided by whoever reads the
//! block it appears in.
//!
//! # Grammar Overview
//!
//! ```text
//! file        = [header] { unit }
//! unit        = name [block] | value | block
//! block       = '(' { unit } ')'
//! value       = number | string | word
//!
//! header      = "SIMISA@" { non_space }
//! number      = ['-'|'+'] digits ['.' digits] [('e'|'E') ['-'|'+'] digits] [unit_suffix]
//! unit_suffix = letter { letter | digit | '/' | '_' | '^' }
//! string      = '"' { char | escape } '"' { '+' '"' { char | escape } '"' }
//! escape      = '\"' | '\\' | '\n' | '\t'
//! word        = any run of characters other than whitespace, '(', ')', '"'
//! comment     = "//" { any_char } newline
//! ```
//!
//! Names are matched case-insensitively. Blocks named `comment`, `skip`
//! or starting with `_` are always skipped.
//!
//! # Reading
//!
//! Readers are built by composing [`Reader`] calls inside the handlers of
//! a [`DispatchTable`]:
//!
//! ```text
//! Tr_WorldSoundFile (
//!     SoundSource (
//!         Position ( 10 2.5 -40 )
//!         FileName ( "horn.sms" )
//!     )
//! )
//! ```
//!
//! The root handler consumes `(` and calls [`Reader::parse_block`] with a
//! table for `soundsource`; that handler does the same one level down, and
//! so on until leaf values are read with the `read_*` family.

mod diagnostic;
mod dispatch;
mod encoding;
mod lexer;
mod reader;
mod units;

pub use diagnostic::{count_kind, Diagnostic, DiagnosticKind, Parsed};
pub use dispatch::{DispatchEntry, DispatchTable, Handler};
pub use encoding::decode_text;
pub use lexer::{Lexer, Token, TokenKind};
pub use reader::{Reader, ReaderConfig, DEFAULT_MAX_DEPTH};
pub use units::{Unit, UnitSpec};
