//! # Worldsound Core
//!
//! A reader for the structured text files that describe simulated-world
//! scene data, here the sound sources and track sound regions of a route.
//!
//! This library provides:
//! - A schema-free lexer for the parenthesis-delimited text format
//! - A dispatch-driven reader that skips what it does not understand
//! - Unit-aware numeric reads with conversion to SI units
//! - Typed records for world sound files built on top of the reader
//!
//! ## Architecture
//!
//! The library is organized into two modules:
//!
//! - [`stf`] - Lexer, reader, dispatch tables and diagnostics
//! - [`world`] - World sound records (sources, regions, the file itself)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! worldsound -v route/WORLD/w-012345+014567.ws
//! ```
//!
//! ### Library
//!
//! ```text
//! let parsed = WorldSoundFile::load(path)?;
//! for diagnostic in &parsed.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! let regions = parsed.value.regions();
//! ```
//!
//! ## Error Handling
//!
//! Reading distinguishes fatal errors from recoverable ones:
//!
//! 1. A missing mandatory paren or keyword, or input ending inside a block,
//!    aborts the file with a [`WorldSoundError`]
//! 2. Unknown names, badly typed values and unit problems are reported as
//!    [`stf::Diagnostic`]s and reading continues with defaults
//!
//! Diagnostics are also emitted as `tracing` warnings as they occur.

pub mod error;
pub mod stf;
pub mod world;

// Re-export main types for convenience
pub use error::{Result, WorldSoundError};
pub use stf::{Diagnostic, DiagnosticKind, Parsed, Reader, ReaderConfig};
pub use world::WorldSoundFile;
