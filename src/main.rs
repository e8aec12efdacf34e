//! Worldsound - world sound file reader
//!
//! Reads one or more world sound files and reports what they contain.
//!
//! # Usage
//!
//! ```bash
//! worldsound route/WORLD/*.ws
//! RUST_LOG=worldsound_core=trace worldsound --strict w-012345+014567.ws
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use clap::{ArgAction, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use worldsound_core::{
    stf::DEFAULT_MAX_DEPTH, Parsed, ReaderConfig, WorldSoundError, WorldSoundFile,
};

/// World sound file reader
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World sound files (.ws) to read
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Exit with failure when any file produced warnings
    #[arg(long)]
    strict: bool,

    /// Print only failures, not per-file summaries and warnings
    #[arg(short, long)]
    quiet: bool,

    /// Deepest block nesting accepted before a file is rejected
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Do not warn about content after the root block
    #[arg(long)]
    allow_trailing: bool,
}

/// What happened to one input file.
enum FileOutcome {
    /// The file does not exist; nothing was read
    Missing,
    /// The file was read, possibly with warnings
    Read(Parsed<WorldSoundFile>),
    /// The file could not be read
    Failed(WorldSoundError),
    /// The reader thread panicked
    Crashed,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(args.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ReaderConfig::new()
        .with_max_depth(args.max_depth)
        .with_trailing_content_warning(!args.allow_trailing);

    // One reader per file, each on its own thread.
    let outcomes: Vec<FileOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = args
            .files
            .iter()
            .map(|path| {
                let config = config.clone();
                scope.spawn(move || read_file(path, config))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(FileOutcome::Crashed))
            .collect()
    });

    let mut failed = false;
    for (path, outcome) in args.files.iter().zip(&outcomes) {
        let path = path.display();
        match outcome {
            FileOutcome::Missing => {
                if !args.quiet {
                    println!("{path}: not found, skipped");
                }
            }
            FileOutcome::Read(parsed) => {
                if !args.quiet {
                    println!("{path}: {}", summary(parsed));
                    for diagnostic in &parsed.diagnostics {
                        println!("  {diagnostic}");
                    }
                }
                failed |= args.strict && parsed.has_diagnostics();
            }
            FileOutcome::Failed(err) => {
                eprintln!("{path}: error: {err}");
                failed = true;
            }
            FileOutcome::Crashed => {
                eprintln!("{path}: error: reader crashed");
                failed = true;
            }
        }
    }

    info!(files = outcomes.len(), failed, "done");
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn read_file(path: &Path, config: ReaderConfig) -> FileOutcome {
    // Absence is the caller's business, not a parse error.
    if !path.is_file() {
        debug!(path = %path.display(), "skipping missing file");
        return FileOutcome::Missing;
    }
    match WorldSoundFile::load_with_config(path, config) {
        Ok(parsed) => FileOutcome::Read(parsed),
        Err(err) => FileOutcome::Failed(err),
    }
}

fn summary(parsed: &Parsed<WorldSoundFile>) -> String {
    let file = &parsed.value;
    let warnings = match parsed.diagnostics.len() {
        0 => String::new(),
        1 => " (1 warning)".to_string(),
        n => format!(" ({n} warnings)"),
    };
    format!(
        "{} sources, {} regions{}",
        file.sources().len(),
        file.regions().len(),
        warnings
    )
}

fn directive_for_verbosity(v: u8) -> &'static str {
    // Diagnostics are printed by the CLI itself, so the library's per-warning
    // events stay hidden unless asked for.
    match v {
        0 => "worldsound=info,worldsound_core=error",
        1 => "worldsound=debug,worldsound_core=debug",
        _ => "worldsound=trace,worldsound_core=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_defaults() {
        assert_eq!(
            directive_for_verbosity(0),
            "worldsound=info,worldsound_core=error"
        );
        assert_eq!(
            directive_for_verbosity(3),
            "worldsound=trace,worldsound_core=trace"
        );
    }

    #[test]
    fn test_summary_counts_warnings() {
        let parsed = WorldSoundFile::parse(
            "t",
            "tr_worldsoundfile ( soundsource ( filename ( a ) ) lights ( ) )",
        )
        .unwrap();
        assert_eq!(summary(&parsed), "1 sources, 0 regions (1 warning)");
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = read_file(&dir.path().join("none.ws"), ReaderConfig::default());
        assert!(matches!(outcome, FileOutcome::Missing));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["worldsound", "-vv", "--strict", "a.ws", "b.ws"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.strict);
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.max_depth, DEFAULT_MAX_DEPTH);
        assert!(Args::try_parse_from(["worldsound"]).is_err());
    }
}
