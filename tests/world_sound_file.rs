//! World sound file integration tests: whole-file reads through the public API.

use std::path::Path;
use std::thread;

use approx::assert_relative_eq;
use worldsound_core::stf::{count_kind, DispatchTable, Reader};
use worldsound_core::world::{NO_TRACK_TYPE, ROOT_KEYWORD};
use worldsound_core::{DiagnosticKind, ReaderConfig, WorldSoundError, WorldSoundFile};

const SAMPLE: &str = include_str!("data/w-005973+014920.ws");

#[test]
fn test_sample_file_reads_with_one_warning() {
    let parsed = WorldSoundFile::parse("w-005973+014920.ws", SAMPLE).unwrap();

    let file = &parsed.value;
    assert_eq!(file.sources().len(), 2);
    assert_eq!(file.sources()[0].file_name, "crossing_bell.sms");
    assert_relative_eq!(file.sources()[0].x, -312.5);
    assert_relative_eq!(file.sources()[1].z, -906.25);

    assert_eq!(file.regions().len(), 2);
    assert_eq!(file.regions()[0].track_type, 2);
    assert_relative_eq!(file.regions()[0].orientation_y.unwrap(), 1.5708);
    assert_eq!(file.regions()[0].track_node_ids, [311, 312]);
    assert!(file.regions()[1].track_node_ids.is_empty());

    // LightSource is unknown to this reader; the comment block is not reported.
    assert_eq!(parsed.diagnostics.len(), 1);
    let warning = &parsed.diagnostics[0];
    assert_eq!(warning.kind, DiagnosticKind::UnknownToken);
    assert_eq!(warning.source, "w-005973+014920.ws");
    assert_eq!((warning.line, warning.column), (24, 2));
}

#[test]
fn test_load_from_disk_matches_parse() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/w-005973+014920.ws");
    let loaded = WorldSoundFile::load(&path).unwrap();
    let parsed = WorldSoundFile::parse("inline", SAMPLE).unwrap();
    assert_eq!(loaded.value, parsed.value);
    assert_eq!(loaded.diagnostics[0].source, path.display().to_string());
}

#[test]
fn test_reading_twice_gives_equal_results() {
    let first = WorldSoundFile::parse("a", SAMPLE).unwrap();
    let second = WorldSoundFile::parse("a", SAMPLE).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_independent_readers_on_threads_agree() {
    let expected = WorldSoundFile::parse("a", SAMPLE).unwrap().value;
    let results: Vec<WorldSoundFile> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| WorldSoundFile::parse("a", SAMPLE).unwrap().value))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.iter().all(|r| *r == expected));
}

#[test]
fn test_missing_open_paren_aborts_without_a_record() {
    let text = "tr_worldsoundfile ( \
                soundsource ( filename ( first.wav ) ) \
                soundsource filename ( \"second.wav\" ) )";

    // Drive the reader directly to see what reached the sequence before the failure.
    let mut reader = Reader::new(text, "t");
    let mut names = Vec::new();
    let err = reader
        .parse_file(&mut DispatchTable::new().on(ROOT_KEYWORD, |r| {
            r.match_exact("(")?;
            r.parse_block(&mut DispatchTable::new().on("soundsource", |r| {
                let source = worldsound_core::world::SoundSource::parse(r)?;
                names.push(source.file_name);
                Ok(())
            }))
        }))
        .unwrap_err();

    assert!(matches!(err, WorldSoundError::Structural { ref expected, .. } if expected == "("));
    assert_eq!(names, ["first.wav"]);
    assert!(WorldSoundFile::parse("t", text).is_err());
}

#[test]
fn test_unterminated_file_is_fatal() {
    let err = WorldSoundFile::parse("t", "tr_worldsoundfile ( soundsource ( ").unwrap_err();
    assert!(matches!(err, WorldSoundError::UnterminatedBlock { .. }));
}

#[test]
fn test_region_defaults_and_warnings() {
    let text = "tr_worldsoundfile ( soundregion ( soundregionroty ( 2deg ) tritemid ( 0 9 ) ) )";
    let parsed = WorldSoundFile::parse("t", text).unwrap();
    let region = &parsed.value.regions()[0];
    assert_eq!(region.track_type, NO_TRACK_TYPE);
    assert_eq!(region.orientation_y, Some(2.0));
    assert_eq!(region.track_node_ids, [9]);
    assert_eq!(count_kind(&parsed.diagnostics, DiagnosticKind::UnexpectedUnit), 1);
}

#[test]
fn test_text_before_root_is_skipped() {
    let text = "junk ( 1 2 ) tr_worldsoundfile ( soundsource ( ) ) trailing";
    let parsed = WorldSoundFile::parse("t", text).unwrap();
    assert_eq!(parsed.value.sources().len(), 1);
    let kinds: Vec<_> = parsed.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        [DiagnosticKind::UnknownToken, DiagnosticKind::TrailingContent]
    );
}

#[test]
fn test_unterminated_string_after_root_is_not_fatal() {
    let text = "tr_worldsoundfile ( soundsource ( filename ( a ) ) ) \"junk";

    let parsed = WorldSoundFile::parse("t", text).unwrap();
    assert_eq!(parsed.value.sources().len(), 1);
    assert_eq!(
        count_kind(&parsed.diagnostics, DiagnosticKind::TrailingContent),
        1
    );

    let config = ReaderConfig::new().with_trailing_content_warning(false);
    let parsed = WorldSoundFile::parse_with_config("t", text, config).unwrap();
    assert_eq!(parsed.value.sources().len(), 1);
    assert!(parsed.diagnostics.is_empty());
}
