//! World sound files.

use std::path::Path;

use tracing::debug;

use super::region::SoundRegion;
use super::source::SoundSource;
use crate::error::{Result, WorldSoundError};
use crate::stf::{decode_text, DispatchTable, Parsed, Reader, ReaderConfig};

/// Root statement of a world sound file.
pub const ROOT_KEYWORD: &str = "tr_worldsoundfile";

/// Contents of one world sound file.
///
/// Both sequences keep file order; consumers rely on it for playback and
/// region precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldSoundFile {
    sources: Vec<SoundSource>,
    regions: Vec<SoundRegion>,
}

impl WorldSoundFile {
    /// Read a world sound file from a reader positioned at the start of input.
    ///
    /// A file without the root statement yields an empty result and a
    /// diagnostic on the reader.
    pub fn from_reader(reader: &mut Reader<'_>) -> Result<Self> {
        let mut sources = Vec::new();
        let mut regions = Vec::new();

        reader.parse_file(&mut DispatchTable::new().on(ROOT_KEYWORD, |r| {
            r.match_exact("(")?;
            r.parse_block(
                &mut DispatchTable::new()
                    .on("soundsource", |r| {
                        sources.push(SoundSource::parse(r)?);
                        Ok(())
                    })
                    .on("soundregion", |r| {
                        regions.push(SoundRegion::parse(r)?);
                        Ok(())
                    }),
            )
        }))?;

        debug!(
            source = reader.source_name(),
            sources = sources.len(),
            regions = regions.len(),
            "read world sound file"
        );

        Ok(Self { sources, regions })
    }

    /// Parse world sound text; `source_name` labels diagnostics.
    pub fn parse(source_name: &str, text: &str) -> Result<Parsed<Self>> {
        Self::parse_with_config(source_name, text, ReaderConfig::default())
    }

    /// Parse world sound text with an explicit reader configuration.
    pub fn parse_with_config(
        source_name: &str,
        text: &str,
        config: ReaderConfig,
    ) -> Result<Parsed<Self>> {
        let mut reader = Reader::with_config(text, source_name, config);
        let value = Self::from_reader(&mut reader)?;
        Ok(Parsed {
            value,
            diagnostics: reader.into_diagnostics(),
        })
    }

    /// Read and parse a world sound file.
    ///
    /// The caller decides what a missing file means; here it is an I/O error.
    pub fn load(path: &Path) -> Result<Parsed<Self>> {
        Self::load_with_config(path, ReaderConfig::default())
    }

    /// Read and parse a world sound file with an explicit reader configuration.
    pub fn load_with_config(path: &Path, config: ReaderConfig) -> Result<Parsed<Self>> {
        let bytes = std::fs::read(path).map_err(|e| WorldSoundError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let text = decode_text(&bytes);
        Self::parse_with_config(&path.display().to_string(), &text, config)
    }

    /// Point emitters, in file order.
    pub fn sources(&self) -> &[SoundSource] {
        &self.sources
    }

    /// Track regions, in file order.
    pub fn regions(&self) -> &[SoundRegion] {
        &self.regions
    }

    /// Whether the file holds neither sources nor regions.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.regions.is_empty()
    }

    /// Take ownership of the sources and regions.
    pub fn into_parts(self) -> (Vec<SoundSource>, Vec<SoundRegion>) {
        (self.sources, self.regions)
    }
}
