//! Track-proximity sound regions.

use crate::error::Result;
use crate::stf::{DispatchTable, Reader, Unit};

/// Track type of a region that names none.
pub const NO_TRACK_TYPE: i32 = -1;

/// Track node id meaning "not associated with any node".
pub const NO_TRACK_NODE: i32 = -1;

/// A region of track that switches the sound environment of trains inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRegion {
    /// Track sound type index, or [`NO_TRACK_TYPE`]
    pub track_type: i32,
    /// Rotation about the vertical axis, if the file gives one
    pub orientation_y: Option<f32>,
    /// Track nodes covered by the region, in file order
    pub track_node_ids: Vec<i32>,
}

impl SoundRegion {
    /// Read a `SoundRegion ( ... )` block; the name has already been consumed.
    ///
    /// ```text
    /// SoundRegion (
    ///     SoundRegionTrackType ( 2 )
    ///     SoundRegionRoty ( 1.5708 )
    ///     TrItemId ( 0 311 )
    /// )
    /// ```
    ///
    /// `TrItemId` carries a database index followed by the node id; the
    /// index is not used. Ids of [`NO_TRACK_NODE`] are dropped.
    pub fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        reader.match_exact("(")?;

        let mut track_type = NO_TRACK_TYPE;
        let mut orientation_y = None;
        let mut track_node_ids = Vec::new();

        reader.parse_block(
            &mut DispatchTable::new()
                .on("soundregiontracktype", |r| {
                    track_type = r.read_int_block(NO_TRACK_TYPE)?;
                    Ok(())
                })
                .on("soundregionroty", |r| {
                    orientation_y = r.read_optional_float_block(Unit::None)?;
                    Ok(())
                })
                .on("tritemid", |r| {
                    r.match_exact("(")?;
                    let _database = r.read_int(0)?;
                    let id = r.read_int(NO_TRACK_NODE)?;
                    r.skip_rest_of_block()?;
                    if id != NO_TRACK_NODE {
                        track_node_ids.push(id);
                    }
                    Ok(())
                }),
        )?;

        Ok(Self {
            track_type,
            orientation_y,
            track_node_ids,
        })
    }

    /// Whether the region names a track type.
    pub fn has_track_type(&self) -> bool {
        self.track_type != NO_TRACK_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> SoundRegion {
        let mut reader = Reader::new(input, "test");
        let region = SoundRegion::parse(&mut reader).unwrap();
        assert_eq!(reader.depth(), 0);
        region
    }

    #[test]
    fn test_sentinel_track_node_is_dropped() {
        assert!(parse("( tritemid ( 7 -1 ) )").track_node_ids.is_empty());
        assert_eq!(parse("( tritemid ( 7 42 ) )").track_node_ids, [42]);
    }

    #[test]
    fn test_track_nodes_keep_file_order() {
        let region = parse("( TrItemId ( 0 5 ) TrItemId ( 0 -1 ) TrItemId ( 1 3 ) TrItemId ( 0 5 ) )");
        assert_eq!(region.track_node_ids, [5, 3, 5]);
    }

    #[test]
    fn test_track_type_default() {
        let region = parse("( soundregionroty ( 0.5 ) )");
        assert_eq!(region.track_type, NO_TRACK_TYPE);
        assert!(!region.has_track_type());
        assert_eq!(region.orientation_y, Some(0.5));

        let region = parse("( SoundRegionTrackType ( 3 ) )");
        assert_eq!(region.track_type, 3);
        assert!(region.has_track_type());
        assert_eq!(region.orientation_y, None);
    }

    #[test]
    fn test_bad_track_type_falls_back_to_default() {
        let mut reader = Reader::new("( soundregiontracktype ( fast ) )", "test");
        let region = SoundRegion::parse(&mut reader).unwrap();
        assert_eq!(region.track_type, NO_TRACK_TYPE);
        assert_eq!(reader.diagnostics().len(), 1);
    }
}
