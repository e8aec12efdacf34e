//! Point sound emitters.

use crate::error::Result;
use crate::stf::{DispatchTable, Reader, Unit};

/// A sound emitter placed at a fixed point in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundSource {
    /// East-west offset within the tile
    pub x: f32,
    /// Height
    pub y: f32,
    /// North-south offset within the tile
    pub z: f32,
    /// Sound definition file played by this emitter
    pub file_name: String,
}

impl SoundSource {
    /// Read a `SoundSource ( ... )` block; the name has already been consumed.
    ///
    /// ```text
    /// SoundSource (
    ///     Position ( -48.2 3 112.5 )
    ///     FileName ( "church_bell.sms" )
    /// )
    /// ```
    pub fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        reader.match_exact("(")?;

        let mut position = [0.0f32; 3];
        let mut file_name = String::new();

        reader.parse_block(
            &mut DispatchTable::new()
                .on("filename", |r| {
                    file_name = r.read_string_block("")?;
                    Ok(())
                })
                .on("position", |r| {
                    r.match_exact("(")?;
                    for axis in position.iter_mut() {
                        *axis = r.read_float(Unit::None, 0.0)?;
                    }
                    r.skip_rest_of_block()
                }),
        )?;

        let [x, y, z] = position;
        Ok(Self { x, y, z, file_name })
    }

    /// Position as `[x, y, z]`.
    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}
