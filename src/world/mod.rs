//! World sound data read from structured text files.
//!
//! A world sound file lists the point emitters and track regions of one
//! world tile. Each record reads its own block through the generic
//! [`stf`](crate::stf) reader and is only added to its parent once it has
//! been read completely.

mod file;
mod region;
mod source;

pub use file::{WorldSoundFile, ROOT_KEYWORD};
pub use region::{SoundRegion, NO_TRACK_NODE, NO_TRACK_TYPE};
pub use source::SoundSource;
