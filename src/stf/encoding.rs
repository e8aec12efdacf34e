//! Text decoding for source files.
//!
//! Files written by the original tools are usually UTF-16 little-endian
//! with a byte-order mark; hand-edited ones are often UTF-8.

/// Decode raw file bytes into text.
///
/// UTF-16 (either byte order) is recognised by its byte-order mark.
/// Anything else is read as UTF-8, with invalid sequences replaced.
pub fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_utf16_little_endian() {
        let bytes = utf16le("Tr_WorldSoundFile ( )");
        assert_eq!(decode_text(&bytes), "Tr_WorldSoundFile ( )");
    }

    #[test]
    fn test_utf16_big_endian() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "ab".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_text(&bytes), "ab");
    }

    #[test]
    fn test_utf8_passthrough() {
        assert_eq!(decode_text("SoundSource ( )".as_bytes()), "SoundSource ( )");
        assert_eq!(decode_text(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }
}
