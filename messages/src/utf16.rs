//! UTF-16LE text carried in byte buffers (paths, file names, net names).

use bytes::Bytes;

/// Encodes `text` as UTF-16LE without a terminator.
pub fn encode(text: &str) -> Bytes {
    text.encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect::<Vec<u8>>()
        .into()
}

/// Decodes UTF-16LE bytes, or `None` if the length is odd or a surrogate is unpaired.
pub fn decode(raw: &[u8]) -> Option<String> {
    if raw.len() % 2 != 0 {
        return None;
    }
    let units = raw.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}
