//! Compression Module
//!
//! Gzip framing for stored values. A compressed value is the fixed marker
//! prefix followed by the base64-encoded gzip stream; anything else is taken
//! as a plain serialized string. Compression is only adopted when the framed
//! form is strictly shorter than the raw string.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Marker prefix identifying a compressed stored value.
pub const COMPRESSION_MARKER: &str = "@gzip:";

// == Encode ==
/// Produces the framed compressed representation of a serialized string.
///
/// Returns None if the gzip encoder fails, which the caller treats as
/// "do not adopt".
pub fn encode(raw: &str) -> Option<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw.as_bytes()).ok()?;
    let compressed = encoder.finish().ok()?;
    Some(format!("{}{}", COMPRESSION_MARKER, BASE64.encode(compressed)))
}

// == Decode ==
/// Recovers the original serialized string from a framed value.
///
/// Returns None when the input is not framed, or the frame is corrupt.
pub fn decode(stored: &str) -> Option<String> {
    let payload = stored.strip_prefix(COMPRESSION_MARKER)?;
    let compressed = BASE64.decode(payload).ok()?;
    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut raw = String::new();
    decoder.read_to_string(&mut raw).ok()?;
    Some(raw)
}

/// Whether a stored value carries the compression marker.
pub fn is_compressed(stored: &str) -> bool {
    stored.starts_with(COMPRESSION_MARKER)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let raw = r#"{"a":1,"b":"some longer text that compresses"}"#;
        let framed = encode(raw).unwrap();
        assert!(is_compressed(&framed));
        assert_eq!(decode(&framed).unwrap(), raw);
    }

    #[test]
    fn test_short_values_grow_when_framed() {
        // The marker plus base64 plus gzip headers dwarf a tiny payload, so
        // the strictly-shorter adoption test rejects it.
        let raw = "1";
        let framed = encode(raw).unwrap();
        assert!(framed.len() > raw.len());
    }

    #[test]
    fn test_repetitive_values_shrink() {
        let raw = "x".repeat(4096);
        let framed = encode(&raw).unwrap();
        assert!(framed.len() < raw.len());
        assert_eq!(decode(&framed).unwrap(), raw);
    }

    #[test]
    fn test_decode_rejects_unframed_input() {
        assert!(decode(r#"{"a":1}"#).is_none());
        assert!(!is_compressed(r#"{"a":1}"#));
    }

    #[test]
    fn test_decode_rejects_corrupt_frame() {
        assert!(decode("@gzip:!!!not-base64!!!").is_none());
        // Valid base64, not a gzip stream.
        let bogus = format!("{}{}", COMPRESSION_MARKER, BASE64.encode(b"plain"));
        assert!(decode(&bogus).is_none());
    }
}
