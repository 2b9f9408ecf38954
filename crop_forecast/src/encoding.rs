//! Text decoding for the price table and market notes files

use crate::error::{ForecastError, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::borrow::Cow;
use tracing::debug;

/// Number of leading bytes sampled for encoding detection
pub const DETECTION_SAMPLE_BYTES: usize = 10_000;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode a price table file.
///
/// UTF-8 is tried first. On failure the encoding is guessed from the first
/// [`DETECTION_SAMPLE_BYTES`] bytes and the whole file is decoded with it.
pub fn decode_table(bytes: &[u8]) -> Result<Cow<'_, str>> {
    if let Ok(text) = std::str::from_utf8(strip_utf8_bom(bytes)) {
        return Ok(Cow::Borrowed(text));
    }

    let encoding = detect_encoding(bytes);
    debug!(encoding = encoding.name(), "price table is not UTF-8, retrying");

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ForecastError::EncodingError(format!(
            "File is neither UTF-8 nor valid {}",
            used.name()
        )));
    }

    Ok(text)
}

/// Decode a market notes file: UTF-8 (with or without BOM), then UTF-16.
pub fn decode_notes(bytes: &[u8]) -> Result<Cow<'_, str>> {
    if let Ok(text) = std::str::from_utf8(strip_utf8_bom(bytes)) {
        return Ok(Cow::Borrowed(text));
    }

    debug!("market notes are not UTF-8, retrying as UTF-16");

    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((enc, bom_len)) if enc == UTF_16LE || enc == UTF_16BE => (enc, &bytes[bom_len..]),
        _ => (UTF_16LE, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            ForecastError::EncodingError("File is neither UTF-8 nor UTF-16".to_string())
        })
}

/// Guess the encoding of `bytes` from a leading sample
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let sample = &bytes[..bytes.len().min(DETECTION_SAMPLE_BYTES)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

fn strip_utf8_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_plain_utf8_is_borrowed() {
        let decoded = decode_table(b"Crop,Price\n").unwrap();
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "Crop,Price\n");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let decoded = decode_table(b"\xEF\xBB\xBFCrop,Price\n").unwrap();
        assert_eq!(decoded, "Crop,Price\n");
    }

    #[test]
    fn test_latin1_table_falls_back() {
        let bytes = b"Crop,Price\nBl\xE9 tendre,2100\nRiz \xE9pic\xE9,3500\nCaf\xE9,4000\n";
        let decoded = decode_table(bytes).unwrap();
        assert!(decoded.contains("Blé tendre"));
        assert!(decoded.contains("Café"));
    }

    #[test]
    fn test_notes_utf16_with_bom() {
        let bytes = utf16le_with_bom(r#"{"last_updated":"2024-05-01"}"#);
        let decoded = decode_notes(&bytes).unwrap();
        assert_eq!(decoded, r#"{"last_updated":"2024-05-01"}"#);
    }

    #[test]
    fn test_notes_utf16_without_bom_defaults_to_little_endian() {
        // 0xE9 0x00 is invalid UTF-8, so this cannot be mistaken for it
        let bytes: Vec<u8> = r#"["é"]"#
            .encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .collect();
        let decoded = decode_notes(&bytes).unwrap();
        assert_eq!(decoded, r#"["é"]"#);
    }

    #[test]
    fn test_notes_undecodable() {
        // Odd length cannot be UTF-16, and 0xFF is never valid UTF-8
        assert!(decode_notes(&[0xFF, 0x00, 0xFF]).is_err());
    }
}
