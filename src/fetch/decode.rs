//! Body decompression and charset decoding

use crate::FetchError;
use encoding_rs::{Encoding, UTF_8};
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use regex::Regex;
use std::io::Read;
use std::sync::OnceLock;

/// Undo the Content-Encoding applied by the server.
///
/// Unknown encodings are passed through untouched.
pub fn decompress(raw: &[u8], content_encoding: Option<&str>) -> Result<Vec<u8>, FetchError> {
    let encoding = content_encoding
        .map(|e| e.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match encoding.as_str() {
        "gzip" | "x-gzip" => {
            let mut out = Vec::new();
            GzDecoder::new(raw)
                .read_to_end(&mut out)
                .map_err(|e| FetchError::Decode(e.to_string()))?;
            Ok(out)
        }
        "deflate" => {
            // Servers disagree on whether deflate means zlib-wrapped or raw
            let mut out = Vec::new();
            if ZlibDecoder::new(raw).read_to_end(&mut out).is_ok() {
                return Ok(out);
            }
            out.clear();
            DeflateDecoder::new(raw)
                .read_to_end(&mut out)
                .map_err(|e| FetchError::Decode(e.to_string()))?;
            Ok(out)
        }
        _ => Ok(raw.to_vec()),
    }
}

fn meta_charset_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#).expect("valid regex")
    })
}

fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches(|c| c == '"' || c == '\''))
        } else {
            None
        }
    })
}

/// Pick the document encoding: Content-Type charset, then a `<meta charset>`
/// sniff over the first KiB, then UTF-8.
pub fn detect_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some(encoding) = content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    let head = &bytes[..bytes.len().min(1024)];
    let head = String::from_utf8_lossy(head);
    meta_charset_regex()
        .captures(&head)
        .and_then(|caps| Encoding::for_label(caps[1].as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode body bytes into text, replacing malformed sequences.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(bytes, content_type);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = used.name(), "body contained malformed sequences");
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_gzip_body_is_decompressed() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<html>hello</html>").unwrap();
        let compressed = encoder.finish().unwrap();

        let out = decompress(&compressed, Some("gzip")).unwrap();
        assert_eq!(out, b"<html>hello</html>");
    }

    #[test]
    fn test_deflate_zlib_body_is_decompressed() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<p>deflated</p>").unwrap();
        let compressed = encoder.finish().unwrap();

        let out = decompress(&compressed, Some("deflate")).unwrap();
        assert_eq!(out, b"<p>deflated</p>");
    }

    #[test]
    fn test_identity_passthrough() {
        assert_eq!(decompress(b"plain", None).unwrap(), b"plain");
        assert_eq!(decompress(b"plain", Some("br")).unwrap(), b"plain");
    }

    #[test]
    fn test_corrupt_gzip_is_decode_error() {
        assert!(matches!(
            decompress(b"definitely not gzip", Some("gzip")),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_charset_from_header_wins() {
        let enc = detect_encoding(b"<meta charset=\"utf-8\">", Some("text/html; charset=ISO-8859-2"));
        assert_eq!(enc.name(), "ISO-8859-2");
    }

    #[test]
    fn test_charset_sniffed_from_meta() {
        let html = b"<html><head><meta charset=\"windows-1250\"></head></html>";
        assert_eq!(detect_encoding(html, Some("text/html")).name(), "windows-1250");
    }

    #[test]
    fn test_decode_latin2_text() {
        // "ő" is 0xF5 in ISO-8859-2
        let bytes = b"<p>\xf5</p>";
        let text = decode_body(bytes, Some("text/html; charset=iso-8859-2"));
        assert_eq!(text, "<p>ő</p>");
    }

    #[test]
    fn test_default_is_utf8() {
        let text = decode_body("<p>árvíztűrő</p>".as_bytes(), None);
        assert_eq!(text, "<p>árvíztűrő</p>");
    }
}
