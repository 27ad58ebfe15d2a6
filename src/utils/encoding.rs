//! Text decoding and binary detection for file contents.
//!
//! Decoding honours UTF-8 and UTF-16 byte-order marks and otherwise decodes
//! as UTF-8 with replacement characters, so a read never fails on encoding.

use encoding_rs::{Encoding, UTF_8};
use std::path::Path;

const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Extensions treated as binary regardless of content.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "pdf", "zip", "gz", "tgz", "bz2",
    "xz", "7z", "rar", "tar", "jar", "war", "exe", "dll", "so", "dylib", "a", "o", "class", "wasm",
    "woff", "woff2", "ttf", "otf", "eot", "mp3", "mp4", "mov", "avi", "wav", "ogg", "sqlite", "db",
    "pyc", "bin",
];

/// Decode file bytes to a `String`.
///
/// 1. BOM present → decode with the BOM's encoding, BOM stripped
/// 2. Otherwise UTF-8, replacing invalid sequences with U+FFFD
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (decoded, _had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }

    let (decoded, _had_errors) = UTF_8.decode_without_bom_handling(bytes);
    decoded.into_owned()
}

/// Whether content should be presented as binary rather than text.
///
/// True for known binary extensions, or when a NUL byte appears in the first
/// 8 KiB of `bytes`.
pub fn looks_binary(path: &Path, bytes: &[u8]) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    if BINARY_EXTENSIONS.contains(&ext.as_str()) {
        return true;
    }

    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    sample.contains(&0)
}
