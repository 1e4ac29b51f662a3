//! Binary file detection

use std::path::Path;

/// Bytes sampled from the start of a file
pub const SAMPLE_LEN: usize = 8192;

/// Fraction of suspicious bytes above which a sample is binary
const SUSPICIOUS_RATIO: f64 = 0.30;

const BINARY_EXTENSIONS: &[&str] = &[
    // Images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "tif", "psd",
    // Audio
    "mp3", "wav", "ogg", "flac", "aac", "m4a",
    // Video
    "mp4", "avi", "mov", "mkv", "webm", "flv",
    // Archives
    "zip", "tar", "gz", "tgz", "rar", "7z", "bz2", "xz", "zst", "jar",
    // Executables and libraries
    "exe", "dll", "so", "dylib", "bin", "o", "a", "lib", "obj",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // Fonts
    "ttf", "otf", "woff", "woff2", "eot",
    // Bytecode and databases
    "class", "pyc", "pyo", "wasm", "db", "sqlite", "sqlite3",
];

/// Check the extension against known binary formats
pub fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| BINARY_EXTENSIONS.contains(&e.as_str()))
}

/// Classify a sample taken from the start of a file.
///
/// Any NUL byte means binary. Otherwise control characters (other than
/// common whitespace and escape) and bytes that are not valid UTF-8 are
/// counted, and the sample is binary when they exceed the ratio.
pub fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }

    let mut suspicious = 0usize;
    for chunk in sample.utf8_chunks() {
        suspicious += chunk.invalid().len();
        suspicious += chunk
            .valid()
            .bytes()
            .filter(|b| b.is_ascii_control() && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b))
            .count();
    }

    suspicious as f64 / sample.len() as f64 > SUSPICIOUS_RATIO
}
