//! File content serving for cached repositories

pub mod binary;
pub mod language;
pub mod reader;

pub use language::{detect_language, PLAIN_TEXT};
pub use reader::{
    read_file_content, read_file_content_with, FileContent, ReadLimits, MAX_CONTENT_BYTES,
    MAX_CONTENT_LINES,
};
