//! Text extraction with binary detection and truncation
//!
//! A line is a run of bytes ending in `\n` or at end of file. Returned
//! content is the longest prefix of whole lines that satisfies both the
//! byte ceiling and the line ceiling; whichever ceiling is hit first
//! decides where the prefix ends. Bytes are counted after lossy UTF-8
//! decoding, since each invalid byte grows into a 3-byte U+FFFD. A single line longer than the byte
//! ceiling therefore yields empty content. The remainder of the file is
//! still streamed to report `total_lines`, but never retained.

use crate::content::binary::{has_binary_extension, looks_binary, SAMPLE_LEN};
use crate::content::language::detect_language;
use crate::error::{LensError, LensResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

/// Byte ceiling for returned content
pub const MAX_CONTENT_BYTES: usize = 3_000_000;

/// Line ceiling for returned content
pub const MAX_CONTENT_LINES: usize = 50_000;

/// Result of reading one file from a cached repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub content: String,
    pub truncated: bool,
    pub total_lines: Option<usize>,
    pub language: String,
    pub is_binary: bool,
}

impl FileContent {
    fn binary(language: String) -> Self {
        Self {
            content: String::new(),
            truncated: false,
            total_lines: None,
            language,
            is_binary: true,
        }
    }
}

/// Content ceilings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    pub max_bytes: usize,
    pub max_lines: usize,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_CONTENT_BYTES,
            max_lines: MAX_CONTENT_LINES,
        }
    }
}

/// Read a file with the default ceilings
pub fn read_file_content(path: &Path) -> LensResult<FileContent> {
    read_file_content_with(path, ReadLimits::default())
}

/// Read a file with explicit ceilings
pub fn read_file_content_with(path: &Path, limits: ReadLimits) -> LensResult<FileContent> {
    let language = detect_language(&path.to_string_lossy()).to_string();

    if has_binary_extension(path) {
        return Ok(FileContent::binary(language));
    }

    let io_err = |e: io::Error| LensError::io(format!("reading {}", path.display()), e);

    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::with_capacity(64 * 1024, file);

    let mut sample = Vec::with_capacity(SAMPLE_LEN);
    (&mut reader)
        .take(SAMPLE_LEN as u64)
        .read_to_end(&mut sample)
        .map_err(io_err)?;

    if looks_binary(&sample) {
        return Ok(FileContent::binary(language));
    }

    let collected = collect_lines(Cursor::new(sample).chain(reader), limits).map_err(io_err)?;

    Ok(FileContent {
        content: collected.content,
        truncated: collected.truncated,
        total_lines: Some(collected.total_lines),
        language,
        is_binary: false,
    })
}

struct Collected {
    content: String,
    truncated: bool,
    total_lines: usize,
}

#[derive(Default)]
struct LineCounter {
    newlines: usize,
    last: Option<u8>,
}

impl LineCounter {
    fn feed(&mut self, bytes: &[u8]) {
        self.newlines += bytes.iter().filter(|&&b| b == b'\n').count();
        if let Some(&b) = bytes.last() {
            self.last = Some(b);
        }
    }

    fn drain<R: BufRead>(&mut self, reader: &mut R) -> io::Result<()> {
        loop {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            self.feed(buf);
            let len = buf.len();
            reader.consume(len);
        }
    }

    fn lines(&self) -> usize {
        match self.last {
            Some(b) if b != b'\n' => self.newlines + 1,
            _ => self.newlines,
        }
    }
}

fn collect_lines<R: BufRead>(mut reader: R, limits: ReadLimits) -> io::Result<Collected> {
    let mut content = String::new();
    let mut counter = LineCounter::default();
    let mut included = 0usize;
    let mut line = Vec::new();

    let truncated = loop {
        line.clear();
        let budget = limits.max_bytes - content.len();

        // One byte past the budget is enough to know the line does not fit
        let read = (&mut reader)
            .take(budget as u64 + 1)
            .read_until(b'\n', &mut line)?;
        if read == 0 {
            break false;
        }
        counter.feed(&line);

        if included >= limits.max_lines || read > budget {
            break true;
        }

        // Invalid bytes grow into U+FFFD, so the ceiling applies to decoded text
        let decoded = String::from_utf8_lossy(&line);
        if decoded.len() > budget {
            break true;
        }

        content.push_str(&decoded);
        included += 1;
    };

    if truncated {
        counter.drain(&mut reader)?;
    }

    Ok(Collected {
        content,
        truncated,
        total_lines: counter.lines(),
    })
}
