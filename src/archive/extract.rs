//! Snapshot tarball extraction
//!
//! GitHub snapshots are gzip-compressed tarballs whose entries all live
//! under one synthetic directory (`{repo}-{branch}/` from codeload,
//! `{owner}-{repo}-{sha}/` from the API). The wrapper is stripped so the
//! destination directly contains the repository files.

use crate::archive::sandbox::sanitize_relative;
use crate::error::{LensError, LensResult};
use flate2::read::GzDecoder;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path};
use tar::{Archive, EntryType};
use tracing::debug;

/// Counters reported after a successful extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Name of the stripped wrapper directory
    pub wrapper: String,
    /// Regular files written
    pub files: usize,
    /// Directories created
    pub dirs: usize,
    /// Symbolic and hard links skipped
    pub skipped_links: usize,
    /// Bytes written
    pub bytes: u64,
}

enum EntryKind {
    Dir,
    File,
    Link,
    Other,
}

fn classify(kind: EntryType) -> EntryKind {
    if kind.is_dir() {
        EntryKind::Dir
    } else if kind.is_file() || kind.is_contiguous() {
        EntryKind::File
    } else if kind.is_symlink() || kind.is_hard_link() {
        EntryKind::Link
    } else {
        EntryKind::Other
    }
}

/// Unpack `archive` into `dest`, which must already exist and be empty.
///
/// Any entry whose name is absolute, contains `..`, or lies outside the
/// wrapper directory aborts the whole extraction with `ExtractionFailed`.
/// Links are never materialized, so nothing written here can redirect a
/// later write outside `dest`.
pub fn extract_tarball(archive: &Path, dest: &Path) -> LensResult<ExtractStats> {
    let file = File::open(archive)
        .map_err(|e| LensError::io(format!("opening archive {}", archive.display()), e))?;
    let mut tar = Archive::new(GzDecoder::new(BufReader::new(file)));

    let entries = tar
        .entries()
        .map_err(|e| LensError::ExtractionFailed(format!("reading tar entries: {}", e)))?;

    let mut wrapper: Option<OsString> = None;
    let mut stats = ExtractStats::default();

    for entry in entries {
        let mut entry = entry
            .map_err(|e| LensError::ExtractionFailed(format!("reading entry: {}", e)))?;

        let kind = classify(entry.header().entry_type());
        if let EntryKind::Other = kind {
            continue;
        }

        let raw = entry
            .path()
            .map_err(|e| LensError::ExtractionFailed(format!("invalid entry path: {}", e)))?
            .into_owned();

        let clean = sanitize_relative(&raw)
            .map_err(|v| LensError::ExtractionFailed(format!("unsafe entry rejected, {}", v)))?;

        let mut components = clean.components();
        let top = match components.next() {
            Some(Component::Normal(top)) => top.to_os_string(),
            _ => continue,
        };

        match &wrapper {
            None => wrapper = Some(top),
            Some(expected) if *expected == top => {}
            Some(expected) => {
                return Err(LensError::ExtractionFailed(format!(
                    "entry {} is outside archive root {}",
                    raw.display(),
                    expected.to_string_lossy()
                )))
            }
        }

        let relative = components.as_path();
        if relative.as_os_str().is_empty() {
            continue;
        }
        let out_path = dest.join(relative);

        match kind {
            EntryKind::Dir => {
                fs::create_dir_all(&out_path).map_err(|e| {
                    LensError::io(format!("creating directory {}", out_path.display()), e)
                })?;
                stats.dirs += 1;
            }
            EntryKind::File => {
                if let Some(parent) = out_path.parent() {
                    fs::create_dir_all(parent).map_err(|e| {
                        LensError::io(format!("creating directory {}", parent.display()), e)
                    })?;
                }
                let mut out = File::create(&out_path).map_err(|e| {
                    LensError::io(format!("creating file {}", out_path.display()), e)
                })?;
                let written = io::copy(&mut entry, &mut out).map_err(|e| {
                    LensError::ExtractionFailed(format!("writing {}: {}", relative.display(), e))
                })?;
                stats.files += 1;
                stats.bytes += written;
            }
            EntryKind::Link => {
                debug!("Skipping link entry {}", raw.display());
                stats.skipped_links += 1;
            }
            EntryKind::Other => {}
        }
    }

    stats.wrapper = wrapper
        .ok_or_else(|| LensError::ExtractionFailed("archive contains no entries".to_string()))?
        .to_string_lossy()
        .into_owned();

    debug!(
        "Extracted {} files, {} dirs ({} bytes) from {}",
        stats.files, stats.dirs, stats.bytes, stats.wrapper
    );
    Ok(stats)
}
