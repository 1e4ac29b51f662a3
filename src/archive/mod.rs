//! Untrusted snapshot handling
//!
//! Snapshots downloaded from the remote are treated as hostile input.
//! Extraction writes only regular files and directories, and every entry
//! name is confined to the destination through [`sandbox`], the same
//! primitive the file reader uses when serving reads.

pub mod extract;
pub mod sandbox;

pub use extract::{extract_tarball, ExtractStats};
pub use sandbox::{resolve_within, sanitize_relative, to_slash, PathViolation};
