//! repolens - browse GitHub repositories without cloning
//!
//! Downloads a branch snapshot, unpacks it into a sandboxed local cache and
//! serves its file tree and file contents from there. See
//! [`service::RepoService`] for the entry point.

pub mod archive;
pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod remote;
pub mod service;
pub mod tree;
pub mod ui;

pub use error::{LensError, LensResult};
