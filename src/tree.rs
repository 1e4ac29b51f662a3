//! File tree construction for cached snapshots
//!
//! The tree is built once per import or update with a single directory walk
//! and stored as `_meta/tree.json`, so serving it later never touches the
//! extracted files.
//!
//! Ordering: at every level directories come before files; within each
//! group names compare case-insensitively, with the exact name as
//! tie-break so the order is total.

use crate::archive::sandbox::to_slash;
use crate::error::{LensError, LensResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Directory or file names never included in a tree
pub const IGNORED_NAMES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".gradle",
    crate::cache::META_DIR,
];

/// Check whether an entry name is in the fixed ignore set
pub fn is_ignored(name: &OsStr) -> bool {
    IGNORED_NAMES.iter().any(|ignored| name == OsStr::new(ignored))
}

/// A node of a repository tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    /// Slash-separated path relative to the repository root ("" for the root)
    pub path: String,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    /// Create an empty directory node
    pub fn dir(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir: true,
            size: None,
            children: Some(Vec::new()),
        }
    }

    /// Create a file node
    pub fn file(name: impl Into<String>, path: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir: false,
            size: Some(size),
            children: None,
        }
    }

    fn push_child(&mut self, child: FileNode) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Look up a node by slash-separated relative path
    pub fn find(&self, path: &str) -> Option<&FileNode> {
        let mut node = self;
        for part in path.split('/').filter(|p| !p.is_empty() && *p != ".") {
            node = node
                .children
                .as_ref()?
                .iter()
                .find(|child| child.name == part)?;
        }
        Some(node)
    }

    /// Number of file (leaf) nodes below this node
    pub fn file_count(&self) -> usize {
        match &self.children {
            None => usize::from(!self.is_dir),
            Some(children) => children.iter().map(FileNode::file_count).sum(),
        }
    }

    /// Total size of all files below this node
    pub fn total_size(&self) -> u64 {
        match &self.children {
            None => self.size.unwrap_or(0),
            Some(children) => children.iter().map(FileNode::total_size).sum(),
        }
    }
}

/// Order two entries: directories first, then case-insensitive name
pub fn compare_entries(a_is_dir: bool, a: &str, b_is_dir: bool, b: &str) -> Ordering {
    b_is_dir
        .cmp(&a_is_dir)
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn compare_dir_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    compare_entries(
        a.file_type().is_dir(),
        &a.file_name().to_string_lossy(),
        b.file_type().is_dir(),
        &b.file_name().to_string_lossy(),
    )
}

fn walk_error(root: &Path, err: walkdir::Error) -> LensError {
    LensError::io(format!("walking {}", root.display()), err.into())
}

/// Build the tree for the directory at `root`, naming the root node `root_name`.
///
/// Entries are visited in final order, so each directory's children are
/// appended already sorted. Only regular files and directories become nodes.
pub fn build_tree(root: &Path, root_name: &str) -> LensResult<FileNode> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(compare_dir_entries)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e.file_name()));

    // Open directories, indexed by depth
    let mut stack: Vec<FileNode> = Vec::new();

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        let depth = entry.depth();

        if depth == 0 {
            if !entry.file_type().is_dir() {
                return Err(LensError::io(
                    format!("building tree for {}", root.display()),
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
                ));
            }
            stack.push(FileNode::dir(root_name, ""));
            continue;
        }

        close_dirs(&mut stack, depth);

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| LensError::Internal(format!("walk left root: {}", e)))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            stack.push(FileNode::dir(name, to_slash(relative)));
        } else if file_type.is_file() {
            let size = entry.metadata().map_err(|e| walk_error(root, e))?.len();
            if let Some(parent) = stack.last_mut() {
                parent.push_child(FileNode::file(name, to_slash(relative), size));
            }
        }
    }

    close_dirs(&mut stack, 1);
    stack
        .pop()
        .ok_or_else(|| LensError::Internal(format!("empty walk of {}", root.display())))
}

/// Pop finished directories until the stack holds exactly `depth` levels
fn close_dirs(stack: &mut Vec<FileNode>, depth: usize) {
    while stack.len() > depth {
        let Some(done) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.push_child(done),
            None => {
                stack.push(done);
                break;
            }
        }
    }
}
