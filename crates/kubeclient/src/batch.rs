//! Ordered, failure-tolerant application of descriptor trees.
//!
//! A batch walks each top-level path depth-first. Siblings are visited in
//! ascending name order for create/replace and descending order for delete,
//! so descriptors named after their dependency order (`00-crds.yaml`,
//! `10-operator.yaml`, ...) are created bottom-up and torn down top-down.
//!
//! A failing descriptor does not stop the walk: every remaining file is still
//! attempted and all failures are returned together, first one first. A
//! missing top-level path aborts before anything runs.

use crate::error::{BatchFailure, Error, Result};
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::Path;
use walkdir::WalkDir;

/// File extension of descriptor files picked up by a batch.
pub const DESCRIPTOR_EXTENSION: &str = "yaml";

/// Subcommands that can be applied across a descriptor tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    /// `create -f <file>`
    Create,
    /// `replace -f <file>`
    Replace,
    /// `delete -f <file>`
    Delete,
}

/// Order in which the children of a directory are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// `a.yaml` before `b.yaml`
    Ascending,
    /// `b.yaml` before `a.yaml`
    Descending,
}

impl SortOrder {
    fn compare(self, a: &OsStr, b: &OsStr) -> Ordering {
        match self {
            Self::Ascending => a.cmp(b),
            Self::Descending => b.cmp(a),
        }
    }
}

impl Subcommand {
    /// The subcommand as passed to the tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Replace => "replace",
            Self::Delete => "delete",
        }
    }

    /// Sibling order for this subcommand.
    pub fn order(&self) -> SortOrder {
        match self {
            Self::Create | Self::Replace => SortOrder::Ascending,
            Self::Delete => SortOrder::Descending,
        }
    }
}

impl std::fmt::Display for Subcommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether `path` names a descriptor file.
pub fn is_descriptor(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == DESCRIPTOR_EXTENSION)
}

/// Apply `apply_file` to every descriptor under `paths`.
///
/// Directories that cannot be listed abort the batch with [`Error::ReadDir`].
/// Per-file failures are collected into [`Error::Batch`].
pub fn apply_paths<P, F>(subcommand: Subcommand, paths: &[P], mut apply_file: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> Result<()>,
{
    for path in paths {
        let path: &Path = path.as_ref();
        if !path.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
    }

    let order = subcommand.order();
    let mut failures = Vec::new();

    for root in paths {
        let root: &Path = root.as_ref();
        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by(move |a, b| order.compare(a.file_name(), b.file_name()));

        for entry in walker {
            let entry = entry.map_err(|source| {
                let path = source.path().unwrap_or(root).to_path_buf();
                Error::ReadDir { path, source }
            })?;

            if !entry.file_type().is_file() || !is_descriptor(entry.path()) {
                continue;
            }

            if let Err(error) = apply_file(entry.path()) {
                log::warn!("{subcommand} {} failed: {error}", entry.path().display());
                failures.push(BatchFailure {
                    path: entry.path().to_path_buf(),
                    error,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::Batch { failures })
    }
}
