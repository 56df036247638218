// Filesystem document store.
//
// Walks a content root into a typed `DocumentTree` and derives canonical
// identifiers from it: the path relative to the root, `/`-separated, with
// the extension marker removed and case preserved.

use crate::error::{Result, ScanError};
use crate::resolve::{normalize_extension, strip_extension};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A directory or a document under the content root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentTree {
    Directory {
        name: String,
        children: Vec<DocumentTree>,
    },
    Document {
        name: String,
        path: PathBuf,
    },
}

/// A discovered document: identifier plus the file it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: String,
    pub path: PathBuf,
}

impl DocumentTree {
    /// Walk `root`, keeping files that end in `.{extension}`.
    ///
    /// Hidden entries are skipped, symlinked directories are not followed and
    /// directories without documents are pruned. Every unreadable directory is
    /// collected into a single [`ScanError::StoreAccess`].
    pub fn scan(root: &Path, extension: &str) -> Result<DocumentTree> {
        if !root.is_dir() {
            return Err(ScanError::InvalidRoot(root.to_path_buf()));
        }

        let extension = normalize_extension(extension);
        let mut failures = Vec::new();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let children = scan_children(root, &extension, &mut failures);

        if !failures.is_empty() {
            return Err(ScanError::StoreAccess(failures));
        }

        Ok(DocumentTree::Directory { name, children })
    }

    pub fn name(&self) -> &str {
        match self {
            DocumentTree::Directory { name, .. } | DocumentTree::Document { name, .. } => name,
        }
    }

    /// Every document below this node, in tree order.
    ///
    /// The node itself does not contribute a segment; its children are
    /// identified relative to it.
    pub fn documents(&self) -> Vec<DocumentEntry> {
        let mut entries = Vec::new();
        match self {
            DocumentTree::Directory { children, .. } => {
                for child in children {
                    child.collect_documents("", &mut entries);
                }
            }
            DocumentTree::Document { .. } => self.collect_documents("", &mut entries),
        }
        entries
    }

    pub fn document_count(&self) -> usize {
        match self {
            DocumentTree::Directory { children, .. } => {
                children.iter().map(DocumentTree::document_count).sum()
            }
            DocumentTree::Document { .. } => 1,
        }
    }

    fn collect_documents(&self, prefix: &str, out: &mut Vec<DocumentEntry>) {
        match self {
            DocumentTree::Directory { name, children } => {
                let prefix = join_segment(prefix, name);
                for child in children {
                    child.collect_documents(&prefix, out);
                }
            }
            DocumentTree::Document { name, path } => out.push(DocumentEntry {
                id: join_segment(prefix, name),
                path: path.clone(),
            }),
        }
    }
}

fn join_segment(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", prefix, segment)
    }
}

fn scan_children(dir: &Path, extension: &str, failures: &mut Vec<ScanError>) -> Vec<DocumentTree> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(source) => {
            failures.push(ScanError::Read {
                path: dir.to_path_buf(),
                source,
            });
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for entry in read_dir {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(source) => failures.push(ScanError::Read {
                path: dir.to_path_buf(),
                source,
            }),
        }
    }
    entries.sort_by_key(|e| e.file_name());

    let mut children = Vec::new();
    for entry in entries {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(source) => {
                failures.push(ScanError::Read { path, source });
                continue;
            }
        };

        if file_type.is_dir() {
            let grandchildren = scan_children(&path, extension, failures);
            if grandchildren.is_empty() {
                debug!("Skipping directory without documents: {}", path.display());
                continue;
            }
            children.push(DocumentTree::Directory {
                name: file_name,
                children: grandchildren,
            });
        } else if let Some(stem) = document_stem(&file_name, extension) {
            children.push(DocumentTree::Document {
                name: stem.to_string(),
                path,
            });
        }
    }

    children
}

/// The file name without its extension marker, if it carries one.
fn document_stem<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let stem = strip_extension(file_name, extension);
    (stem.len() < file_name.len() && !stem.is_empty()).then_some(stem)
}
