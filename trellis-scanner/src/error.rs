use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Unresolvable link '{target}': {reason}")]
    UnresolvableLink { target: String, reason: String },

    #[error("Invalid content root: {0}")]
    InvalidRoot(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document store access failed: {}", describe_failures(.0))]
    StoreAccess(Vec<ScanError>),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl ScanError {
    pub fn unresolvable(target: &str, reason: impl Into<String>) -> Self {
        ScanError::UnresolvableLink {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    /// Paths of every failed read carried by this error.
    pub fn failed_paths(&self) -> Vec<&PathBuf> {
        match self {
            ScanError::Read { path, .. } => vec![path],
            ScanError::StoreAccess(failures) => {
                failures.iter().flat_map(|f| f.failed_paths()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn describe_failures(failures: &[ScanError]) -> String {
    let noun = if failures.len() == 1 { "entry" } else { "entries" };
    let listed: Vec<String> = failures
        .iter()
        .map(|failure| match failure {
            ScanError::Read { path, .. } => path.display().to_string(),
            other => other.to_string(),
        })
        .collect();
    format!("{} unreadable {} ({})", failures.len(), noun, listed.join(", "))
}

pub type Result<T> = std::result::Result<T, ScanError>;
