use thiserror::Error;
use trellis_scanner::ScanError;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::path::PathBuf;

    #[test]
    fn test_scan_error_is_not_repeated_in_chain() {
        let err = GraphError::from(ScanError::StoreAccess(vec![ScanError::Read {
            path: PathBuf::from("content/secret.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }]));

        assert_eq!(
            err.to_string(),
            "Document store access failed: 1 unreadable entry (content/secret.md)"
        );
        // StoreAccess carries no source of its own
        assert!(err.source().is_none());
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let err: GraphError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(matches!(err, GraphError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error: "));
    }
}
