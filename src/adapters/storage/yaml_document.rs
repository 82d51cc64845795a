//! Shared YAML document I/O for the file adapters.
//!
//! Loads are strict: an unreadable or unparseable document is a storage
//! error. Writes go to a sibling temp file that is renamed over the target,
//! so a crash mid-write leaves the previous document intact.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::DomainError;

fn io_error(e: std::io::Error) -> DomainError {
    DomainError::storage(format!("IO error: {}", e))
}

pub(super) async fn exists(path: &Path) -> Result<bool, DomainError> {
    fs::try_exists(path).await.map_err(io_error)
}

/// Reads and parses a document. Returns `None` when the file does not exist.
pub(super) async fn load<T: DeserializeOwned>(
    path: &Path,
    what: &str,
) -> Result<Option<T>, DomainError> {
    if !exists(path).await? {
        return Ok(None);
    }
    let yaml = fs::read_to_string(path).await.map_err(io_error)?;
    serde_yaml::from_str(&yaml)
        .map(Some)
        .map_err(|e| DomainError::storage(format!("Failed to deserialize {}: {}", what, e)))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub(super) async fn store<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    what: &str,
) -> Result<(), DomainError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await.map_err(io_error)?;
    }
    let yaml = serde_yaml::to_string(value)
        .map_err(|e| DomainError::storage(format!("Failed to serialize {}: {}", what, e)))?;

    let temp = temp_path(path);
    fs::write(&temp, yaml).await.map_err(io_error)?;
    fs::rename(&temp, path).await.map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_document_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Option<Vec<String>> = load(&temp_dir.path().join("absent.yaml"), "rows")
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn store_replaces_document_without_leaving_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("rows.yaml");

        store(&path, &vec!["a".to_string()], "rows").await.unwrap();
        store(&path, &vec!["b".to_string(), "c".to_string()], "rows")
            .await
            .unwrap();

        let loaded: Option<Vec<String>> = load(&path, "rows").await.unwrap();
        assert_eq!(loaded, Some(vec!["b".to_string(), "c".to_string()]));
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn unparseable_document_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.yaml");
        std::fs::write(&path, "{{ not: [valid").unwrap();

        let err = load::<Vec<String>>(&path, "rows").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
    }
}
