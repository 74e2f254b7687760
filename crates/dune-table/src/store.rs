//! JSON file helpers shared by the persistent stores.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{TableError, TableResult};

/// Read and parse a JSON file. A missing file is `Ok(None)`.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> TableResult<Option<T>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(TableError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| TableError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a value as pretty-printed JSON, creating parent directories.
pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> TableResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TableError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| TableError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded: Option<BTreeMap<String, u32>> =
            load_json(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/data/values.json");
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1u32);
        save_json(&path, &map).unwrap();
        let loaded: Option<BTreeMap<String, u32>> = load_json(&path).unwrap();
        assert_eq!(loaded, Some(map));
    }

    #[test]
    fn corrupt_file_is_json_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result: TableResult<Option<BTreeMap<String, u32>>> = load_json(&path);
        assert!(matches!(result, Err(TableError::Json { .. })));
    }

    #[test]
    fn writing_to_a_directory_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = save_json(dir.path(), &1u32);
        assert!(matches!(result, Err(TableError::Io { .. })));
    }
}
