//! JSON persistence for the data directory.
//!
//! Schedules and tail records are the only documents the engine writes. The
//! readers here report missing and malformed files as errors; callers decide
//! whether to substitute defaults.

mod schedule;
mod tail;

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{EngineError, EngineResult};

pub use schedule::{ScheduleDocument, load_schedule, save_schedule};
pub use tail::{load_tail, save_tail};

/// Reads and parses a JSON document.
///
/// Fails with [`EngineError::ConfigNotFound`] when the file cannot be read and
/// [`EngineError::ConfigParseError`] when it is not valid JSON.
pub fn read_json(path: &Path) -> EngineResult<Value> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_json::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}

/// Writes a value as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> EngineResult<()> {
    let storage_error = |message: String| EngineError::StorageError {
        path: path.display().to_string(),
        message,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| storage_error(e.to_string()))?;
    }
    let content = serde_json::to_string_pretty(value).map_err(|e| storage_error(e.to_string()))?;
    fs::write(path, content).map_err(|e| storage_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_json(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_read_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"members\": [").unwrap();
        assert!(matches!(
            read_json(&path),
            Err(EngineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        write_json(&path, &json!({"name": "佐藤"})).unwrap();
        let value = read_json(&path).unwrap();
        assert_eq!(value["name"], "佐藤");
        // Non-ASCII text is written as-is
        assert!(fs::read_to_string(&path).unwrap().contains("佐藤"));
    }
}
