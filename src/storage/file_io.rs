//! JSON data files
//!
//! Writes go to a sibling `.json.tmp` file which is synced and renamed over the
//! target, so a crash leaves either the old file or the new one.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{ManhoursError, ManhoursResult};

fn storage_error<'a>(
    action: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> ManhoursError + 'a {
    move |e| ManhoursError::Storage(format!("{} {}: {}", action, path.display(), e))
}

/// Load a data file; a file that does not exist yet reads as `T::default()`
pub fn read_json<T, P>(path: P) -> ManhoursResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(storage_error("cannot open", path)(e)),
    };

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| ManhoursError::Storage(format!("cannot parse {}: {}", path.display(), e)))
}

pub fn write_json_atomic<T, P>(path: P, data: &T) -> ManhoursResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(storage_error("cannot create", parent))?;
    }

    let temp_path = path.with_extension("json.tmp");
    if let Err(err) = write_synced(&temp_path, data) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_error("cannot replace", path)(e)
    })?;

    tracing::debug!(path = %path.display(), "data file written");
    Ok(())
}

fn write_synced<T: Serialize>(temp_path: &Path, data: &T) -> ManhoursResult<()> {
    let file = File::create(temp_path).map_err(storage_error("cannot create", temp_path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data).map_err(|e| {
        ManhoursError::Storage(format!("cannot serialize {}: {}", temp_path.display(), e))
    })?;
    writer.flush().map_err(storage_error("cannot flush", temp_path))?;
    writer.get_ref().sync_all().map_err(storage_error("cannot sync", temp_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample() -> TestData {
        TestData {
            name: "Scaffolding".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: TestData = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_json_atomic(&path, &sample()).unwrap();

        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(loaded, sample());
        assert!(!temp_dir.path().join("test.json.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        write_json_atomic(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_stale_temp_file_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("groups.json");
        std::fs::write(temp_dir.path().join("groups.json.tmp"), "partial").unwrap();

        write_json_atomic(&path, &sample()).unwrap();

        assert_eq!(read_json::<TestData, _>(&path).unwrap(), sample());
        assert!(!temp_dir.path().join("groups.json.tmp").exists());
    }

    #[test]
    fn test_unwritable_target_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "").unwrap();

        let result = write_json_atomic(&path, &sample());
        assert!(matches!(result, Err(ManhoursError::Storage(_))));
        assert!(!temp_dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result: Result<TestData, _> = read_json(&path);
        assert!(matches!(result, Err(ManhoursError::Storage(_))));
    }
}
