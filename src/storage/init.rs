//! Storage initialization
//!
//! Creates the directory layout and empty data files on first run.

use crate::config::paths::ManhoursPaths;
use crate::error::ManhoursError;

use super::file_io::write_json_atomic;
use super::groups::GroupData;
use super::session::SessionData;

/// Initialize storage for a fresh installation
///
/// Existing data files are left untouched.
pub fn initialize_storage(paths: &ManhoursPaths) -> Result<(), ManhoursError> {
    paths.ensure_directories()?;

    if !paths.groups_file().exists() {
        write_json_atomic(paths.groups_file(), &GroupData::default())?;
    }

    if !paths.session_file().exists() {
        write_json_atomic(paths.session_file(), &SessionData::default())?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &ManhoursPaths) -> bool {
    !paths.groups_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemGroup;
    use crate::models::GroupId;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ManhoursPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));

        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.data_dir().exists());
        assert!(paths.session_file().exists());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ManhoursPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let custom = GroupData {
            groups: vec![ItemGroup::new(GroupId::new(1), "Custom Group")],
            ..GroupData::default()
        };
        write_json_atomic(paths.groups_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.groups_file()).unwrap();
        let data: GroupData = serde_json::from_str(&content).unwrap();
        assert_eq!(data.groups.len(), 1);
        assert_eq!(data.groups[0].name, "Custom Group");
    }
}
