//! Storage layer for manhours-cli
//!
//! JSON file storage with atomic writes, an append-only audit trail, and the
//! session file that carries the working set and ledger between commands.

pub mod file_io;
pub mod groups;
pub mod init;
pub mod manpower;
pub mod session;

pub use file_io::{read_json, write_json_atomic};
pub use groups::{GroupData, GroupRepository};
pub use init::initialize_storage;
pub use manpower::ManpowerRepository;
pub use session::{SessionData, SessionRepository};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::ManhoursPaths;
use crate::error::{ManhoursError, ManhoursResult};
use crate::estimate::RecordStore;
use crate::models::{GroupId, GroupItem, ItemGroup};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: ManhoursPaths,
    pub groups: GroupRepository,
    pub manpower: ManpowerRepository,
    pub session: SessionRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a storage handle, making sure the directories exist
    pub fn new(paths: ManhoursPaths) -> Result<Self, ManhoursError> {
        paths.ensure_directories()?;

        Ok(Self {
            groups: GroupRepository::new(paths.groups_file()),
            manpower: ManpowerRepository::new(paths.manpower_file()),
            session: SessionRepository::new(paths.session_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &ManhoursPaths {
        &self.paths
    }

    /// Load all record data from disk
    pub fn load_all(&mut self) -> Result<(), ManhoursError> {
        self.groups.load()?;
        self.manpower.load()?;
        tracing::debug!(base = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }

    /// Save all record data to disk
    pub fn save_all(&self) -> Result<(), ManhoursError> {
        self.groups.save()?;
        self.manpower.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (settings file written)
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    // Audit helpers used by the services

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> ManhoursResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> ManhoursResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> ManhoursResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

impl RecordStore for Storage {
    fn list_groups(&self) -> ManhoursResult<Vec<ItemGroup>> {
        self.groups.get_all_groups()
    }

    fn list_items(&self, group_id: GroupId) -> ManhoursResult<Vec<GroupItem>> {
        self.groups.get_items_in_group(group_id)
    }
}
