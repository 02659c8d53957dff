//! Session persistence
//!
//! The CLI runs one command per process, so the open working set and the
//! consolidation ledger live in session.json between invocations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ManhoursResult;
use crate::estimate::{ConsolidationLedger, WorkingSet};

use super::file_io::{read_json, write_json_atomic};

/// Everything an estimating session carries between commands
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    /// Group currently being edited, if any
    #[serde(default)]
    pub working_set: Option<WorkingSet>,

    /// Groups finished so far
    #[serde(default)]
    pub ledger: ConsolidationLedger,
}

/// Reads and writes session.json
pub struct SessionRepository {
    path: PathBuf,
}

impl SessionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the session, or an empty one if none was saved
    pub fn load(&self) -> ManhoursResult<SessionData> {
        read_json(&self.path)
    }

    pub fn save(&self, session: &SessionData) -> ManhoursResult<()> {
        write_json_atomic(&self.path, session)
    }

    /// Forget the working set and the ledger
    pub fn clear(&self) -> ManhoursResult<()> {
        self.save(&SessionData::default())
    }
}
