//! Append-only audit log
//!
//! One JSON object per line. Entries are never rewritten.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{ManhoursError, ManhoursResult};

use super::entry::AuditEntry;

fn log_error(action: &'static str) -> impl FnOnce(io::Error) -> ManhoursError {
    move |e| ManhoursError::Io(format!("audit log: cannot {}: {}", action, e))
}

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn log(&self, entry: &AuditEntry) -> ManhoursResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append entries with a single write so a batch lands together
    pub fn log_batch(&self, entries: &[AuditEntry]) -> ManhoursResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for entry in entries {
            buffer.push_str(&serde_json::to_string(entry)?);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(log_error("open"))?;
        file.write_all(buffer.as_bytes()).map_err(log_error("append"))?;
        file.flush().map_err(log_error("flush"))?;

        tracing::debug!(count = entries.len(), "audit entries appended");
        Ok(())
    }

    /// Every entry, oldest first; blank lines are skipped
    pub fn read_all(&self) -> ManhoursResult<Vec<AuditEntry>> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(log_error("open")(e)),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(log_error("read"))?;
            if !line.trim().is_empty() {
                entries.push(parse_line(index + 1, &line)?);
            }
        }
        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> ManhoursResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }
}

fn parse_line(line_no: usize, line: &str) -> ManhoursResult<AuditEntry> {
    serde_json::from_str(line)
        .map_err(|e| ManhoursError::Json(format!("audit log line {}: {}", line_no, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn group_entry(i: i64) -> AuditEntry {
        AuditEntry::create(
            EntityType::ItemGroup,
            format!("grp-{}", i),
            Some(format!("Group {}", i)),
            &json!({"id": i}),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&group_entry(1)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::ItemGroup);
    }

    #[test]
    fn test_log_batch() {
        let (logger, _temp) = create_test_logger();
        let entries: Vec<AuditEntry> = (0..3).map(group_entry).collect();

        logger.log_batch(&entries).unwrap();

        assert_eq!(logger.read_all().unwrap().len(), 3);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();
        for i in 0..10 {
            logger.log(&group_entry(i)).unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        let ids: Vec<_> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["grp-7", "grp-8", "grp-9"]);
    }

    #[test]
    fn test_empty_log() {
        let (logger, temp) = create_test_logger();

        assert!(!temp.path().join("audit.log").exists());
        assert!(logger.read_all().unwrap().is_empty());
        assert!(logger.read_recent(5).unwrap().is_empty());
    }

    #[test]
    fn test_reopened_logger_reads_previous_entries() {
        let (logger, temp) = create_test_logger();
        logger.log(&group_entry(1)).unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_line_reports_line_number() {
        let (logger, temp) = create_test_logger();
        logger.log(&group_entry(1)).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(temp.path().join("audit.log"))
            .unwrap();
        writeln!(file, "\n{{ broken").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(matches!(err, ManhoursError::Json(_)));
        assert!(err.to_string().contains("line 3"));
    }
}
