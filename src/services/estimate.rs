//! Estimating session service
//!
//! Drives a working set and the consolidation ledger across CLI invocations.
//! Each call loads the session, applies one step, and saves it again. Row
//! positions are 1-based here because they come straight from the command line.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::audit::AuditEntry;
use crate::error::{ManhoursError, ManhoursResult};
use crate::estimate::{
    open_working_set, BulkDuration, ConsolidationLedger, EstimateRow, FinishOutcome,
    RemoveOutcome, RowField, WorkingSet,
};
use crate::export::{
    build_export_document, export_ledger_csv, export_ledger_json, export_ledger_yaml,
    save_xlsx, ExportFormat,
};
use crate::models::{Money, RowId, UnitCode};
use crate::storage::{SessionData, Storage};

/// Result of opening a group
#[derive(Debug, Clone)]
pub struct Opened {
    pub working_set: WorkingSet,
    /// Group whose unfinished working set was discarded, if any
    pub discarded: Option<String>,
}

/// Result of finishing the open group
#[derive(Debug, Clone)]
pub struct Finished {
    pub group_name: String,
    pub rows: usize,
    pub subtotal: Money,
    pub outcome: FinishOutcome,
    pub grand_total: Money,
}

/// Service for the estimating workflow
pub struct EstimateService<'a> {
    storage: &'a Storage,
}

impl<'a> EstimateService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn load(&self) -> ManhoursResult<SessionData> {
        self.storage.session.load()
    }

    fn save(&self, session: &SessionData) -> ManhoursResult<()> {
        self.storage.session.save(session)
    }

    /// Apply a step to the open working set and persist the result
    fn with_working_set<T>(
        &self,
        step: impl FnOnce(&mut WorkingSet) -> ManhoursResult<T>,
    ) -> ManhoursResult<T> {
        let mut session = self.load()?;
        let set = session
            .working_set
            .as_mut()
            .ok_or(ManhoursError::NoWorkingSet)?;
        let result = step(set)?;
        self.save(&session)?;
        Ok(result)
    }

    /// Open a group's working set, replacing any unfinished one
    pub fn open(&self, group: &str) -> ManhoursResult<Opened> {
        let working_set = open_working_set(self.storage, group)?;
        let mut session = self.load()?;

        let discarded = session
            .working_set
            .replace(working_set.clone())
            .map(|old| old.group_name().to_string());
        if let Some(name) = &discarded {
            tracing::warn!(group = %name, "unfinished working set discarded");
        }

        self.save(&session)?;
        tracing::info!(group = %working_set.group_name(), rows = working_set.len(), "working set opened");
        Ok(Opened {
            working_set,
            discarded,
        })
    }

    /// The open working set
    pub fn current(&self) -> ManhoursResult<WorkingSet> {
        self.load()?.working_set.ok_or(ManhoursError::NoWorkingSet)
    }

    /// Edit one field of a row; the unit must be a recognised code or blank
    pub fn edit(&self, row: usize, field: RowField, value: &str) -> ManhoursResult<EstimateRow> {
        let value = if field == RowField::Unit {
            normalize_unit(value)?
        } else {
            value.to_string()
        };

        self.with_working_set(|set| {
            let index = row_index(row, set.len())?;
            set.edit_field(index, field, &value).cloned()
        })
    }

    /// Append a blank row; returns its 1-based position and synthetic id
    pub fn add_row(&self) -> ManhoursResult<(usize, RowId)> {
        self.with_working_set(|set| {
            let id = set.add_row();
            Ok((set.len(), id))
        })
    }

    pub fn remove_row(&self, row: usize) -> ManhoursResult<RemoveOutcome> {
        self.with_working_set(|set| {
            let index = row_index(row, set.len())?;
            set.remove_row(index)
        })
    }

    /// Apply days and persons to every MH row
    pub fn apply_duration(&self, days: &str, persons: &str) -> ManhoursResult<(BulkDuration, usize)> {
        let duration = BulkDuration::parse(days, persons);
        self.with_working_set(|set| Ok((duration, set.apply_bulk_duration(duration))))
    }

    /// Move the open working set into the ledger
    pub fn finish(&self) -> ManhoursResult<Finished> {
        let mut session = self.load()?;
        let set = session
            .working_set
            .take()
            .ok_or(ManhoursError::NoWorkingSet)?;
        let group_name = set.group_name().to_string();

        let outcome = session.ledger.finish_working_set(set);
        let entry = session
            .ledger
            .entry(&group_name)
            .ok_or_else(|| ManhoursError::Storage(format!("Ledger lost group '{}'", group_name)))?;
        let finished = Finished {
            group_name: group_name.clone(),
            rows: entry.rows().len(),
            subtotal: entry.subtotal(),
            outcome,
            grand_total: session.ledger.grand_total(),
        };

        let summary = format!(
            "{} rows, subtotal {} ({:?})",
            finished.rows, finished.subtotal, outcome
        );
        let audit = AuditEntry::finish(&group_name, summary, entry);

        self.save(&session)?;
        self.storage.audit().log(&audit)?;

        tracing::info!(group = %group_name, subtotal = %finished.subtotal, "group finished");
        Ok(finished)
    }

    /// Discard the open working set without touching the ledger
    pub fn cancel(&self) -> ManhoursResult<String> {
        let mut session = self.load()?;
        let set = session
            .working_set
            .take()
            .ok_or(ManhoursError::NoWorkingSet)?;
        self.save(&session)?;
        Ok(set.group_name().to_string())
    }

    pub fn ledger(&self) -> ManhoursResult<ConsolidationLedger> {
        Ok(self.load()?.ledger)
    }

    /// Write the ledger to `path` in the given format
    pub fn export(&self, format: ExportFormat, path: &Path, currency: &str) -> ManhoursResult<()> {
        let ledger = self.ledger()?;

        match format {
            ExportFormat::Xlsx => {
                let doc = build_export_document(&ledger, currency);
                save_xlsx(&doc, path)?;
            }
            ExportFormat::Csv => {
                let file = File::create(path)?;
                export_ledger_csv(&ledger, BufWriter::new(file))?;
            }
            ExportFormat::Json => {
                let mut writer = BufWriter::new(File::create(path)?);
                export_ledger_json(&ledger, currency, &mut writer, true)?;
            }
            ExportFormat::Yaml => {
                let mut writer = BufWriter::new(File::create(path)?);
                export_ledger_yaml(&ledger, currency, &mut writer)?;
            }
        }

        tracing::info!(format = %format, path = %path.display(), groups = ledger.len(), "ledger exported");
        Ok(())
    }

    /// Clear the ledger and any open working set
    pub fn reset(&self) -> ManhoursResult<()> {
        self.storage.session.clear()
    }
}

/// Convert a 1-based row position to an index
fn row_index(row: usize, len: usize) -> ManhoursResult<usize> {
    if row == 0 || row > len {
        return Err(ManhoursError::row_not_found(row));
    }
    Ok(row - 1)
}

fn normalize_unit(value: &str) -> ManhoursResult<String> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    value
        .parse::<UnitCode>()
        .map(|unit| unit.code().to_string())
        .map_err(|_| {
            ManhoursError::Validation(format!(
                "Unknown unit '{}' (expected one of: {})",
                value.trim(),
                UnitCode::choices()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::ManhoursPaths;
    use crate::export::import_from_json;
    use crate::services::group::{GroupService, ItemInput};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ManhoursPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let groups = GroupService::new(&storage);
        let group = groups.create_group("Scaffolding").unwrap();
        for (desc, unit, rate) in [("Scaffolder", "MH", "50"), ("Clamp", "EA", "20")] {
            groups
                .create_item(
                    group.id,
                    ItemInput {
                        item_no: None,
                        description: desc.into(),
                        unit: unit.into(),
                        unit_rate: rate.into(),
                    },
                )
                .unwrap();
        }
        (temp_dir, storage)
    }

    #[test]
    fn test_steps_require_an_open_working_set() {
        let (_temp, storage) = setup();
        let service = EstimateService::new(&storage);

        assert!(matches!(service.current(), Err(ManhoursError::NoWorkingSet)));
        assert!(matches!(service.finish(), Err(ManhoursError::NoWorkingSet)));
        assert!(matches!(service.add_row(), Err(ManhoursError::NoWorkingSet)));
    }

    #[test]
    fn test_open_persists_between_calls() {
        let (_temp, storage) = setup();
        let service = EstimateService::new(&storage);

        let opened = service.open("scaffolding").unwrap();
        assert!(opened.discarded.is_none());
        assert_eq!(opened.working_set.len(), 2);

        let reopened = service.open("Scaffolding").unwrap();
        assert_eq!(reopened.discarded.as_deref(), Some("Scaffolding"));
        assert_eq!(service.current().unwrap().total_value(), Money::from_cents(52000));
    }

    #[test]
    fn test_edit_uses_one_based_rows() {
        let (_temp, storage) = setup();
        let service = EstimateService::new(&storage);
        service.open("Scaffolding").unwrap();

        let row = service.edit(1, RowField::Days, "3").unwrap();
        assert_eq!(row.total_hours, Decimal::from(30));
        assert_eq!(row.total_value, Money::from_cents(150000));

        assert!(service.edit(0, RowField::Days, "3").unwrap_err().is_not_found());
        assert!(service.edit(3, RowField::Days, "3").unwrap_err().is_not_found());
    }

    #[test]
    fn test_edit_validates_unit() {
        let (_temp, storage) = setup();
        let service = EstimateService::new(&storage);
        service.open("Scaffolding").unwrap();
        let (position, _) = service.add_row().unwrap();
        assert_eq!(position, 3);

        let row = service.edit(position, RowField::Unit, "mh").unwrap();
        assert_eq!(row.unit, "MH");
        assert!(service
            .edit(position, RowField::Unit, "hours")
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_locked_fields_survive_round_trip() {
        let (_temp, storage) = setup();
        let service = EstimateService::new(&storage);
        service.open("Scaffolding").unwrap();

        assert!(matches!(
            service.edit(1, RowField::UnitRate, "99"),
            Err(ManhoursError::Locked(_))
        ));
        assert!(matches!(
            service.edit(1, RowField::TotalHours, "99"),
            Err(ManhoursError::Locked(_))
        ));
    }

    #[test]
    fn test_duration_and_finish() {
        let (_temp, storage) = setup();
        let service = EstimateService::new(&storage);
        service.open("Scaffolding").unwrap();

        let (duration, applied) = service.apply_duration("2", "3").unwrap();
        assert_eq!((duration.days, duration.persons), (2, 3));
        assert_eq!(applied, 1);

        let finished = service.finish().unwrap();
        assert_eq!(finished.outcome, FinishOutcome::Added);
        assert_eq!(finished.rows, 2);
        // 2 days x 3 persons x 10 h x 50.00 + 1 x 20.00
        assert_eq!(finished.subtotal, Money::from_cents(302000));
        assert!(service.current().is_err());

        let audited = storage.audit().read_recent(1).unwrap();
        assert_eq!(audited[0].operation, Operation::Finish);
    }

    #[test]
    fn test_refinish_replaces_group() {
        let (_temp, storage) = setup();
        let service = EstimateService::new(&storage);
        service.open("Scaffolding").unwrap();
        service.finish().unwrap();
        service.open("Scaffolding").unwrap();
        service.remove_row(2).unwrap();

        let finished = service.finish().unwrap();
        assert_eq!(finished.outcome, FinishOutcome::Replaced);
        assert_eq!(service.ledger().unwrap().len(), 1);
        assert_eq!(finished.grand_total, Money::from_cents(50000));
    }

    #[test]
    fn test_cancel_keeps_ledger() {
        let (_temp, storage) = setup();
        let service = EstimateService::new(&storage);
        service.open("Scaffolding").unwrap();
        service.finish().unwrap();
        service.open("Scaffolding").unwrap();

        assert_eq!(service.cancel().unwrap(), "Scaffolding");
        assert_eq!(service.ledger().unwrap().len(), 1);

        service.reset().unwrap();
        assert!(service.ledger().unwrap().is_empty());
    }

    #[test]
    fn test_export_formats() {
        let (temp, storage) = setup();
        let service = EstimateService::new(&storage);
        service.open("Scaffolding").unwrap();
        service.finish().unwrap();

        for format in [
            ExportFormat::Xlsx,
            ExportFormat::Csv,
            ExportFormat::Json,
            ExportFormat::Yaml,
        ] {
            let path = temp.path().join(format!("out.{}", format.extension()));
            service.export(format, &path, "SAR").unwrap();
            assert!(path.exists());
        }

        let json = std::fs::read_to_string(temp.path().join("out.json")).unwrap();
        let imported = import_from_json(&json).unwrap();
        assert_eq!(imported.grand_total, Money::from_cents(52000));
    }
}
