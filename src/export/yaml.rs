//! YAML export of the consolidation ledger

use crate::error::{ManhoursError, ManhoursResult};
use crate::estimate::ConsolidationLedger;
use crate::export::json::LedgerExport;
use std::io::Write;

/// Export the ledger to YAML with a short comment header
pub fn export_ledger_yaml<W: Write>(
    ledger: &ConsolidationLedger,
    currency: &str,
    writer: &mut W,
) -> ManhoursResult<()> {
    let export = LedgerExport::from_ledger(ledger, currency);

    writeln!(writer, "# manhours-cli consolidated estimate")?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(
        writer,
        "# Grand total: {}",
        export.grand_total.format_with_currency(currency)
    )?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| ManhoursError::Export(e.to_string()))?;

    Ok(())
}

/// Import from a YAML export
pub fn import_from_yaml(yaml_str: &str) -> ManhoursResult<LedgerExport> {
    let export: LedgerExport =
        serde_yaml::from_str(yaml_str).map_err(|e| ManhoursError::Import(e.to_string()))?;

    export.validate().map_err(ManhoursError::Import)?;

    Ok(export)
}
