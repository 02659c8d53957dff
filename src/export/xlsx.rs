//! XLSX writer for export documents

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

use super::layout::{ExportCell, ExportDocument, ExportRow, RowKind, SectionStyle};
use crate::error::ManhoursResult;

const FONT: &str = "Arial";
const AMOUNT_FORMAT: &str = "#,##0.00";

struct SheetFormats {
    title: Format,
    header: Format,
    heading: Format,
    text: Format,
    wrapped_text: Format,
    number: Format,
    amount: Format,
}

impl SheetFormats {
    fn new(doc: &ExportDocument) -> Self {
        let base = Format::new().set_font_name(FONT).set_font_size(11);

        let mut header = base
            .clone()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        if let Some(fill) = doc.header_fill {
            header = header.set_background_color(fill);
        }

        let cell = base
            .clone()
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);

        Self {
            title: base
                .clone()
                .set_font_size(14)
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            header,
            heading: base
                .set_bold()
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            text: cell.clone().set_align(FormatAlign::Center).set_text_wrap(),
            wrapped_text: cell.clone().set_align(FormatAlign::Left).set_text_wrap(),
            number: cell.clone().set_align(FormatAlign::Center),
            amount: cell.set_num_format(AMOUNT_FORMAT).set_align(FormatAlign::Right),
        }
    }

    fn section(&self, style: SectionStyle, label: bool) -> Format {
        let mut format = Format::new()
            .set_font_name(FONT)
            .set_font_size(11)
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        if label {
            format = format.set_bold();
            if style.italic {
                format = format.set_italic();
            }
            if let Some(fill) = style.fill {
                format = format.set_background_color(fill);
            }
        }
        format
    }
}

/// Build an in-memory workbook holding the document's single sheet
pub fn build_workbook(doc: &ExportDocument) -> ManhoursResult<Workbook> {
    let mut workbook = Workbook::new();
    let formats = SheetFormats::new(doc);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&doc.sheet_name)?;
    if let Some(color) = doc.tab_color {
        worksheet.set_tab_color(color);
    }
    if let Some(zoom) = doc.zoom {
        worksheet.set_zoom(zoom);
    }

    for (col, column) in doc.columns.iter().enumerate() {
        worksheet.set_column_width(col as u16, column.width)?;
    }

    for (index, row) in doc.rows.iter().enumerate() {
        let row_num = index as u32;
        worksheet.set_row_height(row_num, row.height)?;

        match doc.merges.iter().find(|m| m.row == row_num) {
            Some(merge) => {
                let text = row.cells.first().map(ExportCell::display).unwrap_or_default();
                let format = match row.kind {
                    RowKind::Title => &formats.title,
                    _ => &formats.heading,
                };
                worksheet.merge_range(
                    row_num,
                    merge.first_col,
                    row_num,
                    merge.last_col,
                    &text,
                    format,
                )?;
            }
            None => write_row(worksheet, &formats, row_num, row, doc.columns.len())?,
        }
    }

    tracing::debug!(sheet = %doc.sheet_name, rows = doc.rows.len(), "workbook built");
    Ok(workbook)
}

fn write_row(
    worksheet: &mut Worksheet,
    formats: &SheetFormats,
    row_num: u32,
    row: &ExportRow,
    column_count: usize,
) -> ManhoursResult<()> {
    let empty = ExportCell::Empty;
    for col in 0..column_count {
        let cell = row.cells.get(col).unwrap_or(&empty);
        let col_num = col as u16;

        let format = match row.kind {
            RowKind::Title | RowKind::GroupHeading => formats.heading.clone(),
            RowKind::Header => formats.header.clone(),
            RowKind::Section(style) => formats.section(style, col == 1),
            RowKind::Data => match cell {
                ExportCell::Number(_) if col >= 5 => formats.amount.clone(),
                ExportCell::Number(_) | ExportCell::Integer(_) => formats.number.clone(),
                _ if col == 1 => formats.wrapped_text.clone(),
                _ => formats.text.clone(),
            },
        };

        match cell {
            ExportCell::Empty => {
                worksheet.write_blank(row_num, col_num, &format)?;
            }
            ExportCell::Text(s) => {
                worksheet.write_string_with_format(row_num, col_num, s, &format)?;
            }
            ExportCell::Integer(n) => {
                worksheet.write_number_with_format(row_num, col_num, *n as f64, &format)?;
            }
            ExportCell::Number(d) => {
                let value = d.to_f64().unwrap_or(0.0);
                worksheet.write_number_with_format(row_num, col_num, value, &format)?;
            }
        }
    }
    Ok(())
}

/// Write the document to an .xlsx file
pub fn save_xlsx(doc: &ExportDocument, path: &Path) -> ManhoursResult<()> {
    let mut workbook = build_workbook(doc)?;
    workbook.save(path)?;
    tracing::info!(path = %path.display(), "workbook saved");
    Ok(())
}

/// Serialize the document to .xlsx bytes
pub fn xlsx_bytes(doc: &ExportDocument) -> ManhoursResult<Vec<u8>> {
    let mut workbook = build_workbook(doc)?;
    Ok(workbook.save_to_buffer()?)
}
