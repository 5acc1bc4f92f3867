use crate::error::IngestionError;
use crate::sheet::{Sheet, SheetRow};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Whether `content` is an Excel workbook (`.xlsx` or legacy `.xls`) rather
/// than delimited text.
pub(crate) fn is_workbook(content: &[u8]) -> bool {
    content.starts_with(ZIP_MAGIC) || content.starts_with(OLE_MAGIC)
}

/// Reads the first worksheet of a workbook into a `Sheet`.
///
/// Cells are rendered as the text the delimited exports would carry: numbers
/// with a decimal comma, date cells as ISO timestamps.
pub(crate) fn read_workbook(content: &[u8]) -> Result<Sheet, IngestionError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(content.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestionError::EmptyInput)??;

    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let rows: Vec<SheetRow> = range
        .rows()
        .enumerate()
        .map(|(offset, cells)| SheetRow {
            line: first_line + offset,
            cells: cells.iter().map(cell_text).collect(),
        })
        .collect();

    tracing::debug!(rows = rows.len(), "Read operations workbook.");
    Ok(Sheet { rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => value.to_string().replace('.', ","),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|timestamp| timestamp.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_default(),
    }
}
