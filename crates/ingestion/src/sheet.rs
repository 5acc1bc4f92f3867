use crate::error::IngestionError;
use crate::workbook::{is_workbook, read_workbook};
use configuration::Delimiter;
use csv::{ReaderBuilder, Terminator, Trim};

const CANDIDATE_DELIMITERS: [u8; 3] = [b';', b',', b'\t'];
const DETECTION_LINES: usize = 50;

/// One line of the sheet with its 1-based line number in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl SheetRow {
    /// The trimmed cell at `index`, or `""` when the row is shorter.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(|c| c.trim()).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// A single worksheet as rows of text cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Builds a sheet from literal rows, numbering lines from 1.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<C>>,
        C: Into<String>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| SheetRow {
                line: i + 1,
                cells: cells.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self { rows }
    }
}

/// Decodes an operations export into a `Sheet`.
///
/// Excel workbooks are read from their first worksheet. Anything else is
/// delimited text; files that are not valid UTF-8 are read as Latin-1, which
/// is what desktop trading platforms in Brazil write by default.
pub fn read_sheet(
    content: &[u8],
    delimiter: Delimiter,
    sentinel: &str,
) -> Result<Sheet, IngestionError> {
    if is_workbook(content) {
        return read_workbook(content);
    }

    let text = decode_content(content);
    if text.trim().is_empty() {
        return Err(IngestionError::EmptyInput);
    }

    let delimiter = delimiter
        .as_byte()
        .unwrap_or_else(|| detect_delimiter(&text, sentinel));

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);
        rows.push(SheetRow {
            line,
            cells: record
                .iter()
                .map(|cell| cell.trim_end_matches('\r').to_string())
                .collect(),
        });
    }

    tracing::debug!(
        rows = rows.len(),
        delimiter = %(delimiter as char).escape_default(),
        "Read operations export."
    );
    Ok(Sheet { rows })
}

fn decode_content(content: &[u8]) -> String {
    let content = content.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(content);
    match std::str::from_utf8(content) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!("Export is not valid UTF-8, decoding as Latin-1.");
            content.iter().map(|&b| b as char).collect()
        }
    }
}

/// Picks the delimiter that splits the sentinel out of its header line; failing
/// that, the candidate seen most often in the first lines.
fn detect_delimiter(text: &str, sentinel: &str) -> u8 {
    let lines: Vec<&str> = text.lines().take(DETECTION_LINES).collect();

    for line in &lines {
        for &candidate in &CANDIDATE_DELIMITERS {
            let first = line.split(candidate as char).next().unwrap_or("");
            if line.contains(candidate as char) && strip_quotes(first) == sentinel {
                return candidate;
            }
        }
    }

    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .max_by_key(|&candidate| {
            lines
                .iter()
                .map(|line| line.matches(candidate as char).count())
                .sum::<usize>()
        })
        .unwrap_or(b';')
}

fn strip_quotes(cell: &str) -> &str {
    cell.trim().trim_matches('"').trim()
}
