//! Reading the tabular profile definition from CSV/TSV files or workbooks.
use crate::error::ProfileError;
use calamine::{open_workbook_auto, Data, Reader};
use log::debug;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// One data row with its spreadsheet row number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub number: usize,
    pub cells: Vec<String>,
}

impl SourceRow {
    /// The trimmed cell at `index`, or `None` when absent or blank.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells
            .get(index)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// The header and non-blank rows of a tabular source.
#[derive(Debug, Clone)]
pub struct SourceTable {
    name: String,
    digest: String,
    header: Vec<String>,
    rows: Vec<SourceRow>,
}

impl SourceTable {
    /// Reads `path`, choosing the reader by file extension.
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let bytes = fs::read(path).map_err(|e| ProfileError::io(path, e))?;
        let table = match extension.as_str() {
            "csv" => Self::from_csv(&name, &bytes, b',')?,
            "tsv" | "tab" => Self::from_csv(&name, &bytes, b'\t')?,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
                Self::from_workbook(&name, path, digest_hex(&bytes))?
            }
            _ => {
                return Err(ProfileError::Source {
                    name,
                    message: format!("unsupported file extension `{}`", extension),
                })
            }
        };
        debug!(
            "Read {} data rows from {} (sha256 {})",
            table.rows.len(),
            table.name,
            table.digest
        );
        Ok(table)
    }

    /// Parses delimited text. The first record is the header.
    pub fn from_csv(name: &str, bytes: &[u8], delimiter: u8) -> Result<Self, ProfileError> {
        let source_error = |e: csv::Error| ProfileError::Source {
            name: name.to_string(),
            message: e.to_string(),
        };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);
        let header: Vec<String> = reader
            .headers()
            .map_err(source_error)?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        // one record is one spreadsheet row, however many lines its quoted cells span
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(source_error)?;
            rows.push(SourceRow {
                number: index + 2,
                cells: record.iter().map(str::to_string).collect(),
            });
        }
        Ok(Self::new(name, digest_hex(bytes), header, rows))
    }

    fn from_workbook(name: &str, path: &Path, digest: String) -> Result<Self, ProfileError> {
        let source_error = |message: String| ProfileError::Source {
            name: name.to_string(),
            message,
        };
        let mut workbook = open_workbook_auto(path).map_err(|e| source_error(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| source_error("workbook has no worksheets".to_string()))?
            .map_err(|e| source_error(e.to_string()))?;
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut sheet_rows = range.rows();
        let header = sheet_rows
            .next()
            .map(|cells| cells.iter().map(cell_text).collect())
            .unwrap_or_default();
        let rows = sheet_rows
            .enumerate()
            .map(|(index, cells)| SourceRow {
                // 0-based sheet offset, plus the header, plus 1-based numbering
                number: first_row + index + 2,
                cells: cells.iter().map(cell_text).collect(),
            })
            .collect();
        Ok(Self::new(name, digest, header, rows))
    }

    /// Builds a table from in-memory cells. Row numbers start at 2.
    pub fn from_rows(name: &str, header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut hasher = Sha256::new();
        for line in std::iter::once(&header).chain(rows.iter()) {
            hasher.update(line.join("\u{1f}").as_bytes());
            hasher.update(b"\n");
        }
        let digest = format!("{:x}", hasher.finalize());
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| SourceRow {
                number: index + 2,
                cells,
            })
            .collect();
        Self::new(name, digest, header, rows)
    }

    fn new(name: &str, digest: String, header: Vec<String>, rows: Vec<SourceRow>) -> Self {
        SourceTable {
            name: name.to_string(),
            digest,
            header: header.into_iter().map(|h| h.trim().to_string()).collect(),
            rows: rows.into_iter().filter(|r| !r.is_blank()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase hex SHA-256 of the source bytes.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }
}

fn digest_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}
