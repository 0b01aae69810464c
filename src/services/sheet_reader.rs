//! Reads the uploaded recruits workbook into staging rows.
//!
//! Columns are located by their header label in the first row, so the
//! required columns may appear in any order next to unrelated ones.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::error::ImportError;

pub const CREATED_AT_HEADER: &str = "Fecha de creación";
pub const NAME_HEADER: &str = "Nombre";
pub const PHONE_HEADER: &str = "Teléfono";

pub const REQUIRED_HEADERS: [&str; 3] = [CREATED_AT_HEADER, NAME_HEADER, PHONE_HEADER];

/// Raw content of the creation-date cell.
#[derive(Debug, Clone, PartialEq)]
pub enum DateCell {
    Empty,
    Text(String),
    /// Excel serial date (days since 1899-12-30).
    Serial(f64),
}

/// A data row as read from the sheet, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct StagingRow {
    /// Spreadsheet row number, header row being 1.
    pub row_number: usize,
    pub name: String,
    pub phone: String,
    pub created_at: DateCell,
}

/// Positions of the required columns, built once from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub created_at: usize,
    pub name: usize,
    pub phone: usize,
}

impl ColumnMap {
    pub fn from_headers(headers: &[String]) -> Result<Self, ImportError> {
        let position = |label: &str| {
            let wanted = normalize_header(label);
            headers.iter().position(|h| normalize_header(h) == wanted)
        };

        match (
            position(CREATED_AT_HEADER),
            position(NAME_HEADER),
            position(PHONE_HEADER),
        ) {
            (Some(created_at), Some(name), Some(phone)) => Ok(Self {
                created_at,
                name,
                phone,
            }),
            _ => {
                let missing = REQUIRED_HEADERS
                    .iter()
                    .filter(|label| position(label).is_none())
                    .map(|label| label.to_string())
                    .collect();
                let found = headers
                    .iter()
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
                    .collect();
                Err(ImportError::MissingHeaders { missing, found })
            }
        }
    }
}

/// Lower-cases, trims and folds the accents used in Spanish headers.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Renders a cell as text; integral numbers lose their `.0` so phone numbers
/// typed as numbers come back intact.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

fn date_cell(cell: Option<&Data>) -> DateCell {
    match cell {
        None | Some(Data::Empty) | Some(Data::Error(_)) => DateCell::Empty,
        Some(Data::DateTime(dt)) => DateCell::Serial(dt.as_f64()),
        // Date cells that lost their number format still hold the serial.
        Some(Data::Float(f)) => DateCell::Serial(*f),
        Some(Data::Int(i)) => DateCell::Serial(*i as f64),
        Some(other) => {
            let text = cell_to_string(other);
            if text.is_empty() {
                DateCell::Empty
            } else {
                DateCell::Text(text)
            }
        }
    }
}

/// Parses header and data rows. `first_row_number` is the spreadsheet row
/// number of the header row.
pub fn parse_rows<'a, I>(rows: I, first_row_number: usize) -> Result<Vec<StagingRow>, ImportError>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let header_row = rows.next().ok_or(ImportError::EmptyFile)?;
    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut staged = Vec::new();
    for (offset, row) in rows.enumerate() {
        let text_at = |idx: usize| row.get(idx).map(cell_to_string).unwrap_or_default();

        let name = text_at(columns.name);
        let phone = text_at(columns.phone);
        let created_at = date_cell(row.get(columns.created_at));

        if name.is_empty() && phone.is_empty() && created_at == DateCell::Empty {
            continue;
        }

        staged.push(StagingRow {
            row_number: first_row_number + offset + 1,
            name,
            phone,
            created_at,
        });
    }

    Ok(staged)
}

/// The header must sit on sheet row 1; a sheet whose first row is blank has
/// no header row at all.
pub fn parse_range(range: &Range<Data>) -> Result<Vec<StagingRow>, ImportError> {
    match range.start() {
        Some((0, _)) => parse_rows(range.rows(), 1),
        Some(_) => Err(ImportError::MissingHeaders {
            missing: REQUIRED_HEADERS.iter().map(|label| label.to_string()).collect(),
            found: Vec::new(),
        }),
        None => Err(ImportError::EmptyFile),
    }
}

/// Reads the first worksheet of an uploaded `.xlsx` / `.xls` workbook.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<StagingRow>, ImportError> {
    if bytes.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)??;

    if range.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let rows = parse_range(&range)?;
    tracing::debug!(rows = rows.len(), "parsed import worksheet");
    Ok(rows)
}
