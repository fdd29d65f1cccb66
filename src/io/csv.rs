//! Minimal RFC 4180 CSV reading and field encoding.
//!
//! Supports quoted fields containing commas, doubled quotes and line breaks,
//! and both `\n` and `\r\n` record terminators.

use crate::errors::InputError;
use std::fs;
use std::path::Path;
use tracing::debug;

const ID_COLUMNS: [&str; 2] = ["id", "ID"];
const NAME_COLUMNS: [&str; 3] = ["name", "Name", "NAME"];

/// One usable row of an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub id: String,
    pub name: String,
}

/// A parsed record and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split CSV text into records.
///
/// # Errors
///
/// [`InputError::Malformed`] for an unterminated quoted field or a stray
/// character after a closing quote.
pub fn parse_records(text: &str, origin: &Path) -> Result<Vec<CsvRecord>, InputError> {
    let malformed = |line: usize, message: &str| InputError::Malformed {
        path: origin.to_path_buf(),
        line,
        message: message.to_string(),
    };

    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut after_quote = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    after_quote = true;
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                after_quote = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push(CsvRecord {
                    line: record_line,
                    fields: std::mem::take(&mut fields),
                });
                after_quote = false;
                line += 1;
                record_line = line;
            }
            '"' if field.is_empty() && !after_quote => in_quotes = true,
            _ if after_quote => {
                return Err(malformed(line, "unexpected character after closing quote"));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(malformed(record_line, "unterminated quoted field"));
    }
    if !field.is_empty() || !fields.is_empty() || after_quote {
        fields.push(field);
        records.push(CsvRecord {
            line: record_line,
            fields,
        });
    }

    // Blank lines carry no data
    records.retain(|r| !(r.fields.len() == 1 && r.fields[0].trim().is_empty()));
    Ok(records)
}

/// Parse id/name rows from CSV text with a header line.
///
/// The id column is `id` or `ID`; the name column is `name`, `Name` or
/// `NAME`. Values are trimmed, and rows with an empty id or name are
/// skipped.
pub fn parse_items(text: &str, origin: &Path) -> Result<Vec<InputRow>, InputError> {
    let mut records = parse_records(text, origin)?.into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };

    let find = |names: &[&str]| {
        header
            .fields
            .iter()
            .position(|column| names.contains(&column.trim()))
    };
    let id_col = find(&ID_COLUMNS).ok_or_else(|| InputError::MissingColumn {
        path: origin.to_path_buf(),
        column: "id",
    })?;
    let name_col = find(&NAME_COLUMNS).ok_or_else(|| InputError::MissingColumn {
        path: origin.to_path_buf(),
        column: "name",
    })?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in records {
        let id = record.fields.get(id_col).map(|v| v.trim()).unwrap_or("");
        let name = record.fields.get(name_col).map(|v| v.trim()).unwrap_or("");
        if id.is_empty() || name.is_empty() {
            skipped += 1;
            debug!(line = record.line, "Skipping row without id or name");
            continue;
        }
        rows.push(InputRow {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    if skipped > 0 {
        debug!(skipped, kept = rows.len(), "Incomplete rows skipped");
    }
    Ok(rows)
}

/// Read id/name rows from a CSV file.
pub fn read_items(path: &Path) -> Result<Vec<InputRow>, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_items(text.trim_start_matches('\u{feff}'), path)
}

/// Quote a field when it contains a delimiter, quote or line break.
pub fn encode_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
