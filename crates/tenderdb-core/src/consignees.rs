//! Consignee (delivery location) CSV import and template generation.
//!
//! The importer is a pure function over the uploaded bytes: it never touches
//! the database. Callers review the returned records and warnings before
//! submitting them as part of an installation request.

use std::collections::HashSet;
use std::fmt;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header line served as the downloadable import template.
pub const CONSIGNEE_TEMPLATE: &str =
    "district_name,block_name,facility_name,contact_name,contact_phone,contact_email\n";

/// File name clients expect on the template download.
pub const TEMPLATE_FILENAME: &str = "consignee_template.csv";

/// The columns the importer understands, matched against the header row by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    DistrictName,
    BlockName,
    FacilityName,
    ContactName,
    ContactPhone,
    ContactEmail,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::DistrictName,
        Column::BlockName,
        Column::FacilityName,
        Column::ContactName,
        Column::ContactPhone,
        Column::ContactEmail,
    ];

    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Column::DistrictName => "district_name",
            Column::BlockName => "block_name",
            Column::FacilityName => "facility_name",
            Column::ContactName => "contact_name",
            Column::ContactPhone => "contact_phone",
            Column::ContactEmail => "contact_email",
        }
    }

    fn slot(self) -> usize {
        match self {
            Column::DistrictName => 0,
            Column::BlockName => 1,
            Column::FacilityName => 2,
            Column::ContactName => 3,
            Column::ContactPhone => 4,
            Column::ContactEmail => 5,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One parsed delivery location.
///
/// Absent or blank columns are stored as empty strings. The district, block
/// and facility are required by installation requests but are not enforced
/// at import time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub district_name: String,
    #[serde(default)]
    pub block_name: String,
    #[serde(default)]
    pub facility_name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: String,
}

impl LocationRecord {
    #[must_use]
    pub fn key(&self) -> LocationKey<'_> {
        LocationKey {
            district: &self.district_name,
            block: &self.block_name,
            facility: &self.facility_name,
        }
    }
}

/// The `(district, block, facility)` triple used to detect duplicate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationKey<'a> {
    pub district: &'a str,
    pub block: &'a str,
    pub facility: &'a str,
}

impl fmt::Display for LocationKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.district, self.block, self.facility)
    }
}

/// Output of a single import: every record in file order plus any warnings.
///
/// `warnings` is `None` (serialized as `null`) when nothing was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub locations: Vec<LocationRecord>,
    pub warnings: Option<Vec<String>>,
}

impl ImportResult {
    /// Number of warnings; zero when `warnings` is `None`.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.as_ref().map_or(0, Vec::len)
    }
}

/// Any structural problem with an uploaded CSV file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("file is empty or has no header row")]
    Empty,
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: u64 },
    #[error("line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Return the import template bytes: the header line and nothing else.
#[must_use]
pub fn generate_template() -> &'static [u8] {
    CONSIGNEE_TEMPLATE.as_bytes()
}

/// Parse an uploaded consignee CSV into location records and duplicate warnings.
///
/// The first row names the columns; their order is free. Blank lines are
/// skipped and do not consume a serial number. Every record is kept, including
/// repeated `(district, block, facility)` keys, which are reported as warnings.
///
/// # Errors
///
/// Returns [`ParseError`] if the bytes are not UTF-8, the file has no header,
/// a quoted field is never closed, or a data row has a different number of
/// fields than the header.
pub fn import_locations(raw: &[u8]) -> Result<ImportResult, ParseError> {
    let text = std::str::from_utf8(raw)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if let Some(line) = find_unterminated_quote(text) {
        return Err(ParseError::UnterminatedQuote { line });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if is_blank(&headers) {
        return Err(ParseError::Empty);
    }
    let columns = ColumnIndex::from_headers(&headers);

    let mut locations = Vec::new();
    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        if record.len() != headers.len() {
            return Err(ParseError::ColumnCount {
                line: record
                    .position()
                    .map_or(0, |pos| line_at(text, pos.byte())),
                expected: headers.len(),
                found: record.len(),
            });
        }

        locations.push(LocationRecord {
            serial_number: (locations.len() + 1).to_string(),
            district_name: columns.value(&record, Column::DistrictName),
            block_name: columns.value(&record, Column::BlockName),
            facility_name: columns.value(&record, Column::FacilityName),
            contact_name: columns.value(&record, Column::ContactName),
            contact_phone: columns.value(&record, Column::ContactPhone),
            contact_email: columns.value(&record, Column::ContactEmail),
        });
    }

    let warnings = duplicate_warnings(&locations);
    Ok(ImportResult {
        locations,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
    })
}

/// One warning per repeat occurrence of a location key, in encounter order.
fn duplicate_warnings(locations: &[LocationRecord]) -> Vec<String> {
    let mut seen: HashSet<LocationKey<'_>> = HashSet::with_capacity(locations.len());
    let mut warnings = Vec::new();

    for location in locations {
        let key = location.key();
        if !seen.insert(key) {
            warnings.push(format!(
                "Duplicate entry found (row {}): {key}",
                location.serial_number
            ));
        }
    }

    warnings
}

/// Maps each known column to its position in the header row, if present.
#[derive(Debug)]
struct ColumnIndex([Option<usize>; 6]);

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut slots = [None; 6];
        for column in Column::ALL {
            slots[column.slot()] = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column.header()));
        }
        Self(slots)
    }

    fn value(&self, record: &StringRecord, column: Column) -> String {
        self.0[column.slot()]
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .unwrap_or_default()
            .to_owned()
    }
}

/// A lone whitespace-only field is what a blank line parses to.
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|f| f.trim().is_empty())
}

/// Tracks 1-based line numbers. `\n`, `\r\n` and a lone `\r` each end a line.
#[derive(Debug, Clone, Copy)]
struct LineCounter {
    line: u64,
    after_cr: bool,
}

impl LineCounter {
    fn new() -> Self {
        Self {
            line: 1,
            after_cr: false,
        }
    }

    fn advance(&mut self, c: char) {
        match c {
            '\r' => {
                self.line += 1;
                self.after_cr = true;
            }
            '\n' => {
                if !self.after_cr {
                    self.line += 1;
                }
                self.after_cr = false;
            }
            _ => self.after_cr = false,
        }
    }
}

/// Line on which the record starting at `byte` begins.
fn line_at(text: &str, byte: u64) -> u64 {
    let end = usize::try_from(byte).unwrap_or(usize::MAX).min(text.len());
    let mut counter = LineCounter::new();
    for c in text.get(..end).unwrap_or(text).chars() {
        counter.advance(c);
    }
    counter.line
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Return the 1-based line of a quoted field that is opened but never closed.
///
/// A quote opens a field only as its first character; anywhere else in an
/// unquoted field it is literal. Inside a quoted field `""` is an escaped
/// quote, and a lone quote closes the field.
fn find_unterminated_quote(text: &str) -> Option<u64> {
    let mut lines = LineCounter::new();
    let mut state = ScanState::FieldStart;
    let mut open_line = 0;

    for c in text.chars() {
        let boundary = matches!(c, ',' | '\r' | '\n');
        state = match state {
            ScanState::FieldStart if c == '"' => {
                open_line = lines.line;
                ScanState::Quoted
            }
            ScanState::FieldStart | ScanState::Unquoted | ScanState::QuoteInQuoted
                if boundary =>
            {
                ScanState::FieldStart
            }
            ScanState::FieldStart | ScanState::Unquoted => ScanState::Unquoted,
            ScanState::Quoted if c == '"' => ScanState::QuoteInQuoted,
            ScanState::Quoted => ScanState::Quoted,
            ScanState::QuoteInQuoted if c == '"' => ScanState::Quoted,
            ScanState::QuoteInQuoted => ScanState::Unquoted,
        };
        lines.advance(c);
    }

    (state == ScanState::Quoted).then_some(open_line)
}

#[cfg(test)]
#[path = "consignees_test.rs"]
mod tests;
