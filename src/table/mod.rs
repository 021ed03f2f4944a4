//! Table loading — turns an uploaded delimited-text file into records.
//!
//! The first non-blank row is the header and names the fields; every
//! following row becomes one [`Record`]. Blank rows are discarded. The
//! delimiter is sniffed from the header row, so comma, tab, pipe and
//! semicolon exports all load without the user naming one.

pub mod assign;
mod error;

pub use error::LoadError;

use crate::config::MAX_TABLE_ROWS;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

/// Delimiters tried when sniffing the header line, in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b'\t', b'|', b';'];

/// One row of a loaded table: field name → value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First non-blank value, used as the card heading.
    pub fn title(&self) -> Option<&str> {
        self.fields
            .iter()
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// Serialized as a JSON object so the snapshot reads like the uploaded row.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

fn reader(text: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn is_blank(row: &csv::StringRecord) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}

/// Pick the delimiter that splits the first non-blank row into the most
/// fields. Quoted fields are honoured, so a quoted `"name, full"` does not
/// vote for comma. Ties and single-column files fall back to comma.
pub fn sniff_delimiter(text: &str) -> u8 {
    let mut best = (b',', 1usize);
    for d in DELIMITERS {
        let fields = reader(text, d)
            .into_records()
            .filter_map(Result::ok)
            .find(|row| !is_blank(row))
            .map_or(0, |row| row.len());
        if fields > best.1 {
            best = (d, fields);
        }
    }
    best.0
}

/// Parse a delimited table with a header row into records.
///
/// Blank rows are discarded wherever they appear, so the header is the first
/// non-blank row. An empty or all-blank file is a valid, empty table.
pub fn parse_table(text: &str) -> Result<Vec<Record>, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = sniff_delimiter(text);

    let mut rdr = reader(text, delimiter);
    let mut rows = rdr.records();

    let header = loop {
        match rows.next() {
            None => return Ok(Vec::new()),
            Some(row) => {
                let row = row?;
                if !is_blank(&row) {
                    break row;
                }
            }
        }
    };
    let names: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        if is_blank(&row) {
            continue;
        }
        if records.len() == MAX_TABLE_ROWS {
            return Err(LoadError::TooManyRows {
                limit: MAX_TABLE_ROWS,
            });
        }
        let record: Record = names
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        records.push(record);
    }

    debug!(
        rows = records.len(),
        columns = names.len(),
        delimiter = %(delimiter as char).escape_default(),
        "parsed table"
    );
    Ok(records)
}
