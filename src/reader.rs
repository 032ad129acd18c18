use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::ReaderError;

// =============================================================================
// Part 1: Tabular records
// =============================================================================

/// One data row keyed by the header, in column order.
///
/// Short rows leave the trailing columns empty; fields past the last
/// header column are kept in `rest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
    rest: Vec<String>,
}

impl Record {
    /// Pair header names with the row's values
    /// Role: Turn a positional row into a keyed record
    pub fn from_row(headers: &StringRecord, row: &StringRecord) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, key)| (key.to_string(), row.get(i).unwrap_or_default().to_string()))
            .collect();
        let rest = row.iter().skip(headers.len()).map(str::to_string).collect();
        Self { fields, rest }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key:?}: {value:?}")?;
        }
        if !self.rest.is_empty() {
            if !self.fields.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "rest: {:?}", self.rest)?;
        }
        f.write_str("}")
    }
}

// =============================================================================
// Part 2: Handlers
// =============================================================================

/// Delimited text with a header line, printed one record per row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabularReader {
    pub delimiter: u8,
}

impl Default for TabularReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl TabularReader {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn read_and_print<W: Write>(&self, path: &Path, out: &mut W) -> Result<(), ReaderError> {
        let file = File::open(path).map_err(|err| ReaderError::from_io(path, err))?;
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|err| ReaderError::from_csv(path, err))?
            .clone();
        debug!(path = %path.display(), columns = headers.len(), "parsed header");

        let mut rows = 0usize;
        for result in reader.records() {
            let row = result.map_err(|err| ReaderError::from_csv(path, err))?;
            writeln!(out, "{}", Record::from_row(&headers, &row)).map_err(ReaderError::Output)?;
            rows += 1;
        }
        out.flush().map_err(ReaderError::Output)?;

        info!(path = %path.display(), rows, "printed tabular file");
        Ok(())
    }
}

/// Whole file printed verbatim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainTextReader;

impl PlainTextReader {
    pub fn read_and_print<W: Write>(&self, path: &Path, out: &mut W) -> Result<(), ReaderError> {
        let mut content = String::new();
        {
            let mut file = File::open(path).map_err(|err| ReaderError::from_io(path, err))?;
            file.read_to_string(&mut content)
                .map_err(|err| ReaderError::from_io(path, err))?;
        }

        out.write_all(content.as_bytes())
            .and_then(|_| out.flush())
            .map_err(ReaderError::Output)?;

        info!(path = %path.display(), bytes = content.len(), "printed text file");
        Ok(())
    }
}

/// A handler the registry hands out for one file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reader {
    Tabular(TabularReader),
    PlainText(PlainTextReader),
}

impl Reader {
    pub fn tabular() -> Self {
        Reader::Tabular(TabularReader::default())
    }

    pub fn plain_text() -> Self {
        Reader::PlainText(PlainTextReader)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Reader::Tabular(_) => "tabular",
            Reader::PlainText(_) => "plain_text",
        }
    }

    /// Open `path` and print its contents to `out`
    /// Role: The single capability every handler exposes
    pub fn read_and_print<W: Write>(&self, path: &Path, out: &mut W) -> Result<(), ReaderError> {
        match self {
            Reader::Tabular(reader) => reader.read_and_print(path, out),
            Reader::PlainText(reader) => reader.read_and_print(path, out),
        }
    }
}
