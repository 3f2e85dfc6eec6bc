use std::{collections::HashMap, io::Read};

use csv::StringRecord;
use thiserror::Error;

use primitives::cpm::{self, CpmMicros};

/// Header names of the columns the builder reads. The sheet usually carries
/// more (`Create Date`, `Price Points`, `Slot Size`, ...), those pass
/// through untouched.
pub const COLUMN_SLOT_NAME: &str = "Slot Name";
pub const COLUMN_CPM: &str = "cpm";
pub const COLUMN_ENCODED_PRICE_POINT: &str = "Encoded Price Points";
pub const COLUMN_IGNORE: &str = "IGNORE";

/// Cell value marking a row to be skipped.
pub const IGNORE_FLAG: &str = "YES";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Reading the sheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("The sheet has no `{0}` column")]
    MissingColumn(&'static str),
    #[error("Row {row} has no `{column}` cell")]
    MissingCell { row: usize, column: &'static str },
    #[error("Row {row}: invalid CPM: {source}")]
    InvalidCpm {
        row: usize,
        #[source]
        source: cpm::Error,
    },
}

/// One decoded row of the configuration sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationRow {
    pub slot_name: String,
    /// Zero when the row is ignored: the cell is not even parsed then, so
    /// junk values in skipped rows cannot fail the whole sheet.
    pub cpm: CpmMicros,
    pub encoded_price_point: String,
    pub ignore: bool,
}

/// Positions of the needed columns, resolved from the header row once per
/// sheet. Header cells without a name never make it into the lookup.
#[derive(Debug, Clone, Copy)]
struct Columns {
    slot_name: usize,
    cpm: usize,
    encoded_price_point: usize,
    ignore: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, Error> {
        let lookup: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.trim().is_empty())
            .map(|(index, name)| (name.trim(), index))
            .collect();

        let position = |column: &'static str| -> Result<usize, Error> {
            lookup
                .get(column)
                .copied()
                .ok_or(Error::MissingColumn(column))
        };

        Ok(Self {
            slot_name: position(COLUMN_SLOT_NAME)?,
            cpm: position(COLUMN_CPM)?,
            encoded_price_point: position(COLUMN_ENCODED_PRICE_POINT)?,
            ignore: position(COLUMN_IGNORE)?,
        })
    }

    /// Decodes one record, `row` being its 1-based position among the data
    /// rows (the header is row 0).
    fn decode(&self, row: usize, record: &StringRecord) -> Result<ConfigurationRow, Error> {
        let cell = |index: usize, column: &'static str| -> Result<&str, Error> {
            record
                .get(index)
                .map(str::trim)
                .ok_or(Error::MissingCell { row, column })
        };

        let ignore = cell(self.ignore, COLUMN_IGNORE)? == IGNORE_FLAG;
        let cpm = if ignore {
            CpmMicros::default()
        } else {
            cell(self.cpm, COLUMN_CPM)?
                .parse()
                .map_err(|source| Error::InvalidCpm { row, source })?
        };

        Ok(ConfigurationRow {
            slot_name: cell(self.slot_name, COLUMN_SLOT_NAME)?.to_string(),
            cpm,
            encoded_price_point: cell(self.encoded_price_point, COLUMN_ENCODED_PRICE_POINT)?
                .to_string(),
            ignore,
        })
    }
}

/// Decodes a configuration sheet exported as CSV with a header row.
///
/// The reader is flexible: rows shorter or longer than the header are fine
/// as long as the cells that matter are there.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ConfigurationRow>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut rows = Vec::new();
    for (position, record) in csv_reader.records().enumerate() {
        rows.push(columns.decode(position + 1, &record?)?);
    }

    Ok(rows)
}
