//! CSV loading of trip datasets.
//!
//! Rows whose timestamps cannot be parsed, or that lack a station, are
//! excluded one by one and counted in the [`LoadReport`] instead of failing
//! the whole load. Fields are decoded individually, so a cell that is not
//! valid UTF-8 only affects its own row.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use flate2::read::GzDecoder;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::CityCatalog;
use crate::error::{AnalysisError, LoadError};
use crate::trip::TripRecord;

const START_TIME: &str = "Start Time";
const END_TIME: &str = "End Time";
const START_STATION: &str = "Start Station";
const END_STATION: &str = "End Station";
const USER_TYPE: &str = "User Type";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Counts of rows read and rejected during a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub malformed_timestamps: usize,
    pub missing_stations: usize,
    /// Birth-year cells that could not be read. The row is kept without one.
    pub malformed_birth_years: usize,
}

impl LoadReport {
    pub fn excluded(&self) -> usize {
        self.malformed_timestamps + self.missing_stations
    }
}

/// A loaded dataset and how it was read.
#[derive(Debug, Clone, Default)]
pub struct LoadedTrips {
    pub records: Vec<TripRecord>,
    pub report: LoadReport,
}

/// Supplies trip collections by city key.
pub trait TripSource {
    fn load(&self, city: &str) -> Result<LoadedTrips, AnalysisError>;
}

/// Reads city datasets from CSV files listed in a [`CityCatalog`].
pub struct CsvTripSource {
    catalog: CityCatalog,
}

impl CsvTripSource {
    pub fn new(catalog: CityCatalog) -> Self {
        Self { catalog }
    }
}

impl TripSource for CsvTripSource {
    fn load(&self, city: &str) -> Result<LoadedTrips, AnalysisError> {
        let path = self.catalog.path_for(city)?;
        Ok(load_file(&path)?)
    }
}

/// Loads a CSV file, decompressing it first if the name ends in `.gz`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_file(path: &Path) -> Result<LoadedTrips, LoadError> {
    let file = BufReader::new(File::open(path)?);
    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");

    let loaded = if gzipped {
        read_trips(GzDecoder::new(file))?
    } else {
        read_trips(file)?
    };

    info!(
        records = loaded.records.len(),
        excluded = loaded.report.excluded(),
        "Dataset loaded"
    );
    Ok(loaded)
}

/// Parses trip rows from any CSV reader with a header row.
pub fn read_trips<R: Read>(reader: R) -> Result<LoadedTrips, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::locate(rdr.headers()?)?;
    let mut loaded = LoadedTrips::default();

    for (row_no, result) in rdr.byte_records().enumerate() {
        let row = result?;
        loaded.report.rows_read += 1;

        // None when the cell is not valid UTF-8
        let text = |idx: usize| std::str::from_utf8(row.get(idx).unwrap_or(b"")).ok();
        let optional = |idx: Option<usize>| {
            idx.and_then(text)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let (Some(start), Some(end)) = (
            text(columns.start_time).and_then(parse_timestamp),
            text(columns.end_time).and_then(parse_timestamp),
        ) else {
            debug!(row = row_no, "Excluding row with malformed timestamp");
            loaded.report.malformed_timestamps += 1;
            continue;
        };

        let start_station = text(columns.start_station).unwrap_or("");
        let end_station = text(columns.end_station).unwrap_or("");
        if start_station.is_empty() || end_station.is_empty() {
            debug!(row = row_no, "Excluding row without a readable station");
            loaded.report.missing_stations += 1;
            continue;
        }

        let birth_year = match columns.birth_year.map(|idx| row.get(idx).unwrap_or(b"")) {
            None => None,
            Some(cell) if cell.is_empty() => None,
            Some(cell) => {
                let year = std::str::from_utf8(cell).ok().and_then(parse_birth_year);
                if year.is_none() {
                    debug!(row = row_no, "Ignoring unreadable birth year");
                    loaded.report.malformed_birth_years += 1;
                }
                year
            }
        };

        loaded.records.push(
            TripRecord::new(start, end, start_station, end_station)
                .with_user_type(optional(columns.user_type))
                .with_gender(optional(columns.gender))
                .with_birth_year(birth_year),
        );
    }

    if loaded.report.excluded() > 0 {
        warn!(
            malformed_timestamps = loaded.report.malformed_timestamps,
            missing_stations = loaded.report.missing_stations,
            "Rows excluded from the dataset"
        );
    }
    if loaded.report.malformed_birth_years > 0 {
        warn!(
            malformed_birth_years = loaded.report.malformed_birth_years,
            "Unreadable birth years ignored"
        );
    }

    Ok(loaded)
}

/// Parses a naive local timestamp in any of the accepted layouts.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Birth years arrive as `1992` or `1992.0`.
fn parse_birth_year(value: &str) -> Option<i32> {
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|y| y.is_finite() && y.fract() == 0.0)
        .map(|y| y as i32)
}

struct Columns {
    start_time: usize,
    end_time: usize,
    start_station: usize,
    end_station: usize,
    user_type: Option<usize>,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        let columns = Columns {
            start_time: require(START_TIME)?,
            end_time: require(END_TIME)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: find(USER_TYPE),
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        };

        debug!(
            user_type = columns.user_type.is_some(),
            gender = columns.gender.is_some(),
            birth_year = columns.birth_year.is_some(),
            "Optional columns located"
        );
        Ok(columns)
    }
}
