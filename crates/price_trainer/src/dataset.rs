//! CSV dataset loading
//!
//! Reads historical flights with a header row. Columns are located by name,
//! so column order does not matter and extra columns (the unnamed index,
//! `flight`) are ignored.

use flight_price_core::{CabinClass, Carrier, FlightQuery, StopBucket, TimeBucket};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::errors::{Result, TrainerError};

/// Header names every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "airline",
    "source_city",
    "departure_time",
    "stops",
    "arrival_time",
    "destination_city",
    "class",
    "duration",
    "days_left",
    "price",
];

/// One historical flight and its ticket price
#[derive(Clone, Debug, PartialEq)]
pub struct FlightRecord {
    pub query: FlightQuery,
    pub price: f64,
}

/// Training dataset in file row order
#[derive(Clone, Debug, Default)]
pub struct FlightDataset {
    pub records: Vec<FlightRecord>,
}

struct ColumnIndex {
    airline: usize,
    source_city: usize,
    departure_time: usize,
    stops: usize,
    arrival_time: usize,
    destination_city: usize,
    class: usize,
    duration: usize,
    days_left: usize,
    price: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| TrainerError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            airline: find("airline")?,
            source_city: find("source_city")?,
            departure_time: find("departure_time")?,
            stops: find("stops")?,
            arrival_time: find("arrival_time")?,
            destination_city: find("destination_city")?,
            class: find("class")?,
            duration: find("duration")?,
            days_left: find("days_left")?,
            price: find("price")?,
        })
    }
}

impl FlightDataset {
    /// Load dataset from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            TrainerError::Dataset(format!("failed to open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }

    /// Load dataset from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(rdr.headers()?)?;
        let mut records = Vec::new();

        for result in rdr.records() {
            let row = result.map_err(row_error)?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            let text = |idx: usize, name: &str| -> Result<String> {
                row.get(idx)
                    .map(str::to_string)
                    .ok_or_else(|| TrainerError::UnreadableValue {
                        line,
                        column: name.to_string(),
                        value: String::new(),
                    })
            };

            let query = FlightQuery {
                carrier: Carrier::from(text(columns.airline, "airline")?),
                origin: text(columns.source_city, "source_city")?,
                destination: text(columns.destination_city, "destination_city")?,
                departure: TimeBucket::from(text(columns.departure_time, "departure_time")?),
                stops: StopBucket::from(text(columns.stops, "stops")?),
                arrival: TimeBucket::from(text(columns.arrival_time, "arrival_time")?),
                cabin: CabinClass::from(text(columns.class, "class")?),
                duration: parse_cell(&row, columns.duration, "duration", line)?,
                days_left: parse_cell(&row, columns.days_left, "days_left", line)?,
            };
            let price = parse_cell(&row, columns.price, "price", line)?;

            records.push(FlightRecord { query, price });
        }

        if records.is_empty() {
            return Err(TrainerError::Dataset("dataset is empty".to_string()));
        }

        debug!("Parsed {} dataset rows", records.len());
        Ok(Self { records })
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Route keys in row order.
    pub fn route_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.records.iter().map(|r| r.query.route_key())
    }

    /// Minimum and maximum target price.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.records.iter().map(|r| r.price).fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
    }
}

fn row_error(err: csv::Error) -> TrainerError {
    if let csv::ErrorKind::UnequalLengths { pos, expected_len, len } = err.kind() {
        return TrainerError::RaggedRow {
            line: pos.as_ref().map(|p| p.line()).unwrap_or_default(),
            expected: *expected_len,
            found: *len,
        };
    }
    TrainerError::Csv(err)
}

fn parse_cell<T: FromStr>(row: &csv::StringRecord, idx: usize, column: &str, line: u64) -> Result<T> {
    let raw = row.get(idx).unwrap_or("");
    raw.parse().map_err(|_| TrainerError::UnreadableValue {
        line,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
,airline,flight,source_city,departure_time,stops,arrival_time,destination_city,class,duration,days_left,price
0,SpiceJet,SG-8709,Delhi,Evening,zero,Night,Mumbai,Economy,2.17,1,5953
1,Vistara,UK-995,Delhi,Morning,one,Afternoon,Mumbai,Business,5.5,20,42000
2,AirAsia,I5-764,Mumbai,Night,two_or_more,Morning,Kolkata,Economy,11.25,45,4100
";

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv(SAMPLE);
        let dataset = FlightDataset::from_csv(file.path()).unwrap();

        assert_eq!(dataset.len(), 3);
        let first = &dataset.records[0];
        assert_eq!(first.query.carrier, Carrier::SpiceJet);
        assert_eq!(first.query.departure, TimeBucket::Evening);
        assert_eq!(first.query.arrival, TimeBucket::Night);
        assert_eq!(first.query.duration, 2.17);
        assert_eq!(first.query.days_left, 1);
        assert_eq!(first.price, 5953.0);
        assert_eq!(dataset.records[2].query.stops, StopBucket::TwoOrMore);
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let csv = "\
price,days_left,duration,class,destination_city,arrival_time,stops,departure_time,source_city,airline
6000,3,2.0,Economy,Mumbai,Night,zero,Evening,Delhi,Indigo
";
        let dataset = FlightDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records[0].query.carrier, Carrier::Indigo);
        assert_eq!(dataset.records[0].price, 6000.0);
    }

    #[test]
    fn test_missing_price_column() {
        let csv = "\
airline,source_city,departure_time,stops,arrival_time,destination_city,class,duration,days_left
SpiceJet,Delhi,Evening,zero,Night,Mumbai,Economy,2.17,1
";
        let err = FlightDataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.is_schema_error());
        assert!(matches!(err, TrainerError::MissingColumn(ref c) if c == "price"));
    }

    #[test]
    fn test_unreadable_duration() {
        let csv = "\
airline,source_city,departure_time,stops,arrival_time,destination_city,class,duration,days_left,price
SpiceJet,Delhi,Evening,zero,Night,Mumbai,Economy,two hours,1,5953
";
        let err = FlightDataset::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            TrainerError::UnreadableValue { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, "duration");
                assert_eq!(value, "two hours");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_is_schema_error() {
        let csv = "\
airline,source_city,departure_time,stops,arrival_time,destination_city,class,duration,days_left,price
SpiceJet,Delhi,Evening,zero,Night,Mumbai,Economy,2.17,1,5953
Indigo,Delhi,Morning,one,Night,Mumbai,Economy,3.5
";
        let err = FlightDataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.is_schema_error());
        match err {
            TrainerError::RaggedRow { line, expected, found } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 10);
                assert_eq!(found, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "airline,source_city,departure_time,stops,arrival_time,destination_city,class,duration,days_left,price\n";
        let err = FlightDataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TrainerError::Dataset(_)));
    }

    #[test]
    fn test_route_keys_and_price_range() {
        let dataset = FlightDataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let routes: Vec<String> = dataset.route_keys().collect();
        assert_eq!(routes, vec!["Delhi_Mumbai", "Delhi_Mumbai", "Mumbai_Kolkata"]);
        assert_eq!(dataset.price_range(), Some((4100.0, 42000.0)));
    }
}
