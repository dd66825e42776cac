//! Historical daily closing prices.

use crate::error::{DataError, Result};
use crate::statement::parse_date;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One observed close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub const fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Date-ordered closing price series.
///
/// Construction sorts by date and keeps the first close seen for a date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    close: Option<f64>,
}

impl PriceHistory {
    /// Build a history from unordered points.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    /// Read `date,close` rows from CSV. Other columns are ignored and rows
    /// with an empty close are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut points = Vec::new();

        for row in rdr.deserialize() {
            let row: CsvRow = row?;
            if let Some(close) = row.close {
                points.push(PricePoint::new(parse_date(&row.date)?, close));
            }
        }

        Ok(Self::new(points))
    }

    /// Read a CSV price file.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Build a history from a quote frame with `date` and `close` columns.
    ///
    /// `date` may be a `Date` column or `YYYY-MM-DD` strings. Rows with a null
    /// close are skipped.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let dates = df.column("date")?.cast(&DataType::String)?;
        let dates = dates.str()?;
        let closes = df.column("close")?.cast(&DataType::Float64)?;
        let closes = closes.f64()?;

        let mut points = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let Some(close) = closes.get(i) else {
                continue;
            };
            let date = dates
                .get(i)
                .ok_or_else(|| DataError::Parse(format!("Missing date in row {i}")))?;
            points.push(PricePoint::new(parse_date(date)?, close));
        }

        Ok(Self::new(points))
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observations in date order.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Iterate observations in date order.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    /// Observation on exactly `date`.
    pub fn on(&self, date: NaiveDate) -> Option<&PricePoint> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| &self.points[idx])
    }

    /// First and last observed dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }
}
