use std::path::PathBuf;

use polars::datatypes::TimeUnit;
use polars::prelude::StrptimeOptions;
use polars::prelude::*;

use crate::error::{BikeshareError, Result};
use crate::filters::{weekday_name, City, DayFilter, FilterCriteria, MonthFilter};
use crate::schema::*;

/// Which optional columns a trip table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    Basic,
    WithDemographics,
}

impl TableShape {
    pub fn for_city(city: City) -> Self {
        if city.has_demographics() {
            TableShape::WithDemographics
        } else {
            TableShape::Basic
        }
    }
}

/// Trips for one city, with `month` and `day_of_week` derived from Start Time.
#[derive(Debug, Clone)]
pub struct TripTable {
    city: City,
    shape: TableShape,
    frame: DataFrame,
}

impl TripTable {
    /// Build a table from raw string columns as read from a city file.
    ///
    /// Start Time must parse for every row and every non-blank Trip Duration
    /// or Birth Year must be a number. Blank cells and `NaN` become null.
    pub fn from_raw(city: City, raw: DataFrame) -> Result<Self> {
        let shape = TableShape::for_city(city);
        require_columns(&raw, &trip::REQUIRED)?;

        let mut text_cols = vec![trip::START_STATION, trip::END_STATION, trip::USER_TYPE];
        let mut float_cols = vec![trip::TRIP_DURATION];
        if shape == TableShape::WithDemographics {
            require_columns(&raw, &demographics::ALL)?;
            text_cols.push(demographics::GENDER);
            float_cols.push(demographics::BIRTH_YEAR);
        }

        let df = parse_datetime_column(raw, trip::START_TIME, START_TIME_FORMAT)?;
        let unparsed = df.column(trip::START_TIME)?.null_count();
        if unparsed > 0 {
            return Err(BikeshareError::InvalidData(format!(
                "Column '{}' has {} empty values",
                trip::START_TIME,
                unparsed
            )));
        }

        let df = df
            .lazy()
            .with_columns(
                text_cols
                    .iter()
                    .chain(float_cols.iter())
                    .map(|c| blank_to_null(c))
                    .collect::<Vec<_>>(),
            )
            .collect()?;
        let df = parse_float_columns(df, &float_cols)?;

        let mut derived_cols: Vec<Expr> = float_cols.iter().map(|c| nan_to_null(c)).collect();
        derived_cols.push(
            col(trip::START_TIME)
                .dt()
                .month()
                .cast(DataType::Int32)
                .alias(derived::MONTH),
        );
        derived_cols.push(
            col(trip::START_TIME)
                .dt()
                .strftime("%A")
                .alias(derived::DAY_OF_WEEK),
        );

        Ok(Self {
            city,
            shape,
            frame: df.lazy().with_columns(derived_cols).collect()?,
        })
    }

    /// Keep only trips in the given month and on the given weekday.
    /// Row order is preserved.
    pub fn filter(self, month: MonthFilter, day: DayFilter) -> Result<Self> {
        let mut lazy = self.frame.lazy();
        if let Some(n) = month.number() {
            lazy = lazy.filter(col(derived::MONTH).eq(lit(n as i32)));
        }
        if let DayFilter::Only(weekday) = day {
            lazy = lazy.filter(col(derived::DAY_OF_WEEK).eq(lit(weekday_name(weekday))));
        }
        Ok(Self {
            city: self.city,
            shape: self.shape,
            frame: lazy.collect()?,
        })
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn shape(&self) -> TableShape {
        self.shape
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Rows `[offset, offset + len)`, clipped to the end of the table.
    pub fn rows(&self, offset: usize, len: usize) -> DataFrame {
        self.frame.slice(offset as i64, len)
    }
}

/// Reads city files from a data directory.
#[derive(Debug, Clone)]
pub struct TripLoader {
    base_path: PathBuf,
}

impl TripLoader {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn path_for(&self, city: City) -> PathBuf {
        self.base_path.join(city.file_name())
    }

    /// Load the city's trips and apply the month and day filters.
    pub fn load(&self, criteria: &FilterCriteria) -> Result<TripTable> {
        let path = self.path_for(criteria.city);
        if !path.is_file() {
            return Err(BikeshareError::SourceNotFound {
                city: criteria.city.to_string(),
                path,
            });
        }

        let raw = read_csv_as_strings(path.clone())?;
        tracing::info!(path = %path.display(), rows = raw.height(), "read trip file");

        let table = TripTable::from_raw(criteria.city, raw)?.filter(criteria.month, criteria.day)?;
        tracing::info!(
            city = %criteria.city,
            month = ?criteria.month,
            day = ?criteria.day,
            rows = table.height(),
            "applied filters"
        );
        Ok(table)
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
fn read_csv_as_strings(path: PathBuf) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(BikeshareError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Parse a string column to Datetime, failing on any malformed value.
fn parse_datetime_column(df: DataFrame, column: &str, format: &str) -> Result<DataFrame> {
    let df = df
        .lazy()
        .with_columns([col(column)
            .str()
            .strip_chars(lit(" \t\r\n"))
            .str()
            .to_datetime(
                Some(TimeUnit::Microseconds),
                None,
                StrptimeOptions {
                    format: Some(format.into()),
                    strict: true,
                    ..Default::default()
                },
                lit("raise"),
            )])
        .collect()?;
    Ok(df)
}

/// Cast string columns to Float64. A non-blank cell that is not a number
/// fails the whole table.
fn parse_float_columns(df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let blanks: Vec<usize> = columns
        .iter()
        .map(|c| df.column(c).map(|s| s.null_count()))
        .collect::<PolarsResult<_>>()?;

    let df = df
        .lazy()
        .with_columns(
            columns
                .iter()
                .map(|c| col(*c).cast(DataType::Float64))
                .collect::<Vec<_>>(),
        )
        .collect()?;

    for (column, blank) in columns.iter().zip(blanks) {
        let malformed = df.column(column)?.null_count() - blank;
        if malformed > 0 {
            return Err(BikeshareError::InvalidData(format!(
                "Column '{}' has {} values that are not numbers",
                column, malformed
            )));
        }
    }
    Ok(df)
}

/// Trimmed text, with empty cells as null.
fn blank_to_null(column: &str) -> Expr {
    let trimmed = col(column).str().strip_chars(lit(" \t\r\n"));
    when(trimmed.clone().eq(lit("")))
        .then(lit(NULL).cast(DataType::String))
        .otherwise(trimmed)
        .alias(column)
}

fn nan_to_null(column: &str) -> Expr {
    when(col(column).is_nan())
        .then(lit(NULL).cast(DataType::Float64))
        .otherwise(col(column))
        .alias(column)
}
