//! Read-only statistics over a trip table.
//!
//! Null cells are ignored throughout; the loader has already turned blank
//! text and `NaN` into null. Modes break ties towards the smallest value in
//! natural order, so repeated runs on the same table agree.

use polars::prelude::*;

use crate::error::Result;
use crate::filters::month_name;
use crate::model::{TableShape, TripTable};
use crate::schema::{demographics, derived, trip};

const COUNT: &str = "count";

// ── Primitives ──────────────────────────────────────────────────────────────

/// Row count per distinct combination of `keys`, most frequent first, ties
/// by ascending key. Rows with a null in any key are left out.
pub fn value_counts(df: &DataFrame, keys: &[&str]) -> Result<DataFrame> {
    let mut lazy = df.clone().lazy();
    for key in keys {
        lazy = lazy.filter(col(*key).is_not_null());
    }

    let mut order = vec![col(COUNT)];
    order.extend(keys.iter().map(|k| col(*k)));
    let mut descending = vec![true];
    descending.extend(keys.iter().map(|_| false));

    let counts = lazy
        .group_by(keys.iter().map(|k| col(*k)).collect::<Vec<_>>())
        .agg([len().cast(DataType::UInt64).alias(COUNT)])
        .sort_by_exprs(
            order,
            SortMultipleOptions {
                descending,
                ..Default::default()
            },
        )
        .collect()?;
    Ok(counts)
}

/// Most frequent text value of `column`.
fn str_mode(df: &DataFrame, column: &str) -> Result<Option<String>> {
    let counts = value_counts(df, &[column])?;
    Ok(counts.column(column)?.str()?.get(0).map(str::to_string))
}

fn i32_mode(df: &DataFrame, column: &str) -> Result<Option<i32>> {
    let counts = value_counts(df, &[column])?;
    Ok(counts.column(column)?.as_materialized_series().i32()?.get(0))
}

/// Text counts as `(value, count)` pairs in `value_counts` order.
fn str_counts(df: &DataFrame, column: &str) -> Result<Vec<(String, usize)>> {
    let counts = value_counts(df, &[column])?;
    let values = counts.column(column)?.str()?;
    let totals = counts.column(COUNT)?.as_materialized_series().u64()?;
    Ok(values
        .into_iter()
        .zip(totals.into_iter())
        .filter_map(|(v, n)| Some((v?.to_string(), n? as usize)))
        .collect())
}

/// Finite float out of a reduction result; null and `NaN` give `None`.
fn scalar_f64(scalar: Scalar) -> Option<f64> {
    scalar
        .value()
        .try_extract::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn whole_year(scalar: Scalar) -> Option<i64> {
    scalar_f64(scalar).map(|y| y as i64)
}

// ── Time of travel ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    pub month: String,
    pub day_of_week: String,
    pub hour: i32,
}

pub fn time_stats(table: &TripTable) -> Result<Option<TimeStats>> {
    let df = table.frame();

    let hours = df
        .clone()
        .lazy()
        .select([col(trip::START_TIME)
            .dt()
            .hour()
            .cast(DataType::Int32)
            .alias(derived::HOUR)])
        .collect()?;

    let month = i32_mode(df, derived::MONTH)?;
    let day = str_mode(df, derived::DAY_OF_WEEK)?;
    let hour = i32_mode(&hours, derived::HOUR)?;

    Ok(match (month, day, hour) {
        (Some(month), Some(day), Some(hour)) => Some(TimeStats {
            month: u32::try_from(month)
                .ok()
                .and_then(month_name)
                .map(str::to_string)
                .unwrap_or_else(|| month.to_string()),
            day_of_week: capitalize(&day),
            hour,
        }),
        _ => None,
    })
}

fn capitalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Stations ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start_station: String,
    pub end_station: String,
    pub trip: (String, String),
}

pub fn station_stats(table: &TripTable) -> Result<Option<StationStats>> {
    let df = table.frame();
    let start_station = str_mode(df, trip::START_STATION)?;
    let end_station = str_mode(df, trip::END_STATION)?;

    let pairs = value_counts(df, &[trip::START_STATION, trip::END_STATION])?;
    let pair_start = pairs.column(trip::START_STATION)?.str()?.get(0);
    let pair_end = pairs.column(trip::END_STATION)?.str()?.get(0);

    Ok(match (start_station, end_station, pair_start, pair_end) {
        (Some(start), Some(end), Some(pair_start), Some(pair_end)) => Some(StationStats {
            start_station: start,
            end_station: end,
            trip: (pair_start.to_string(), pair_end.to_string()),
        }),
        _ => None,
    })
}

// ── Trip duration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DurationStats {
    pub total: f64,
    pub mean: f64,
}

impl DurationStats {
    /// Total in seconds with thousands separators and no decimals.
    pub fn total_display(&self) -> String {
        format_thousands(self.total)
    }

    /// Mean in seconds with two decimals.
    pub fn mean_display(&self) -> String {
        format!("{:.2}", self.mean)
    }
}

pub fn trip_duration_stats(table: &TripTable) -> Result<Option<DurationStats>> {
    let s = table
        .frame()
        .column(trip::TRIP_DURATION)?
        .as_materialized_series();
    if s.null_count() == s.len() {
        return Ok(None);
    }

    let total = scalar_f64(s.sum_reduce()?);
    let mean = scalar_f64(s.mean_reduce());
    Ok(match (total, mean) {
        (Some(total), Some(mean)) => Some(DurationStats { total, mean }),
        _ => None,
    })
}

/// Round to a whole number and group digits in threes, e.g. `1234567.4` →
/// `1,234,567`.
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{value:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

// ── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemographicStats {
    pub gender_counts: Vec<(String, usize)>,
    pub earliest_birth_year: Option<i64>,
    pub latest_birth_year: Option<i64>,
    pub common_birth_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user_type_counts: Vec<(String, usize)>,
    /// `None` for tables without Gender / Birth Year columns.
    pub demographics: Option<DemographicStats>,
}

pub fn user_stats(table: &TripTable) -> Result<Option<UserStats>> {
    if table.is_empty() {
        return Ok(None);
    }
    let df = table.frame();
    let user_type_counts = str_counts(df, trip::USER_TYPE)?;

    let demographics = match table.shape() {
        TableShape::Basic => None,
        TableShape::WithDemographics => Some(demographic_stats(df)?),
    };

    Ok(Some(UserStats {
        user_type_counts,
        demographics,
    }))
}

fn demographic_stats(df: &DataFrame) -> Result<DemographicStats> {
    let years = df
        .column(demographics::BIRTH_YEAR)?
        .as_materialized_series();

    let common = value_counts(df, &[demographics::BIRTH_YEAR])?;
    let common_birth_year = common
        .column(demographics::BIRTH_YEAR)?
        .as_materialized_series()
        .f64()?
        .get(0)
        .filter(|y| y.is_finite())
        .map(|y| y as i64);

    Ok(DemographicStats {
        gender_counts: str_counts(df, demographics::GENDER)?,
        earliest_birth_year: whole_year(years.min_reduce()?),
        latest_birth_year: whole_year(years.max_reduce()?),
        common_birth_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{City, DayFilter, MonthFilter};
    use crate::model::tests::{CHICAGO_CSV, WASHINGTON_CSV};
    use polars::df;

    fn table(city: City, rows: &[(&str, &str, &str, &str, &str)]) -> TripTable {
        let starts: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let durations: Vec<&str> = rows.iter().map(|r| r.1).collect();
        let start_stations: Vec<&str> = rows.iter().map(|r| r.2).collect();
        let end_stations: Vec<&str> = rows.iter().map(|r| r.3).collect();
        let user_types: Vec<&str> = rows.iter().map(|r| r.4).collect();
        let raw = df!(
            trip::START_TIME => starts,
            trip::TRIP_DURATION => durations,
            trip::START_STATION => start_stations,
            trip::END_STATION => end_stations,
            trip::USER_TYPE => user_types
        )
        .unwrap();
        TripTable::from_raw(city, raw).unwrap()
    }

    fn csv_table(city: City, csv: &str) -> TripTable {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(city.file_name()), csv).unwrap();
        crate::model::TripLoader::new(dir.path())
            .load(&crate::filters::FilterCriteria {
                city,
                month: MonthFilter::All,
                day: DayFilter::All,
            })
            .unwrap()
    }

    #[test]
    fn counts_order_by_frequency_then_value() {
        let df = df!("kind" => ["x", "y", "y", "z", "x", "w", "y"]).unwrap();
        assert_eq!(
            str_counts(&df, "kind").unwrap(),
            vec![
                ("y".to_string(), 3),
                ("x".to_string(), 2),
                ("w".to_string(), 1),
                ("z".to_string(), 1)
            ]
        );
    }

    #[test]
    fn mode_prefers_smallest_on_tie() {
        let df = df!(
            "name" => ["b", "a", "b", "a", "c"],
            "n" => [3i32, 1, 3, 1, 2]
        )
        .unwrap();
        assert_eq!(str_mode(&df, "name").unwrap().as_deref(), Some("a"));
        assert_eq!(i32_mode(&df, "n").unwrap(), Some(1));
    }

    #[test]
    fn counts_skip_nulls() {
        let df = df!("kind" => [Some("a"), None, None, Some("b"), Some("b")]).unwrap();
        assert_eq!(str_mode(&df, "kind").unwrap().as_deref(), Some("b"));
        assert_eq!(str_counts(&df, "kind").unwrap().len(), 2);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(60.0), "60");
        assert_eq!(format_thousands(999.5), "1,000");
        assert_eq!(format_thousands(1234567.4), "1,234,567");
        assert_eq!(format_thousands(-12345.0), "-12,345");
        assert_eq!(format_thousands(0.0), "0");
    }

    #[test]
    fn duration_sum_and_mean() {
        let t = table(
            City::Washington,
            &[
                ("2017-01-01 10:00:00", "10", "A", "B", "Subscriber"),
                ("2017-01-01 11:00:00", "20", "A", "B", "Subscriber"),
                ("2017-01-01 12:00:00", "30", "A", "B", "Subscriber"),
            ],
        );
        let stats = trip_duration_stats(&t).unwrap().unwrap();
        assert_eq!(stats.total_display(), "60");
        assert_eq!(stats.mean_display(), "20.00");
    }

    #[test]
    fn station_tie_is_deterministic() {
        let rows = [
            ("2017-01-01 10:00:00", "1", "Zeta", "Hub", "Subscriber"),
            ("2017-01-01 10:00:00", "1", "Alpha", "Hub", "Subscriber"),
            ("2017-01-01 10:00:00", "1", "Zeta", "Dock", "Subscriber"),
            ("2017-01-01 10:00:00", "1", "Alpha", "Dock", "Subscriber"),
            ("2017-01-01 10:00:00", "1", "Mid", "Dock", "Subscriber"),
        ];
        let t = table(City::Washington, &rows);
        let first = station_stats(&t).unwrap().unwrap();
        for _ in 0..5 {
            assert_eq!(station_stats(&t).unwrap().unwrap(), first);
        }
        assert_eq!(first.start_station, "Alpha");
        assert_eq!(first.end_station, "Dock");
        assert_eq!(first.trip, ("Alpha".to_string(), "Dock".to_string()));
    }

    #[test]
    fn popular_trip_pair() {
        let t = csv_table(City::Chicago, CHICAGO_CSV);
        let stats = station_stats(&t).unwrap().unwrap();
        assert_eq!(stats.start_station, "Canal St");
        assert_eq!(stats.end_station, "Clark St");
        assert_eq!(stats.trip, ("Canal St".to_string(), "Clark St".to_string()));
    }

    #[test]
    fn time_of_travel() {
        let t = csv_table(City::Chicago, CHICAGO_CSV);
        let stats = time_stats(&t).unwrap().unwrap();
        // January and March tie on two trips each
        assert_eq!(stats.month, "January");
        assert_eq!(stats.day_of_week, "Monday");
        assert_eq!(stats.hour, 8);
    }

    #[test]
    fn users_with_demographics() {
        let t = csv_table(City::Chicago, CHICAGO_CSV);
        let stats = user_stats(&t).unwrap().unwrap();
        assert_eq!(
            stats.user_type_counts,
            vec![("Subscriber".to_string(), 3), ("Customer".to_string(), 2)]
        );
        let demo = stats.demographics.unwrap();
        assert_eq!(
            demo.gender_counts,
            vec![("Female".to_string(), 2), ("Male".to_string(), 2)]
        );
        assert_eq!(demo.earliest_birth_year, Some(1975));
        assert_eq!(demo.latest_birth_year, Some(1990));
        assert_eq!(demo.common_birth_year, Some(1984));
    }

    #[test]
    fn nan_birth_year_is_ignored() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-02-01 07:00:00,10,A,B,Subscriber,Male,1980
2017-02-01 08:00:00,20,A,B,Subscriber,Female,nan
2017-02-01 09:00:00,30,A,B,Customer,Female,NaN
";
        let t = csv_table(City::Chicago, csv);
        let demo = user_stats(&t).unwrap().unwrap().demographics.unwrap();
        assert_eq!(demo.earliest_birth_year, Some(1980));
        assert_eq!(demo.latest_birth_year, Some(1980));
        assert_eq!(demo.common_birth_year, Some(1980));
    }

    #[test]
    fn blank_stations_do_not_win_the_mode() {
        let csv = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1,2017-02-01 07:00:00,x,10, ,Hub,Subscriber
2,2017-02-01 08:00:00,x,20, ,Hub,Subscriber
3,2017-02-01 09:00:00,x,30,Dock,Hub,Subscriber
";
        let t = csv_table(City::Washington, csv);
        let stats = station_stats(&t).unwrap().unwrap();
        assert_eq!(stats.start_station, "Dock");
        assert_eq!(stats.trip, ("Dock".to_string(), "Hub".to_string()));
    }

    #[test]
    fn blank_durations_are_left_out_of_the_mean() {
        let t = table(
            City::Washington,
            &[
                ("2017-01-01 10:00:00", "10", "A", "B", "Subscriber"),
                ("2017-01-01 11:00:00", "", "A", "B", "Subscriber"),
                ("2017-01-01 12:00:00", "30", "A", "B", "Subscriber"),
            ],
        );
        let stats = trip_duration_stats(&t).unwrap().unwrap();
        assert_eq!(stats.total_display(), "40");
        assert_eq!(stats.mean_display(), "20.00");
    }

    #[test]
    fn users_without_demographics_stop_after_user_types() {
        let t = csv_table(City::Washington, WASHINGTON_CSV);
        let stats = user_stats(&t).unwrap().unwrap();
        assert_eq!(stats.user_type_counts.len(), 2);
        assert!(stats.demographics.is_none());
    }

    #[test]
    fn empty_table_has_no_statistics() {
        let t = csv_table(City::Chicago, CHICAGO_CSV)
            .filter(MonthFilter::May, DayFilter::All)
            .unwrap();
        assert!(t.is_empty());
        assert!(time_stats(&t).unwrap().is_none());
        assert!(station_stats(&t).unwrap().is_none());
        assert!(trip_duration_stats(&t).unwrap().is_none());
        assert!(user_stats(&t).unwrap().is_none());
    }
}
