//! Text rendering of the four statistics sections.
//!
//! Each section prints a header, its results, and how long the computation
//! took.

use std::io::Write;
use std::time::Instant;

use crate::aggregation::{
    station_stats, time_stats, trip_duration_stats, user_stats, DemographicStats,
};
use crate::error::Result;
use crate::model::TripTable;

const NO_DATA: &str = "No data available for the selected filters.";

fn separator() -> String {
    "-".repeat(40)
}

fn start<W: Write>(out: &mut W, title: &str) -> Result<Instant> {
    writeln!(out, "\n{title}\n")?;
    Ok(Instant::now())
}

fn finish<W: Write>(out: &mut W, section: &str, started: Instant) -> Result<()> {
    let elapsed = started.elapsed();
    tracing::debug!(section, elapsed = ?elapsed, "statistics computed");
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{}", separator())?;
    Ok(())
}

fn write_counts<W: Write>(out: &mut W, title: &str, counts: &[(String, usize)]) -> Result<()> {
    writeln!(out, "{title}:")?;
    for (value, count) in counts {
        writeln!(out, "  {value}: {count}")?;
    }
    Ok(())
}

fn write_year<W: Write>(out: &mut W, label: &str, year: Option<i64>) -> Result<()> {
    match year {
        Some(y) => writeln!(out, "{label}: {y}")?,
        None => writeln!(out, "{label}: n/a")?,
    }
    Ok(())
}

/// Most frequent month, weekday and start hour.
pub fn write_time_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    let started = start(out, "Calculating the Most Frequent Times of Travel...")?;

    match time_stats(table)? {
        Some(stats) => {
            writeln!(out, "most common month: {}", stats.month)?;
            writeln!(out, "most common day of the week: {}", stats.day_of_week)?;
            writeln!(out, "most common hour: {}", stats.hour)?;
        }
        None => writeln!(out, "{NO_DATA}")?,
    }

    finish(out, "time", started)
}

/// Most popular stations and trip.
pub fn write_station_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    let started = start(out, "Calculating the Most Popular Stations and Trip...")?;

    match station_stats(table)? {
        Some(stats) => {
            writeln!(out, "most common Start Station: {}", stats.start_station)?;
            writeln!(out, "most common End Station: {}", stats.end_station)?;
            writeln!(
                out,
                "most common combination of Start and End Station: ({}, {})",
                stats.trip.0, stats.trip.1
            )?;
        }
        None => writeln!(out, "{NO_DATA}")?,
    }

    finish(out, "station", started)
}

/// Total and mean trip duration.
pub fn write_trip_duration_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    let started = start(out, "Calculating Trip Duration...")?;

    match trip_duration_stats(table)? {
        Some(stats) => {
            writeln!(out, "Total Trip Duration: {}", stats.total_display())?;
            writeln!(out, "Mean Trip Duration: {}", stats.mean_display())?;
        }
        None => writeln!(out, "{NO_DATA}")?,
    }

    finish(out, "duration", started)
}

/// User type counts, plus gender and birth years where the city records them.
pub fn write_user_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    let started = start(out, "Calculating User Stats...")?;

    match user_stats(table)? {
        Some(stats) => {
            write_counts(out, "User Type counts", &stats.user_type_counts)?;
            if let Some(demo) = stats.demographics {
                write_demographics(out, &demo)?;
            }
        }
        None => writeln!(out, "{NO_DATA}")?,
    }

    finish(out, "user", started)
}

fn write_demographics<W: Write>(out: &mut W, demo: &DemographicStats) -> Result<()> {
    write_counts(out, "Gender counts", &demo.gender_counts)?;
    write_year(out, "Earliest year", demo.earliest_birth_year)?;
    write_year(out, "Most recent year", demo.latest_birth_year)?;
    write_year(out, "Most common year", demo.common_birth_year)
}

/// All four sections in their fixed order.
pub fn write_all<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    write_time_stats(out, table)?;
    write_station_stats(out, table)?;
    write_trip_duration_stats(out, table)?;
    write_user_stats(out, table)
}
