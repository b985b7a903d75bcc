//! Filter criteria for one analysis round: which city, which month, which day.
//!
//! All three are parsed from lowercase option strings offered by the prompter.

use std::fmt;
use std::str::FromStr;

use chrono::{Month, Weekday};

use crate::error::BikeshareError;

// ── City ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const OPTIONS: [&'static str; 3] = ["chicago", "new york city", "washington"];

    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Source file holding this city's trips.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Whether this city's file carries Gender and Birth Year columns.
    pub fn has_demographics(self) -> bool {
        !matches!(self, City::Washington)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| BikeshareError::InvalidData(format!("Unknown city: '{s}'")))
    }
}

// ── Month ───────────────────────────────────────────────────────────────────

/// Month filter. Only January through June can be selected: the data sets
/// cover the first half of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    January,
    February,
    March,
    April,
    May,
    June,
}

impl MonthFilter {
    pub const OPTIONS: [&'static str; 7] =
        ["all", "january", "february", "march", "april", "may", "june"];

    const VARIANTS: [MonthFilter; 7] = [
        MonthFilter::All,
        MonthFilter::January,
        MonthFilter::February,
        MonthFilter::March,
        MonthFilter::April,
        MonthFilter::May,
        MonthFilter::June,
    ];

    /// Calendar month number (1-based), or `None` for `All`.
    pub fn number(self) -> Option<u32> {
        match self {
            MonthFilter::All => None,
            m => Some(m as u32),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::OPTIONS
            .iter()
            .position(|o| *o == s)
            .map(|i| Self::VARIANTS[i])
            .ok_or_else(|| BikeshareError::InvalidData(format!("Unsupported month: '{s}'")))
    }
}

/// Full English name of a calendar month number, e.g. `1` → `January`.
pub fn month_name(number: u32) -> Option<&'static str> {
    u8::try_from(number)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
        .map(|m| m.name())
}

// ── Day ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Only(Weekday),
}

impl DayFilter {
    pub const OPTIONS: [&'static str; 8] = [
        "all",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];
}

impl FromStr for DayFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "all" {
            return Ok(DayFilter::All);
        }
        // chrono also accepts "mon"; only full names are valid here
        if !Self::OPTIONS.contains(&s.as_str()) {
            return Err(BikeshareError::InvalidData(format!("Unknown day: '{s}'")));
        }
        s.parse::<Weekday>()
            .map(DayFilter::Only)
            .map_err(|_| BikeshareError::InvalidData(format!("Unknown day: '{s}'")))
    }
}

/// Full English name of a weekday, matching the `%A` strftime output.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ── Criteria ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_ordinals_follow_calendar() {
        assert_eq!(MonthFilter::All.number(), None);
        assert_eq!(MonthFilter::January.number(), Some(1));
        assert_eq!(MonthFilter::June.number(), Some(6));
        assert_eq!("March".parse::<MonthFilter>().unwrap(), MonthFilter::March);
    }

    #[test]
    fn months_after_june_are_rejected() {
        assert!("july".parse::<MonthFilter>().is_err());
        assert!("december".parse::<MonthFilter>().is_err());
        assert!(!MonthFilter::OPTIONS.contains(&"july"));
    }

    #[test]
    fn every_month_option_parses() {
        for opt in MonthFilter::OPTIONS {
            assert!(opt.parse::<MonthFilter>().is_ok(), "{opt}");
        }
    }

    #[test]
    fn day_parsing() {
        assert_eq!("all".parse::<DayFilter>().unwrap(), DayFilter::All);
        assert_eq!(
            "Saturday".parse::<DayFilter>().unwrap(),
            DayFilter::Only(Weekday::Sat)
        );
        assert!("sat".parse::<DayFilter>().is_err());
        assert!("someday".parse::<DayFilter>().is_err());
    }

    #[test]
    fn city_files_and_shapes() {
        let nyc: City = "New York City".parse().unwrap();
        assert_eq!(nyc, City::NewYorkCity);
        assert_eq!(nyc.file_name(), "new_york_city.csv");
        assert!(nyc.has_demographics());
        assert!(!City::Washington.has_demographics());
        assert!("boston".parse::<City>().is_err());
    }

    #[test]
    fn names() {
        assert_eq!(month_name(2), Some("February"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(13), None);
        assert_eq!(weekday_name(Weekday::Wed), "Wednesday");
    }
}
