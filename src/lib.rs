//! Interactive descriptive statistics over US bikeshare trip data.

pub mod aggregation;
pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod filters;
pub mod model;
pub mod prompt;
pub mod report;
pub mod schema;

pub use config::Config;
pub use error::{BikeshareError, Result};
pub use filters::{City, DayFilter, FilterCriteria, MonthFilter};
pub use model::{TableShape, TripLoader, TripTable};
pub use prompt::Console;
