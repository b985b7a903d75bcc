//! One analysis round after another until the user stops.

use std::io::{BufRead, Write};

use crate::browser::browse;
use crate::config::Config;
use crate::error::Result;
use crate::model::TripLoader;
use crate::prompt::Console;
use crate::report;

/// Prompt, load, browse, report; repeat while the user answers "yes".
pub fn run<R: BufRead, W: Write>(config: &Config, console: &mut Console<R, W>) -> Result<()> {
    let loader = TripLoader::new(&config.data_dir);
    let mut round = 0usize;

    loop {
        round += 1;
        let criteria = console.get_filters()?;
        tracing::info!(round, city = %criteria.city, "starting analysis round");

        let table = loader.load(&criteria)?;
        browse(console, &table)?;
        report::write_all(console.output(), &table)?;

        if !console.confirm("\nWould you like to restart? Enter yes or no.\n")? {
            break;
        }
    }
    Ok(())
}
