//! Line-oriented dialogue with the user.
//!
//! `Console` owns the input and output streams so the interactive parts of
//! the program can be driven from a script in tests.

use std::io::{BufRead, Write};

use crate::error::{BikeshareError, Result};
use crate::filters::{City, DayFilter, FilterCriteria, MonthFilter};

const AFFIRMATIVE: &str = "yes";

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Ask for `name` until the answer, lowercased, is one of `options`.
    pub fn pick_one(&mut self, name: &str, options: &[&str]) -> Result<String> {
        let listing = options
            .iter()
            .map(|o| format!("'{o}'"))
            .collect::<Vec<_>>()
            .join(", ");
        loop {
            let answer = self.ask(&format!("Enter the {name} [{listing}]: "), name)?;
            if options.contains(&answer.as_str()) {
                return Ok(answer);
            }
            tracing::debug!(name, answer = %answer, "rejected input");
        }
    }

    /// Ask a yes/no question. Only "yes" counts as yes.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.ask(question, "a yes/no answer")? == AFFIRMATIVE)
    }

    /// Collect city, month and day for one analysis round.
    pub fn get_filters(&mut self) -> Result<FilterCriteria> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        let city: City = self.pick_one("city", &City::OPTIONS)?.parse()?;
        let month: MonthFilter = self.pick_one("month", &MonthFilter::OPTIONS)?.parse()?;
        let day: DayFilter = self.pick_one("day", &DayFilter::OPTIONS)?.parse()?;

        writeln!(self.output, "{}", "-".repeat(40))?;
        Ok(FilterCriteria { city, month, day })
    }

    fn ask(&mut self, prompt: &str, waiting_for: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        // undecodable bytes only make the answer invalid, never the session
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Err(BikeshareError::InputClosed(waiting_for.to_string()));
        }
        Ok(String::from_utf8_lossy(&line).trim().to_lowercase())
    }
}
