//! Interactive selection of the chart window.
//!
//! Each question is repeated until it gets a valid answer. Running out of
//! input is an error rather than a silent default.

use crate::error::{CliError, CliResult};
use birdcount_common::Granularity;
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};

/// First and last date present in the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    /// Earliest local date with a reading.
    pub first: NaiveDate,
    /// Latest local date with a reading.
    pub last: NaiveDate,
}

impl DateBounds {
    /// Whether `date` lies within the bounds, inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last
    }
}

/// Answers collected from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionAnswers {
    /// First day to chart.
    pub start_date: NaiveDate,
    /// Bucket width.
    pub granularity: Granularity,
    /// Number of days to chart.
    pub day_span: u32,
}

/// Question-and-answer loop over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter reading answers from `input` and writing questions to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the prompter, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Asks for the start date, interval and day count in that order.
    pub fn ask_selection(
        &mut self,
        site: &str,
        bounds: DateBounds,
    ) -> CliResult<SelectionAnswers> {
        writeln!(
            self.output,
            "Welcome, this program will plot the bird movements (in/out) in a garage in {site}"
        )?;
        writeln!(
            self.output,
            "Please input the start date (from {} to {})",
            bounds.first, bounds.last
        )?;

        let start_date = self.ask_start_date(bounds)?;
        let granularity = self.ask_granularity()?;
        let day_span = self.ask_day_span()?;

        Ok(SelectionAnswers {
            start_date,
            granularity,
            day_span,
        })
    }

    /// Asks for year, month and day until they form a date within `bounds`.
    pub fn ask_start_date(&mut self, bounds: DateBounds) -> CliResult<NaiveDate> {
        loop {
            let year = self.ask("Year: ", "the start year")?;
            let month = self.ask("Month (number): ", "the start month")?;
            let day = self.ask("Day: ", "the start day")?;

            match parse_date(&year, &month, &day) {
                Some(date) if bounds.contains(date) => return Ok(date),
                Some(_) => writeln!(
                    self.output,
                    "The date is not in the data. Please try again. Data from {} to {}.",
                    bounds.first, bounds.last
                )?,
                None => writeln!(
                    self.output,
                    "Invalid date. Please try again. Year(XXXX), month(XX) and day(XX) must be valid numbers/date."
                )?,
            }
        }
    }

    /// Asks for `h`, `d` or `w`.
    pub fn ask_granularity(&mut self) -> CliResult<Granularity> {
        writeln!(
            self.output,
            "What type of interval would you like? (Write 'h' for hours, 'd' for days, 'w' for weeks)"
        )?;
        loop {
            let answer = self.ask("Interval: ", "the interval")?;
            if let Ok(granularity) = answer.parse::<Granularity>() {
                return Ok(granularity);
            }
            writeln!(
                self.output,
                "Invalid interval. Please enter 'h' for hours, 'd' for days, or 'w' for weeks."
            )?;
        }
    }

    /// Asks for a positive number of days.
    pub fn ask_day_span(&mut self) -> CliResult<u32> {
        loop {
            let answer = self.ask("How many days do you want to display? ", "the number of days")?;
            match answer.parse::<u32>() {
                Ok(days) if days > 0 => return Ok(days),
                Ok(_) => writeln!(
                    self.output,
                    "Please enter a positive integer for the number of days."
                )?,
                Err(_) => writeln!(self.output, "Invalid input. Please enter a positive integer")?,
            }
        }
    }

    fn ask(&mut self, question: &str, what: &'static str) -> CliResult<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::InputClosed(what));
        }
        Ok(line.trim().to_string())
    }
}

/// Runs the selection prompt on the process's standard input and output.
pub fn prompt_on_terminal(site: &str, bounds: DateBounds) -> CliResult<SelectionAnswers> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Prompter::new(stdin.lock(), stdout.lock()).ask_selection(site, bounds)
}

fn parse_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
