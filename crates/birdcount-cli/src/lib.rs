//! # Birdcount CLI
//!
//! Command line front end: reads the sensor log, asks for or takes the chart
//! window, runs the correction pipeline and writes a PNG or JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod args;
pub mod error;
pub mod prompt;

pub use app::{date_bounds, App, Outcome};
pub use args::Args;
pub use error::{CliError, CliResult};
pub use prompt::{prompt_on_terminal, DateBounds, Prompter, SelectionAnswers};
