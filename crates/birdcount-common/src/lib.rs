//! # Birdcount Common
//!
//! Shared types, error handling, and logging for Birdcount.
//!
//! This crate provides the foundational types used by every other crate in
//! the workspace: the sensor [`Sample`], the [`Granularity`] of an aggregated
//! chart, and the workspace-wide [`BirdcountError`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{BirdcountError, Result};
pub use logging::{
    bootstrap_subscriber, init_default_logging, init_dev_logging, init_logging, LoggingConfig,
};
pub use types::*;
pub use utils::*;
