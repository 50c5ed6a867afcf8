//! # CLI Command Implementations
//!
//! Each subcommand of `ra-tuner` lives in its own file with:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `ra_tuner` library.

pub mod apply;
pub mod defaults;
pub mod merge;
