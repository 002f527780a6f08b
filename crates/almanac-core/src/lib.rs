//! Shared configuration, errors and defaults for the almanac crates.

pub mod config;
pub mod constants;
pub mod error;
