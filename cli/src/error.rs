#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use oas2md_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// Loading or converting the OpenAPI document failed.
    #[display("{}", _0)]
    App(AppError),

    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// The options file could not be read or parsed.
    #[from(ignore)]
    #[display("Invalid config file: {}", _0)]
    Config(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `Config(String)`
/// variant contains a `String`, which does not implement `std::error::Error`.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
