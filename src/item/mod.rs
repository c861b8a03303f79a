#[cfg(feature = "logger")]
/// This module provides an issue writer that logs validation issues.
pub mod logger;

#[cfg(feature = "csv")]
/// This module provides the CSV item reader, item writer and error report writer.
pub mod csv;
