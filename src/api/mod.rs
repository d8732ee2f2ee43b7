//! Output API for separation results

pub mod formatting;
pub mod types;

pub use formatting::{CsvFormatter, FormattedMatrix, JsonFormatter, MatrixFormatter, TextFormatter};
pub use types::OutputFormat;
