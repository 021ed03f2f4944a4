//! Per-file load failures.

use thiserror::Error;

/// Why an uploaded table could not be turned into records.
///
/// A failure is scoped to one file: the caller reports it and leaves the
/// target category's current table in place.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reader failure. The input is already UTF-8 and the reader accepts
    /// ragged rows, so this only surfaces if the `csv` reader itself gives up.
    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("table has more than {limit} rows")]
    TooManyRows { limit: usize },
}
