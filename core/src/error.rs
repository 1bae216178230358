use crate::timeseries::TimeSeriesError;

/// Failures a component may surface from `initialize` or `calculate`.
///
/// Everything here is absorbed by the [`Dispatcher`](crate::Dispatcher)
/// and translated into a status code; no variant ever crosses the C
/// boundary as a Rust error.
#[derive(thiserror::Error, Debug)]
pub enum CalcError {
    /// Plain failure. The text is logged but not reported to the host.
    #[error("{0}")]
    Failed(String),

    /// Failure with a message the host should display. The dispatcher
    /// returns `FailureWithMessage` and places the message address in
    /// output slot 0.
    #[error("{0}")]
    Fatal(String),

    /// A malformed time-series payload in the input buffer.
    #[error("time series payload: {0}")]
    TimeSeries(#[from] TimeSeriesError),
}

impl CalcError {
    pub fn failed(msg: impl Into<String>) -> Self {
        CalcError::Failed(msg.into())
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        CalcError::Fatal(msg.into())
    }
}
