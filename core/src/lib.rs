//! Safe core for GoldSim-compatible external functions.
//!
//! Component authors implement [`ExternalFunction`]; a [`Dispatcher`]
//! owns the component and turns the host's raw method codes and flat
//! double buffers into trait calls, absorbing every failure so that
//! nothing but a status code crosses the C boundary.

pub mod dispatch;
pub use dispatch::Dispatcher;

pub mod function;
pub use function::{ArgCounts, ExternalFunction};

pub mod output;
pub use output::OutputWriter;

pub mod timeseries;
pub use timeseries::{input_span, TimeSeriesError, TimeSeriesPayload};

pub mod error;
pub use error::CalcError;
