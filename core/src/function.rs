use crate::error::CalcError;
use crate::output::OutputWriter;

/// Argument counts reported to the host via `ReportArguments`.
///
/// The host sizes future invocation buffers from these numbers, so
/// they must match what `calculate` actually consumes and produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgCounts {
    pub inputs: usize,
    pub outputs: usize,
}

/// A pluggable computation unit driven by the host through its
/// lifecycle: initialize, report metadata, calculate repeatedly,
/// clean up.
///
/// Implementations never see raw pointers or method codes; the
/// [`Dispatcher`](crate::Dispatcher) handles the wire contract.
pub trait ExternalFunction {
    /// Version identifier reported for `ReportVersion`.
    fn version(&self) -> f64;

    /// Argument counts reported for `ReportArguments`.
    fn arg_counts(&self) -> ArgCounts;

    /// Called before each realization. May be called more than once
    /// per process; acquire here whatever must live until `cleanup`.
    fn initialize(&mut self) -> Result<(), CalcError> {
        Ok(())
    }

    /// One calculation over the positional input buffer. Must write at
    /// least one output value.
    fn calculate(&mut self, inputs: &[f64], out: &mut OutputWriter<'_>) -> Result<(), CalcError>;

    /// Release everything acquired in `initialize`. The dispatcher
    /// guarantees this is never called on an uninitialized component.
    fn cleanup(&mut self) {}

    /// Number of leading input slots `input_span` may inspect before
    /// the full extent of the buffer is known. Defaults to the
    /// declared input count; packed-payload components raise it to
    /// cover their header region.
    fn header_span(&self) -> usize {
        self.arg_counts().inputs
    }

    /// Total input slots one `Calculate` invocation occupies, given
    /// the header region. Defaults to the declared input count.
    fn input_span(&self, _header: &[f64]) -> usize {
        self.arg_counts().inputs
    }
}
