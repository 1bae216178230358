//! The raw GoldSim external-function contract.
//!
//! GoldSim drives every external function through a single exported C
//! symbol with this exact signature:
//!
//! ```c
//! void MyExternalFcn(int method, int* status, double* inargs, double* outargs)
//! ```
//!
//! The method and status codes below are fixed by the host and must
//! never be renumbered. This crate holds nothing but that contract so
//! that both the component side and any host-side tooling agree on it.

/// Lifecycle phases GoldSim requests from an external function.
///
/// The discriminants are the wire values the host sends; they are a
/// serialization contract, not an implementation detail.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XfMethod {
    /// Called before each realization. No arguments are passed.
    Initialize = 0,
    /// Called during the simulation each time the inputs change.
    Calculate = 1,
    /// Report the external-function version in output slot 0.
    ReportVersion = 2,
    /// Report the input/output argument counts in output slots 0 and 1.
    ReportArguments = 3,
    /// Called before the library is unloaded. No arguments are passed.
    Cleanup = 99,
}

impl XfMethod {
    /// Decode a raw method code. Unknown codes stay raw so the caller
    /// can fail the invocation without touching the output buffer.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(XfMethod::Initialize),
            1 => Some(XfMethod::Calculate),
            2 => Some(XfMethod::ReportVersion),
            3 => Some(XfMethod::ReportArguments),
            99 => Some(XfMethod::Cleanup),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Status codes an external function reports back to GoldSim.
///
/// `FailureWithMessage` and `IncreaseMemory` are only meaningful for
/// `Calculate`: the first returns the address of an error message in
/// output slot 0, the second returns the required output capacity (in
/// doubles) in output slot 0 so the host can grow the buffer and retry.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XfStatus {
    /// Call completed; simulation continues.
    Success = 0,
    /// Call failed with no error information.
    Failure = 1,
    /// Call succeeded but the host should unload the library now.
    CleanupNow = 99,
    /// Call failed; output slot 0 holds the address of a message.
    FailureWithMessage = -1,
    /// Output buffer too small; output slot 0 holds the required size.
    IncreaseMemory = -2,
}

impl XfStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(XfStatus::Success),
            1 => Some(XfStatus::Failure),
            99 => Some(XfStatus::CleanupNow),
            -1 => Some(XfStatus::FailureWithMessage),
            -2 => Some(XfStatus::IncreaseMemory),
            _ => None,
        }
    }
}

/// Packing convention for a time-series definition passed through the
/// flat input buffer of a `Calculate` call.
///
/// The host gives no schema; the layout is positional. A buffer is a
/// time series when the slot at `marker_slot` holds `marker`. The
/// sample count *n* sits at `count_slot`, followed by *n* time values
/// and then *n* data values starting at `data_slot`. Slot `tag_slot`
/// carries a caller-chosen identifier.
///
/// Only one layout revision has been observed in the wild; new
/// revisions must be added as new constants, never by editing `V1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesLayout {
    pub tag_slot: usize,
    pub marker_slot: usize,
    pub marker: f64,
    pub count_slot: usize,
    pub data_slot: usize,
}

impl TimeSeriesLayout {
    /// The layout GoldSim uses when an input is linked to a Time
    /// Series definition element.
    pub const V1: TimeSeriesLayout = TimeSeriesLayout {
        tag_slot: 0,
        marker_slot: 1,
        marker: 20.0,
        count_slot: 8,
        data_slot: 9,
    };

    /// Number of leading slots that must be readable before the sample
    /// count can be trusted.
    pub fn header_len(&self) -> usize {
        self.count_slot + 1
    }
}

/// The exact C signature GoldSim expects from an exported function.
pub type RawExternalFn = unsafe extern "C" fn(i32, *mut i32, *const f64, *mut f64);
