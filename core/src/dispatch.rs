use std::ffi::CString;

use gsx_abi::{XfMethod, XfStatus};

use crate::error::CalcError;
use crate::function::ExternalFunction;
use crate::output::OutputWriter;

/// Owns one component instance and every piece of state that must
/// survive between host calls: the initialized flag, the output
/// capacity granted through the grow-and-retry protocol, and the
/// message kept alive for `FailureWithMessage`.
///
/// [`invoke`](Dispatcher::invoke) is a strict finite-state dispatch
/// over the method code. Every component failure is absorbed here and
/// logged; only the status code (plus, for fatal errors, a message
/// address in output slot 0) reaches the host.
pub struct Dispatcher<F: ExternalFunction> {
    function: F,
    initialized: bool,
    granted_outputs: usize,
    // Kept alive so the address written into output slot 0 stays
    // valid until the next invocation.
    fatal_message: Option<CString>,
}

impl<F: ExternalFunction> Dispatcher<F> {
    pub fn new(function: F) -> Self {
        let declared = function.arg_counts().outputs.max(1);
        Dispatcher {
            function,
            initialized: false,
            granted_outputs: declared,
            fatal_message: None,
        }
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    /// Dispatch one host invocation.
    ///
    /// `inputs` and `outputs` are the positional buffers for this call;
    /// the slice lengths are the capacities the host provided.
    pub fn invoke(&mut self, method_code: i32, inputs: &[f64], outputs: &mut [f64]) -> XfStatus {
        let Some(method) = XfMethod::from_code(method_code) else {
            // Defensive: the host promises only the five defined codes,
            // but an unknown one must fail without touching outputs.
            log::error!("unrecognized method code {method_code}");
            return XfStatus::Failure;
        };
        self.fatal_message = None;

        match method {
            XfMethod::Initialize => match self.function.initialize() {
                Ok(()) => {
                    self.initialized = true;
                    log::debug!("initialized");
                    XfStatus::Success
                }
                Err(err) => self.fail(err, outputs),
            },
            XfMethod::ReportVersion => {
                if let Some(slot) = outputs.first_mut() {
                    *slot = self.function.version();
                }
                XfStatus::Success
            }
            XfMethod::ReportArguments => {
                let counts = self.function.arg_counts();
                let mut out = OutputWriter::new(outputs);
                out.set(0, counts.inputs as f64);
                out.set(1, counts.outputs as f64);
                XfStatus::Success
            }
            XfMethod::Calculate => self.calculate(inputs, outputs),
            XfMethod::Cleanup => {
                // Safe without a matching Initialize, and safe twice.
                if self.initialized {
                    self.function.cleanup();
                    self.initialized = false;
                    log::debug!("cleaned up");
                }
                XfStatus::Success
            }
        }
    }

    fn calculate(&mut self, inputs: &[f64], outputs: &mut [f64]) -> XfStatus {
        let mut out = OutputWriter::new(outputs);
        match self.function.calculate(inputs, &mut out) {
            Ok(()) => {
                if out.needs_resize() {
                    let required = out.required();
                    self.granted_outputs = required;
                    log::debug!(
                        "output buffer too small ({} < {required}); requesting resize",
                        outputs.len()
                    );
                    if let Some(slot) = outputs.first_mut() {
                        *slot = required as f64;
                    }
                    XfStatus::IncreaseMemory
                } else {
                    XfStatus::Success
                }
            }
            Err(err) => self.fail(err, outputs),
        }
    }

    fn fail(&mut self, err: CalcError, outputs: &mut [f64]) -> XfStatus {
        match err {
            CalcError::Fatal(msg) => {
                log::error!("fatal: {msg}");
                let text = msg.replace('\0', "?");
                let message = CString::new(text).unwrap_or_default();
                if let Some(slot) = outputs.first_mut() {
                    *slot = message.as_ptr() as usize as f64;
                }
                self.fatal_message = Some(message);
                XfStatus::FailureWithMessage
            }
            other => {
                log::error!("{other}");
                XfStatus::Failure
            }
        }
    }

    /// Leading input slots the export glue may read before sizing the
    /// full input slice. Zero for every method but `Calculate`, where
    /// no inputs are meaningful.
    pub fn header_span(&self, method_code: i32) -> usize {
        match XfMethod::from_code(method_code) {
            Some(XfMethod::Calculate) => self.function.header_span(),
            _ => 0,
        }
    }

    /// Full input extent of one invocation, given its header region.
    pub fn input_span(&self, method_code: i32, header: &[f64]) -> usize {
        match XfMethod::from_code(method_code) {
            Some(XfMethod::Calculate) => self.function.input_span(header),
            _ => 0,
        }
    }

    /// Output slots the host has allocated for this method, per the
    /// contract: one for `ReportVersion`, two for `ReportArguments`,
    /// and for `Calculate` the declared count or whatever larger size
    /// was granted through `IncreaseMemory`. Unknown codes get zero so
    /// the buffer stays untouched.
    pub fn output_span(&self, method_code: i32) -> usize {
        match XfMethod::from_code(method_code) {
            Some(XfMethod::ReportVersion) => 1,
            Some(XfMethod::ReportArguments) => 2,
            Some(XfMethod::Calculate) => self.granted_outputs,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::ArgCounts;

    #[derive(Default)]
    struct Doubler {
        init_calls: usize,
        cleanup_calls: usize,
    }

    impl ExternalFunction for Doubler {
        fn version(&self) -> f64 {
            1.01
        }

        fn arg_counts(&self) -> ArgCounts {
            ArgCounts { inputs: 1, outputs: 1 }
        }

        fn initialize(&mut self) -> Result<(), CalcError> {
            self.init_calls += 1;
            Ok(())
        }

        fn calculate(&mut self, inputs: &[f64], out: &mut OutputWriter<'_>) -> Result<(), CalcError> {
            let x = inputs
                .first()
                .copied()
                .ok_or_else(|| CalcError::failed("missing input 0"))?;
            out.set(0, 2.0 * x);
            Ok(())
        }

        fn cleanup(&mut self) {
            self.cleanup_calls += 1;
        }
    }

    /// Writes four outputs but declares one, to exercise the
    /// grow-and-retry protocol.
    #[derive(Default)]
    struct WideOutput;

    impl ExternalFunction for WideOutput {
        fn version(&self) -> f64 {
            1.0
        }

        fn arg_counts(&self) -> ArgCounts {
            ArgCounts { inputs: 0, outputs: 1 }
        }

        fn calculate(&mut self, _inputs: &[f64], out: &mut OutputWriter<'_>) -> Result<(), CalcError> {
            for i in 0..4 {
                out.set(i, i as f64 + 1.0);
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct AlwaysFatal;

    impl ExternalFunction for AlwaysFatal {
        fn version(&self) -> f64 {
            1.0
        }

        fn arg_counts(&self) -> ArgCounts {
            ArgCounts { inputs: 0, outputs: 1 }
        }

        fn calculate(&mut self, _inputs: &[f64], _out: &mut OutputWriter<'_>) -> Result<(), CalcError> {
            Err(CalcError::fatal("input file missing"))
        }
    }

    #[test]
    fn report_version_writes_slot_zero() {
        let mut d = Dispatcher::new(Doubler::default());
        let mut out = [0.0];
        // Inputs are meaningless for this method; pass junk to prove it.
        let status = d.invoke(XfMethod::ReportVersion.code(), &[42.0], &mut out);
        assert_eq!(status, XfStatus::Success);
        assert_eq!(out[0], 1.01);
    }

    #[test]
    fn report_arguments_writes_counts() {
        let mut d = Dispatcher::new(Doubler::default());
        let mut out = [0.0, 0.0];
        let status = d.invoke(XfMethod::ReportArguments.code(), &[], &mut out);
        assert_eq!(status, XfStatus::Success);
        assert_eq!(out, [1.0, 1.0]);
    }

    #[test]
    fn calculate_consumes_declared_inputs() {
        let mut d = Dispatcher::new(Doubler::default());
        let mut out = [0.0];
        let status = d.invoke(XfMethod::Calculate.code(), &[21.0], &mut out);
        assert_eq!(status, XfStatus::Success);
        assert_eq!(out[0], 42.0);
    }

    #[test]
    fn unrecognized_method_fails_without_touching_outputs() {
        let mut d = Dispatcher::new(Doubler::default());
        let mut out = [7.7, 8.8];
        let status = d.invoke(7, &[1.0], &mut out);
        assert_eq!(status, XfStatus::Failure);
        assert_eq!(out, [7.7, 8.8]);
    }

    #[test]
    fn cleanup_is_idempotent_and_safe_without_initialize() {
        let mut d = Dispatcher::new(Doubler::default());
        let mut out = [0.0];

        // Cleanup before any Initialize: no-op, Success.
        assert_eq!(d.invoke(XfMethod::Cleanup.code(), &[], &mut out), XfStatus::Success);
        assert_eq!(d.function().cleanup_calls, 0);

        assert_eq!(d.invoke(XfMethod::Initialize.code(), &[], &mut out), XfStatus::Success);
        assert_eq!(d.invoke(XfMethod::Cleanup.code(), &[], &mut out), XfStatus::Success);
        assert_eq!(d.invoke(XfMethod::Cleanup.code(), &[], &mut out), XfStatus::Success);
        assert_eq!(d.function().cleanup_calls, 1);
    }

    #[test]
    fn initialize_may_repeat_per_realization() {
        let mut d = Dispatcher::new(Doubler::default());
        let mut out = [0.0];
        for _ in 0..3 {
            assert_eq!(d.invoke(XfMethod::Initialize.code(), &[], &mut out), XfStatus::Success);
            assert_eq!(d.invoke(XfMethod::Cleanup.code(), &[], &mut out), XfStatus::Success);
        }
        assert_eq!(d.function().init_calls, 3);
        assert_eq!(d.function().cleanup_calls, 3);
    }

    #[test]
    fn undersized_output_requests_resize_then_retry_succeeds() {
        let mut d = Dispatcher::new(WideOutput);
        let mut small = [0.0];
        let status = d.invoke(XfMethod::Calculate.code(), &[], &mut small);
        assert_eq!(status, XfStatus::IncreaseMemory);
        assert_eq!(small[0], 4.0);
        assert_eq!(d.output_span(XfMethod::Calculate.code()), 4);

        // Host grows the buffer to the requested size and retries.
        let mut grown = vec![0.0; 4];
        let status = d.invoke(XfMethod::Calculate.code(), &[], &mut grown);
        assert_eq!(status, XfStatus::Success);
        assert_eq!(grown, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn fatal_error_reports_message_address() {
        let mut d = Dispatcher::new(AlwaysFatal);
        let mut out = [0.0];
        let status = d.invoke(XfMethod::Calculate.code(), &[], &mut out);
        assert_eq!(status, XfStatus::FailureWithMessage);
        assert_ne!(out[0], 0.0);

        // The address in slot 0 points at the dispatcher-owned message.
        let ptr = out[0] as usize as *const std::os::raw::c_char;
        let msg = unsafe { std::ffi::CStr::from_ptr(ptr) };
        assert_eq!(msg.to_str().unwrap(), "input file missing");
    }

    #[test]
    fn spans_are_zero_outside_calculate() {
        let d = Dispatcher::new(Doubler::default());
        assert_eq!(d.header_span(XfMethod::Initialize.code()), 0);
        assert_eq!(d.header_span(XfMethod::Calculate.code()), 1);
        assert_eq!(d.input_span(XfMethod::Calculate.code(), &[0.0]), 1);
        assert_eq!(d.output_span(XfMethod::ReportVersion.code()), 1);
        assert_eq!(d.output_span(XfMethod::ReportArguments.code()), 2);
        assert_eq!(d.output_span(7), 0);
    }
}
