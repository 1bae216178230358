//! The exported symbol must never let a panic unwind into the host's
//! frame, and must stay callable after one has been absorbed.

use gsx_abi::{XfMethod, XfStatus};
use gsx_core::{ArgCounts, CalcError, ExternalFunction, OutputWriter};
use gsx_helper::export_external_function;

#[derive(Default)]
struct Panicker;

impl ExternalFunction for Panicker {
    fn version(&self) -> f64 {
        1.0
    }

    fn arg_counts(&self) -> ArgCounts {
        ArgCounts { inputs: 0, outputs: 1 }
    }

    fn calculate(&mut self, _inputs: &[f64], _out: &mut OutputWriter<'_>) -> Result<(), CalcError> {
        panic!("deliberate panic for boundary test");
    }
}

export_external_function!(panicking_function, Panicker);

#[test]
fn panic_becomes_failure_status() {
    unsafe {
        let mut status = i32::MIN;
        let mut out = [0.0];
        panicking_function(
            XfMethod::Calculate.code(),
            &mut status,
            std::ptr::null(),
            out.as_mut_ptr(),
        );
        assert_eq!(status, XfStatus::Failure.code());
    }
}

#[test]
fn boundary_survives_repeated_panics() {
    unsafe {
        let mut out = [0.0];
        for _ in 0..3 {
            let mut status = i32::MIN;
            panicking_function(
                XfMethod::Calculate.code(),
                &mut status,
                std::ptr::null(),
                out.as_mut_ptr(),
            );
            assert_eq!(status, XfStatus::Failure.code());
        }

        // Non-panicking methods still work on the same dispatcher.
        let mut status = i32::MIN;
        panicking_function(
            XfMethod::ReportVersion.code(),
            &mut status,
            std::ptr::null(),
            out.as_mut_ptr(),
        );
        assert_eq!(status, XfStatus::Success.code());
        assert_eq!(out[0], 1.0);
    }
}

#[test]
fn null_status_pointer_is_tolerated() {
    unsafe {
        let mut out = [0.0];
        panicking_function(
            XfMethod::ReportVersion.code(),
            std::ptr::null_mut(),
            std::ptr::null(),
            out.as_mut_ptr(),
        );
        assert_eq!(out[0], 1.0);
    }
}
