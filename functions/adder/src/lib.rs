//! Additive external function that delegates its arithmetic to the
//! embedded expression engine.
//!
//! The component itself never does arithmetic: it binds the two input
//! values into the engine's namespace, asks it to evaluate `a + b`,
//! and extracts the numeric result. An evaluation failure is logged as
//! one formatted diagnostic and the output falls back to 0.0; the host
//! only ever sees status codes.

use gsx_core::{ArgCounts, CalcError, ExternalFunction, OutputWriter};
use gsx_eval::Engine;
use gsx_helper::export_external_function;

pub const VERSION: f64 = 1.01;

#[derive(Debug, Default)]
pub struct Adder {
    // Lives exactly from Initialize to Cleanup.
    engine: Option<Engine>,
}

impl ExternalFunction for Adder {
    fn version(&self) -> f64 {
        VERSION
    }

    fn arg_counts(&self) -> ArgCounts {
        ArgCounts { inputs: 2, outputs: 1 }
    }

    fn initialize(&mut self) -> Result<(), CalcError> {
        self.engine = Some(Engine::new());
        Ok(())
    }

    fn calculate(&mut self, inputs: &[f64], out: &mut OutputWriter<'_>) -> Result<(), CalcError> {
        let a = inputs
            .first()
            .copied()
            .ok_or_else(|| CalcError::failed("missing input 0"))?;
        let b = inputs
            .get(1)
            .copied()
            .ok_or_else(|| CalcError::failed("missing input 1"))?;
        let engine = self
            .engine
            .as_mut()
            .ok_or_else(|| CalcError::failed("calculate before initialize"))?;

        let snippet = format!("a = {a}\nb = {b}\na + b");
        let sum = match engine.eval_f64(&snippet) {
            Ok(sum) => sum,
            Err(err) => {
                log::error!("evaluation failed: {}", err.diagnostic());
                0.0
            }
        };
        out.set(0, sum);
        Ok(())
    }

    fn cleanup(&mut self) {
        self.engine = None;
    }
}

export_external_function!(gsx_add, Adder);
