//! Manual smoke driver: walks both exported external functions through
//! the host lifecycle in-process and prints what the host would see.
//!
//! Run with `RUST_LOG=debug` to watch the dispatcher logging.

use anyhow::{bail, Result};
use gsx_abi::{RawExternalFn, TimeSeriesLayout, XfMethod, XfStatus};

/// Drive one raw invocation the way the host does.
fn call(function: RawExternalFn, method: XfMethod, inputs: &[f64], outputs: &mut [f64]) -> i32 {
    let mut status = i32::MIN;
    unsafe {
        function(
            method.code(),
            &mut status,
            inputs.as_ptr(),
            outputs.as_mut_ptr(),
        );
    }
    status
}

fn expect(status: i32, context: &str) -> Result<()> {
    if status != XfStatus::Success.code() {
        bail!("{context}: status {status}");
    }
    Ok(())
}

fn drive_adder() -> Result<()> {
    println!("== adder ==");
    let mut out = [0.0, 0.0];

    expect(call(adder::gsx_add, XfMethod::ReportVersion, &[], &mut out), "version")?;
    println!("version: {}", out[0]);

    expect(call(adder::gsx_add, XfMethod::ReportArguments, &[], &mut out), "arguments")?;
    println!("arguments: {} in, {} out", out[0], out[1]);

    expect(call(adder::gsx_add, XfMethod::Initialize, &[], &mut out), "initialize")?;

    expect(call(adder::gsx_add, XfMethod::Calculate, &[10.0, 20.0], &mut out), "calculate")?;
    println!("10 + 20 = {}", out[0]);
    if out[0] != 30.0 {
        bail!("adder produced {} instead of 30", out[0]);
    }

    expect(call(adder::gsx_add, XfMethod::Cleanup, &[], &mut out), "cleanup")?;
    Ok(())
}

fn drive_recorder() -> Result<()> {
    println!("== time-series recorder ==");
    let layout = TimeSeriesLayout::V1;
    let pairs = [(0.0, 1.0), (1.0, 4.0), (2.0, 9.0)];

    let mut inputs = vec![0.0; layout.data_slot + 2 * pairs.len()];
    inputs[layout.tag_slot] = 7.0;
    inputs[layout.marker_slot] = layout.marker;
    inputs[layout.count_slot] = pairs.len() as f64;
    for (i, (t, v)) in pairs.iter().enumerate() {
        inputs[layout.data_slot + i] = *t;
        inputs[layout.data_slot + pairs.len() + i] = *v;
    }

    let mut out = [0.0];
    let record = ts_recorder::gsx_timeseries_record;
    expect(call(record, XfMethod::Initialize, &[], &mut out), "initialize")?;
    expect(call(record, XfMethod::Calculate, &inputs, &mut out), "calculate")?;
    println!("imported value: {}", out[0]);
    println!("wrote {} samples (see timeseries_7.txt)", pairs.len());
    expect(call(record, XfMethod::Cleanup, &[], &mut out), "cleanup")?;
    Ok(())
}

fn show_diagnostics() {
    println!("== evaluation diagnostics ==");
    let mut engine = gsx_eval::Engine::new();
    if let Err(err) = engine.eval_f64("undefined_name + 1") {
        println!("{}", err.diagnostic());
    }
    if let Err(err) = engine.exec("a = 1\nb = 1 / 0") {
        println!("{}", err.diagnostic());
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::debug!("smoke driver starting");
    drive_adder()?;
    drive_recorder()?;
    show_diagnostics();
    println!("smoke test passed");
    Ok(())
}
