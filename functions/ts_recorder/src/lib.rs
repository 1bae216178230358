//! External function that records a time-series definition to a file.
//!
//! When a `Calculate` input carries the packed time-series marker, the
//! payload is decoded and written to one tab-separated text file per
//! invocation, named from the tag in input slot 0. Scalar inputs pass
//! through without writing anything. Either way the component imports
//! a fixed value back into the host, since every external function
//! must produce at least one output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use gsx_abi::TimeSeriesLayout;
use gsx_config::{load_recorder_settings, RecorderSettings};
use gsx_core::{input_span, ArgCounts, CalcError, ExternalFunction, OutputWriter, TimeSeriesPayload};
use gsx_helper::export_external_function;

pub const VERSION: f64 = 1.01;

/// Value imported into the host after every calculate call.
pub const IMPORT_VALUE: f64 = 10.0;

const LAYOUT: TimeSeriesLayout = TimeSeriesLayout::V1;

#[derive(Debug, Default)]
pub struct TimeSeriesRecorder {
    // Loaded on Initialize, dropped on Cleanup.
    settings: Option<RecorderSettings>,
}

impl TimeSeriesRecorder {
    /// Build a recorder with fixed settings, bypassing the config
    /// file lookup. Settings injected this way survive Initialize.
    pub fn with_settings(settings: RecorderSettings) -> Self {
        TimeSeriesRecorder {
            settings: Some(settings),
        }
    }

    fn write_series(&self, series: &TimeSeriesPayload<'_>) -> Result<PathBuf, CalcError> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| CalcError::failed("calculate before initialize"))?;
        // The tag travels through a double; the original convention
        // truncates it to an integer for the file name.
        let name = format!("{}{}.txt", settings.file_prefix, series.tag() as i64);
        let path = settings.output_dir.join(name);

        let file = File::create(&path)
            .map_err(|e| CalcError::fatal(format!("cannot create {}: {e}", path.display())))?;
        let mut writer = BufWriter::new(file);
        for (time, value) in series.iter() {
            writeln!(writer, "{time}\t{value}")
                .map_err(|e| CalcError::fatal(format!("cannot write {}: {e}", path.display())))?;
        }
        writer
            .flush()
            .map_err(|e| CalcError::fatal(format!("cannot write {}: {e}", path.display())))?;
        Ok(path)
    }
}

impl ExternalFunction for TimeSeriesRecorder {
    fn version(&self) -> f64 {
        VERSION
    }

    fn arg_counts(&self) -> ArgCounts {
        ArgCounts { inputs: 2, outputs: 1 }
    }

    // A time-series definition occupies more input slots than the
    // declared scalar count; the header region tells us how many.
    fn header_span(&self) -> usize {
        LAYOUT.header_len()
    }

    fn input_span(&self, header: &[f64]) -> usize {
        input_span(header, &LAYOUT, self.arg_counts().inputs)
    }

    fn initialize(&mut self) -> Result<(), CalcError> {
        if self.settings.is_none() {
            let settings = load_recorder_settings()
                .map_err(|e| CalcError::fatal(format!("recorder settings: {e}")))?;
            self.settings = Some(settings);
        }
        Ok(())
    }

    fn calculate(&mut self, inputs: &[f64], out: &mut OutputWriter<'_>) -> Result<(), CalcError> {
        if TimeSeriesPayload::detect(inputs, &LAYOUT) {
            let series = TimeSeriesPayload::decode(inputs, &LAYOUT)?;
            let path = self.write_series(&series)?;
            log::info!("recorded {} samples to {}", series.len(), path.display());
        }
        out.set(0, IMPORT_VALUE);
        Ok(())
    }

    fn cleanup(&mut self) {
        self.settings = None;
    }
}

export_external_function!(gsx_timeseries_record, TimeSeriesRecorder);
