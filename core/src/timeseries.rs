use gsx_abi::TimeSeriesLayout;

/// Decode failures for a packed time-series payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TimeSeriesError {
    #[error("marker slot does not hold the time-series marker")]
    NotTimeSeries,

    #[error("sample count slot holds {0}, not a usable count")]
    BadCount(f64),

    #[error("buffer holds {actual} slots but the payload needs {expected}")]
    Truncated { expected: usize, actual: usize },
}

/// Borrowed view of a time-series payload packed into the flat input
/// buffer of one `Calculate` invocation.
///
/// The view never outlives the invocation; the host owns the buffer
/// and gives no guarantee its contents survive between calls.
#[derive(Debug, PartialEq)]
pub struct TimeSeriesPayload<'a> {
    tag: f64,
    times: &'a [f64],
    values: &'a [f64],
}

impl<'a> TimeSeriesPayload<'a> {
    /// Check the marker slot the way the host contract defines it:
    /// by integral value, since the marker travels through a double.
    pub fn detect(inputs: &[f64], layout: &TimeSeriesLayout) -> bool {
        inputs
            .get(layout.marker_slot)
            .is_some_and(|v| *v as i64 == layout.marker as i64)
    }

    /// Decode a payload from `inputs` per `layout`.
    pub fn decode(
        inputs: &'a [f64],
        layout: &TimeSeriesLayout,
    ) -> Result<TimeSeriesPayload<'a>, TimeSeriesError> {
        if !Self::detect(inputs, layout) {
            return Err(TimeSeriesError::NotTimeSeries);
        }
        let raw_count = inputs
            .get(layout.count_slot)
            .copied()
            .ok_or(TimeSeriesError::Truncated {
                expected: layout.header_len(),
                actual: inputs.len(),
            })?;
        let count = decode_count(raw_count).ok_or(TimeSeriesError::BadCount(raw_count))?;
        // A count can be finite yet absurd; checked math keeps a junk
        // slot from overflowing the extent computation.
        let expected = count
            .checked_mul(2)
            .and_then(|n| n.checked_add(layout.data_slot))
            .ok_or(TimeSeriesError::BadCount(raw_count))?;
        if inputs.len() < expected {
            return Err(TimeSeriesError::Truncated {
                expected,
                actual: inputs.len(),
            });
        }
        let times = &inputs[layout.data_slot..layout.data_slot + count];
        let values = &inputs[layout.data_slot + count..expected];
        let tag = inputs.get(layout.tag_slot).copied().unwrap_or(0.0);
        Ok(TimeSeriesPayload { tag, times, values })
    }

    /// Caller-chosen identifier carried in the tag slot.
    pub fn tag(&self) -> f64 {
        self.tag
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &'a [f64] {
        self.times
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// (time, value) pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}

/// Total input slots one invocation occupies: the declared scalar
/// count, or the packed extent when the header region carries the
/// time-series marker. Used by the export glue to size the raw input
/// slice before any payload decoding happens.
pub fn input_span(header: &[f64], layout: &TimeSeriesLayout, declared: usize) -> usize {
    if !TimeSeriesPayload::detect(header, layout) {
        return declared;
    }
    header
        .get(layout.count_slot)
        .copied()
        .and_then(decode_count)
        .and_then(|count| count.checked_mul(2))
        .and_then(|n| n.checked_add(layout.data_slot))
        .unwrap_or(declared)
}

fn decode_count(raw: f64) -> Option<usize> {
    if !raw.is_finite() || raw < 0.0 || raw.fract() != 0.0 {
        return None;
    }
    Some(raw as usize)
}
