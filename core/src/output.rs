/// Write-only positional view over the host's output buffer.
///
/// Writes past the end of the buffer are tallied instead of performed;
/// after `calculate` returns, a `required()` larger than `capacity()`
/// triggers the host's grow-and-retry protocol rather than an
/// out-of-bounds write.
pub struct OutputWriter<'a> {
    buf: &'a mut [f64],
    required: usize,
}

impl<'a> OutputWriter<'a> {
    pub fn new(buf: &'a mut [f64]) -> Self {
        OutputWriter { buf, required: 0 }
    }

    /// Write `value` to output slot `idx` if the host allocated it;
    /// either way, record that the slot is needed.
    pub fn set(&mut self, idx: usize, value: f64) {
        if idx + 1 > self.required {
            self.required = idx + 1;
        }
        if let Some(slot) = self.buf.get_mut(idx) {
            *slot = value;
        }
    }

    /// Slots the host actually allocated for this invocation.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Highest slot count any `set` call has asked for so far.
    pub fn required(&self) -> usize {
        self.required
    }

    /// True when the invocation needs more slots than the host gave.
    pub fn needs_resize(&self) -> bool {
        self.required > self.buf.len()
    }
}
