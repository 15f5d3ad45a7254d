use crate::source::{bytes_for_width, mask_for_width, write_value, DataSource, StopTest};
use crate::{Origin, Status};

/// Replays a fixed byte buffer as a sequence of bit draws.
///
/// Used internally by [`crate::Tree::rewrite`] to predict the outcome of a candidate buffer
/// without invoking the real test function. Forced draws are injected directly — no bytes are
/// consumed from the input for them — matching how a forced draw in the real engine is a value
/// the test chose, not one a data source produced.
#[derive(Debug)]
pub struct BufferSource<'a> {
    input: &'a [u8],
    pos: usize,
    output: Vec<u8>,
    status: Option<Status>,
    origin: Option<Origin>,
}

impl<'a> BufferSource<'a> {
    /// Create a source that will replay `input`, consuming bytes from the front.
    pub fn new(input: &'a [u8]) -> Self {
        BufferSource {
            input,
            pos: 0,
            output: Vec::new(),
            status: None,
            origin: None,
        }
    }

    /// The status this source concluded with, if any (`None` until `conclude_test` runs or the
    /// input overruns).
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// The origin recorded alongside `status()`, if any.
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// Consume this source, returning the bytes actually produced (the "rewritten buffer").
    pub fn into_output(self) -> Vec<u8> {
        self.output
    }
}

impl DataSource for BufferSource<'_> {
    fn draw_bits(&mut self, width: u8, forced: Option<u64>) -> Result<u64, StopTest> {
        if let Some(value) = forced {
            write_value(&mut self.output, width, value);
            return Ok(value);
        }

        let n = bytes_for_width(width);
        if self.pos + n > self.input.len() {
            self.status = Some(Status::Overrun);
            self.origin = None;
            return Err(StopTest);
        }

        let mut value: u64 = 0;
        for &byte in &self.input[self.pos..self.pos + n] {
            value = (value << 8) | byte as u64;
        }
        self.pos += n;
        value &= mask_for_width(width);

        write_value(&mut self.output, width, value);
        Ok(value)
    }

    fn conclude_test(&mut self, status: Status, origin: Option<Origin>) -> StopTest {
        self.status = Some(status);
        self.origin = origin;
        StopTest
    }
}
