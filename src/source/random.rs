use rand::RngCore;

use crate::source::{mask_for_width, write_value, DataSource, StopTest};
use crate::{Origin, Status};

/// Draws bits from an RNG with unbounded length — it can never overrun.
///
/// Used internally by [`crate::Tree::generate_novel_prefix`]'s acceptance-sampler loop.
pub struct RandomSource<'a, R: RngCore> {
    rng: &'a mut R,
    output: Vec<u8>,
    status: Option<Status>,
    origin: Option<Origin>,
}

// Implemented by hand rather than derived: deriving `Debug` would add an implicit `R: Debug`
// bound, which nothing about the `RngCore` contract promises.
impl<R: RngCore> std::fmt::Debug for RandomSource<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource")
            .field("output", &self.output)
            .field("status", &self.status)
            .field("origin", &self.origin)
            .finish()
    }
}

impl<'a, R: RngCore> RandomSource<'a, R> {
    /// Create a source that draws from `rng`.
    pub fn new(rng: &'a mut R) -> Self {
        RandomSource {
            rng,
            output: Vec::new(),
            status: None,
            origin: None,
        }
    }

    /// The status this source concluded with, if any.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Consume this source, returning the bytes drawn so far.
    pub fn into_output(self) -> Vec<u8> {
        self.output
    }
}

impl<R: RngCore> DataSource for RandomSource<'_, R> {
    fn draw_bits(&mut self, width: u8, forced: Option<u64>) -> Result<u64, StopTest> {
        let value = match forced {
            Some(value) => value,
            None => self.rng.next_u64() & mask_for_width(width),
        };
        write_value(&mut self.output, width, value);
        Ok(value)
    }

    fn conclude_test(&mut self, status: Status, origin: Option<Origin>) -> StopTest {
        self.status = Some(status);
        self.origin = origin;
        StopTest
    }
}
