mod buffer;
mod random;

pub use buffer::BufferSource;
pub use random::RandomSource;

use crate::{Origin, Status};

/// Signal that a run has concluded — either because `conclude_test` was called, or because the
/// data source ran out of input. Caught by [`crate::simulate`], never surfaced past it.
#[derive(Debug, Clone, Copy)]
pub struct StopTest;

pub(crate) fn bytes_for_width(width: u8) -> usize {
    (width as usize + 7) / 8
}

pub(crate) fn mask_for_width(width: u8) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Append `value`'s big-endian encoding, truncated to `bytes_for_width(width)` bytes, to `out`.
pub(crate) fn write_value(out: &mut Vec<u8>, width: u8, value: u64) {
    let n = bytes_for_width(width);
    for i in (0..n).rev() {
        out.push((value >> (8 * i)) as u8);
    }
}

/// The contract the trie needs from whatever is producing a run's draws.
///
/// Implemented here by [`BufferSource`] (fixed byte buffer, for [`crate::Tree::rewrite`]) and
/// [`RandomSource`] (unbounded RNG-backed source, for [`crate::Tree::generate_novel_prefix`]).
/// A full property-testing engine's own data object (the one driving real, non-simulated test
/// runs) is expected to implement this too, though that type lives outside this crate.
pub trait DataSource {
    /// Draw an integer in `[0, 2^width)`. If `forced` is `Some`, that exact value is returned
    /// (a real implementation should not consume any backing input for a forced draw — the
    /// value came from the test, not from the source). Returns `Err(StopTest)` on overrun.
    fn draw_bits(&mut self, width: u8, forced: Option<u64>) -> Result<u64, StopTest>;

    /// Conclude the run with the given status and optional origin. Always signals `StopTest`.
    fn conclude_test(&mut self, status: Status, origin: Option<Origin>) -> StopTest;
}
