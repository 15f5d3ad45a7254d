#![deny(missing_debug_implementations, rust_2018_idioms)]

//! `drawtree` is the execution trie a property-based testing engine uses to remember every
//! prior invocation of a test function in terms of the primitive random draws that produced it.
//!
//! A test function, run by the outer engine, makes a sequence of `draw_bits(n)` calls and
//! eventually concludes with a [`Status`]. This crate's [`Tree`] remembers that sequence as a
//! variant Patricia trie: a long unbranching run of draws is compressed into a single node, and
//! a node only splits into a [`Status`]-carrying branch the moment two recorded runs disagree.
//!
//! Three operations drive a search loop built on top of this crate:
//!
//! - **Record** an execution as it happens, via [`Tree::new_observer`] and the
//!   [`Observer`] it returns. Detects contradictions with previously recorded executions
//!   ([`TreeError`]) — the property-testing analogue of a flaky test.
//! - **Simulate** a candidate byte buffer against everything already recorded, via
//!   [`Tree::rewrite`], to predict its outcome without invoking the real test function.
//! - **Generate a novel prefix**, via [`Tree::generate_novel_prefix`]: a short bit-string
//!   guaranteed not to replay any previously seen execution, used to steer future exploration
//!   away from ground already covered.
//!
//! Everything else a real engine needs — shrinking, the byte-level data object that drives a
//! *real* (non-simulated) run, the invalid/interesting/valid/overrun classification policy — is
//! an external collaborator. This crate only consumes the small [`DataSource`] contract and the
//! two observer events; it has no opinion on how the runner drives tests.
//!
//! # Example
//!
//! ```
//! use drawtree::{Status, Tree};
//!
//! let mut tree = Tree::new();
//!
//! // Record two runs of a test that draws two 8-bit values.
//! for buf in [[0u8, 0], [0u8, 1]] {
//!     let mut observer = tree.new_observer();
//!     for &byte in &buf {
//!         observer.draw_bits(8, false, byte as u64).unwrap();
//!     }
//!     observer.conclude_test(Status::Valid, None).unwrap();
//! }
//!
//! // The tree now predicts both recorded inputs without re-running the test.
//! assert_eq!(tree.rewrite(&[0, 0]).1, Some(Status::Valid));
//! assert_eq!(tree.rewrite(&[0, 1]).1, Some(Status::Valid));
//! // A third, never-seen input is still unknown.
//! assert_eq!(tree.rewrite(&[0, 2]).1, None);
//! ```

mod conclusion;
mod error;
mod node;
mod observer;
mod simulate;
mod source;
mod status;
mod tree;

pub use error::TreeError;
pub use observer::Observer;
pub use source::{BufferSource, DataSource, RandomSource, StopTest};
pub use status::{Origin, Status};
pub use tree::{Config, Tree};
