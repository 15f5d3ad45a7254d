use rand::RngCore;

use crate::conclusion::Interner;
use crate::node::{Arena, NodeId};
use crate::observer::Observer;
use crate::simulate::{simulate, SimulateOutcome};
use crate::source::{BufferSource, RandomSource};
use crate::Status;

const DEFAULT_NOVEL_PREFIX_LOG_INTERVAL: u64 = 10_000;

/// Environment-driven knobs for a [`Tree`].
///
/// Grounded on `tokio-rs-loom`'s `model::Builder`: defaults baked in, overridable from the
/// environment at construction time, with a misconfigured value treated as a programmer/
/// operator error (an immediate `expect` panic) rather than a recoverable runtime condition.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// How many rejected attempts `generate_novel_prefix`'s acceptance sampler tolerates before
    /// emitting a `tracing::warn!` progress line. Overridable via
    /// `DRAWTREE_NOVEL_PREFIX_LOG_INTERVAL`.
    pub novel_prefix_log_interval: u64,
}

impl Config {
    /// Read configuration from the environment, falling back to built-in defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup rather than the process environment.
    ///
    /// `from_env` is just `Self::from_lookup` closed over `std::env::var`; exposing the lookup
    /// itself lets a caller (or a test) exercise the same fallback/parse logic without mutating
    /// process-wide environment state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let novel_prefix_log_interval = lookup("DRAWTREE_NOVEL_PREFIX_LOG_INTERVAL")
            .map(|v| {
                v.parse()
                    .expect("invalid value for `DRAWTREE_NOVEL_PREFIX_LOG_INTERVAL`")
            })
            .unwrap_or(DEFAULT_NOVEL_PREFIX_LOG_INTERVAL);

        Config {
            novel_prefix_log_interval,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            novel_prefix_log_interval: DEFAULT_NOVEL_PREFIX_LOG_INTERVAL,
        }
    }
}

/// Tracks the tree structure of every recorded test-function execution, keyed by the sequence
/// of primitive bit draws that produced it.
///
/// Owned by a single search loop for its entire lifetime; see the crate-level docs for the
/// single-threaded, no-eviction resource model.
#[derive(Debug)]
pub struct Tree {
    pub(crate) arena: Arena,
    pub(crate) intern: Interner,
    config: Config,
}

impl Tree {
    /// Create an empty tree with default configuration (see [`Config::from_env`]).
    pub fn new() -> Self {
        Tree::with_config(Config::from_env())
    }

    /// Create an empty tree with explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Tree {
            arena: Arena::new(),
            intern: Interner::new(),
            config,
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        Arena::root()
    }

    /// Returns `true` if every reachable leaf of the tree is a concluded, fully-forced path —
    /// no novel extension of any recorded prefix is possible. Constant time.
    pub fn is_exhausted(&self) -> bool {
        self.arena[self.root()].exhausted
    }

    /// Begin recording a new execution, starting at the root.
    pub fn new_observer(&mut self) -> Observer<'_> {
        Observer::new(self)
    }

    /// Replay `buffer` through previously recorded knowledge, predicting its outcome without
    /// invoking the real test function.
    ///
    /// Returns the bytes actually consumed (which may differ from `buffer` when forced draws
    /// rewrite input bytes) and the status the tree predicts, or `None` if the buffer diverges
    /// from every recorded execution before reaching a conclusion.
    pub fn rewrite(&self, buffer: &[u8]) -> (Vec<u8>, Option<Status>) {
        let mut data = BufferSource::new(buffer);
        let outcome = simulate(&self.arena, self.root(), &mut data);
        let status = match outcome {
            SimulateOutcome::Concluded => Some(data.status().unwrap_or(Status::Overrun)),
            SimulateOutcome::PreviouslyUnseen => None,
        };
        (data.into_output(), status)
    }

    /// Generate a short bit-string guaranteed not to replay any previously seen execution.
    ///
    /// # Panics
    ///
    /// Panics if the tree `is_exhausted()`: there is nothing novel left to generate.
    pub fn generate_novel_prefix<R: RngCore>(&self, rng: &mut R) -> Vec<u8> {
        assert!(
            !self.is_exhausted(),
            "generate_novel_prefix called on an exhausted tree"
        );

        let mut attempts: u64 = 0;
        loop {
            let mut data = RandomSource::new(rng);
            match simulate(&self.arena, self.root(), &mut data) {
                SimulateOutcome::PreviouslyUnseen => return data.into_output(),
                SimulateOutcome::Concluded => {
                    attempts += 1;
                    if self.config.novel_prefix_log_interval > 0
                        && attempts % self.config.novel_prefix_log_interval == 0
                    {
                        tracing::warn!(
                            attempts,
                            "generate_novel_prefix has rejected many consecutive attempts"
                        );
                    }
                }
            }
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}
