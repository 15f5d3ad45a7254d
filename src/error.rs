use crate::Status;

/// The two ways a live recording can be found Flaky.
///
/// Both variants are fatal to the current search but not to the process: the caller is expected
/// to abandon the in-progress run and report the failure, not retry against the same tree.
///
/// `PreviouslyUnseen`, the simulator's internal "fell off the known tree" signal, is
/// deliberately not a variant here — it never crosses this crate's public API.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The live recording contradicted the tree's existing record in a way attributable to
    /// nondeterminism in the test's data *generation* (not its result).
    #[error("inconsistent data generation: {reason} (is data generation depending on external state?)")]
    InconsistentGeneration {
        /// Short, stable, machine-matchable description of which check failed.
        reason: &'static str,
    },

    /// A full replay reached the same terminal node but produced a different conclusion.
    #[error(
        "inconsistent test results: test case was {first:?} on first run but {second:?} on replay"
    )]
    InconsistentResults {
        /// The status recorded the first time this draw path concluded.
        first: Status,
        /// The status observed this time, replaying the same draw path.
        second: Status,
    },
}

impl TreeError {
    pub(crate) fn inconsistent_generation(reason: &'static str) -> Self {
        let err = TreeError::InconsistentGeneration { reason };
        tracing::error!(%err, "flaky test detected");
        err
    }

    pub(crate) fn inconsistent_results(first: Status, second: Status) -> Self {
        let err = TreeError::InconsistentResults { first, second };
        tracing::error!(%err, "flaky test detected");
        err
    }
}
