use crate::node::{Arena, NodeId, Transition};
use crate::source::{DataSource, StopTest};

/// How a simulated replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SimulateOutcome {
    /// The replay ran to a recorded conclusion (or the data source overran).
    Concluded,
    /// The replay diverged from every previously recorded path.
    PreviouslyUnseen,
}

/// Replay `data` against the tree rooted at `root`.
///
/// Walks draw-by-draw through each node's compressed chain, raising `PreviouslyUnseen` the
/// moment the replay disagrees with a recorded value or falls off the known tree, and otherwise
/// following `Branch` transitions until a `Conclusion` is reached (or the data source itself
/// signals `StopTest`, e.g. on overrun).
pub(crate) fn simulate(arena: &Arena, root: NodeId, data: &mut dyn DataSource) -> SimulateOutcome {
    let mut current = root;

    loop {
        let node = &arena[current];

        for i in 0..node.values.len() {
            let forced = if node.forced.contains(&i) {
                Some(node.values[i])
            } else {
                None
            };
            match data.draw_bits(node.bits[i], forced) {
                Err(StopTest) => return SimulateOutcome::Concluded,
                Ok(value) if value == node.values[i] => {}
                Ok(_) => return SimulateOutcome::PreviouslyUnseen,
            }
        }

        match &node.transition {
            Transition::Conclusion(conclusion) => {
                let StopTest = data.conclude_test(conclusion.status, conclusion.origin.clone());
                return SimulateOutcome::Concluded;
            }
            Transition::Unknown => return SimulateOutcome::PreviouslyUnseen,
            Transition::Branch { bits, children } => match data.draw_bits(*bits, None) {
                Err(StopTest) => return SimulateOutcome::Concluded,
                Ok(value) => match children.get(&value) {
                    Some(&child) => current = child,
                    None => return SimulateOutcome::PreviouslyUnseen,
                },
            },
        }
    }
}
