use crate::node::{Node, NodeId, Transition};
use crate::{Origin, Status, Tree, TreeError};

/// Mutates a [`Tree`] as a real test run proceeds, splitting nodes on divergence and finalising
/// on conclusion.
///
/// Obtained via [`Tree::new_observer`]. The two events below are exactly the `DataObserver`
/// callbacks the outer engine is expected to fire as the real (non-simulated) data source
/// produces draws and eventually concludes.
#[derive(Debug)]
pub struct Observer<'a> {
    tree: &'a mut Tree,
    current: NodeId,
    index: usize,
    trail: Vec<NodeId>,
}

impl<'a> Observer<'a> {
    pub(crate) fn new(tree: &'a mut Tree) -> Self {
        let root = tree.root();
        Observer {
            tree,
            current: root,
            index: 0,
            trail: vec![root],
        }
    }

    /// Record one `draw_bits(n_bits)` event that produced `value`, optionally forced.
    pub fn draw_bits(&mut self, n_bits: u8, forced: bool, value: u64) -> Result<(), TreeError> {
        let i = self.index;
        self.index += 1;
        let node = self.current;

        let chain_len = self.tree.arena[node].bits.len();
        if i < chain_len {
            self.draw_in_chain(node, i, n_bits, forced, value)?;
        } else {
            self.draw_past_chain(node, n_bits, forced, value)?;
        }

        if self.trail.last() != Some(&self.current) {
            self.trail.push(self.current);
        }
        Ok(())
    }

    fn draw_in_chain(
        &mut self,
        node: NodeId,
        i: usize,
        n_bits: u8,
        forced: bool,
        value: u64,
    ) -> Result<(), TreeError> {
        let (expected_bits, expected_value, is_forced) = {
            let n = &self.tree.arena[node];
            (n.bits[i], n.values[i], n.forced.contains(&i))
        };

        if n_bits != expected_bits {
            return Err(TreeError::inconsistent_generation(
                "draw width disagreed with a previously recorded draw at this position",
            ));
        }
        if forced && !is_forced {
            return Err(TreeError::inconsistent_generation(
                "draw was forced this time but was free on a previous recording",
            ));
        }

        if value != expected_value {
            if is_forced {
                return Err(TreeError::inconsistent_generation(
                    "a draw that was previously forced produced a different value this time",
                ));
            }
            // `split_at` truncates `node` in place and moves its old tail (keyed under
            // `expected_value`) into a new sibling; it returns that sibling's id, which we
            // don't need here — we're about to insert a second, empty sibling under `value`.
            let _previously_recorded_sibling = self.tree.arena.split_at(node, i);
            let new_child = self.tree.arena.push(Node::empty());
            match &mut self.tree.arena[node].transition {
                Transition::Branch { children, .. } => {
                    children.insert(value, new_child);
                }
                _ => unreachable!("split_at always leaves a Branch on the truncated node"),
            }
            self.current = new_child;
            self.index = 0;
        }

        Ok(())
    }

    fn draw_past_chain(
        &mut self,
        node: NodeId,
        n_bits: u8,
        forced: bool,
        value: u64,
    ) -> Result<(), TreeError> {
        enum Action {
            Append,
            Branch { width: u8 },
            Conclusion,
        }

        let action = match &self.tree.arena[node].transition {
            Transition::Unknown => Action::Append,
            Transition::Conclusion(_) => Action::Conclusion,
            Transition::Branch { bits, .. } => Action::Branch { width: *bits },
        };

        match action {
            Action::Append => {
                let i = self.tree.arena[node].bits.len();
                let n = &mut self.tree.arena[node];
                n.bits.push(n_bits);
                n.values.push(value);
                if forced {
                    n.forced.insert(i);
                }
            }
            Action::Conclusion => {
                return Err(TreeError::inconsistent_generation(
                    "drew past a previously recorded conclusion",
                ));
            }
            Action::Branch { width } => {
                if n_bits != width {
                    return Err(TreeError::inconsistent_generation(
                        "branch draw width disagreed with a previously recorded branch",
                    ));
                }
                let existing = match &self.tree.arena[node].transition {
                    Transition::Branch { children, .. } => children.get(&value).copied(),
                    _ => unreachable!(),
                };
                let child = match existing {
                    Some(child) => child,
                    None => {
                        let child = self.tree.arena.push(Node::empty());
                        match &mut self.tree.arena[node].transition {
                            Transition::Branch { children, .. } => {
                                children.insert(value, child);
                            }
                            _ => unreachable!(),
                        }
                        child
                    }
                };
                self.current = child;
                self.index = 0;
            }
        }

        Ok(())
    }

    /// Record that the run concluded with `status` (and, for `INTERESTING` results, an
    /// `origin`). `OVERRUN` is never recorded.
    pub fn conclude_test(
        &mut self,
        status: Status,
        origin: Option<Origin>,
    ) -> Result<(), TreeError> {
        if status == Status::Overrun {
            return Ok(());
        }

        let node = self.current;
        let i = self.index;
        let values_len = self.tree.arena[node].values.len();
        let is_branch = matches!(self.tree.arena[node].transition, Transition::Branch { .. });
        if i < values_len || is_branch {
            return Err(TreeError::inconsistent_generation(
                "concluded before the full recorded draw chain at this node was replayed",
            ));
        }

        let new_conclusion = self.tree.intern.intern(status, origin);

        match &self.tree.arena[node].transition {
            Transition::Conclusion(existing) => {
                if !crate::conclusion::conclusion_eq(existing, &new_conclusion) {
                    let first = existing.status;
                    return Err(TreeError::inconsistent_results(first, status));
                }
            }
            _ => {
                self.tree.arena[node].transition = Transition::Conclusion(new_conclusion);
            }
        }

        for &ancestor in self.trail.iter().rev() {
            if !self.tree.arena.check_exhausted(ancestor) {
                break;
            }
        }
        if self.tree.is_exhausted() {
            tracing::info!("execution tree fully exhausted");
        }

        Ok(())
    }
}
