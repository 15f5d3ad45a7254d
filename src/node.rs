use std::collections::{BTreeSet, HashMap};
use std::ops::{Index, IndexMut};

use crate::conclusion::Conclusion;

/// Opaque handle to a node living in a [`Arena`].
///
/// Never invalidated and never reused: nodes are appended but never removed, so a tree only
/// ever grows while it lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

/// What follows the compressed chain of draws stored inline on a [`Node`].
#[derive(Debug)]
pub(crate) enum Transition {
    /// The tail has not yet been observed.
    Unknown,
    /// The next draw has width `bits`; `children` maps observed draw values to child nodes.
    Branch {
        bits: u8,
        children: HashMap<u64, NodeId>,
    },
    /// This node terminates the run with a non-`OVERRUN` status.
    Conclusion(Conclusion),
}

/// One trie node: a compressed run of draws that has only ever been observed with a single
/// value sequence, plus whatever follows it.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) bits: Vec<u8>,
    pub(crate) values: Vec<u64>,
    pub(crate) forced: BTreeSet<usize>,
    pub(crate) transition: Transition,
    pub(crate) exhausted: bool,
}

impl Node {
    pub(crate) fn empty() -> Self {
        Node {
            bits: Vec::new(),
            values: Vec::new(),
            forced: BTreeSet::new(),
            transition: Transition::Unknown,
            exhausted: false,
        }
    }

    /// Invariant 6, evaluated fresh from this node's own fields plus (for a `Branch`) whatever
    /// is already cached on its children. Does not mutate `self`; callers decide whether to
    /// cache the result.
    fn satisfies_exhaustion(&self, arena: &Arena) -> bool {
        if self.forced.len() != self.values.len() {
            return false;
        }
        match &self.transition {
            Transition::Unknown => false,
            Transition::Conclusion(_) => true,
            Transition::Branch { bits, children } => {
                let capacity: u128 = 1u128 << (*bits as u32);
                if children.len() as u128 != capacity {
                    return false;
                }
                children.values().all(|&child| arena[child].exhausted)
            }
        }
    }
}

/// Append-only storage for every node in a tree, addressed by [`NodeId`].
///
/// Grounded on `tokio-rs-loom`'s `rt::object::Set`: a `Vec` plus an opaque index standing in
/// for a direct pointer. Unlike loom's store, which truncates and reuses slots across explored
/// permutations, this arena only ever grows — the trie it backs never replays over itself.
#[derive(Debug)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Arena { nodes: vec![Node::empty()] }
    }

    pub(crate) fn root() -> NodeId {
        NodeId(0)
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Idempotent. Returns the (possibly just-updated) exhausted flag.
    pub(crate) fn check_exhausted(&mut self, id: NodeId) -> bool {
        if self.nodes[id.0].exhausted {
            return true;
        }
        let now_exhausted = self.nodes[id.0].satisfies_exhaustion(self);
        if now_exhausted {
            self.nodes[id.0].exhausted = true;
        }
        now_exhausted
    }

    /// Splits the node at `id` so that the draw at index `i` becomes the last one in its
    /// compressed chain, pushing everything after it into a fresh sibling node.
    ///
    /// Panics (an "inconsistent generation" programmer-visible precondition failure) if `i` is
    /// a forced index or out of range for the node's current `values`; callers are expected to
    /// have already checked `forced` membership where a recoverable `TreeError` is wanted (see
    /// `Observer::draw_bits`, which only calls this once it knows `value != values[i]` and `i`
    /// is not forced).
    pub(crate) fn split_at(&mut self, id: NodeId, i: usize) -> NodeId {
        let node = &mut self.nodes[id.0];
        assert!(i < node.values.len(), "split_at index out of range");
        assert!(!node.forced.contains(&i), "split_at on a forced index");

        let n_bits = node.bits[i];
        let key = node.values[i];

        let child_bits = node.bits.split_off(i + 1);
        let child_values = node.values.split_off(i + 1);
        node.bits.truncate(i);
        node.values.truncate(i);

        let child_forced: BTreeSet<usize> = node
            .forced
            .iter()
            .filter(|&&j| j > i)
            .map(|&j| j - i - 1)
            .collect();
        node.forced.retain(|&j| j < i);

        let child_transition = std::mem::replace(&mut node.transition, Transition::Unknown);

        let child = Node {
            bits: child_bits,
            values: child_values,
            forced: child_forced,
            transition: child_transition,
            exhausted: false,
        };
        let child_exhausted = child.satisfies_exhaustion(self);
        let child_id = self.push(child);
        self.nodes[child_id.0].exhausted = child_exhausted;

        let mut children = HashMap::with_capacity(1);
        children.insert(key, child_id);
        self.nodes[id.0].transition = Transition::Branch { bits: n_bits, children };

        child_id
    }
}

impl Index<NodeId> for Arena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Arena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}
