use std::collections::HashMap;
use std::rc::Rc;

use crate::{Origin, Status};

/// The terminal status of a run (excluding `OVERRUN`), shared across every node it occurs at.
///
/// Two conclusions compare equal iff they are the same interned handle: see [`Conclusion::eq`].
#[derive(Debug)]
pub struct ConclusionData {
    pub(crate) status: Status,
    pub(crate) origin: Option<Origin>,
}

/// A cheap, cloneable, reference-comparable handle to an interned `(status, origin)` pair.
pub type Conclusion = Rc<ConclusionData>;

/// Returns true iff `a` and `b` are the same interned conclusion.
pub(crate) fn conclusion_eq(a: &Conclusion, b: &Conclusion) -> bool {
    Rc::ptr_eq(a, b)
}

/// Tree-scoped intern table for `(status, origin)` pairs.
///
/// A process-wide table would need a `Mutex` for no benefit here, since this crate's non-goals
/// exclude sharing a tree's knowledge across threads or trees; see DESIGN.md.
#[derive(Debug, Default)]
pub(crate) struct Interner {
    table: HashMap<(Status, Option<Origin>), Conclusion>,
}

impl Interner {
    pub(crate) fn new() -> Self {
        Interner {
            table: HashMap::new(),
        }
    }

    pub(crate) fn intern(&mut self, status: Status, origin: Option<Origin>) -> Conclusion {
        self.table
            .entry((status, origin.clone()))
            .or_insert_with(|| Rc::new(ConclusionData { status, origin }))
            .clone()
    }
}
