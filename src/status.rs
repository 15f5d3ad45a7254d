use std::sync::Arc;

/// Outcome classification for one run of the test function.
///
/// `Overrun` is never recorded by the tree (see [`crate::Tree`] docs); the other three are the
/// only statuses a [`crate::Conclusion`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The data source ran out of bytes before the run could reach a conclusion.
    Overrun,
    /// The input was rejected (e.g. failed an `assume`).
    Invalid,
    /// The input was accepted and nothing interesting happened.
    Valid,
    /// The input triggered a failure.
    Interesting,
}

/// An opaque, equality-comparable token distinguishing different failure causes.
///
/// The trie never inspects an `Origin`'s contents; it only needs to tell two origins apart,
/// and to carry the label along for whatever reports it to a human later.
/// Two `INTERESTING` conclusions with different origins are distinct outcomes, and colliding on
/// the same draw path with a different origin is a [`crate::TreeError::InconsistentResults`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(Arc<str>);

impl Origin {
    /// Wrap an arbitrary label as an origin token.
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Origin(label.into())
    }

    /// The label this origin was constructed from.
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<T> From<T> for Origin
where
    T: Into<Arc<str>>,
{
    fn from(value: T) -> Self {
        Origin::new(value)
    }
}
