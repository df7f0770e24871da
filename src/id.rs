//! Client-visible identifiers shared by the expression builder, the document
//! and the runtime.

use std::fmt;

/// Stable client-side identifier of a component instance (`s0`, `s1`, ...).
///
/// Allocated once per node by the [`Document`](crate::document::Document) and
/// never reused, so the client can always locate the DOM counterpart of a
/// node by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

impl InstanceId {
    /// The raw counter value.
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Unique client-side identifier of a reactive variable (`v1`, `v2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u64);

impl VariableId {
    /// The raw counter value.
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
