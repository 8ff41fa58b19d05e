use std::fmt;

/// Stable handle to a node inside a `QuestionSequence` arena.
///
/// The generation distinguishes successive occupants of the same slot, so a
/// handle kept past removal of its node is rejected instead of aliasing the
/// node that reused the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    #[must_use]
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the arena slot index
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the slot generation this handle was issued for
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
