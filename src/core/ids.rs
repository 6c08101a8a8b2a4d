use std::collections::HashSet;

pub type NodeId = u32;

/// Upper bound on the number of entities a graph can address with [`NodeId`].
pub const MAX_ENTITIES: u64 = 1 << NodeId::BITS;

/// Tracks which entity ids have already been declared.
#[derive(Debug, Default)]
pub struct SeenEntities {
    seen: HashSet<NodeId>,
}

impl SeenEntities {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Returns `true` the first time `id` is observed.
    pub fn first_sighting(&mut self, id: NodeId) -> bool {
        self.seen.insert(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.seen.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
