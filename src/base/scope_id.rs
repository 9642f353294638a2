//! Scope identifiers.

/// Index of a scope in its arena.
///
/// Ids are only meaningful within the analysis pass that allocated them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
