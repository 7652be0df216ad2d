//! Entity trait: records that carry an API-assigned identity.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Linear lookup of a record by identity.
///
/// Collaborator lists are small (one page of API results), so no index is kept.
pub fn find_by_id<'a, T: Entity>(records: &'a [T], id: &T::Id) -> Option<&'a T> {
    records.iter().find(|r| r.id() == id)
}
