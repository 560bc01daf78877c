//! Entity traits: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier, backed by the backend's integer key.
    type Id: Copy
        + Eq
        + core::hash::Hash
        + core::fmt::Debug
        + core::fmt::Display
        + From<u64>
        + Into<u64>
        + Send
        + Sync
        + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// A persisted record whose identity is assigned by the backend.
///
/// `Draft` is the record as submitted, before it has an identity. Backends
/// assign the integer key and call [`Record::from_draft`].
pub trait Record: Entity + Clone + Send + Sync + 'static {
    type Draft: Clone + Send + Sync + 'static;

    /// Entity name used in errors and logs (e.g. `"inventory lot"`).
    const KIND: &'static str;

    /// Materialize a draft under the identity chosen by the backend.
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self;
}
