//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// The storage gateway is keyed by `Id`, so every persisted record type implements this.
pub trait Entity: Clone {
    /// Strongly-typed entity identifier.
    type Id: Clone + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Human-readable entity kind, used in error messages ("customer", "order", ...).
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
