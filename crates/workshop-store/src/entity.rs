//! # Entity Identity
//!
//! Every record a [`Repository`](crate::repository::Repository) manages carries
//! a [`Uuid`] that is assigned exactly once, at registration, and never changes
//! afterwards. Entities are otherwise plain value records.
//!
//! Implementors only have to expose the identifier and accept the one-time
//! assignment; the repository is the only caller of [`Entity::assign_id`].

use uuid::Uuid;

/// A domain record with a stable, unique identifier.
pub trait Entity {
    /// The identifier assigned at registration. Unregistered entities
    /// conventionally report [`Uuid::nil`].
    fn id(&self) -> Uuid;

    /// Stores the identifier generated by the repository.
    fn assign_id(&mut self, id: Uuid);
}
