//! Value object trait: equality by value, not identity.

/// Marker trait for value objects: immutable and compared by value.
pub trait ValueObject: Clone + PartialEq + Eq + core::fmt::Debug {}
