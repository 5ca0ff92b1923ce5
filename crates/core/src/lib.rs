//! `crewdesk-core` — shared domain building blocks.
//!
//! Identifiers and errors used by every other crate. No infrastructure concerns.

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{EventId, TeamId};
pub use value_object::ValueObject;
