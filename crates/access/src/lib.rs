//! `crewdesk-access` — hierarchical, scope-aware permission evaluation.
//!
//! Permissions are dotted paths (`team.senior.requests`), optionally narrowed
//! to a CRUD operation (`team.senior.requests:update`). A principal holds
//! grants and revokes; a grant or revoke on a path also governs every path
//! below it unless a more specific rule says otherwise. Rules and queries can
//! be scoped to an event and/or a team.
//!
//! The crate is pure: no IO, no shared mutable state. The permission catalog
//! is built once at startup and shared; an [`AccessControl`] is built per
//! principal per request.

pub mod access;
pub mod catalog;
pub mod error;
pub mod explain;
pub mod operation;
pub mod path;
mod resolve;
pub mod rule;
pub mod scope;
pub mod verdict;

pub use access::{AccessControl, AccessControlOptions, Request};
pub use catalog::{CatalogBuilder, CatalogDocument, CatalogError, PermissionCatalog, PermissionDefinition, PermissionKind};
pub use error::{AccessDeniedError, AccessError, MissingScope, ScopeRequiredError};
pub use explain::Explanation;
pub use operation::Operation;
pub use path::{is_valid_permission_path, PermissionPath};
pub use rule::{Polarity, Rule, RuleInput, ScopedPermission};
pub use scope::{Scope, Selector, ANY_EVENT, ANY_TEAM, WILDCARD};
pub use verdict::{Decision, Verdict, VerdictScope};
