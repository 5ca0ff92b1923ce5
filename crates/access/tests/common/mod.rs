//! Shared fixtures for access-control integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use crewdesk_access::{AccessControl, AccessControlOptions, PermissionCatalog, PermissionDefinition};
use crewdesk_core::{EventId, TeamId};

/// Catalog used across the integration tests.
///
/// - `test.boolean`: plain boolean
/// - `test.crud`: CRUD-shaped
/// - `test.event`: boolean, needs an event
/// - `test.team`: boolean, needs a team
/// - `test.scoped`: CRUD-shaped, needs an event and a team
/// - `testgroup`: expands to `test.boolean` and `test.crud:read`
pub fn catalog() -> Arc<PermissionCatalog> {
    crewdesk_observability::init();

    let catalog = PermissionCatalog::builder()
        .permission("test.boolean", PermissionDefinition::boolean())
        .permission("test.crud", PermissionDefinition::crud())
        .permission("test.event", PermissionDefinition::boolean().requiring_event())
        .permission("test.team", PermissionDefinition::boolean().requiring_team())
        .permission(
            "test.scoped",
            PermissionDefinition::crud().requiring_event().requiring_team(),
        )
        .group("testgroup", ["test.boolean", "test.crud:read"])
        .build()
        .unwrap();

    Arc::new(catalog)
}

pub fn access(options: AccessControlOptions) -> AccessControl {
    AccessControl::new(catalog(), options).unwrap()
}

pub fn event(id: &str) -> EventId {
    EventId::new(id).unwrap()
}

pub fn team(id: &str) -> TeamId {
    TeamId::new(id).unwrap()
}
