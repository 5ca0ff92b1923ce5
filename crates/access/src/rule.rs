//! Grant/revoke rules and their normalization from caller input.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crewdesk_core::{EventId, TeamId};

use crate::{AccessError, Operation, PermissionCatalog, PermissionKind, PermissionPath, Scope, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Grant,
    Revoke,
}

/// A normalized, immutable grant or revoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub path: PermissionPath,
    pub polarity: Polarity,
    pub scope: Scope,
}

impl Rule {
    pub fn new(path: PermissionPath, polarity: Polarity, scope: Scope) -> Self {
        Self {
            path,
            polarity,
            scope,
        }
    }

    /// Segment count of the rule's path.
    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    pub fn operation(&self) -> Option<Operation> {
        self.path.operation()
    }

    pub fn is_operation_level(&self) -> bool {
        self.path.operation().is_some()
    }
}

/// A permission record with an optional scope, as supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedPermission {
    pub permission: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Selector<EventId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Selector<TeamId>>,
}

impl ScopedPermission {
    pub fn new(permission: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
            event: None,
            team: None,
        }
    }

    pub fn event(mut self, event: impl Into<Selector<EventId>>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn team(mut self, team: impl Into<Selector<TeamId>>) -> Self {
        self.team = Some(team.into());
        self
    }
}

/// One grant or revoke entry: a bare permission/group name or a scoped record.
///
/// Deserializes from a JSON string or object only; a sequence is never read
/// as a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RuleInput {
    Permission(String),
    Scoped(ScopedPermission),
}

impl<'de> Deserialize<'de> for RuleInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleInputVisitor;

        impl<'de> Visitor<'de> for RuleInputVisitor {
            type Value = RuleInput;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a permission name or a {permission, event?, team?} record")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<RuleInput, E> {
                Ok(RuleInput::Permission(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<RuleInput, E> {
                Ok(RuleInput::Permission(value))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<RuleInput, A::Error> {
                ScopedPermission::deserialize(de::value::MapAccessDeserializer::new(map)).map(RuleInput::Scoped)
            }
        }

        deserializer.deserialize_any(RuleInputVisitor)
    }
}

impl RuleInput {
    fn parts(&self) -> (&str, Scope) {
        match self {
            Self::Permission(permission) => (permission.as_str(), Scope::global()),
            Self::Scoped(record) => (
                record.permission.as_str(),
                Scope {
                    event: record.event.clone(),
                    team: record.team.clone(),
                },
            ),
        }
    }
}

impl From<&str> for RuleInput {
    fn from(value: &str) -> Self {
        Self::Permission(value.to_string())
    }
}

impl From<String> for RuleInput {
    fn from(value: String) -> Self {
        Self::Permission(value)
    }
}

impl From<ScopedPermission> for RuleInput {
    fn from(value: ScopedPermission) -> Self {
        Self::Scoped(value)
    }
}

/// Expand caller input into rules of a single polarity.
///
/// Group names expand into one rule per member, each carrying the entry's
/// scope. Other names must be valid permission paths; they need not be
/// declared in the catalog. An operation facet is rejected when no CRUD
/// permission exists at or below its path, since no query could reach it.
pub(crate) fn normalize(
    catalog: &PermissionCatalog,
    inputs: &[RuleInput],
    polarity: Polarity,
) -> Result<Vec<Rule>, AccessError> {
    let mut rules = Vec::with_capacity(inputs.len());

    for input in inputs {
        let (name, scope) = input.parts();

        if let Some(members) = catalog.group_members(name) {
            for member in members {
                ensure_reachable(catalog, member)?;
                rules.push(Rule::new(member.clone(), polarity, scope.clone()));
            }
            continue;
        }

        let path = PermissionPath::parse(name).map_err(|e| AccessError::InvalidPermission {
            path: name.to_string(),
            reason: e.to_string(),
        })?;
        ensure_reachable(catalog, &path)?;
        rules.push(Rule::new(path, polarity, scope));
    }

    Ok(rules)
}

fn ensure_reachable(catalog: &PermissionCatalog, path: &PermissionPath) -> Result<(), AccessError> {
    if path.operation().is_none()
        || catalog.kind_of(path.segments()) == PermissionKind::Crud
        || catalog.has_crud_within(path.segments())
    {
        return Ok(());
    }

    Err(AccessError::InvalidPermission {
        path: path.to_string(),
        reason: "operation facet on a boolean permission tree".to_string(),
    })
}
