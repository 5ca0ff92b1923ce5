//! Read-only permission catalog.
//!
//! The catalog declares which permission paths exist, whether each one is a
//! plain boolean or CRUD-shaped, and which scope dimensions a query must
//! supply. It also holds permission groups: symbolic names that expand into a
//! fixed list of paths when rules are normalized.
//!
//! A catalog is built once at process start (from a builder or a JSON
//! document) and shared behind an `Arc`; nothing mutates it afterwards.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PermissionPath;

/// Shape of a declared permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    /// Granted or revoked as a whole.
    #[default]
    Boolean,
    /// Queried per create/read/update/delete facet.
    Crud,
}

/// Metadata for one declared permission path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDefinition {
    #[serde(default)]
    pub kind: PermissionKind,
    #[serde(default)]
    pub requires_event: bool,
    #[serde(default)]
    pub requires_team: bool,
}

impl PermissionDefinition {
    pub const fn boolean() -> Self {
        Self {
            kind: PermissionKind::Boolean,
            requires_event: false,
            requires_team: false,
        }
    }

    pub const fn crud() -> Self {
        Self {
            kind: PermissionKind::Crud,
            requires_event: false,
            requires_team: false,
        }
    }

    pub const fn requiring_event(mut self) -> Self {
        self.requires_event = true;
        self
    }

    pub const fn requiring_team(mut self) -> Self {
        self.requires_team = true;
        self
    }

    pub fn requires_scope(&self) -> bool {
        self.requires_event || self.requires_team
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid catalog permission '{path}': {reason}")]
    InvalidPermission { path: String, reason: String },

    #[error("catalog permission '{0}' must not carry an operation suffix")]
    OperationSuffix(String),

    #[error("group name must not be blank")]
    BlankGroupName,

    #[error("group '{0}' has no members")]
    EmptyGroup(String),

    #[error("group '{group}' has invalid member '{member}': {reason}")]
    InvalidGroupMember {
        group: String,
        member: String,
        reason: String,
    },

    #[error("group '{0}' has the same name as a declared permission")]
    GroupShadowsPermission(String),

    #[error("malformed catalog document: {0}")]
    Malformed(String),
}

/// Serialized catalog form.
///
/// ```json
/// {
///   "permissions": {
///     "event.visible": { "kind": "boolean", "requiresEvent": true },
///     "team.requests": { "kind": "crud", "requiresEvent": true, "requiresTeam": true }
///   },
///   "groups": { "lead": ["event.visible", "team.requests:read"] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub permissions: BTreeMap<String, PermissionDefinition>,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct PermissionCatalog {
    definitions: HashMap<Vec<Box<str>>, PermissionDefinition>,
    groups: HashMap<String, Vec<PermissionPath>>,
}

impl PermissionCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| CatalogError::Malformed(e.to_string()))?;
        Self::from_document(document)
    }

    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut definitions = HashMap::with_capacity(document.permissions.len());
        for (raw, definition) in document.permissions {
            let path = PermissionPath::parse(&raw).map_err(|e| CatalogError::InvalidPermission {
                path: raw.clone(),
                reason: e.to_string(),
            })?;
            if path.operation().is_some() {
                return Err(CatalogError::OperationSuffix(raw));
            }
            definitions.insert(path.segments().to_vec(), definition);
        }

        let mut groups = HashMap::with_capacity(document.groups.len());
        for (name, members) in document.groups {
            if name.trim().is_empty() {
                return Err(CatalogError::BlankGroupName);
            }
            if members.is_empty() {
                return Err(CatalogError::EmptyGroup(name));
            }
            if let Ok(path) = PermissionPath::parse(&name) {
                if definitions.contains_key(path.segments()) {
                    return Err(CatalogError::GroupShadowsPermission(name));
                }
            }

            let members = members
                .into_iter()
                .map(|member| {
                    PermissionPath::parse(&member).map_err(|e| CatalogError::InvalidGroupMember {
                        group: name.clone(),
                        member: member.clone(),
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            groups.insert(name, members);
        }

        tracing::debug!(
            permissions = definitions.len(),
            groups = groups.len(),
            "permission catalog loaded"
        );

        Ok(Self {
            definitions,
            groups,
        })
    }

    /// Definition declared for exactly `path` (an operation suffix is ignored).
    pub fn definition_for(&self, path: &str) -> Option<&PermissionDefinition> {
        let path = PermissionPath::parse(path).ok()?;
        self.definition(path.segments())
    }

    /// Definition declared for exactly these segments.
    pub fn definition(&self, segments: &[Box<str>]) -> Option<&PermissionDefinition> {
        self.definitions.get(segments)
    }

    /// The definition of `segments` or, failing that, of its closest declared
    /// ancestor.
    pub fn nearest_definition(&self, segments: &[Box<str>]) -> Option<&PermissionDefinition> {
        (1..=segments.len())
            .rev()
            .find_map(|depth| self.definitions.get(&segments[..depth]))
    }

    /// Kind inherited from the nearest declared ancestor; undeclared trees are
    /// boolean.
    pub fn kind_of(&self, segments: &[Box<str>]) -> PermissionKind {
        self.nearest_definition(segments)
            .map(|d| d.kind)
            .unwrap_or_default()
    }

    /// `true` when a CRUD-shaped permission is declared at or below `segments`.
    pub fn has_crud_within(&self, segments: &[Box<str>]) -> bool {
        self.definitions
            .iter()
            .any(|(path, definition)| definition.kind == PermissionKind::Crud && path.starts_with(segments))
    }

    pub fn group_members(&self, name: &str) -> Option<&[PermissionPath]> {
        self.groups.get(name).map(Vec::as_slice)
    }
}

/// Incremental catalog construction, validated on [`CatalogBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    document: CatalogDocument,
}

impl CatalogBuilder {
    pub fn permission(mut self, path: impl Into<String>, definition: PermissionDefinition) -> Self {
        self.document.permissions.insert(path.into(), definition);
        self
    }

    pub fn group<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document
            .groups
            .insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<PermissionCatalog, CatalogError> {
        PermissionCatalog::from_document(self.document)
    }
}
