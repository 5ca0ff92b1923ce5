use thiserror::Error;

use crate::{Operation, PermissionPath, Scope};

/// Scope dimensions a query failed to supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingScope {
    Event,
    Team,
    EventAndTeam,
}

impl MissingScope {
    pub(crate) fn from_flags(event: bool, team: bool) -> Option<Self> {
        match (event, team) {
            (true, true) => Some(Self::EventAndTeam),
            (true, false) => Some(Self::Event),
            (false, true) => Some(Self::Team),
            (false, false) => None,
        }
    }
}

impl core::fmt::Display for MissingScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Event => "an event",
            Self::Team => "a team",
            Self::EventAndTeam => "an event and a team",
        })
    }
}

/// A scope-requiring permission was queried without the scope it needs.
///
/// This is a bug in the calling code, never an access decision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("permission '{path}' requires {missing} in scope")]
pub struct ScopeRequiredError {
    pub path: PermissionPath,
    pub missing: MissingScope,
}

/// The principal is not allowed to perform the requested action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("access denied: '{path}' ({scope})")]
pub struct AccessDeniedError {
    /// Queried path, including the operation if one was requested.
    pub path: PermissionPath,
    pub scope: Scope,
}

impl AccessDeniedError {
    pub fn operation(&self) -> Option<Operation> {
        self.path.operation()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("invalid permission '{path}': {reason}")]
    InvalidPermission { path: String, reason: String },

    #[error("permission '{path}' is CRUD-shaped and needs an operation")]
    OperationRequired { path: PermissionPath },

    #[error("permission '{path}' does not take an operation (got '{operation}')")]
    UnexpectedOperation {
        path: PermissionPath,
        operation: Operation,
    },

    #[error("operation '{argument}' conflicts with the suffix of '{path}'")]
    ConflictingOperation {
        path: PermissionPath,
        argument: Operation,
    },

    #[error(transparent)]
    ScopeRequired(#[from] ScopeRequiredError),

    #[error(transparent)]
    Denied(#[from] AccessDeniedError),
}

impl AccessError {
    /// `true` for misuse of the API by the caller; `false` only for an
    /// ordinary access denial.
    pub fn is_contract_violation(&self) -> bool {
        !self.is_denied()
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }
}
