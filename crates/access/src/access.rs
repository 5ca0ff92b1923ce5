//! `AccessControl`: the per-principal permission facade.

use std::cmp::Reverse;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crewdesk_core::{EventId, TeamId};

use crate::error::MissingScope;
use crate::resolve::{self, Precedence, Target};
use crate::rule::normalize;
use crate::{
    AccessDeniedError, AccessError, Explanation, Operation, PermissionCatalog, PermissionKind,
    PermissionPath, Polarity, Rule, RuleInput, Scope, ScopeRequiredError, Verdict,
};

/// Constructor payload: the principal's grants, revokes and default scopes.
///
/// `grants` and `revokes` deserialize from a single entry or an array; each
/// entry is a permission/group name or a `{permission, event?, team?}` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlOptions {
    #[serde(default, deserialize_with = "one_or_many")]
    pub grants: Vec<RuleInput>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub revokes: Vec<RuleInput>,
    /// Events the principal takes part in.
    #[serde(default)]
    pub events: Vec<EventId>,
    /// Teams the principal belongs to.
    #[serde(default)]
    pub teams: Vec<TeamId>,
}

impl AccessControlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, input: impl Into<RuleInput>) -> Self {
        self.grants.push(input.into());
        self
    }

    pub fn revoke(mut self, input: impl Into<RuleInput>) -> Self {
        self.revokes.push(input.into());
        self
    }

    pub fn event(mut self, event: EventId) -> Self {
        self.events.push(event);
        self
    }

    pub fn team(mut self, team: TeamId) -> Self {
        self.teams.push(team);
        self
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<RuleInput>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<RuleInput>),
        One(RuleInput),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(input) => vec![input],
        OneOrMany::Many(inputs) => inputs,
    })
}

/// A permission question: a path, an optional operation and a scope.
///
/// Usually built through one of the `From` conversions:
///
/// ```ignore
/// access.can("event.visible")?;
/// access.can(("team.requests", Operation::Update))?;
/// access.can(("team.requests", Operation::Read, Scope::global().with_team(team)))?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    pub path: &'a str,
    pub operation: Option<Operation>,
    pub scope: Scope,
}

impl<'a> Request<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            operation: None,
            scope: Scope::global(),
        }
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}

impl<'a> From<&'a str> for Request<'a> {
    fn from(path: &'a str) -> Self {
        Self::new(path)
    }
}

impl<'a> From<(&'a str, Operation)> for Request<'a> {
    fn from((path, operation): (&'a str, Operation)) -> Self {
        Self::new(path).operation(operation)
    }
}

impl<'a> From<(&'a str, Scope)> for Request<'a> {
    fn from((path, scope): (&'a str, Scope)) -> Self {
        Self::new(path).scope(scope)
    }
}

impl<'a> From<(&'a str, Operation, Scope)> for Request<'a> {
    fn from((path, operation, scope): (&'a str, Operation, Scope)) -> Self {
        Self::new(path).operation(operation).scope(scope)
    }
}

/// Permission evaluation for one principal.
///
/// Built once per request from the principal's grants and revokes; immutable
/// afterwards, so it can be shared freely across threads. All queries are
/// pure in-memory computations.
#[derive(Debug, Clone)]
pub struct AccessControl {
    catalog: Arc<PermissionCatalog>,
    grants: Vec<Rule>,
    revokes: Vec<Rule>,
    events: Vec<EventId>,
    teams: Vec<TeamId>,
}

impl AccessControl {
    pub fn new(catalog: Arc<PermissionCatalog>, options: AccessControlOptions) -> Result<Self, AccessError> {
        let grants = normalize(&catalog, &options.grants, Polarity::Grant)?;
        let revokes = normalize(&catalog, &options.revokes, Polarity::Revoke)?;

        tracing::debug!(
            grants = grants.len(),
            revokes = revokes.len(),
            events = options.events.len(),
            teams = options.teams.len(),
            "access control built"
        );

        Ok(Self {
            catalog,
            grants,
            revokes,
            events: options.events,
            teams: options.teams,
        })
    }

    pub fn grants(&self) -> &[Rule] {
        &self.grants
    }

    pub fn revokes(&self) -> &[Rule] {
        &self.revokes
    }

    pub fn default_events(&self) -> &[EventId] {
        &self.events
    }

    pub fn default_teams(&self) -> &[TeamId] {
        &self.teams
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.grants.iter().chain(&self.revokes)
    }

    /// Resolve a request to a verdict, or `None` when no rule at any ancestor
    /// level governs the path.
    pub fn query<'a>(&self, request: impl Into<Request<'a>>) -> Result<Option<Verdict>, AccessError> {
        let target = self.target(request.into())?;
        let winner = resolve::select(self.rules(), &target);
        let verdict = winner.map(|rule| resolve::verdict(rule, &target));

        tracing::trace!(
            permission = %target.path,
            scope = %target.scope,
            winner = ?winner.map(|rule| rule.path.to_string()),
            verdict = ?verdict.map(|v| v.result),
            "access query resolved"
        );

        Ok(verdict)
    }

    /// `true` only for a granted verdict; revoked and unknown both deny.
    pub fn can<'a>(&self, request: impl Into<Request<'a>>) -> Result<bool, AccessError> {
        Ok(self.query(request)?.is_some_and(|verdict| verdict.is_granted()))
    }

    /// Like [`AccessControl::can`], but a denial is returned as
    /// [`AccessError::Denied`].
    pub fn require<'a>(&self, request: impl Into<Request<'a>>) -> Result<(), AccessError> {
        let request = request.into();
        if self.can(request.clone())? {
            return Ok(());
        }

        let target = self.target(request)?;
        Err(AccessDeniedError {
            path: target.path,
            scope: target.scope,
        }
        .into())
    }

    /// Resolve a request and report every rule that took part in the decision.
    pub fn explain<'a>(&self, request: impl Into<Request<'a>>) -> Result<Explanation, AccessError> {
        let target = self.target(request.into())?;

        let mut candidates: Vec<&Rule> = resolve::candidates(self.rules(), &target).collect();
        candidates.sort_by_key(|rule| Reverse(Precedence::of(rule)));
        let winner = resolve::select(self.rules(), &target);
        let verdict = winner.map(|rule| resolve::verdict(rule, &target));

        Ok(Explanation::new(
            target.path,
            target.scope,
            candidates.into_iter().cloned().collect(),
            winner.cloned(),
            verdict,
        ))
    }

    /// Default events in which the request is granted. The request's event
    /// dimension is replaced by each default event in turn.
    pub fn granted_events<'a>(&self, request: impl Into<Request<'a>>) -> Result<Vec<EventId>, AccessError> {
        let request = request.into();
        let mut granted = Vec::new();
        for event in &self.events {
            let scoped = Request {
                scope: request.scope.clone().with_event(event.clone()),
                ..request.clone()
            };
            if self.can(scoped)? {
                granted.push(event.clone());
            }
        }
        Ok(granted)
    }

    /// Default teams in which the request is granted. The request's team
    /// dimension is replaced by each default team in turn.
    pub fn granted_teams<'a>(&self, request: impl Into<Request<'a>>) -> Result<Vec<TeamId>, AccessError> {
        let request = request.into();
        let mut granted = Vec::new();
        for team in &self.teams {
            let scoped = Request {
                scope: request.scope.clone().with_team(team.clone()),
                ..request.clone()
            };
            if self.can(scoped)? {
                granted.push(team.clone());
            }
        }
        Ok(granted)
    }

    /// Parse the request and enforce the catalog contract: operation shape
    /// and scope requirements.
    fn target(&self, request: Request<'_>) -> Result<Target, AccessError> {
        self.check(request).inspect_err(|err| {
            tracing::debug!(error = %err, "access query rejected");
        })
    }

    fn check(&self, request: Request<'_>) -> Result<Target, AccessError> {
        let parsed = PermissionPath::parse(request.path).map_err(|e| AccessError::InvalidPermission {
            path: request.path.to_string(),
            reason: e.to_string(),
        })?;

        let operation = match (parsed.operation(), request.operation) {
            (Some(suffix), Some(argument)) if suffix != argument => {
                return Err(AccessError::ConflictingOperation {
                    path: parsed,
                    argument,
                });
            }
            (suffix, argument) => suffix.or(argument),
        };
        let path = parsed.with_operation(operation);

        let kind = self.catalog.kind_of(path.segments());
        match (kind, operation) {
            (PermissionKind::Crud, None) => return Err(AccessError::OperationRequired { path }),
            (PermissionKind::Boolean, Some(operation)) => {
                return Err(AccessError::UnexpectedOperation {
                    path: path.with_operation(None),
                    operation,
                });
            }
            _ => {}
        }

        let definition = self.catalog.definition(path.segments()).copied();
        if let Some(definition) = definition {
            let missing = MissingScope::from_flags(
                definition.requires_event && request.scope.event.is_none(),
                definition.requires_team && request.scope.team.is_none(),
            );
            if let Some(missing) = missing {
                return Err(ScopeRequiredError { path, missing }.into());
            }
        }

        Ok(Target {
            path,
            scope: request.scope,
            definition,
        })
    }
}
