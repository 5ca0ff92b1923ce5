//! Event/team scoping of rules and queries.
//!
//! Each dimension of a [`Scope`] is either absent, a concrete identifier, or
//! the wildcard [`Selector::Any`]. Matching is deliberately asymmetric:
//!
//! | rule dimension | query dimension     | matches |
//! |----------------|---------------------|---------|
//! | absent         | anything            | yes     |
//! | `Any`          | anything            | yes     |
//! | `Exact(v)`     | `Exact(v)`          | yes     |
//! | `Exact(v)`     | other / `Any` / absent | no   |
//!
//! A wildcard in a query therefore reaches only rules that apply everywhere on
//! that axis; it never searches across concretely scoped rules.

use core::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crewdesk_core::{EventId, TeamId, ValueObject};

/// Wire form of the wildcard sentinel.
pub const WILDCARD: &str = "*";

/// One scope dimension value: a concrete identifier or "any".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector<T> {
    Any,
    Exact(T),
}

/// Wildcard event sentinel.
pub const ANY_EVENT: Selector<EventId> = Selector::Any;

/// Wildcard team sentinel.
pub const ANY_TEAM: Selector<TeamId> = Selector::Any;

impl<T> Selector<T> {
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn exact(&self) -> Option<&T> {
        match self {
            Self::Any => None,
            Self::Exact(value) => Some(value),
        }
    }
}

impl From<EventId> for Selector<EventId> {
    fn from(value: EventId) -> Self {
        Self::Exact(value)
    }
}

impl From<TeamId> for Selector<TeamId> {
    fn from(value: TeamId) -> Self {
        Self::Exact(value)
    }
}

impl<T: core::fmt::Display> core::fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Any => f.write_str(WILDCARD),
            Self::Exact(value) => value.fmt(f),
        }
    }
}

impl<T: core::fmt::Display> Serialize for Selector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Selector<T>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == WILDCARD {
            return Ok(Self::Any);
        }
        raw.parse().map(Self::Exact).map_err(de::Error::custom)
    }
}

/// How narrowly a scope restricts where a rule applies. Orders global below
/// wildcard below concrete; more concrete dimensions rank higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity {
    concrete: u8,
    wildcard: u8,
}

/// Optional `(event, team)` context of a rule or a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Selector<EventId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Selector<TeamId>>,
}

impl ValueObject for Scope {}

impl Scope {
    /// A scope with neither dimension set.
    pub fn global() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, event: impl Into<Selector<EventId>>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_team(mut self, team: impl Into<Selector<TeamId>>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.event.is_none() && self.team.is_none()
    }

    /// `true` when no dimension is pinned to a concrete identifier, i.e. the
    /// scope applies everywhere.
    pub fn is_global(&self) -> bool {
        !matches!(self.event, Some(Selector::Exact(_))) && !matches!(self.team, Some(Selector::Exact(_)))
    }

    pub fn specificity(&self) -> Specificity {
        fn rank<T>(dimension: &Option<Selector<T>>, acc: &mut Specificity) {
            match dimension {
                None => {}
                Some(Selector::Any) => acc.wildcard += 1,
                Some(Selector::Exact(_)) => acc.concrete += 1,
            }
        }

        let mut acc = Specificity::default();
        rank(&self.event, &mut acc);
        rank(&self.team, &mut acc);
        acc
    }

    /// Whether a rule carrying this scope applies to a query scoped by `query`.
    pub fn admits(&self, query: &Scope) -> bool {
        dimension_admits(self.event.as_ref(), query.event.as_ref())
            && dimension_admits(self.team.as_ref(), query.team.as_ref())
    }
}

fn dimension_admits<T: PartialEq>(rule: Option<&Selector<T>>, query: Option<&Selector<T>>) -> bool {
    match rule {
        None | Some(Selector::Any) => true,
        Some(Selector::Exact(expected)) => {
            matches!(query, Some(Selector::Exact(actual)) if actual == expected)
        }
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match (&self.event, &self.team) {
            (None, None) => f.write_str("global"),
            (Some(event), None) => write!(f, "event={event}"),
            (None, Some(team)) => write!(f, "team={team}"),
            (Some(event), Some(team)) => write!(f, "event={event}, team={team}"),
        }
    }
}
