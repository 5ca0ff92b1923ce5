//! Hierarchical rule selection.
//!
//! A rule is a candidate for a query when its path is the queried path or an
//! ancestor of it, its operation (if any) is the queried operation, and its
//! scope admits the query scope. Among candidates the winner is the maximum
//! [`Precedence`]: deepest path first, then operation-level over
//! permission-level, then the more specific scope, and finally revoke over
//! grant.

use crate::{PermissionDefinition, PermissionPath, Polarity, Rule, Scope, Verdict, VerdictScope};
use crate::scope::Specificity;

/// Ordering key of a candidate rule. Field order is comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Precedence {
    depth: usize,
    operation_level: bool,
    specificity: Specificity,
    revoke: bool,
}

impl Precedence {
    pub(crate) fn of(rule: &Rule) -> Self {
        Self {
            depth: rule.depth(),
            operation_level: rule.is_operation_level(),
            specificity: rule.scope.specificity(),
            revoke: rule.polarity == Polarity::Revoke,
        }
    }
}

/// A query after parsing and contract checks.
#[derive(Debug, Clone)]
pub(crate) struct Target {
    /// Queried path with the effective operation attached.
    pub path: PermissionPath,
    pub scope: Scope,
    /// Catalog entry for exactly this path, if declared.
    pub definition: Option<PermissionDefinition>,
}

pub(crate) fn applies(rule: &Rule, target: &Target) -> bool {
    rule.path.covers(target.path.segments())
        && rule
            .operation()
            .is_none_or(|op| target.path.operation() == Some(op))
        && rule.scope.admits(&target.scope)
}

pub(crate) fn candidates<'r, I>(rules: I, target: &Target) -> impl Iterator<Item = &'r Rule>
where
    I: IntoIterator<Item = &'r Rule>,
{
    rules.into_iter().filter(move |rule| applies(rule, target))
}

pub(crate) fn select<'r, I>(rules: I, target: &Target) -> Option<&'r Rule>
where
    I: IntoIterator<Item = &'r Rule>,
{
    candidates(rules, target).max_by_key(|rule| Precedence::of(rule))
}

pub(crate) fn verdict(winner: &Rule, target: &Target) -> Verdict {
    let exact_node = winner.depth() == target.path.depth()
        && winner.is_operation_level() == target.path.operation().is_some();
    let expanded = !exact_node;
    let global = winner.scope.is_global();
    let requires_scope = target
        .definition
        .is_some_and(|definition| definition.requires_scope());

    Verdict {
        result: winner.polarity.into(),
        crud: winner.is_operation_level(),
        expanded,
        global,
        scope: (requires_scope && expanded && global).then_some(VerdictScope::Global),
    }
}
