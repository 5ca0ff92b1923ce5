//! Explanation of access decisions, for debugging "why was this allowed or
//! denied?" questions.

use serde::Serialize;

use crate::{PermissionPath, Polarity, Rule, Scope, Verdict};

/// Detailed account of how a query was resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    /// Queried path, including the effective operation.
    pub permission: PermissionPath,

    pub scope: Scope,

    /// Every rule that applied to the query, most specific first. Rules of
    /// equal precedence keep their input order.
    pub candidates: Vec<Rule>,

    /// The rule that decided the verdict.
    pub winner: Option<Rule>,

    pub verdict: Option<Verdict>,

    /// Human-readable summary of the decision.
    pub reason: String,
}

impl Explanation {
    pub(crate) fn new(
        permission: PermissionPath,
        scope: Scope,
        candidates: Vec<Rule>,
        winner: Option<Rule>,
        verdict: Option<Verdict>,
    ) -> Self {
        let reason = match (&winner, &verdict) {
            (Some(rule), Some(verdict)) => {
                let action = match rule.polarity {
                    Polarity::Grant => "granted",
                    Polarity::Revoke => "revoked",
                };
                let mut reason = format!(
                    "{action} by '{}' ({}), the most specific of {} matching rule(s)",
                    rule.path,
                    rule.scope,
                    candidates.len()
                );
                if verdict.expanded {
                    reason.push_str(&format!("; inherited by '{permission}'"));
                }
                reason
            }
            _ => format!("no grant or revoke covers '{permission}' in scope {scope}"),
        };

        Self {
            permission,
            scope,
            candidates,
            winner,
            verdict,
            reason,
        }
    }
}
