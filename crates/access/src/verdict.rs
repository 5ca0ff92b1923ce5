use serde::{Deserialize, Serialize};

use crate::Polarity;

/// Outcome carried by a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Granted,
    Revoked,
}

impl From<Polarity> for Decision {
    fn from(value: Polarity) -> Self {
        match value {
            Polarity::Grant => Self::Granted,
            Polarity::Revoke => Self::Revoked,
        }
    }
}

/// Marker attached when a scope-requiring permission was answered by an
/// unscoped rule inherited from an ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictScope {
    Global,
}

/// Structured answer to a permission query.
///
/// - `crud`: the winning rule names the queried operation.
/// - `expanded`: the winning rule sits above the queried node and the result
///   was inherited.
/// - `global`: the winning rule is not pinned to a concrete event or team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Verdict {
    pub result: Decision,
    pub crud: bool,
    pub expanded: bool,
    pub global: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<VerdictScope>,
}

impl Verdict {
    pub fn is_granted(&self) -> bool {
        self.result == Decision::Granted
    }
}
