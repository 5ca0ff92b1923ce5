//! Permission path syntax.
//!
//! A path is one or more ASCII-letter segments joined by `.`, optionally
//! followed by `:` and a CRUD operation, e.g. `team.senior.requests:update`.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crewdesk_core::{DomainError, DomainResult, ValueObject};

use crate::Operation;

/// Returns `true` when `input` is a syntactically valid permission path.
pub fn is_valid_permission_path(input: &str) -> bool {
    PermissionPath::parse(input).is_ok()
}

/// A parsed permission path.
///
/// Segments are split once at parse time so ancestor checks are plain slice
/// prefix comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionPath {
    segments: Vec<Box<str>>,
    operation: Option<Operation>,
}

impl PermissionPath {
    pub fn parse(input: &str) -> DomainResult<Self> {
        let (body, operation) = match input.split_once(':') {
            Some((body, op)) => {
                let op = op
                    .parse::<Operation>()
                    .map_err(|_| DomainError::validation(format!("'{input}': invalid operation suffix")))?;
                (body, Some(op))
            }
            None => (input, None),
        };

        let mut segments = Vec::new();
        for segment in body.split('.') {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_alphabetic()) {
                return Err(DomainError::validation(format!(
                    "'{input}': segments must be non-empty ASCII letters"
                )));
            }
            segments.push(Box::from(segment));
        }

        Ok(Self { segments, operation })
    }

    pub fn segments(&self) -> &[Box<str>] {
        &self.segments
    }

    /// Number of segments, ignoring any operation suffix.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn with_operation(mut self, operation: Option<Operation>) -> Self {
        self.operation = operation;
        self
    }

    /// `true` if this path (ignoring its operation) equals `segments` or is
    /// one of its ancestors.
    pub fn covers(&self, segments: &[Box<str>]) -> bool {
        segments.starts_with(&self.segments)
    }
}

impl ValueObject for PermissionPath {}

impl core::fmt::Display for PermissionPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        if let Some(op) = self.operation {
            write!(f, ":{op}")?;
        }
        Ok(())
    }
}

impl FromStr for PermissionPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PermissionPath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PermissionPath> for String {
    fn from(value: PermissionPath) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_dotted_paths_with_optional_operation() {
        for valid in [
            "test",
            "event.visible",
            "team.senior.requests",
            "Test.CamelCase",
            "test.crud:create",
            "test:read",
            "a.b.c.d:delete",
        ] {
            assert!(is_valid_permission_path(valid), "{valid} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_paths() {
        for invalid in [
            "",
            " ",
            "   ",
            "123",
            "test.123",
            "test1",
            "test,crud",
            "test.$crud",
            "test..crud",
            ".test",
            "test.",
            "test:",
            "test:list",
            "test:Read",
            "test:read:read",
            "test crud",
            ":read",
        ] {
            assert!(!is_valid_permission_path(invalid), "{invalid:?} should be invalid");
        }
    }

    #[test]
    fn parse_exposes_structure() {
        let path = PermissionPath::parse("team.senior.requests:update").unwrap();
        assert_eq!(path.depth(), 3);
        assert_eq!(path.operation(), Some(Operation::Update));
        assert_eq!(path.segments()[1].as_ref(), "senior");
        assert_eq!(path.to_string(), "team.senior.requests:update");
    }

    #[test]
    fn covers_is_a_segment_prefix_check() {
        let parent = PermissionPath::parse("test.any").unwrap();
        let child = PermissionPath::parse("test.any.deep").unwrap();
        let lookalike = PermissionPath::parse("test.anything").unwrap();

        assert!(parent.covers(child.segments()));
        assert!(parent.covers(parent.segments()));
        assert!(!parent.covers(lookalike.segments()));
        assert!(!child.covers(parent.segments()));
    }

    #[test]
    fn serde_uses_the_string_form() {
        let path: PermissionPath = serde_json::from_str("\"test.crud:read\"").unwrap();
        assert_eq!(path.operation(), Some(Operation::Read));
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"test.crud:read\"");
        assert!(serde_json::from_str::<PermissionPath>("\"test.1\"").is_err());
    }

    proptest! {
        #[test]
        fn grammar_strings_are_accepted(
            input in "[A-Za-z]{1,8}(\\.[A-Za-z]{1,8}){0,4}(:(create|read|update|delete))?"
        ) {
            prop_assert!(is_valid_permission_path(&input));
            let parsed = PermissionPath::parse(&input).unwrap();
            prop_assert_eq!(parsed.to_string(), input);
        }

        #[test]
        fn digits_and_punctuation_are_rejected(
            prefix in "[A-Za-z]{0,6}",
            bad in "[0-9 ,$!_\\-]",
            suffix in "[A-Za-z]{0,6}",
        ) {
            let input = format!("{prefix}{bad}{suffix}");
            prop_assert!(!is_valid_permission_path(&input));
        }
    }
}
