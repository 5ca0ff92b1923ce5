mod common;

use crewdesk_access::{AccessControlOptions, AccessError, Decision, Operation, Verdict};
use proptest::prelude::*;

use common::access;

fn inherited_grant() -> Verdict {
    Verdict {
        result: Decision::Granted,
        crud: false,
        expanded: true,
        global: true,
        scope: None,
    }
}

#[test]
fn root_grant_reaches_deep_paths() {
    let ac = access(AccessControlOptions::new().grant("test"));

    assert_eq!(ac.query("test.anything.deep").unwrap(), Some(inherited_grant()));
    assert!(ac.can("test.boolean").unwrap());
    assert_eq!(ac.query("other").unwrap(), None);
    assert!(!ac.can("other").unwrap());
}

#[test]
fn subtree_revoke_leaves_siblings_granted() {
    let ac = access(AccessControlOptions::new().grant("test").revoke("test.anything"));

    let deep = ac.query("test.anything.deep").unwrap().unwrap();
    assert_eq!(deep.result, Decision::Revoked);
    assert!(deep.expanded);

    let node = ac.query("test.anything").unwrap().unwrap();
    assert_eq!(node.result, Decision::Revoked);
    assert!(!node.expanded);

    assert!(ac.can("test.other").unwrap());
    assert!(ac.can("test.anythingelse").unwrap());
    assert!(ac.can("test").unwrap());
}

#[test]
fn deeper_grant_overrides_ancestor_revoke() {
    let ac = access(
        AccessControlOptions::new()
            .revoke("test")
            .grant("test.anything.deep"),
    );

    assert!(ac.can("test.anything.deep.leaf").unwrap());
    assert!(!ac.can("test.anything").unwrap());
}

#[test]
fn crud_facets_are_more_specific_than_the_permission() {
    let ac = access(AccessControlOptions::new().grant("test.crud").grant("test.crud:delete"));

    assert_eq!(
        ac.query(("test.crud", Operation::Create)).unwrap(),
        Some(inherited_grant())
    );
    assert_eq!(
        ac.query(("test.crud", Operation::Delete)).unwrap(),
        Some(Verdict {
            result: Decision::Granted,
            crud: true,
            expanded: false,
            global: true,
            scope: None,
        })
    );
}

#[test]
fn revoked_facet_overrides_granted_permission() {
    let ac = access(AccessControlOptions::new().grant("test.crud").revoke("test.crud:delete"));

    for op in [Operation::Create, Operation::Read, Operation::Update] {
        assert!(ac.can(("test.crud", op)).unwrap(), "{op} should stay granted");
    }
    assert!(!ac.can(("test.crud", Operation::Delete)).unwrap());

    let verdict = ac.query("test.crud:delete").unwrap().unwrap();
    assert_eq!(verdict.result, Decision::Revoked);
    assert!(verdict.crud);
}

#[test]
fn grant_and_revoke_of_the_same_rule_deny() {
    let ac = access(AccessControlOptions::new().grant("test.boolean").revoke("test.boolean"));
    assert!(!ac.can("test.boolean").unwrap());
}

#[test]
fn end_to_end_boolean_and_crud() {
    let ac = access(AccessControlOptions::new().grant("test").revoke("test.boolean"));

    assert!(ac.can(("test.crud", Operation::Create)).unwrap());
    assert!(!ac.can("test.boolean").unwrap());
}

#[test]
fn groups_expand_into_their_members() {
    let ac = access(AccessControlOptions::new().grant("testgroup"));

    assert!(ac.can("test.boolean").unwrap());
    assert!(ac.can(("test.crud", Operation::Read)).unwrap());
    assert_eq!(ac.query(("test.crud", Operation::Create)).unwrap(), None);
    assert_eq!(ac.grants().len(), 2);
}

#[test]
fn operation_shape_is_enforced() {
    let ac = access(AccessControlOptions::new().grant("test"));

    assert!(matches!(
        ac.can("test.crud"),
        Err(AccessError::OperationRequired { .. })
    ));
    assert!(matches!(
        ac.can("test.crud.nested"),
        Err(AccessError::OperationRequired { .. })
    ));
    assert!(matches!(
        ac.can(("test.boolean", Operation::Read)),
        Err(AccessError::UnexpectedOperation { operation: Operation::Read, .. })
    ));
    assert!(matches!(
        ac.can(("test.crud:read", Operation::Delete)),
        Err(AccessError::ConflictingOperation { argument: Operation::Delete, .. })
    ));

    assert!(ac.can("test.crud:read").unwrap());
    assert!(ac.can(("test.crud:read", Operation::Read)).unwrap());
}

#[test]
fn malformed_input_is_rejected() {
    let ac = access(AccessControlOptions::new().grant("test"));
    assert!(matches!(ac.can("test.1"), Err(AccessError::InvalidPermission { .. })));

    let err = crewdesk_access::AccessControl::new(
        common::catalog(),
        AccessControlOptions::new().revoke("test,boolean"),
    )
    .unwrap_err();
    assert!(err.is_contract_violation());
}

#[test]
fn unknown_leaf_paths_behave_as_booleans() {
    let ac = access(AccessControlOptions::new().grant("volunteer.shifts.swap"));

    assert!(ac.can("volunteer.shifts.swap").unwrap());
    assert!(ac.can("volunteer.shifts.swap.urgent").unwrap());
    assert!(!ac.can("volunteer.shifts").unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// A grant on the root governs every descendant that no other rule touches.
    #[test]
    fn root_grant_is_inherited_everywhere(suffix in "[A-Za-z]{1,6}(\\.[A-Za-z]{1,6}){0,3}") {
        let path = format!("volunteer.{suffix}");
        let ac = access(AccessControlOptions::new().grant("volunteer"));

        let verdict = ac.query(path.as_str()).unwrap().unwrap();
        prop_assert_eq!(verdict, inherited_grant());
    }

    /// Repeated queries against the same instance return equal verdicts.
    #[test]
    fn queries_are_idempotent(
        path in prop::sample::select(vec!["test", "test.boolean", "test.anything.deep", "other"]),
        op in prop::sample::select(Operation::ALL.to_vec()),
    ) {
        let ac = access(
            AccessControlOptions::new()
                .grant("test")
                .revoke("test.anything")
                .grant("test.crud:delete"),
        );

        prop_assert_eq!(ac.query(path).unwrap(), ac.query(path).unwrap());
        prop_assert_eq!(
            ac.query(("test.crud", op)).unwrap(),
            ac.query(("test.crud", op)).unwrap()
        );
    }
}
