//! Tests for graph manager mutations and relationship invariants

use kin_graph::{
    FamilyGraph, Gender, GraphConfig, KinGraphError, MemberDraft, RelationshipType,
};

/// Create a test draft
fn draft(name: &str, gender: Gender) -> MemberDraft {
    MemberDraft::new(name, gender)
}

/// Check spouse symmetry and parent/child duality for every active pair
fn assert_invariants(graph: &FamilyGraph) {
    for member in graph.active_members() {
        if let Some(spouse_id) = member.spouse_id.as_deref() {
            let spouse = graph.active_member(spouse_id).expect("spouse exists");
            assert_eq!(
                spouse.spouse_id.as_deref(),
                Some(member.id.as_str()),
                "spouse link of {} is not symmetric",
                member.id
            );
        }
        for child_id in &member.children_ids {
            let child = graph.active_member(child_id).expect("child exists");
            assert!(
                child.father_id.as_deref() == Some(member.id.as_str())
                    || child.mother_id.as_deref() == Some(member.id.as_str()),
                "child {} does not point back at parent {}",
                child_id,
                member.id
            );
        }
        for parent_id in [member.father_id.as_deref(), member.mother_id.as_deref()]
            .into_iter()
            .flatten()
        {
            let parent = graph.active_member(parent_id).expect("parent exists");
            assert!(
                parent.children_ids.contains(&member.id),
                "parent {} does not list child {}",
                parent_id,
                member.id
            );
        }
        // no member is its own ancestor
        assert!(
            !graph.ancestors(&member.id).contains(&member.id),
            "member {} is its own ancestor",
            member.id
        );
    }
}

#[test]
fn test_add_root() {
    let mut graph = FamilyGraph::new();
    let id = graph.add_root(draft("John", Gender::Male)).unwrap();

    let member = graph.member(&id).unwrap();
    assert_eq!(member.name, "John");
    assert_eq!(member.generation, 0);
    assert!(member.is_active);
    assert!(member.is_parentless());
    assert_eq!(graph.find_roots().len(), 1);
    assert_eq!(graph.default_root().unwrap().id, id);
}

#[test]
fn test_empty_name_is_rejected() {
    let mut graph = FamilyGraph::new();
    let err = graph.add_root(draft("   ", Gender::Female)).unwrap_err();
    assert!(matches!(err, KinGraphError::Validation(_)));
    assert!(graph.is_empty());
}

#[test]
fn test_spouse_symmetry() {
    let mut graph = FamilyGraph::new();
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    let mary = graph
        .add_member(draft("Mary", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap();

    assert_eq!(graph.member(&john).unwrap().spouse_id.as_deref(), Some(mary.as_str()));
    assert_eq!(graph.member(&mary).unwrap().spouse_id.as_deref(), Some(john.as_str()));
    assert_invariants(&graph);

    // no third member may claim either side
    let err = graph
        .add_member(draft("Impostor", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap_err();
    assert!(matches!(
        err,
        KinGraphError::InvalidRelationship { slot: "spouse", .. }
    ));
    assert_eq!(graph.active_count(), 2);
}

#[test]
fn test_add_parent_wires_both_sides() {
    let mut graph = FamilyGraph::new();
    let child = graph.add_root(draft("Child", Gender::Female)).unwrap();
    let father = graph
        .add_member(draft("Father", Gender::Male), &child, RelationshipType::Father)
        .unwrap();
    let mother = graph
        .add_member(draft("Mother", Gender::Female), &child, RelationshipType::Mother)
        .unwrap();

    let child_member = graph.member(&child).unwrap();
    assert_eq!(child_member.father_id.as_deref(), Some(father.as_str()));
    assert_eq!(child_member.mother_id.as_deref(), Some(mother.as_str()));
    assert!(graph.member(&father).unwrap().children_ids.contains(&child));
    assert!(graph.member(&mother).unwrap().children_ids.contains(&child));
    assert_invariants(&graph);
}

#[test]
fn test_occupied_parent_slot_fails_without_mutation() {
    let mut graph = FamilyGraph::new();
    let child = graph.add_root(draft("Child", Gender::Male)).unwrap();
    let father = graph
        .add_member(draft("Father", Gender::Male), &child, RelationshipType::Father)
        .unwrap();

    let before = graph.len();
    let err = graph
        .add_member(draft("Second Father", Gender::Male), &child, RelationshipType::Father)
        .unwrap_err();
    assert!(matches!(
        err,
        KinGraphError::InvalidRelationship { slot: "father", .. }
    ));
    // the failed call left the graph untouched
    assert_eq!(graph.len(), before);
    assert_eq!(
        graph.member(&child).unwrap().father_id.as_deref(),
        Some(father.as_str())
    );
}

#[test]
fn test_unknown_related_member() {
    let mut graph = FamilyGraph::new();
    graph.add_root(draft("Root", Gender::Male)).unwrap();
    let err = graph
        .add_member(draft("X", Gender::Male), "member-99", RelationshipType::Child)
        .unwrap_err();
    assert!(matches!(err, KinGraphError::NotFound(_)));
}

#[test]
fn test_dual_parent_backfill() {
    let mut graph = FamilyGraph::new();
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    let mary = graph
        .add_member(draft("Mary", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap();
    let alice = graph
        .add_member(draft("Alice", Gender::Female), &john, RelationshipType::Child)
        .unwrap();

    let alice_member = graph.member(&alice).unwrap();
    assert_eq!(alice_member.father_id.as_deref(), Some(john.as_str()));
    assert_eq!(alice_member.mother_id.as_deref(), Some(mary.as_str()));
    assert!(graph.member(&john).unwrap().children_ids.contains(&alice));
    assert!(graph.member(&mary).unwrap().children_ids.contains(&alice));
    assert_eq!(alice_member.generation, 1);
    assert_invariants(&graph);
}

#[test]
fn test_child_of_single_parent_gets_one_slot() {
    let mut graph = FamilyGraph::new();
    let mother = graph.add_root(draft("Mother", Gender::Female)).unwrap();
    let child = graph
        .add_member(draft("Kid", Gender::Male), &mother, RelationshipType::Child)
        .unwrap();

    let child_member = graph.member(&child).unwrap();
    assert_eq!(child_member.mother_id.as_deref(), Some(mother.as_str()));
    assert!(child_member.father_id.is_none());
    assert_invariants(&graph);
}

#[test]
fn test_can_add_relationship() {
    let mut graph = FamilyGraph::new();
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    assert!(graph.can_add_relationship(&john, RelationshipType::Father));
    assert!(graph.can_add_relationship(&john, RelationshipType::Spouse));
    assert!(graph.can_add_relationship(&john, RelationshipType::Child));
    assert!(!graph.can_add_relationship("member-42", RelationshipType::Child));

    graph
        .add_member(draft("Mary", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap();
    graph
        .add_member(draft("Robert", Gender::Male), &john, RelationshipType::Father)
        .unwrap();
    assert!(!graph.can_add_relationship(&john, RelationshipType::Spouse));
    assert!(!graph.can_add_relationship(&john, RelationshipType::Father));
    assert!(graph.can_add_relationship(&john, RelationshipType::Mother));
    // children are always allowed
    assert!(graph.can_add_relationship(&john, RelationshipType::Child));
}

#[test]
fn test_removal_clears_back_references() {
    let mut graph = FamilyGraph::new();
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    let mary = graph
        .add_member(draft("Mary", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap();
    let alice = graph
        .add_member(draft("Alice", Gender::Female), &john, RelationshipType::Child)
        .unwrap();

    graph.remove_member(&mary).unwrap();

    assert!(!graph.member(&mary).unwrap().is_active);
    assert!(graph.member(&john).unwrap().spouse_id.is_none());
    assert!(graph.member(&alice).unwrap().mother_id.is_none());
    // nobody still references the removed member
    for member in graph.active_members() {
        assert!(!member.children_ids.contains(&mary));
        assert_ne!(member.spouse_id.as_deref(), Some(mary.as_str()));
        assert_ne!(member.father_id.as_deref(), Some(mary.as_str()));
        assert_ne!(member.mother_id.as_deref(), Some(mary.as_str()));
    }
    assert_invariants(&graph);
}

#[test]
fn test_removal_is_idempotent() {
    let mut graph = FamilyGraph::new();
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    let mary = graph
        .add_member(draft("Mary", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap();

    graph.remove_member(&mary).unwrap();
    // removing an already-inactive member is a no-op success
    graph.remove_member(&mary).unwrap();
    assert_eq!(graph.active_count(), 1);

    // an id that never existed is still an error
    let err = graph.remove_member("member-99").unwrap_err();
    assert!(matches!(err, KinGraphError::NotFound(_)));
}

#[test]
fn test_orphan_cleanup_disabled_by_default() {
    let mut graph = FamilyGraph::new();
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    graph
        .add_member(draft("Mary", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap();
    let robert = graph
        .add_member(draft("Robert", Gender::Male), &john, RelationshipType::Father)
        .unwrap();

    // Robert's only link was his child John; with cleanup off he
    // survives the removal as an isolated ancestor
    graph.remove_member(&john).unwrap();
    assert!(graph.member(&robert).unwrap().is_active);
}

#[test]
fn test_orphan_cleanup_when_enabled() {
    let config = GraphConfig {
        orphan_cleanup: true,
    };
    let mut graph = FamilyGraph::with_config(config);
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    let mary = graph
        .add_member(draft("Mary", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap();
    let alice = graph
        .add_member(draft("Alice", Gender::Female), &john, RelationshipType::Child)
        .unwrap();
    let robert = graph
        .add_member(draft("Robert", Gender::Male), &john, RelationshipType::Father)
        .unwrap();

    // removing John strips Robert's only link; Mary and Alice keep
    // their mother/child edge and must survive the cascade
    graph.remove_member(&john).unwrap();
    assert!(!graph.member(&robert).unwrap().is_active);
    assert!(graph.member(&mary).unwrap().is_active);
    assert!(graph.member(&alice).unwrap().is_active);
}

#[test]
fn test_orphan_cleanup_spares_sole_member() {
    let config = GraphConfig {
        orphan_cleanup: true,
    };
    let mut graph = FamilyGraph::with_config(config);
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    let mary = graph
        .add_member(draft("Mary", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap();

    graph.remove_member(&mary).unwrap();
    // John is isolated but the graph never cleans down to zero
    assert!(graph.member(&john).unwrap().is_active);
    assert_eq!(graph.active_count(), 1);
}

#[test]
fn test_long_mutation_sequence_keeps_invariants() {
    let mut graph = FamilyGraph::new();
    let root = graph.add_root(draft("Root", Gender::Male)).unwrap();
    let spouse = graph
        .add_member(draft("Spouse", Gender::Female), &root, RelationshipType::Spouse)
        .unwrap();
    let mut last_child = root.clone();
    for i in 0..4 {
        last_child = graph
            .add_member(
                draft(&format!("Child {i}"), Gender::Male),
                &last_child,
                RelationshipType::Child,
            )
            .unwrap();
        graph
            .add_member(
                draft(&format!("Partner {i}"), Gender::Female),
                &last_child,
                RelationshipType::Spouse,
            )
            .unwrap();
        assert_invariants(&graph);
    }
    graph.remove_member(&spouse).unwrap();
    graph.remove_member(&last_child).unwrap();
    assert_invariants(&graph);
}
