//! Tests for generation derivation across graph mutations

use kin_graph::{FamilyGraph, Gender, MemberDraft, RelationshipType};

fn draft(name: &str, gender: Gender) -> MemberDraft {
    MemberDraft::new(name, gender)
}

/// Generation monotonicity: every child sits at least one level below
/// each parent, spouses share a level
fn assert_generation_invariants(graph: &FamilyGraph) {
    for member in graph.active_members() {
        for parent_id in [member.father_id.as_deref(), member.mother_id.as_deref()]
            .into_iter()
            .flatten()
        {
            if let Some(parent) = graph.active_member(parent_id) {
                assert!(
                    member.generation >= parent.generation + 1,
                    "child {} (gen {}) not below parent {} (gen {})",
                    member.id,
                    member.generation,
                    parent.id,
                    parent.generation
                );
            }
        }
        if let Some(spouse) = graph.active_spouse(member) {
            assert_eq!(
                member.generation, spouse.generation,
                "spouses {} and {} on different levels",
                member.id, spouse.id
            );
        }
    }
}

#[test]
fn test_root_starts_at_zero() {
    let mut graph = FamilyGraph::new();
    let root = graph.add_root(draft("Root", Gender::Male)).unwrap();
    assert_eq!(graph.member(&root).unwrap().generation, 0);
}

#[test]
fn test_child_is_one_below_parent() {
    let mut graph = FamilyGraph::new();
    let root = graph.add_root(draft("Root", Gender::Male)).unwrap();
    let child = graph
        .add_member(draft("Child", Gender::Female), &root, RelationshipType::Child)
        .unwrap();
    let grandchild = graph
        .add_member(draft("Grandchild", Gender::Male), &child, RelationshipType::Child)
        .unwrap();

    assert_eq!(graph.member(&root).unwrap().generation, 0);
    assert_eq!(graph.member(&child).unwrap().generation, 1);
    assert_eq!(graph.member(&grandchild).unwrap().generation, 2);
    assert_generation_invariants(&graph);
}

#[test]
fn test_adding_a_parent_shifts_generations_down() {
    let mut graph = FamilyGraph::new();
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    let alice = graph
        .add_member(draft("Alice", Gender::Female), &john, RelationshipType::Child)
        .unwrap();
    // John stops being a root once his father exists
    let robert = graph
        .add_member(draft("Robert", Gender::Male), &john, RelationshipType::Father)
        .unwrap();

    assert_eq!(graph.member(&robert).unwrap().generation, 0);
    assert_eq!(graph.member(&john).unwrap().generation, 1);
    assert_eq!(graph.member(&alice).unwrap().generation, 2);
    assert_eq!(graph.find_roots().len(), 1);
    assert_generation_invariants(&graph);
}

#[test]
fn test_spouse_is_pulled_to_partner_level() {
    let mut graph = FamilyGraph::new();
    let john = graph.add_root(draft("John", Gender::Male)).unwrap();
    let robert = graph
        .add_member(draft("Robert", Gender::Male), &john, RelationshipType::Father)
        .unwrap();
    // Mary has no parents of her own, yet must sit on John's level
    let mary = graph
        .add_member(draft("Mary", Gender::Female), &john, RelationshipType::Spouse)
        .unwrap();

    assert_eq!(graph.member(&robert).unwrap().generation, 0);
    assert_eq!(graph.member(&john).unwrap().generation, 1);
    assert_eq!(graph.member(&mary).unwrap().generation, 1);
    assert_generation_invariants(&graph);
}

#[test]
fn test_child_takes_max_of_uneven_parents() {
    let mut graph = FamilyGraph::new();
    // deep side: grandmother -> mother
    let grandmother = graph.add_root(draft("Grandmother", Gender::Female)).unwrap();
    let mother = graph
        .add_member(draft("Mother", Gender::Female), &grandmother, RelationshipType::Child)
        .unwrap();
    // shallow side: father marries into the deep branch
    let father = graph
        .add_member(draft("Father", Gender::Male), &mother, RelationshipType::Spouse)
        .unwrap();
    let child = graph
        .add_member(draft("Child", Gender::Male), &father, RelationshipType::Child)
        .unwrap();

    assert_eq!(graph.member(&mother).unwrap().generation, 1);
    assert_eq!(graph.member(&father).unwrap().generation, 1);
    // one below the deeper parent, not below generation 0
    assert_eq!(graph.member(&child).unwrap().generation, 2);
    assert_generation_invariants(&graph);
}

#[test]
fn test_detached_member_keeps_zero() {
    let mut graph = FamilyGraph::new();
    let root = graph.add_root(draft("Root", Gender::Male)).unwrap();
    graph
        .add_member(draft("Child", Gender::Male), &root, RelationshipType::Child)
        .unwrap();
    let loner = graph.add_root(draft("Loner", Gender::Unknown)).unwrap();

    assert_eq!(graph.member(&loner).unwrap().generation, 0);
    assert_eq!(graph.find_roots().len(), 2);
}

#[test]
fn test_removal_promotes_children_to_roots() {
    let mut graph = FamilyGraph::new();
    let root = graph.add_root(draft("Root", Gender::Male)).unwrap();
    let child = graph
        .add_member(draft("Child", Gender::Female), &root, RelationshipType::Child)
        .unwrap();
    let grandchild = graph
        .add_member(draft("Grandchild", Gender::Male), &child, RelationshipType::Child)
        .unwrap();

    graph.remove_member(&root).unwrap();

    // the orphaned child becomes a root and the levels close up
    assert_eq!(graph.member(&child).unwrap().generation, 0);
    assert_eq!(graph.member(&grandchild).unwrap().generation, 1);
    assert_eq!(graph.find_roots().len(), 1);
    assert_generation_invariants(&graph);
}
