//! Walkthrough: build a three-generation family, lay it out and print
//! the rendering shapes.
//!
//! Run with `cargo run --example build_family`.

use anyhow::Result;
use kin_graph::{
    FamilyDirectory, Gender, LayoutConfig, MemberDraft, RelationshipType, TreeLayout,
    serialize_tree,
};

fn main() -> Result<()> {
    env_logger::init();

    let mut directory = FamilyDirectory::new();
    let family_key = directory.create_family("The Doe Family")?.family_key.clone();

    let john = directory.add_member(
        &family_key,
        MemberDraft::new("John Doe", Gender::Male),
        None,
    )?;
    let mary = directory.add_member(
        &family_key,
        MemberDraft::new("Mary Doe", Gender::Female),
        Some((&john, RelationshipType::Spouse)),
    )?;
    directory.add_member(
        &family_key,
        MemberDraft::new("Alice Doe", Gender::Female),
        Some((&john, RelationshipType::Child)),
    )?;
    directory.add_member(
        &family_key,
        MemberDraft::new("Bob Doe", Gender::Male),
        Some((&mary, RelationshipType::Child)),
    )?;
    directory.add_member(
        &family_key,
        MemberDraft::new("Robert Doe Sr.", Gender::Male),
        Some((&john, RelationshipType::Father)),
    )?;

    let record = directory.get_family(&family_key)?;
    let graph = record.graph();

    println!("family {} with {} members", record.name, graph.active_count());
    for member in graph.active_members() {
        println!("  gen {}  {} ({})", member.generation, member.name, member.id);
    }

    let layout = TreeLayout::compute(graph, &LayoutConfig::default());
    println!("\nlayout ({} x {}):", layout.width(), layout.height());
    for (id, position) in layout.positions() {
        println!("  {id}: ({}, {}) level {}", position.x, position.y, position.level);
    }
    println!("connectors: {}", layout.connectors().len());

    if let Some(root) = graph.default_root() {
        let tree = serialize_tree(graph, &root.id)?;
        println!("\ntree from {}:\n{}", root.name, serde_json::to_string_pretty(&tree)?);
    }

    let snapshot = directory.snapshot(&family_key)?;
    println!("\nsnapshot round-trips {} member records", snapshot.members.len());
    Ok(())
}
