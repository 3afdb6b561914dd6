//! Integration tests for command resolution
//!
//! Tests the relationship-scoped lookup order and what resolution returns.

use hearth_foundation::{Discard, ErrorKind, Transcript};
use hearth_world::verbs::{self, Look};
use hearth_world::{Audience, CommandResolver, EntityNode, World, perform};

// =============================================================================
// Lookup Order
// =============================================================================

#[test]
fn resolution_order_is_self_container_children_siblings() {
    let mut world = World::new();
    let room = world.spawn(EntityNode::new("Hall").with_verb(
        Audience::Contents,
        "poke",
        Look::build,
        "room",
    ));
    let me = world.spawn(EntityNode::new("me").with_verb(Audience::Itself, "poke", Look::build, "self"));
    let held = world.spawn(EntityNode::new("stick").with_verb(
        Audience::Container,
        "poke",
        Look::build,
        "child",
    ));
    let near = world.spawn(EntityNode::new("bell").with_verb(
        Audience::Siblings,
        "poke",
        Look::build,
        "sibling",
    ));
    world.add(room, me, &Discard).unwrap();
    world.add(room, near, &Discard).unwrap();
    world.add(me, held, &Discard).unwrap();

    let usage = |world: &World| CommandResolver::lookup(world, me, "poke").map(|r| r.entry.usage);

    assert_eq!(usage(&world), Some("self"));

    world.node_mut(me).unwrap().unregister(Audience::Itself, "poke");
    assert_eq!(usage(&world), Some("room"));

    world.node_mut(room).unwrap().unregister(Audience::Contents, "poke");
    assert_eq!(usage(&world), Some("child"));

    world.remove(me, held, &Discard).unwrap();
    assert_eq!(usage(&world), Some("sibling"));

    world.remove(room, near, &Discard).unwrap();
    assert_eq!(usage(&world), None);
}

#[test]
fn no_fallthrough_once_a_table_matches() {
    let mut world = World::new();
    let room = world.spawn(verbs::room("Hall", "A hall."));
    // The player's own `go` shadows the room's even though it does nothing useful.
    let me = world.spawn(verbs::player("Ann").with_verb(Audience::Itself, "go", Look::build, "mine"));
    world.add(room, me, &Discard).unwrap();

    let found = CommandResolver::lookup(&world, me, "go").unwrap();
    assert_eq!(found.owner, me);
    assert_eq!(found.entry.usage, "mine");
}

#[test]
fn verbs_are_case_sensitive() {
    let mut world = World::new();
    let me = world.spawn(verbs::player("Ann"));
    let err = CommandResolver::resolve(&world, me, "LOOK").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownCommand(ref v) if v == "LOOK"));
}

// =============================================================================
// Resolution Results
// =============================================================================

#[test]
fn resolve_returns_unexecuted_action() {
    let mut world = World::new();
    let room = world.spawn(verbs::room("Hall", "A hall."));
    let me = world.spawn(verbs::player("Ann"));
    world.add(room, me, &Discard).unwrap();

    let action = CommandResolver::resolve(&world, me, "say hello there")
        .unwrap()
        .unwrap();
    assert_eq!(action.name(), "say");
    assert_eq!(action.caller(), me);
}

#[test]
fn resolved_action_gets_trailing_text() {
    let mut world = World::new();
    let room = world.spawn(verbs::room("Hall", "A hall."));
    let me = world.spawn(verbs::player("Ann"));
    world.add(room, me, &Discard).unwrap();
    let out = Transcript::new();

    let mut action = CommandResolver::resolve(&world, me, "say   hello   there ")
        .unwrap()
        .unwrap();
    perform(action.as_mut(), &mut world, &out).unwrap();

    assert_eq!(out.received_by(me), vec!["You say, \"hello   there\""]);
}

#[test]
fn resolving_for_dead_issuer_fails() {
    let mut world = World::new();
    let me = world.spawn(verbs::player("Ann"));
    world.destroy(me).unwrap();
    assert!(CommandResolver::resolve(&world, me, "look").is_err());
}

#[test]
fn container_verb_resolves_with_owner() {
    let mut world = World::new();
    let room = world.spawn(verbs::room("Hall", "A hall."));
    let me = world.spawn(verbs::player("Ann"));
    world.add(room, me, &Discard).unwrap();

    let found = CommandResolver::lookup(&world, me, "go").unwrap();
    assert_eq!(found.owner, room);
    assert_eq!(found.audience, Audience::Contents);
    assert_eq!(found.entry.usage, verbs::go::USAGE);
}
