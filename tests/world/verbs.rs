//! Integration tests for the built-in verbs
//!
//! Drives each verb through resolution and `perform`, the way the driver
//! does, and checks who was told what.

use hearth_foundation::{Discard, EntityId, Transcript};
use hearth_world::{CommandResolver, World, perform, verbs};

struct Inn {
    world: World,
    hall: EntityId,
    yard: EntityId,
    ann: EntityId,
    bob: EntityId,
    cid: EntityId,
}

fn inn() -> Inn {
    let mut world = World::new();
    let area = world.spawn(verbs::area("Inn"));
    world.attach_root(area).unwrap();
    let hall = world.spawn(verbs::room("Hall", "A smoky hall."));
    let yard = world.spawn(verbs::room("Yard", "A muddy yard."));
    world.add(area, hall, &Discard).unwrap();
    world.add(area, yard, &Discard).unwrap();
    world.add_exit(hall, "out", yard).unwrap();
    world.add_exit(yard, "in", hall).unwrap();

    let ann = world.spawn(verbs::player("Ann"));
    let bob = world.spawn(verbs::player("Bob"));
    let cid = world.spawn(verbs::player("Cid"));
    for p in [ann, bob, cid] {
        world.add(hall, p, &Discard).unwrap();
    }
    Inn {
        world,
        hall,
        yard,
        ann,
        bob,
        cid,
    }
}

fn run(world: &mut World, issuer: EntityId, line: &str) -> Transcript {
    let out = Transcript::new();
    let mut action = CommandResolver::resolve(world, issuer, line)
        .unwrap()
        .unwrap();
    perform(action.as_mut(), world, &out).unwrap();
    out
}

// =============================================================================
// Speech
// =============================================================================

#[test]
fn say_reaches_caller_once_and_each_sibling_once() {
    let mut inn = inn();
    let out = run(&mut inn.world, inn.ann, "say hello");

    assert_eq!(out.received_by(inn.ann), vec!["You say, \"hello\""]);
    assert_eq!(out.received_by(inn.bob), vec!["Ann says, \"hello\""]);
    assert_eq!(out.received_by(inn.cid), vec!["Ann says, \"hello\""]);
    assert!(out.received_by(inn.hall).is_empty());
}

#[test]
fn emote_uses_caller_name() {
    let mut inn = inn();
    let out = run(&mut inn.world, inn.bob, "emote grins widely");
    assert_eq!(
        out.recipients_of("::: Bob grins widely :::"),
        vec![inn.bob, inn.ann, inn.cid]
    );
}

// =============================================================================
// Looking Around
// =============================================================================

#[test]
fn look_shows_room_and_others() {
    let mut inn = inn();
    let out = run(&mut inn.world, inn.bob, "look");
    assert_eq!(
        out.received_by(inn.bob),
        vec!["Hall\nA smoky hall.\nObvious exits are out.\n Ann\n Cid"]
    );
    assert_eq!(out.len(), 1);
}

#[test]
fn go_then_look_from_new_room() {
    let mut inn = inn();
    let out = run(&mut inn.world, inn.ann, "go out");

    assert_eq!(inn.world.parent_of(inn.ann), Some(inn.yard));
    assert_eq!(out.received_by(inn.bob), vec!["Ann leaves."]);
    assert_eq!(out.received_by(inn.cid), vec!["Ann leaves."]);
    assert_eq!(
        out.received_by(inn.ann).last().map(String::as_str),
        Some("Yard\nA muddy yard.\nObvious exits are in.")
    );

    let out = run(&mut inn.world, inn.ann, "go in");
    assert_eq!(inn.world.parent_of(inn.ann), Some(inn.hall));
    assert_eq!(out.received_by(inn.bob), vec!["Ann enters."]);
    inn.world.check_invariants().unwrap();
}

// =============================================================================
// Help and Quit
// =============================================================================

#[test]
fn help_on_each_kit_verb_has_usage() {
    let mut inn = inn();
    for verb in ["look", "say", "emote", "quit", "help", "go"] {
        let out = run(&mut inn.world, inn.ann, &format!("help {verb}"));
        let text = &out.received_by(inn.ann)[0];
        assert!(text.starts_with("Usage: "), "{verb}: {text}");
    }
}

#[test]
fn quit_detaches_and_hangs_up_after_telling_the_room() {
    let mut inn = inn();
    let out = run(&mut inn.world, inn.cid, "quit");

    assert_eq!(inn.world.parent_of(inn.cid), None);
    assert!(!inn.world.exists(inn.cid));
    assert_eq!(inn.world.children_of(inn.hall), &[inn.ann, inn.bob]);
    assert_eq!(out.hung_up(), vec![inn.cid]);

    let bob_heard = out.received_by(inn.bob);
    assert_eq!(bob_heard, vec!["Cid has left this world.", "Cid leaves."]);
}

#[test]
fn quit_something_is_refused() {
    let mut inn = inn();
    let out = run(&mut inn.world, inn.cid, "quit game");

    assert_eq!(inn.world.parent_of(inn.cid), Some(inn.hall));
    assert_eq!(out.received_by(inn.cid), vec!["Quit what?"]);
    assert!(out.hung_up().is_empty());
}
