//! End-to-end scenarios
//!
//! Each scenario builds a small world, submits commands through the queue,
//! drains the driver and checks what every participant was told.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;
use hearth_foundation::{Discard, EntityId, Transcript};
use hearth_runtime::{Driver, DriverConfig, EnterWorld, SessionLink, Sessions};
use hearth_world::{World, verbs};

fn room_with(names: &[&str]) -> (World, EntityId, Vec<EntityId>) {
    let mut world = World::new();
    let area = world.spawn(verbs::area("Vale"));
    world.attach_root(area).unwrap();
    let room = world.spawn(verbs::room("Green", "Soft grass underfoot."));
    world.add(area, room, &Discard).unwrap();
    world.set_starting("main", room).unwrap();

    let players = names
        .iter()
        .map(|name| {
            let p = world.spawn(verbs::player(*name));
            world.add(room, p, &Discard).unwrap();
            p
        })
        .collect();
    (world, room, players)
}

fn drained(rx: &Receiver<String>) -> Vec<String> {
    rx.try_iter().collect()
}

// =============================================================================
// Arrival
// =============================================================================

#[test]
fn entering_an_empty_room() {
    let (mut world, room, _) = room_with(&[]);
    let out = Transcript::new();
    let pat = world.spawn(verbs::player("Pat"));

    world.add(room, pat, &out).unwrap();

    assert_eq!(world.parent_of(pat), Some(room));
    assert_eq!(world.children_of(room), &[pat]);
    assert_eq!(out.received_by(pat), vec!["You enter Green."]);
    // Only the room itself is told; it has no other occupants.
    assert_eq!(out.received_by(room), vec!["Pat enters you."]);
    assert_eq!(out.len(), 2);
}

#[test]
fn entering_through_the_queue_greets_and_shows_the_room() {
    let (world, room, players) = room_with(&["Ann"]);
    let sessions = Arc::new(Sessions::new());
    let mut driver = Driver::new(world, sessions.clone(), DriverConfig::default());

    let (ann_tx, ann_rx) = crossbeam_channel::unbounded();
    sessions.bind(players[0], SessionLink::new(ann_tx));
    let (tx, rx) = crossbeam_channel::unbounded();
    let (reply, entered) = crossbeam_channel::bounded(1);
    let task = EnterWorld::new("Pat", "main")
        .with_session(Arc::clone(&sessions), SessionLink::new(tx))
        .with_reply(reply);
    driver.submitter().submit_task(None, Box::new(task)).unwrap();
    driver.drain().unwrap();

    let pat = entered.try_recv().unwrap();
    assert_eq!(driver.world().parent_of(pat), Some(room));
    assert_eq!(
        drained(&rx),
        vec![
            "You enter Green.",
            "You arrive into this world.",
            "Green\nSoft grass underfoot.\nThere are no obvious exits.\n Ann",
        ]
    );
    assert_eq!(
        drained(&ann_rx),
        vec!["Pat enters.", "Pat arrives into this world."]
    );
}

// =============================================================================
// Speech
// =============================================================================

#[test]
fn saying_hello() {
    let (world, _, players) = room_with(&["Ann", "Bob"]);
    let (ann, bob) = (players[0], players[1]);
    let out = Arc::new(Transcript::new());
    let mut driver = Driver::new(world, out.clone(), DriverConfig::default());

    driver.submitter().submit(ann, "say hello").unwrap();
    driver.drain().unwrap();

    assert_eq!(out.received_by(ann), vec!["You say, \"hello\""]);
    assert_eq!(out.received_by(bob), vec!["Ann says, \"hello\""]);
}

// =============================================================================
// Unknown Verbs
// =============================================================================

#[test]
fn unknown_verb_leaves_the_world_alone() {
    let (world, room, players) = room_with(&["Ann", "Bob"]);
    let (ann, bob) = (players[0], players[1]);
    let out = Arc::new(Transcript::new());
    let mut driver = Driver::new(world, out.clone(), DriverConfig::default());

    let q = driver.submitter();
    q.submit(ann, "dance wildly").unwrap();
    q.submit(ann, "say still here").unwrap();
    driver.drain().unwrap();

    assert_eq!(
        out.received_by(ann),
        vec!["\"dance\" is not a valid command.", "You say, \"still here\""]
    );
    assert_eq!(out.received_by(bob), vec!["Ann says, \"still here\""]);
    assert_eq!(driver.world().children_of(room), &[ann, bob]);
    assert_eq!(driver.stats().unknown, 1);
    driver.world().check_invariants().unwrap();
}

// =============================================================================
// Quitting
// =============================================================================

#[test]
fn quitting_tells_the_room_then_detaches_goes_offline_and_frees_the_body() {
    let (world, room, players) = room_with(&["Ann", "Bob"]);
    let (ann, bob) = (players[0], players[1]);
    let sessions = Arc::new(Sessions::new());
    let (ann_tx, ann_rx) = crossbeam_channel::unbounded();
    let (bob_tx, bob_rx) = crossbeam_channel::unbounded();
    let ann_link = SessionLink::new(ann_tx);
    let ann_online = ann_link.online_flag();
    sessions.bind(ann, ann_link);
    sessions.bind(bob, SessionLink::new(bob_tx));
    let mut driver = Driver::new(world, sessions.clone(), DriverConfig::default());

    driver.submitter().submit(ann, "quit").unwrap();
    driver.drain().unwrap();

    assert_eq!(driver.world().parent_of(ann), None);
    assert_eq!(driver.world().children_of(room), &[bob]);
    assert!(!driver.world().exists(ann));

    assert!(!sessions.is_online(ann));
    assert!(!ann_online.load(std::sync::atomic::Ordering::Acquire));
    assert_eq!(
        drained(&ann_rx),
        vec!["Goodbye, see you soon.", "You leave Green."]
    );
    assert_eq!(
        drained(&bob_rx),
        vec!["Ann has left this world.", "Ann leaves."]
    );

    // Later lines from the freed body reach nobody.
    driver.submitter().submit(ann, "say anyone?").unwrap();
    driver.drain().unwrap();
    assert!(drained(&bob_rx).is_empty());
}

#[test]
fn login_and_quit_cycles_do_not_grow_the_world() {
    let (world, room, _) = room_with(&[]);
    let sessions = Arc::new(Sessions::new());
    let mut driver = Driver::new(world, sessions.clone(), DriverConfig::default());
    let before = driver.world().entity_count();

    for n in 0..200 {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let (reply, entered) = crossbeam_channel::bounded(1);
        let task = EnterWorld::new(format!("Guest{n}"), "main")
            .with_session(Arc::clone(&sessions), SessionLink::new(tx))
            .with_reply(reply);
        driver.submitter().submit_task(None, Box::new(task)).unwrap();
        driver.drain().unwrap();

        let guest = entered.try_recv().unwrap();
        assert_eq!(driver.world().entity_count(), before + 1);
        driver.submitter().submit(guest, "quit").unwrap();
        driver.drain().unwrap();
        assert!(!driver.world().exists(guest));
    }

    assert_eq!(driver.world().entity_count(), before);
    assert!(driver.world().children_of(room).is_empty());
    assert!(sessions.is_empty());
    assert_eq!(driver.stats().failed, 0);
    driver.world().check_invariants().unwrap();
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn producers_on_many_threads_keep_their_own_order() {
    let names = ["Ann", "Bob", "Cid", "Dee"];
    let (world, _, players) = room_with(&names);
    let out = Arc::new(Transcript::new());
    let mut driver = Driver::new(world, out.clone(), DriverConfig::default());

    let producers: Vec<_> = players
        .iter()
        .map(|&who| {
            let q = driver.submitter();
            thread::spawn(move || {
                for n in 0..25 {
                    q.submit(who, format!("emote counts {n}")).unwrap();
                }
            })
        })
        .collect();
    for p in producers {
        p.join().unwrap();
    }
    driver.drain().unwrap();

    let observer = players[0];
    let heard = out.received_by(observer);
    assert_eq!(heard.len(), names.len() * 25);
    for name in names {
        let from_one: Vec<String> = heard
            .iter()
            .filter(|t| t.starts_with(&format!("::: {name} ")))
            .cloned()
            .collect();
        let expected: Vec<String> = (0..25)
            .map(|n| format!("::: {name} counts {n} :::"))
            .collect();
        assert_eq!(from_one, expected);
    }
    driver.world().check_invariants().unwrap();
}
