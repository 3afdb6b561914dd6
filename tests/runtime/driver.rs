//! Integration tests for the driver
//!
//! Tests draining, failure isolation, heartbeats, and the threaded driver.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use hearth_foundation::{Deliver, Discard, EntityId, Error, Result, Transcript};
use hearth_runtime::{Driver, DriverConfig, FAILURE_MESSAGE, Heartbeat, Task};
use hearth_world::verbs::{self, Say};
use hearth_world::{Action, Notice, Slot, World};

fn world_with_two() -> (World, EntityId, EntityId, EntityId) {
    let mut world = World::new();
    let hall = world.spawn(verbs::room("Hall", "A hall."));
    world.set_starting("main", hall).unwrap();
    let ann = world.spawn(verbs::player("Ann"));
    let bob = world.spawn(verbs::player("Bob"));
    world.add(hall, ann, &Discard).unwrap();
    world.add(hall, bob, &Discard).unwrap();
    (world, hall, ann, bob)
}

fn wait_until(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(2));
    }
}

#[derive(Debug)]
struct FailingAfterMove {
    caller: EntityId,
    to: EntityId,
}

impl Action for FailingAfterMove {
    fn name(&self) -> &str {
        "stumble"
    }

    fn caller(&self) -> EntityId {
        self.caller
    }

    fn action(&mut self, world: &mut World, out: &dyn Deliver) -> Result<bool> {
        let from = world.parent_of(self.caller).unwrap_or(self.to);
        world.move_entity(from, self.to, self.caller, out)?;
        Ok(true)
    }

    fn respond(&self, _world: &World, _outcome: bool, _notice: &mut Notice) -> Result<()> {
        Err(Error::action_failed("cannot describe the stumble"))
    }
}

// =============================================================================
// Draining
// =============================================================================

#[test]
fn constructed_actions_run_directly() {
    let (world, _, ann, bob) = world_with_two();
    let out = Arc::new(Transcript::new());
    let mut driver = Driver::new(world, out.clone(), DriverConfig::default());

    driver
        .submitter()
        .submit_action(Some(ann), Box::new(Say::new(ann, "queued")))
        .unwrap();
    driver.drain().unwrap();

    assert_eq!(out.received_by(bob), vec!["Ann says, \"queued\""]);
}

#[test]
fn one_command_completes_before_the_next() {
    let (world, hall, ann, bob) = world_with_two();
    let out = Arc::new(Transcript::new());
    let mut driver = Driver::new(world, out.clone(), DriverConfig::default());
    let q = driver.submitter();

    q.submit(ann, "quit").unwrap();
    q.submit(bob, "look").unwrap();
    driver.drain().unwrap();

    // Bob's look already sees the room without Ann.
    assert_eq!(
        out.received_by(bob).last().map(String::as_str),
        Some("Hall\nA hall.\nThere are no obvious exits.")
    );
    assert_eq!(driver.world().children_of(hall), &[bob]);
}

#[test]
fn failed_step_is_not_rolled_back() {
    let (mut world, hall, ann, _) = world_with_two();
    let cellar = world.spawn(verbs::room("Cellar", "Dark."));
    let out = Arc::new(Transcript::new());
    let mut driver = Driver::new(world, out.clone(), DriverConfig::default());
    let q = driver.submitter();

    q.submit_action(Some(ann), Box::new(FailingAfterMove { caller: ann, to: cellar }))
        .unwrap();
    q.submit(ann, "say down here").unwrap();
    driver.drain().unwrap();

    assert_eq!(driver.world().parent_of(ann), Some(cellar));
    assert!(!driver.world().children_of(hall).contains(&ann));
    let heard = out.received_by(ann);
    assert!(heard.contains(&FAILURE_MESSAGE.to_string()));
    assert_eq!(heard.last().map(String::as_str), Some("You say, \"down here\""));
    assert_eq!(driver.stats().failed, 1);
    assert_eq!(driver.stats().executed, 1);
}

#[test]
fn system_command_failure_tells_nobody() {
    #[derive(Debug)]
    struct Broken;

    impl Task for Broken {
        fn describe(&self) -> &str {
            "broken"
        }

        fn run(self: Box<Self>, _world: &mut World, _out: &dyn Deliver) -> Result<()> {
            Err(Error::action_failed("no"))
        }
    }

    let (world, _, _, _) = world_with_two();
    let out = Arc::new(Transcript::new());
    let mut driver = Driver::new(world, out.clone(), DriverConfig::default());
    driver.submitter().submit_task(None, Box::new(Broken)).unwrap();

    driver.drain().unwrap();
    assert!(out.is_empty());
    assert_eq!(driver.stats().failed, 1);
}

#[test]
fn line_without_sender_is_ignored() {
    let (world, _, _, _) = world_with_two();
    let out = Arc::new(Transcript::new());
    let mut driver = Driver::new(world, out.clone(), DriverConfig::default());
    driver
        .submitter()
        .enqueue(None, hearth_runtime::Payload::Line("say hi".into()))
        .unwrap();

    driver.drain().unwrap();
    assert!(out.is_empty());
}

// =============================================================================
// Heartbeat
// =============================================================================

struct Chime {
    rung: Arc<AtomicUsize>,
    room: EntityId,
}

impl Heartbeat for Chime {
    fn name(&self) -> &str {
        "chime"
    }

    fn beat(&mut self, world: &mut World, out: &dyn Deliver) {
        self.rung.fetch_add(1, Ordering::SeqCst);
        let mut notice = Notice::new(self.room);
        notice.tell(Slot::CallerChildren, "A bell chimes.");
        notice.send(world, out);
    }
}

#[test]
fn heartbeat_runs_on_interval_independent_of_commands() {
    let (world, hall, ann, bob) = world_with_two();
    let out = Arc::new(Transcript::new());
    let rung = Arc::new(AtomicUsize::new(0));
    let config = DriverConfig::default()
        .with_heartbeat(Duration::from_millis(10))
        .with_idle_quantum(Duration::from_millis(1));
    let handle = Driver::new(world, out.clone(), config)
        .with_heartbeat(Box::new(Chime {
            rung: Arc::clone(&rung),
            room: hall,
        }))
        .spawn()
        .unwrap();

    wait_until(|| rung.load(Ordering::SeqCst) >= 3);
    let driver = handle.stop().unwrap();

    assert!(rung.load(Ordering::SeqCst) >= 3);
    assert!(driver.stats().heartbeats >= 3);
    assert!(out.received_by(ann).iter().all(|t| t == "A bell chimes."));
    assert!(!out.received_by(bob).is_empty());
}

// =============================================================================
// Threaded Driver
// =============================================================================

#[test]
fn threaded_driver_serves_many_producers() {
    let (world, _, ann, bob) = world_with_two();
    let out = Arc::new(Transcript::new());
    let handle = Driver::new(world, out.clone(), DriverConfig::default())
        .spawn()
        .unwrap();

    let producers: Vec<_> = [ann, bob]
        .into_iter()
        .map(|who| {
            let q = handle.submitter();
            thread::spawn(move || {
                for n in 0..50 {
                    q.submit(who, format!("say {n}")).unwrap();
                }
            })
        })
        .collect();
    for p in producers {
        p.join().unwrap();
    }

    wait_until(|| out.received_by(ann).len() >= 100);
    let driver = handle.stop().unwrap();

    let mine: Vec<String> = out
        .received_by(ann)
        .into_iter()
        .filter(|t| t.starts_with("You say"))
        .collect();
    let expected: Vec<String> = (0..50).map(|n| format!("You say, \"{n}\"")).collect();
    assert_eq!(mine, expected);
    assert_eq!(driver.stats().executed, 100);
}
