//! A small starter world so the server has somewhere to stand.

use hearth_foundation::{Discard, Result};
use hearth_world::{World, verbs};

/// Tag of the starter world's arrival room.
pub const MAIN: &str = "main";

/// Builds one area with two connected rooms and tags the first as
/// [`MAIN`].
///
/// # Errors
///
/// Only fails on an internal inconsistency while linking.
pub fn starter_world() -> Result<World> {
    let mut world = World::new();

    let area = world.spawn(verbs::area("Hearthstead"));
    world.attach_root(area)?;

    let common = world.spawn(verbs::room(
        "The Common Room",
        "A low-beamed room warmed by a wide stone hearth. A door leads north.",
    ));
    let yard = world.spawn(verbs::room(
        "The Courtyard",
        "Cobbles slick with rain surround a dry well. The common room lies south.",
    ));

    world.add(area, common, &Discard)?;
    world.add(area, yard, &Discard)?;
    world.add_exit(common, "north", yard)?;
    world.add_exit(yard, "south", common)?;
    world.set_starting(MAIN, common)?;

    Ok(world)
}
