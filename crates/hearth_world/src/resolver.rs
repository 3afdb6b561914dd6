//! Relationship-scoped command resolution.
//!
//! A verb is looked up in the tables reachable from the issuer, first match
//! wins:
//!
//! 1. the issuer's own table
//! 2. its container's table for contents
//! 3. each child's table for its container, in child order
//! 4. each sibling's table for siblings, in sibling order
//!
//! There is no global verb table.

use hearth_foundation::{EntityId, Error, Result};
use tracing::debug;

use crate::action::{Action, Invocation};
use crate::node::{Audience, VerbEntry};
use crate::world::World;

/// Where a verb was found.
#[derive(Clone, Copy, Debug)]
pub struct Resolved {
    /// Entity whose table held the verb.
    pub owner: EntityId,
    /// Which of its tables.
    pub audience: Audience,
    /// The registered entry.
    pub entry: VerbEntry,
}

/// Resolves raw input lines into actions.
pub struct CommandResolver;

impl CommandResolver {
    /// Splits a line into verb and trailing text.
    ///
    /// The first run of whitespace is the delimiter; the trail keeps any
    /// inner spacing and is empty, never absent, when nothing follows.
    #[must_use]
    pub fn split_command(line: &str) -> (&str, &str) {
        let line = line.trim();
        match line.find(char::is_whitespace) {
            Some(at) => (&line[..at], line[at..].trim_start()),
            None => (line, ""),
        }
    }

    /// The tables consulted for an issuer, in resolution order.
    #[must_use]
    pub fn scopes(world: &World, issuer: EntityId) -> Vec<(EntityId, Audience)> {
        let mut scopes = vec![(issuer, Audience::Itself)];
        if let Some(parent) = world.parent_of(issuer) {
            scopes.push((parent, Audience::Contents));
        }
        scopes.extend(
            world
                .children_of(issuer)
                .iter()
                .map(|child| (*child, Audience::Container)),
        );
        if let Some(siblings) = world.siblings_of(issuer) {
            scopes.extend(siblings.into_iter().map(|s| (s, Audience::Siblings)));
        }
        scopes
    }

    /// Finds the first table reachable from the issuer that holds the verb.
    #[must_use]
    pub fn lookup(world: &World, issuer: EntityId, verb: &str) -> Option<Resolved> {
        Self::scopes(world, issuer)
            .into_iter()
            .find_map(|(owner, audience)| {
                let entry = world.get(owner)?.commands().get(audience, verb)?;
                Some(Resolved {
                    owner,
                    audience,
                    entry: *entry,
                })
            })
    }

    /// Resolves a line typed by the issuer into an unexecuted action.
    ///
    /// A blank line resolves to `None`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand` if no reachable table holds the verb, or an
    /// arena error if the issuer is not live.
    pub fn resolve(
        world: &World,
        issuer: EntityId,
        line: &str,
    ) -> Result<Option<Box<dyn Action + Send>>> {
        world.node(issuer)?;

        let (verb, trail) = Self::split_command(line);
        if verb.is_empty() {
            return Ok(None);
        }

        let Some(found) = Self::lookup(world, issuer, verb) else {
            return Err(Error::unknown_command(verb));
        };
        debug!(
            issuer = %issuer,
            verb,
            owner = %found.owner,
            audience = ?found.audience,
            "resolved"
        );

        let invocation = Invocation {
            issuer,
            owner: found.owner,
            audience: found.audience,
            verb: verb.to_string(),
            trail: trail.to_string(),
        };
        Ok(Some((found.entry.build)(invocation)))
    }

    /// Every verb reachable by the issuer with the entry that would win,
    /// in resolution order.
    #[must_use]
    pub fn available_verbs(world: &World, issuer: EntityId) -> Vec<(String, Resolved)> {
        let mut verbs: Vec<(String, Resolved)> = Vec::new();
        for (owner, audience) in Self::scopes(world, issuer) {
            let Some(node) = world.get(owner) else {
                continue;
            };
            for (verb, entry) in node.commands().table(audience) {
                if verbs.iter().any(|(known, _)| known == verb) {
                    continue;
                }
                verbs.push((
                    verb.clone(),
                    Resolved {
                        owner,
                        audience,
                        entry: *entry,
                    },
                ));
            }
        }
        verbs
    }
}
