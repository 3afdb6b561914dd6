//! Entity nodes and their per-audience command tables.

use std::collections::BTreeMap;
use std::fmt;

use hearth_foundation::EntityId;

use crate::action::ActionFactory;

/// What an entity is, for rendering and kit construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A top-level grouping of rooms; usually a tree root.
    Area,
    /// A location players can stand in.
    Room,
    /// A body driven by a connection.
    Player,
    /// Anything else.
    #[default]
    Item,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Area => "area",
            Self::Room => "room",
            Self::Player => "player",
            Self::Item => "item",
        };
        f.write_str(name)
    }
}

/// A named way out of a room.
///
/// Exits are data on the room, not containment edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exit {
    /// Direction the player types, e.g. `north`.
    pub direction: String,
    /// Room the exit leads to.
    pub destination: EntityId,
}

/// Who may invoke a verb registered on an entity.
///
/// Each entity carries one command table per audience. The resolver
/// consults them relative to the issuer: its own `Itself` table, its
/// container's `Contents` table, each child's `Container` table and each
/// sibling's `Siblings` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Audience {
    /// The entity itself.
    Itself,
    /// The entities contained in this one.
    Contents,
    /// The entity containing this one.
    Container,
    /// The other entities sharing this one's container.
    Siblings,
}

impl Audience {
    /// All audiences in resolution order.
    pub const ALL: [Audience; 4] = [
        Audience::Itself,
        Audience::Contents,
        Audience::Container,
        Audience::Siblings,
    ];
}

/// One registered verb.
#[derive(Clone, Copy)]
pub struct VerbEntry {
    /// Builds the action for an invocation.
    pub build: ActionFactory,
    /// One-line usage shown by `help`.
    pub usage: &'static str,
}

impl fmt::Debug for VerbEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerbEntry")
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Verb name to entry, for one audience.
pub type VerbTable = BTreeMap<String, VerbEntry>;

/// The four command tables of an entity.
#[derive(Clone, Debug, Default)]
pub struct CommandTables {
    itself: VerbTable,
    contents: VerbTable,
    container: VerbTable,
    siblings: VerbTable,
}

impl CommandTables {
    /// Returns the table for an audience.
    #[must_use]
    pub fn table(&self, audience: Audience) -> &VerbTable {
        match audience {
            Audience::Itself => &self.itself,
            Audience::Contents => &self.contents,
            Audience::Container => &self.container,
            Audience::Siblings => &self.siblings,
        }
    }

    /// Returns the table for an audience, mutably.
    pub fn table_mut(&mut self, audience: Audience) -> &mut VerbTable {
        match audience {
            Audience::Itself => &mut self.itself,
            Audience::Contents => &mut self.contents,
            Audience::Container => &mut self.container,
            Audience::Siblings => &mut self.siblings,
        }
    }

    /// Looks up a verb in one audience's table.
    #[must_use]
    pub fn get(&self, audience: Audience, verb: &str) -> Option<&VerbEntry> {
        self.table(audience).get(verb)
    }
}

/// A node in the containment tree.
///
/// Nodes are created detached. The tree links (`parent`, `children`) are
/// only changed by [`World`](crate::World) so the parent/children
/// biconditional holds after every mutation.
#[derive(Clone, Debug, Default)]
pub struct EntityNode {
    name: String,
    description: Option<String>,
    kind: EntityKind,
    exits: Vec<Exit>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    commands: CommandTables,
}

impl EntityNode {
    /// Creates a detached item with the given name and no verbs.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the long description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the kind.
    #[must_use]
    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    /// Registers a verb for an audience, replacing any previous entry.
    #[must_use]
    pub fn with_verb(
        mut self,
        audience: Audience,
        verb: impl Into<String>,
        build: ActionFactory,
        usage: &'static str,
    ) -> Self {
        self.register(audience, verb, build, usage);
        self
    }

    /// Registers a verb for an audience on an existing node.
    pub fn register(
        &mut self,
        audience: Audience,
        verb: impl Into<String>,
        build: ActionFactory,
        usage: &'static str,
    ) {
        self.commands
            .table_mut(audience)
            .insert(verb.into(), VerbEntry { build, usage });
    }

    /// Removes a verb from one audience's table.
    pub fn unregister(&mut self, audience: Audience, verb: &str) -> Option<VerbEntry> {
        self.commands.table_mut(audience).remove(verb)
    }

    /// Short display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the node.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Long description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Replaces the long description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// The node's kind.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Exits in registration order.
    #[must_use]
    pub fn exits(&self) -> &[Exit] {
        &self.exits
    }

    /// Finds an exit by direction.
    #[must_use]
    pub fn exit(&self, direction: &str) -> Option<EntityId> {
        self.exits
            .iter()
            .find(|exit| exit.direction == direction)
            .map(|exit| exit.destination)
    }

    /// Adds or replaces an exit.
    pub fn set_exit(&mut self, direction: impl Into<String>, destination: EntityId) {
        let direction = direction.into();
        if let Some(exit) = self.exits.iter_mut().find(|e| e.direction == direction) {
            exit.destination = destination;
        } else {
            self.exits.push(Exit {
                direction,
                destination,
            });
        }
    }

    /// The containing entity, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Contained entities in insertion order.
    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// The node's command tables.
    #[must_use]
    pub fn commands(&self) -> &CommandTables {
        &self.commands
    }
}
