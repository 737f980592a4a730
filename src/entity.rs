//! Entity identifiers.
//!
//! Cameras, renderables and lights are components attached to an [`Entity`].
//! Identifiers are minted by an [`EntityAllocator`] that is created by the
//! driver and handed by reference to whoever needs one. There is no global.

use std::{collections::HashSet, fmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct EntityAllocator {
    next: u32,
    alive: HashSet<Entity>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh identifier. Identifiers are never reused.
    pub fn create(&mut self) -> Entity {
        // 0 stays reserved as "no entity"
        self.next += 1;
        let entity = Entity(self.next);
        self.alive.insert(entity);
        entity
    }

    /// Returns `false` if the entity was already destroyed or never minted here.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        self.alive.remove(&entity)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }
}
