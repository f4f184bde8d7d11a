// ldportal/src/catalog.rs
//! Lookup seam for the vehicle/character tables. The driver only ever reads
//! from it; the data itself lives with the application.

use std::collections::HashMap;

use crate::tag::TagIdentity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vehicle build variant (each vehicle has three).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rebuild {
    /// Base build
    First = 0,
    /// First alternate build
    Second = 1,
    /// Second alternate build
    Third = 2,
}

impl Rebuild {
    fn from_index(i: u16) -> Self {
        match i % 3 {
            0 => Self::First,
            1 => Self::Second,
            _ => Self::Third,
        }
    }
}

/// Name and metadata of one vehicle or character.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogEntry {
    /// Vehicle or character id as stored on the tag
    pub id: u16,
    /// Display name
    pub name: String,
    /// Franchise the entry belongs to
    pub world: String,
    /// In-game abilities
    pub abilities: Vec<String>,
}

impl CatalogEntry {
    /// Entry without abilities.
    pub fn new(id: u16, name: impl Into<String>, world: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            world: world.into(),
            abilities: Vec::new(),
        }
    }

    /// Replace the ability list.
    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    /// Rebuild variant of a vehicle id. Vehicle ids start at 1000 and the
    /// numbering shifts by one from 1155 on.
    pub fn rebuild(&self) -> Option<Rebuild> {
        let offset = self.id.checked_sub(1000)?;
        if offset < 155 {
            Some(Rebuild::from_index(offset))
        } else {
            Some(Rebuild::from_index(offset + 1))
        }
    }
}

/// Read-only id → entry lookup.
pub trait Catalog: Send + Sync {
    /// Vehicle entry for `id`.
    fn vehicle(&self, id: u16) -> Option<&CatalogEntry>;
    /// Character entry for `id`.
    fn character(&self, id: u16) -> Option<&CatalogEntry>;

    /// Entry for a decoded tag identity.
    fn lookup(&self, identity: TagIdentity) -> Option<&CatalogEntry> {
        match identity {
            TagIdentity::Vehicle(id) => self.vehicle(id),
            TagIdentity::Character(id) => self.character(id),
        }
    }
}

/// Catalog that knows nothing. Events still carry the decoded identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl Catalog for EmptyCatalog {
    fn vehicle(&self, _id: u16) -> Option<&CatalogEntry> {
        None
    }

    fn character(&self, _id: u16) -> Option<&CatalogEntry> {
        None
    }
}

/// In-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    vehicles: HashMap<u16, CatalogEntry>,
    characters: HashMap<u16, CatalogEntry>,
}

impl StaticCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a vehicle entry.
    pub fn with_vehicle(mut self, entry: CatalogEntry) -> Self {
        self.vehicles.insert(entry.id, entry);
        self
    }

    /// Add or replace a character entry.
    pub fn with_character(mut self, entry: CatalogEntry) -> Self {
        self.characters.insert(entry.id, entry);
        self
    }

    /// Vehicles plus characters.
    pub fn len(&self) -> usize {
        self.vehicles.len() + self.characters.len()
    }

    /// `true` when no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Catalog for StaticCatalog {
    fn vehicle(&self, id: u16) -> Option<&CatalogEntry> {
        self.vehicles.get(&id)
    }

    fn character(&self, id: u16) -> Option<&CatalogEntry> {
        self.characters.get(&id)
    }
}
