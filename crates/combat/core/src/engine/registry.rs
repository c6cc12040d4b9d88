//! Reference-counted handles for definitions held by scripts.
//!
//! Native owners clone the [`SharedCombat`]; scripts hold a [`CombatHandle`]
//! instead and pair every `retain` with a `release`. A handle outliving its
//! entry is detected through the slot generation.

use std::fmt;

use super::SharedCombat;
use crate::error::{CombatError, ErrorSeverity};

/// Generational index into a [`CombatRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CombatHandle {
    index: u32,
    generation: u32,
}

impl fmt::Display for CombatHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Result of [`CombatRegistry::release`].
#[derive(Debug)]
pub enum Released {
    /// Other holders remain.
    Retained(u32),
    /// The last script reference was dropped.
    Destroyed(SharedCombat),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("combat handle {0} is stale")]
    StaleHandle(CombatHandle),

    #[error("reference count of combat handle {0} overflowed")]
    CounterOverflow(CombatHandle),
}

impl CombatError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::StaleHandle(_) => "REGISTRY_STALE_HANDLE",
            Self::CounterOverflow(_) => "REGISTRY_COUNTER_OVERFLOW",
        }
    }
}

#[derive(Debug)]
struct Entry {
    combat: SharedCombat,
    count: u32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug, Default)]
pub struct CombatRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl CombatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Registers `combat` with a reference count of one.
    pub fn insert(&mut self, combat: impl Into<SharedCombat>) -> CombatHandle {
        let entry = Entry {
            combat: combat.into(),
            count: 1,
        };
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return CombatHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        CombatHandle {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, handle: CombatHandle) -> Result<&SharedCombat, RegistryError> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
            .map(|entry| &entry.combat)
            .ok_or(RegistryError::StaleHandle(handle))
    }

    /// Current reference count.
    pub fn count(&self, handle: CombatHandle) -> Result<u32, RegistryError> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
            .map(|entry| entry.count)
            .ok_or(RegistryError::StaleHandle(handle))
    }

    /// Adds a reference. Returns the new count.
    pub fn retain(&mut self, handle: CombatHandle) -> Result<u32, RegistryError> {
        let entry = self.entry_mut(handle)?;
        entry.count = entry
            .count
            .checked_add(1)
            .ok_or(RegistryError::CounterOverflow(handle))?;
        Ok(entry.count)
    }

    /// Drops a reference. The entry is removed exactly when the count reaches
    /// zero and its handle becomes stale.
    pub fn release(&mut self, handle: CombatHandle) -> Result<Released, RegistryError> {
        let entry = self.entry_mut(handle)?;
        entry.count -= 1;
        if entry.count > 0 {
            return Ok(Released::Retained(entry.count));
        }

        let slot = &mut self.slots[handle.index as usize];
        let Some(entry) = slot.entry.take() else {
            return Err(RegistryError::StaleHandle(handle));
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Ok(Released::Destroyed(entry.combat))
    }

    fn entry_mut(&mut self, handle: CombatHandle) -> Result<&mut Entry, RegistryError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(RegistryError::StaleHandle(handle))
    }
}
