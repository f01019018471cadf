//! Fixed-capacity, id-addressed rule slots.
//!
//! Rule ids are slot indices. Deleting a rule vacates its slot without
//! renumbering the others, and inserting without an explicit id takes
//! the lowest free slot. Inserting with an id that is already occupied
//! replaces that rule in place.

use crate::common::entity::Sense;
use crate::firewall::entity::NativeRuleEntry;
use crate::firewall::error::FirewallError;

#[derive(Debug, Clone)]
pub struct RuleTable {
    sense: Sense,
    slots: Vec<Option<NativeRuleEntry>>,
}

impl RuleTable {
    pub fn new(sense: Sense, capacity: usize) -> Self {
        Self {
            sense,
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Insert a rule. With an explicit id the target slot is used even
    /// when occupied; without one the lowest vacant slot is taken.
    /// Returns the id the rule landed on.
    pub fn insert(
        &mut self,
        entry: NativeRuleEntry,
        id: Option<u16>,
    ) -> Result<u16, FirewallError> {
        match id {
            Some(id) => {
                let capacity = self.slots.len();
                let slot = self.slots.get_mut(usize::from(id)).ok_or_else(|| {
                    FirewallError::BadRequest(format!(
                        "rule id {id} out of range (capacity {capacity})"
                    ))
                })?;
                *slot = Some(entry);
                Ok(id)
            }
            None => {
                let free = self
                    .slots
                    .iter()
                    .position(Option::is_none)
                    .ok_or(FirewallError::CapacityExceeded { sense: self.sense })?;
                self.slots[free] = Some(entry);
                #[allow(clippy::cast_possible_truncation)]
                let id = free as u16;
                Ok(id)
            }
        }
    }

    /// Vacate a slot. The remaining rules keep their ids.
    pub fn remove(&mut self, id: u16) -> Result<NativeRuleEntry, FirewallError> {
        self.slots
            .get_mut(usize::from(id))
            .and_then(Option::take)
            .ok_or(FirewallError::NotFound)
    }

    pub fn get(&self, id: u16) -> Option<&NativeRuleEntry> {
        self.slots.get(usize::from(id)).and_then(Option::as_ref)
    }

    /// Occupied slots in ascending id order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn entries(&self) -> impl Iterator<Item = (u16, &NativeRuleEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|entry| (i as u16, entry)))
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
    }
}
