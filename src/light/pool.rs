//! Free-list of tree roots available to light walkers

use std::collections::BTreeSet;

use crate::math::RandomSource;

/// Tree indices not currently claimed by any light.
///
/// `acquire` and `release` are the only mutation points; a walker holds at
/// most one index at a time and gives it back before taking another.
#[derive(Clone, Debug)]
pub struct RootPool {
    free: BTreeSet<usize>,
    capacity: usize,
}

impl RootPool {
    /// Pool holding every index in `0..capacity`
    pub fn new(capacity: usize) -> Self {
        Self {
            free: (0..capacity).collect(),
            capacity,
        }
    }

    /// Remove and return a uniformly random free index, or `None` when all
    /// roots are claimed.
    pub fn acquire<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.free.is_empty() {
            return None;
        }
        let pick = rng.index(self.free.len());
        let index = self.free.iter().nth(pick).copied()?;
        self.free.remove(&index);
        Some(index)
    }

    /// Return a claimed index. Returns false if it was already free or out of range.
    pub fn release(&mut self, index: usize) -> bool {
        if index >= self.capacity {
            log::warn!("Released root {} outside pool of {}", index, self.capacity);
            return false;
        }
        self.free.insert(index)
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn is_free(&self, index: usize) -> bool {
        self.free.contains(&index)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
