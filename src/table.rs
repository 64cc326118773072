// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! The open-addressed table.
//!
//! The table stores only slot state — `Empty` or `Occupied(position)` — and
//! is otherwise key-agnostic: callers supply the hash and an equality
//! closure that reaches into the key store to compare the probed slot's
//! key. This keeps the probe loop allocation-free and free of any generic
//! bound on the key type itself.

/// Initial capacity for a freshly constructed table.
pub const INITIAL_CAPACITY: usize = 16;

/// Growth threshold: the table grows once occupancy would exceed this
/// fraction of capacity.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

#[derive(Debug, Clone, Copy)]
enum Slot {
    Empty,
    Occupied(usize),
}

/// The result of probing for a key: either it is already present at some
/// position, or the probe terminated at an empty slot that a caller may
/// claim with [`Table::occupy`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum Probe {
    Found(usize),
    Vacant(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct Table {
    slots: Vec<Slot>,
    mask: usize,
    occupied: usize,
    load_factor: f64,
}

impl Table {
    pub(crate) fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two().max(INITIAL_CAPACITY);
        Self {
            slots: vec![Slot::Empty; capacity],
            mask: capacity - 1,
            occupied: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.occupied
    }

    /// Walk the perturbed linear probe sequence starting at `hash`'s
    /// preferred slot, calling `equal(position)` for every occupied
    /// slot visited until either an equal key or an empty slot is found.
    /// This sequence visits every slot exactly once before repeating, which
    /// is required for both insert and lookup to terminate correctly.
    pub(crate) fn probe<F>(&self, hash: u64, mut equal: F) -> Probe
    where
        F: FnMut(usize) -> bool,
    {
        let mut index = (hash as usize) & self.mask;
        let mut perturb = hash;
        loop {
            match self.slots[index] {
                Slot::Occupied(position) if equal(position) => return Probe::Found(position),
                Slot::Occupied(_) => {}
                Slot::Empty => return Probe::Vacant(index),
            }
            index = (5usize.wrapping_mul(index).wrapping_add(1).wrapping_add(perturb as usize)) & self.mask;
            perturb >>= 5;
        }
    }

    /// Claim a vacant slot index (as returned by [`Table::probe`]) for
    /// `position`.
    pub(crate) fn occupy(&mut self, slot_index: usize, position: usize) {
        debug_assert!(matches!(self.slots[slot_index], Slot::Empty));
        self.slots[slot_index] = Slot::Occupied(position);
        self.occupied += 1;
    }

    /// Whether inserting one more element would push occupancy past the
    /// load-factor threshold.
    pub(crate) fn needs_growth(&self) -> bool {
        (self.occupied + 1) as f64 > self.capacity() as f64 * self.load_factor
    }

    /// Double capacity and re-insert every existing position by recomputing
    /// its probe in the new table. `rehash` maps a position (an index into
    /// the key store) back to its hash. Growth never changes positions.
    pub(crate) fn grow<F>(&mut self, rehash: F)
    where
        F: Fn(usize) -> u64,
    {
        let new_capacity = self.capacity() * 2;
        log::debug!(
            "growing auto-indexed table from {} to {} slots ({} occupied)",
            self.capacity(),
            new_capacity,
            self.occupied,
        );
        let mut new_table = Table {
            slots: vec![Slot::Empty; new_capacity],
            mask: new_capacity - 1,
            occupied: 0,
            load_factor: self.load_factor,
        };
        for position in 0..self.occupied {
            let hash = rehash(position);
            match new_table.probe(hash, |_| false) {
                Probe::Vacant(slot_index) => new_table.occupy(slot_index, position),
                Probe::Found(_) => unreachable!("rehash of distinct positions cannot collide with an equal key"),
            }
        }
        *self = new_table;
    }
}
