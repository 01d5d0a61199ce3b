//! Fixed-capacity object pools
//!
//! A pool owns `N` slot records plus an `active` flag per slot. Spawning
//! claims the first inactive slot (lowest index) and overwrites the whole
//! record; releasing only clears the flag. Inactive records are stale and
//! are never handed out by the iterators. Nothing grows after construction,
//! so the update loop never allocates.

/// Index of a slot within its pool
pub type SlotId = usize;

#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    active: Vec<bool>,
}

impl<T: Default + Clone> Pool<T> {
    /// Create a pool with `capacity` inactive slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::default(); capacity],
            active: vec![false; capacity],
        }
    }
}

impl<T> Pool<T> {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    pub fn is_full(&self) -> bool {
        self.active.iter().all(|a| *a)
    }

    /// Claim the first free slot and initialize it with `record`.
    ///
    /// Returns `None` (and leaves the pool untouched) when every slot is in use.
    pub fn spawn(&mut self, record: T) -> Option<SlotId> {
        let id = self.active.iter().position(|a| !*a)?;
        self.slots[id] = record;
        self.active[id] = true;
        Some(id)
    }

    /// Free a slot. Releasing an inactive slot is a no-op.
    pub fn release(&mut self, id: SlotId) {
        if let Some(flag) = self.active.get_mut(id) {
            *flag = false;
        }
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.active.get(id).copied().unwrap_or(false)
    }

    /// Active slot by id
    pub fn get(&self, id: SlotId) -> Option<&T> {
        if self.is_active(id) { self.slots.get(id) } else { None }
    }

    /// Active slot by id (mutable)
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        if self.is_active(id) {
            self.slots.get_mut(id)
        } else {
            None
        }
    }

    /// Active slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, _)| self.active[*i])
    }

    /// Active slots in slot order (mutable)
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        let active = &self.active;
        self.slots
            .iter_mut()
            .enumerate()
            .filter(move |(i, _)| active[*i])
    }

    /// Visit every active slot in slot order; the closure returns `false`
    /// to release the slot it was given.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for (slot, flag) in self.slots.iter_mut().zip(self.active.iter_mut()) {
            if *flag && !keep(slot) {
                *flag = false;
            }
        }
    }

    /// Release every slot. Idempotent.
    pub fn reset(&mut self) {
        self.active.iter_mut().for_each(|a| *a = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Dot {
        x: f32,
        ttl: f32,
    }

    #[test]
    fn test_spawn_claims_lowest_free_slot() {
        let mut pool: Pool<Dot> = Pool::new(4);
        assert_eq!(pool.spawn(Dot { x: 1.0, ttl: 1.0 }), Some(0));
        assert_eq!(pool.spawn(Dot { x: 2.0, ttl: 1.0 }), Some(1));
        assert_eq!(pool.spawn(Dot { x: 3.0, ttl: 1.0 }), Some(2));
        pool.release(1);
        assert_eq!(pool.spawn(Dot { x: 4.0, ttl: 1.0 }), Some(1));
        assert_eq!(pool.get(1).map(|d| d.x), Some(4.0));
    }

    #[test]
    fn test_full_pool_rejects_without_mutation() {
        let mut pool: Pool<Dot> = Pool::new(2);
        pool.spawn(Dot { x: 1.0, ttl: 1.0 });
        pool.spawn(Dot { x: 2.0, ttl: 1.0 });
        let before: Vec<Dot> = pool.iter().map(|(_, d)| d.clone()).collect();
        assert!(pool.is_full());
        assert_eq!(pool.spawn(Dot { x: 9.0, ttl: 9.0 }), None);
        let after: Vec<Dot> = pool.iter().map(|(_, d)| d.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_released_slot_is_hidden() {
        let mut pool: Pool<Dot> = Pool::new(3);
        let id = pool.spawn(Dot { x: 5.0, ttl: 1.0 }).unwrap();
        pool.release(id);
        assert!(pool.get(id).is_none());
        assert_eq!(pool.iter().count(), 0);
        // Releasing twice is harmless
        pool.release(id);
        pool.release(99);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_retain_releases_expired() {
        let mut pool: Pool<Dot> = Pool::new(4);
        for ttl in [0.5, 2.0, 0.1, 3.0] {
            pool.spawn(Dot { x: 0.0, ttl });
        }
        pool.retain(|d| {
            d.ttl -= 1.0;
            d.ttl > 0.0
        });
        let ids: Vec<SlotId> = pool.iter().map(|(i, _)| i).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut pool: Pool<Dot> = Pool::new(8);
        for _ in 0..5 {
            pool.spawn(Dot::default());
        }
        pool.reset();
        assert_eq!(pool.active_count(), 0);
        pool.reset();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.capacity(), 8);
    }

    proptest! {
        #[test]
        fn prop_active_never_exceeds_capacity(
            capacity in 1usize..32,
            ops in proptest::collection::vec((any::<bool>(), 0usize..40), 0..200),
        ) {
            let mut pool: Pool<Dot> = Pool::new(capacity);
            for (spawn, idx) in ops {
                if spawn {
                    let was_full = pool.is_full();
                    let id = pool.spawn(Dot::default());
                    prop_assert_eq!(id.is_none(), was_full);
                } else {
                    pool.release(idx);
                }
                prop_assert!(pool.active_count() <= pool.capacity());
            }
        }
    }
}
