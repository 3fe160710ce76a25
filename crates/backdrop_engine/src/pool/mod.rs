//! Fixed-capacity object pool
//!
//! Holds every entity a background simulates. The pool is filled once at
//! scene start and never resized afterwards: entities that leave the
//! visible area or get collected are recycled in place, which keeps the
//! steady state allocation-free.
//!
//! Each slot carries a generation counter. Recycling bumps it, so a
//! [`PoolHandle`] captured for an earlier spawn (for example inside a
//! collection event) can never address the replacement entity.

/// Handle to a pooled entity with generation counter for safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    /// Slot index, stable for the life of the pool
    pub index: u32,
    /// Spawn generation of the slot
    pub generation: u32,
}

impl PoolHandle {
    /// Create a new handle with index and generation
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Statistics for pool monitoring
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Entities built by the factory at creation
    pub created: usize,
    /// Total recycle operations
    pub recycled: u64,
    /// Entities dropped by `dispose`
    pub disposed: usize,
}

/// Pool of entities iterated in creation order
#[derive(Debug, Clone)]
pub struct ObjectPool<T> {
    /// Storage for pool objects
    objects: Vec<T>,
    /// Generation counters for each slot
    generations: Vec<u32>,
    /// Fixed capacity
    capacity: usize,
    stats: PoolStats,
}

impl<T> ObjectPool<T> {
    /// Populate a pool with `count` entities built by `factory`
    ///
    /// The factory receives the slot index. Slots are stored in the order
    /// they are created, which is also the iteration order.
    pub fn create(count: usize, mut factory: impl FnMut(usize) -> T) -> Self {
        let objects: Vec<T> = (0..count).map(&mut factory).collect();
        log::debug!("Created object pool with {} entities", count);

        Self {
            objects,
            generations: vec![0; count],
            capacity: count,
            stats: PoolStats { created: count, ..PoolStats::default() },
        }
    }

    /// Visit every entity in creation order
    pub fn for_each(&mut self, mut visitor: impl FnMut(PoolHandle, &mut T)) {
        for (index, object) in self.objects.iter_mut().enumerate() {
            let handle = PoolHandle::new(index as u32, self.generations[index]);
            visitor(handle, object);
        }
    }

    /// Iterate immutably in creation order
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> + '_ {
        self.objects
            .iter()
            .zip(self.generations.iter())
            .enumerate()
            .map(|(index, (object, generation))| (PoolHandle::new(index as u32, *generation), object))
    }

    /// Replace the entity in `index` with a fresh spawn
    ///
    /// The slot's generation is incremented so handles to the old entity
    /// go stale. Returns the handle of the new entity, or `None` if the
    /// index is out of range.
    pub fn recycle(&mut self, index: usize, fresh: T) -> Option<PoolHandle> {
        let slot = self.objects.get_mut(index)?;
        *slot = fresh;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.stats.recycled += 1;
        log::trace!("Recycled pool slot {} (generation {})", index, self.generations[index]);
        Some(PoolHandle::new(index as u32, self.generations[index]))
    }

    /// Current handle for a slot
    pub fn handle_at(&self, index: usize) -> Option<PoolHandle> {
        self.generations.get(index).map(|generation| PoolHandle::new(index as u32, *generation))
    }

    /// Check if a handle refers to the current occupant of its slot
    pub fn is_handle_valid(&self, handle: PoolHandle) -> bool {
        let index = handle.index as usize;
        index < self.objects.len() && self.generations[index] == handle.generation
    }

    /// Validate handle and get object
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        if self.is_handle_valid(handle) {
            self.objects.get(handle.index as usize)
        } else {
            None
        }
    }

    /// Validate handle and get mutable object
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if self.is_handle_valid(handle) {
            self.objects.get_mut(handle.index as usize)
        } else {
            None
        }
    }

    /// Entities as a slice in creation order
    pub fn as_slice(&self) -> &[T] {
        &self.objects
    }

    /// Number of live slots
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the pool holds no entities
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Capacity fixed at creation
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get statistics
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Drop every entity
    ///
    /// Used on scene teardown. Calling it again is a no-op.
    pub fn dispose(&mut self) -> usize {
        let disposed = self.objects.len();
        if disposed > 0 {
            self.objects.clear();
            self.generations.clear();
            self.stats.disposed += disposed;
            log::debug!("Disposed {} pooled entities", disposed);
        }
        disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_preserves_order() {
        let mut pool = ObjectPool::create(5, |i| i * 10);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.capacity(), 5);

        let mut seen = Vec::new();
        pool.for_each(|handle, value| {
            seen.push((handle.index, *value));
        });
        assert_eq!(seen, vec![(0, 0), (1, 10), (2, 20), (3, 30), (4, 40)]);
    }

    #[test]
    fn test_recycle_keeps_size_and_invalidates_handles() {
        let mut pool = ObjectPool::create(3, |i| i);
        let old = pool.handle_at(1).unwrap();

        let new = pool.recycle(1, 99).unwrap();
        assert_eq!(pool.len(), 3);
        assert_ne!(old, new);
        assert!(pool.get(old).is_none());
        assert_eq!(pool.get(new), Some(&99));
        assert_eq!(pool.stats().recycled, 1);

        assert!(pool.recycle(7, 0).is_none());
    }

    #[test]
    fn test_visitor_mutation() {
        let mut pool = ObjectPool::create(4, |_| 1);
        pool.for_each(|_, value| *value += 1);
        assert!(pool.as_slice().iter().all(|v| *v == 2));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut pool = ObjectPool::create(8, |i| i);
        assert_eq!(pool.dispose(), 8);
        assert_eq!(pool.dispose(), 0);
        assert!(pool.is_empty());
        assert_eq!(pool.stats().disposed, 8);
    }
}
