//! Tile lookup seam and a bounded in-memory tile store.
//!
//! The painter only ever reads tiles through [`TileStore`]; fetching and
//! eviction policy belong to whoever owns the store.

use std::collections::{HashMap, VecDeque};

use crate::types::{Tile, TileCoordinate};

/// Read access to tiles by coordinate. Every lookup may miss.
pub trait TileStore<B> {
    fn get(&self, coords: &TileCoordinate) -> Option<&Tile<B>>;

    /// True when `coords` has no tile or its tile is not fully loaded.
    fn needs_fetch(&self, coords: &TileCoordinate) -> bool {
        self.get(coords).is_none_or(Tile::needs_fetch)
    }
}

/// A tile store with a fixed capacity.
///
/// When the store exceeds capacity, the oldest (least recently inserted)
/// tiles are evicted. Lookups do not promote entries; replacing a tile keeps
/// its original insertion slot.
#[derive(Debug)]
pub struct MemoryTileStore<B> {
    entries: HashMap<TileCoordinate, Tile<B>>,
    order: VecDeque<TileCoordinate>,
    capacity: usize,
}

impl<B> MemoryTileStore<B> {
    /// Create a new store with the given capacity.
    ///
    /// A capacity of 0 keeps nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Insert or replace a tile. Returns `true` if the coordinate was new.
    pub fn insert(&mut self, tile: Tile<B>) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let coords = tile.coords;
        let is_new = self.entries.insert(coords, tile).is_none();
        if is_new {
            self.order.push_back(coords);
            self.enforce_cap();
        }
        is_new
    }

    pub fn get_mut(&mut self, coords: &TileCoordinate) -> Option<&mut Tile<B>> {
        self.entries.get_mut(coords)
    }

    pub fn remove(&mut self, coords: &TileCoordinate) -> Option<Tile<B>> {
        let removed = self.entries.remove(coords)?;
        self.order.retain(|c| c != coords);
        Some(removed)
    }

    /// Mark every stored tile stale.
    pub fn invalidate_all(&mut self) {
        for tile in self.entries.values_mut() {
            tile.invalidate();
        }
    }

    pub fn contains(&self, coords: &TileCoordinate) -> bool {
        self.entries.contains_key(coords)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Evict oldest tiles until we're at or below capacity.
    fn enforce_cap(&mut self) {
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }
}

impl<B> Default for MemoryTileStore<B> {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl<B> TileStore<B> for MemoryTileStore<B> {
    fn get(&self, coords: &TileCoordinate) -> Option<&Tile<B>> {
        self.entries.get(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i64) -> TileCoordinate {
        TileCoordinate::new(x, 0, 10, 0, 0)
    }

    #[test]
    fn test_basic_insert_get() {
        let mut store = MemoryTileStore::new(3);
        assert!(store.insert(Tile::ready(at(0), 1)));
        assert!(store.insert(Tile::ready(at(256), 2)));

        assert_eq!(store.get(&at(0)).and_then(|t| t.bitmap), Some(1));
        assert!(store.get(&at(512)).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_eviction() {
        let mut store = MemoryTileStore::new(2);
        store.insert(Tile::ready(at(0), ()));
        store.insert(Tile::ready(at(256), ()));
        store.insert(Tile::ready(at(512), ()));

        // oldest tile should be evicted
        assert!(!store.contains(&at(0)));
        assert!(store.contains(&at(256)));
        assert!(store.contains(&at(512)));
    }

    #[test]
    fn test_replace_keeps_single_slot() {
        let mut store = MemoryTileStore::new(2);
        store.insert(Tile::ready(at(0), 1));
        assert!(!store.insert(Tile::ready(at(0), 2)));
        store.insert(Tile::ready(at(256), 3));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&at(0)).and_then(|t| t.bitmap), Some(2));
    }

    #[test]
    fn test_needs_fetch_for_missing_and_partial() {
        let mut store = MemoryTileStore::new(4);
        store.insert(Tile::ready(at(0), ()));
        assert!(!store.needs_fetch(&at(0)));
        assert!(store.needs_fetch(&at(256)));

        store.invalidate_all();
        assert!(store.needs_fetch(&at(0)));
    }

    #[test]
    fn test_zero_capacity_and_remove() {
        let mut empty: MemoryTileStore<()> = MemoryTileStore::new(0);
        assert!(!empty.insert(Tile::ready(at(0), ())));
        assert!(empty.is_empty());

        let mut store = MemoryTileStore::new(2);
        store.insert(Tile::ready(at(0), ()));
        assert!(store.remove(&at(0)).is_some());
        assert!(store.remove(&at(0)).is_none());
        store.clear();
        assert!(store.is_empty());
    }
}
