//! Generational arena that remembers insertion order

use slotmap::{Key, SlotMap};

/// A `SlotMap` plus the order keys were inserted in.
///
/// Listings, resolution results and bookmarks all follow registration order,
/// which a plain slot map does not preserve once slots are reused.
#[derive(Debug, Clone)]
pub struct OrderedArena<K: Key, V> {
    items: SlotMap<K, V>,
    order: Vec<K>,
}

impl<K: Key, V> OrderedArena<K, V> {
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: V) -> K {
        let key = self.items.insert(value);
        self.order.push(key);
        key
    }

    pub fn remove(&mut self, key: K) -> Option<V> {
        let value = self.items.remove(key)?;
        self.order.retain(|k| *k != key);
        Some(value)
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.items.get_mut(key)
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.order.iter().map(|k| (*k, &self.items[*k]))
    }
}

impl<K: Key, V> Default for OrderedArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::DefaultKey;

    #[test]
    fn test_order_survives_slot_reuse() {
        let mut arena: OrderedArena<DefaultKey, &str> = OrderedArena::new();
        let a = arena.insert("a");
        arena.insert("b");
        arena.remove(a);
        arena.insert("c");

        let values: Vec<&str> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["b", "c"]);
    }
}
