use std::{
    iter::FusedIterator,
    marker::PhantomData,
    mem::replace,
    ops::{Index, IndexMut},
};

use crate::memory::EntityIndex;

/// Generation counter of a slab entry.
///
/// Bumped every time the entry is freed so that keys to a previous occupant
/// no longer resolve.
pub type Generation = u32;

/// Key of a slab entry: its index together with the generation it was
/// allocated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey<K> {
    index: K,
    generation: Generation,
}

impl<K: Copy> SlotKey<K> {
    #[inline]
    pub fn index(self) -> K {
        self.index
    }
}

/// A generational slab arena that manages fixed-sized objects.
#[derive(Debug, Clone)]
pub struct Slab<K, V> {
    data: Vec<Entry<V>>,
    free: usize,
    len: usize,
    phantom: PhantomData<K>,
}

impl<K, V> Slab<K, V>
where
    K: EntityIndex,
{
    /// Creates an empty [`Slab<K, V>`].
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            free: 0,
            len: 0,
            phantom: PhantomData,
        }
    }

    /// Returns the number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether there is no stored value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns whether `key` refers to a stored value of the current generation.
    #[inline]
    pub fn contains(&self, key: SlotKey<K>) -> bool {
        self.get(key).is_some()
    }

    /// Returns the key of the value currently stored at `index`, if any.
    pub fn key(&self, index: K) -> Option<SlotKey<K>> {
        match self.data.get(index.index()) {
            Some(Entry::Full { generation, .. }) => Some(SlotKey {
                index,
                generation: *generation,
            }),
            _ => None,
        }
    }

    pub fn insert(&mut self, value: V) -> SlotKey<K> {
        let index = self.free;

        let generation = if index == self.data.len() {
            self.data.push(Entry::Full {
                value,
                generation: 0,
            });
            self.free += 1;
            0
        } else {
            let Entry::Free { next, generation } = self.data[index] else {
                unreachable!()
            };
            self.free = next;
            self.data[index] = Entry::Full { value, generation };
            generation
        };

        self.len += 1;

        SlotKey {
            index: K::new(index),
            generation,
        }
    }

    /// Removes the value `key` refers to.
    ///
    /// Returns `None` when the key is stale or was never allocated.
    pub fn remove(&mut self, key: SlotKey<K>) -> Option<V> {
        let index = key.index.index();
        let entry = self.data.get_mut(index)?;

        match &*entry {
            Entry::Full { generation, .. } if *generation == key.generation => {}
            _ => return None,
        }

        let freed = Entry::Free {
            next: self.free,
            generation: key.generation.wrapping_add(1),
        };

        let Entry::Full { value, .. } = replace(entry, freed) else {
            unreachable!()
        };

        self.free = index;
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, key: SlotKey<K>) -> Option<&V> {
        match self.data.get(key.index.index()) {
            Some(Entry::Full { value, generation }) if *generation == key.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: SlotKey<K>) -> Option<&mut V> {
        match self.data.get_mut(key.index.index()) {
            Some(Entry::Full { value, generation }) if *generation == key.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Mutably borrows the values at two distinct indices at once.
    ///
    /// Returns `None` if the indices coincide or either entry is free.
    pub fn get2_mut(&mut self, a: K, b: K) -> Option<(&mut V, &mut V)> {
        let (a, b) = (a.index(), b.index());

        if a == b || a >= self.data.len() || b >= self.data.len() {
            return None;
        }

        let (low, high) = self.data.split_at_mut(a.max(b));
        let (first, second) = (&mut low[a.min(b)], &mut high[0]);

        match (first, second) {
            (Entry::Full { value: first, .. }, Entry::Full { value: second, .. }) => {
                if a < b {
                    Some((first, second))
                } else {
                    Some((second, first))
                }
            }
            _ => None,
        }
    }

    /// Iterates mutably over all stored values in storage order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.data.iter_mut().filter_map(|entry| match entry {
            Entry::Full { value, .. } => Some(value),
            Entry::Free { .. } => None,
        })
    }
}

impl<K, V> Index<K> for Slab<K, V>
where
    K: EntityIndex,
{
    type Output = V;

    fn index(&self, index: K) -> &Self::Output {
        match self.data.get(index.index()) {
            Some(Entry::Full { value, .. }) => value,
            _ => panic!("invalid key"),
        }
    }
}

impl<K, V> IndexMut<K> for Slab<K, V>
where
    K: EntityIndex,
{
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        match self.data.get_mut(index.index()) {
            Some(Entry::Full { value, .. }) => value,
            _ => panic!("invalid key"),
        }
    }
}

impl<K, V> Default for Slab<K, V>
where
    K: EntityIndex,
{
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
enum Entry<V> {
    Free { next: usize, generation: Generation },
    Full { value: V, generation: Generation },
}

pub struct IntoIter<K, V> {
    entries: std::iter::Enumerate<std::vec::IntoIter<Entry<V>>>,
    len: usize,
    phantom: PhantomData<K>,
}

impl<K, V> IntoIter<K, V> {
    fn new(slab: Slab<K, V>) -> Self {
        Self {
            entries: slab.data.into_iter().enumerate(),
            len: slab.len,
            phantom: PhantomData,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V>
where
    K: EntityIndex,
{
    type Item = (SlotKey<K>, V);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, entry) in self.entries.by_ref() {
            if let Entry::Full { value, generation } = entry {
                self.len -= 1;
                let key = SlotKey {
                    index: K::new(index),
                    generation,
                };
                return Some((key, value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V>
where
    K: EntityIndex,
{
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> where K: EntityIndex {}

impl<K, V> IntoIterator for Slab<K, V>
where
    K: EntityIndex,
{
    type Item = (SlotKey<K>, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
