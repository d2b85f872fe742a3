//! Opaque handles to container slots.
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::InvalidPosition;
use crate::memory::{entity_impl, SlotKey};

/// Identity of a container instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct OwnerId(u64);

impl OwnerId {
    /// Draws an id no other container in this process has been given.
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to one element slot of a container.
///
/// A position is only a capability: the element it denotes is read and
/// written through the container that issued it. Positions compare equal
/// exactly when they denote the same slot of the same container instance.
/// Once the slot is removed the position stays invalid for good, even if the
/// container reuses the storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position<K> {
    owner: OwnerId,
    key: SlotKey<K>,
}

impl<K: Copy> Position<K> {
    #[inline]
    pub(crate) fn new(owner: OwnerId, key: SlotKey<K>) -> Self {
        Self { owner, key }
    }

    #[inline]
    pub(crate) fn key(self) -> SlotKey<K> {
        self.key
    }

    /// Returns the slot key if the position was issued by `owner`.
    #[inline]
    pub(crate) fn key_for(self, owner: OwnerId) -> Result<SlotKey<K>, InvalidPosition> {
        if self.owner == owner {
            Ok(self.key)
        } else {
            Err(InvalidPosition::Foreign)
        }
    }
}

/// Index of a slot in a [`PositionalList`](crate::PositionalList).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SlotIndex(u32);
entity_impl!(SlotIndex, u32);

/// Index of a node in a [`LinkedTree`](crate::LinkedTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeIndex(u32);
entity_impl!(NodeIndex, u32);

/// Position of an element in a [`PositionalList`](crate::PositionalList).
pub type ListPosition = Position<SlotIndex>;

/// Position of a node in a [`LinkedTree`](crate::LinkedTree).
pub type TreePosition = Position<NodeIndex>;
