//! A sequence with stable handles to its elements.
//!
//! [`PositionalList`] is a doubly linked list whose slots live in an arena.
//! Every insertion hands out a [`ListPosition`] that keeps denoting the same
//! element while other elements are added or removed around it, so
//! insertions and removals at a known position take *O*(1).
mod iter;

pub use iter::{Elements, Positions};

use std::fmt;
use std::mem::replace;

use crate::error::{Error, InvalidPosition};
use crate::memory::{EntityIndex, Slab};
use crate::position::{ListPosition, OwnerId, SlotIndex};

/// A doubly linked list addressed by positions.
///
/// The sequence is bounded by two sentinel slots which are never exposed as
/// positions. Positions issued by one list are rejected by every other list,
/// including clones of it.
pub struct PositionalList<E> {
    owner: OwnerId,
    slots: Slab<SlotIndex, Slot<E>>,
    head: SlotIndex,
    tail: SlotIndex,
}

#[derive(Debug, Clone)]
struct Slot<E> {
    /// The stored element; `None` only for the two sentinels.
    element: Option<E>,
    /// The previous and the next slot. Sentinels link to themselves at the ends.
    links: [SlotIndex; 2],
}

impl<E> PositionalList<E> {
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Slab::with_capacity(capacity + 2);
        let head = SlotIndex::new(0);
        let tail = SlotIndex::new(1);

        slots.insert(Slot {
            element: None,
            links: [head, tail],
        });
        slots.insert(Slot {
            element: None,
            links: [head, tail],
        });

        Self {
            owner: OwnerId::fresh(),
            slots,
            head,
            tail,
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - 2
    }

    /// Returns whether the list holds no element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the position of the first element, or `None` if the list is empty.
    #[inline]
    pub fn first(&self) -> Option<ListPosition> {
        self.position(self.slots[self.head].links[1])
    }

    /// Returns the position of the last element, or `None` if the list is empty.
    #[inline]
    pub fn last(&self) -> Option<ListPosition> {
        self.position(self.slots[self.tail].links[0])
    }

    /// Returns the position preceding `position`, or `None` if it is the first.
    ///
    /// # Errors
    ///
    /// When `position` is not a live position of this list.
    pub fn before(&self, position: ListPosition) -> Result<Option<ListPosition>, Error> {
        let index = self.resolve(position)?;
        Ok(self.position(self.slots[index].links[0]))
    }

    /// Returns the position following `position`, or `None` if it is the last.
    ///
    /// # Errors
    ///
    /// When `position` is not a live position of this list.
    pub fn after(&self, position: ListPosition) -> Result<Option<ListPosition>, Error> {
        let index = self.resolve(position)?;
        Ok(self.position(self.slots[index].links[1]))
    }

    /// Returns whether `position` denotes an element of this list.
    #[inline]
    pub fn contains(&self, position: ListPosition) -> bool {
        self.get(position).is_ok()
    }

    /// Borrows the element at `position`.
    ///
    /// # Errors
    ///
    /// When `position` is not a live position of this list.
    pub fn get(&self, position: ListPosition) -> Result<&E, Error> {
        let key = position.key_for(self.owner)?;
        self.slots
            .get(key)
            .and_then(|slot| slot.element.as_ref())
            .ok_or(Error::InvalidPosition(InvalidPosition::Stale))
    }

    /// Mutably borrows the element at `position`.
    ///
    /// # Errors
    ///
    /// When `position` is not a live position of this list.
    pub fn get_mut(&mut self, position: ListPosition) -> Result<&mut E, Error> {
        let key = position.key_for(self.owner)?;
        self.slots
            .get_mut(key)
            .and_then(|slot| slot.element.as_mut())
            .ok_or(Error::InvalidPosition(InvalidPosition::Stale))
    }

    /// Inserts an element at the front of the list.
    ///
    /// # Examples
    ///
    /// ```
    /// # use postree::PositionalList;
    /// let mut list = PositionalList::new();
    /// list.add_last(1);
    /// let front = list.add_first(0);
    /// assert_eq!(list.first(), Some(front));
    /// assert!(list.iter().eq(&[0, 1]));
    /// ```
    pub fn add_first(&mut self, element: E) -> ListPosition {
        let next = self.slots[self.head].links[1];
        self.link_between(element, self.head, next)
    }

    /// Inserts an element at the back of the list.
    pub fn add_last(&mut self, element: E) -> ListPosition {
        let prev = self.slots[self.tail].links[0];
        self.link_between(element, prev, self.tail)
    }

    /// Inserts an element right before `position`.
    ///
    /// # Errors
    ///
    /// When `position` is not a live position of this list.
    pub fn add_before(&mut self, position: ListPosition, element: E) -> Result<ListPosition, Error> {
        let index = self.resolve(position)?;
        let prev = self.slots[index].links[0];
        Ok(self.link_between(element, prev, index))
    }

    /// Inserts an element right after `position`.
    ///
    /// # Errors
    ///
    /// When `position` is not a live position of this list.
    ///
    /// # Examples
    ///
    /// ```
    /// # use postree::PositionalList;
    /// let mut list = PositionalList::new();
    /// let a = list.add_last('a');
    /// let c = list.add_last('c');
    /// let b = list.add_after(a, 'b').unwrap();
    /// assert_eq!(list.after(b).unwrap(), Some(c));
    /// assert_eq!(list.before(b).unwrap(), Some(a));
    /// ```
    pub fn add_after(&mut self, position: ListPosition, element: E) -> Result<ListPosition, Error> {
        let index = self.resolve(position)?;
        let next = self.slots[index].links[1];
        Ok(self.link_between(element, index, next))
    }

    /// Replaces the element at `position`, returning the previous one.
    ///
    /// # Errors
    ///
    /// When `position` is not a live position of this list.
    pub fn set(&mut self, position: ListPosition, element: E) -> Result<E, Error> {
        Ok(replace(self.get_mut(position)?, element))
    }

    /// Removes the element at `position` and returns it.
    ///
    /// `position` and every copy of it become invalid.
    ///
    /// # Errors
    ///
    /// When `position` is not a live position of this list.
    ///
    /// # Examples
    ///
    /// ```
    /// # use postree::PositionalList;
    /// let mut list = PositionalList::new();
    /// let a = list.add_last("a");
    /// assert_eq!(list.remove(a), Ok("a"));
    /// assert!(list.is_empty());
    /// assert!(list.remove(a).unwrap_err().is_invalid_position());
    /// ```
    pub fn remove(&mut self, position: ListPosition) -> Result<E, Error> {
        self.resolve(position)?;
        let slot = self
            .slots
            .remove(position.key())
            .ok_or(Error::InvalidPosition(InvalidPosition::Stale))?;

        let [prev, next] = slot.links;
        self.slots[prev].links[1] = next;
        self.slots[next].links[0] = prev;

        slot.element.ok_or(InvalidPosition::Stale.into())
    }

    /// Removes the first element and returns it, or `None` if the list is empty.
    pub fn pop_first(&mut self) -> Option<E> {
        let first = self.first()?;
        self.remove(first).ok()
    }

    /// Iterates over the positions of the list from front to back.
    #[inline]
    pub fn positions(&self) -> Positions<'_, E> {
        Positions::new(self)
    }

    /// Iterates over the elements of the list from front to back.
    #[inline]
    pub fn elements(&self) -> Elements<'_, E> {
        Elements::new(self)
    }

    /// Alias of [`PositionalList::elements`].
    #[inline]
    pub fn iter(&self) -> Elements<'_, E> {
        self.elements()
    }

    /// Applies `f` to every element, in no particular order.
    pub(crate) fn update_each(&mut self, mut f: impl FnMut(&mut E)) {
        for slot in self.slots.values_mut() {
            if let Some(element) = slot.element.as_mut() {
                f(element);
            }
        }
    }

    /// Ensures that `position` denotes an element slot of this list.
    fn resolve(&self, position: ListPosition) -> Result<SlotIndex, Error> {
        self.get(position)?;
        Ok(position.key().index())
    }

    /// Turns a slot index into a position, mapping the sentinels to `None`.
    fn position(&self, index: SlotIndex) -> Option<ListPosition> {
        if index == self.head || index == self.tail {
            return None;
        }

        let key = self.slots.key(index)?;
        Some(ListPosition::new(self.owner, key))
    }

    fn link_between(&mut self, element: E, prev: SlotIndex, next: SlotIndex) -> ListPosition {
        let key = self.slots.insert(Slot {
            element: Some(element),
            links: [prev, next],
        });

        self.slots[prev].links[1] = key.index();
        self.slots[next].links[0] = key.index();

        ListPosition::new(self.owner, key)
    }
}

impl<E> Default for PositionalList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Clone for PositionalList<E> {
    /// Clones the elements into a list with its own identity; positions of
    /// `self` are not valid in the clone.
    fn clone(&self) -> Self {
        Self {
            owner: OwnerId::fresh(),
            slots: self.slots.clone(),
            head: self.head,
            tail: self.tail,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for PositionalList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elements()).finish()
    }
}

/// Renders the elements separated by spaces, framed by the two sentinels
/// which show as `null`.
impl<E: fmt::Display> fmt::Display for PositionalList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null")?;

        for element in self.elements() {
            write!(f, " {element}")?;
        }

        f.write_str(" null")
    }
}

impl<'a, E> IntoIterator for &'a PositionalList<E> {
    type Item = &'a E;
    type IntoIter = Elements<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_no_boundary_positions() {
        let list = PositionalList::<u8>::new();
        assert!(list.is_empty());
        assert_eq!(list.first(), None);
        assert_eq!(list.last(), None);
        assert_eq!(list.positions().count(), 0);
    }

    #[test]
    fn sentinels_frame_the_elements() {
        let mut list = PositionalList::new();
        let a = list.add_last(1);
        let b = list.add_last(2);

        assert_eq!(list.before(a), Ok(None));
        assert_eq!(list.after(b), Ok(None));
        assert_eq!(list.slots[list.head].links[1], a.key().index());
        assert_eq!(list.slots[list.tail].links[0], b.key().index());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn remove_relinks_neighbours() {
        let mut list = PositionalList::new();
        let a = list.add_last('a');
        let b = list.add_last('b');
        let c = list.add_last('c');

        assert_eq!(list.remove(b), Ok('b'));
        assert_eq!(list.after(a), Ok(Some(c)));
        assert_eq!(list.before(c), Ok(Some(a)));
        assert_eq!(list.get(b), Err(InvalidPosition::Stale.into()));
    }

    #[test]
    fn reused_slot_does_not_revive_position() {
        let mut list = PositionalList::new();
        let a = list.add_last(1);
        list.remove(a).unwrap();
        let b = list.add_last(2);

        assert_eq!(a.key().index(), b.key().index());
        assert_ne!(a, b);
        assert!(!list.contains(a));
        assert_eq!(list.get(b), Ok(&2));
    }

    #[test]
    fn clone_has_its_own_identity() {
        let mut list = PositionalList::new();
        let a = list.add_last(1);
        let copy = list.clone();

        assert!(copy.iter().eq(list.iter()));
        assert_eq!(copy.get(a), Err(InvalidPosition::Foreign.into()));
        assert_eq!(copy.first().map(|p| copy.get(p)), Some(Ok(&1)));
    }

    #[test]
    fn update_each_visits_every_element() {
        let mut list = PositionalList::new();
        let a = list.add_last(1);
        list.add_last(2);
        list.update_each(|e| *e *= 10);

        assert!(list.iter().eq(&[10, 20]));
        assert_eq!(list.get(a), Ok(&10));
    }

    #[test]
    fn display_shows_sentinels() {
        let mut list = PositionalList::new();
        assert_eq!(list.to_string(), "null null");
        list.add_last(0);
        list.add_last(1);
        assert_eq!(list.to_string(), "null 0 1 null");
    }
}
