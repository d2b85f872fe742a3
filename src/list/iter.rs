use std::iter::FusedIterator;

use super::PositionalList;
use crate::error::Error;
use crate::position::{ListPosition, SlotIndex};

/// Walks the element slots of a list from front to back.
#[derive(Debug)]
struct Cursor<'a, E> {
    list: &'a PositionalList<E>,
    next: SlotIndex,
    len: usize,
}

impl<'a, E> Clone for Cursor<'a, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, E> Copy for Cursor<'a, E> {}

impl<'a, E> Cursor<'a, E> {
    fn new(list: &'a PositionalList<E>) -> Self {
        Self {
            list,
            next: list.slots[list.head].links[1],
            len: list.len(),
        }
    }

    #[inline]
    fn advance(&mut self) -> Option<SlotIndex> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        let current = self.next;
        self.next = self.list.slots[current].links[1];
        Some(current)
    }
}

/// Iterator over the positions of a [`PositionalList`].
///
/// Created by [`PositionalList::positions`].
#[derive(Debug)]
pub struct Positions<'a, E> {
    cursor: Cursor<'a, E>,
}

impl<'a, E> Clone for Positions<'a, E> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor,
        }
    }
}

impl<'a, E> Positions<'a, E> {
    pub(super) fn new(list: &'a PositionalList<E>) -> Self {
        Self {
            cursor: Cursor::new(list),
        }
    }

    /// Advances the iterator, failing once every position has been reported.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchElement`] when the iterator is exhausted.
    pub fn try_next(&mut self) -> Result<ListPosition, Error> {
        self.next().ok_or(Error::NoSuchElement)
    }
}

impl<'a, E> Iterator for Positions<'a, E> {
    type Item = ListPosition;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor.advance()?;
        self.cursor.list.position(index)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.len, Some(self.cursor.len))
    }
}

impl<'a, E> ExactSizeIterator for Positions<'a, E> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.cursor.len
    }
}

impl<'a, E> FusedIterator for Positions<'a, E> {}

/// Iterator over the elements of a [`PositionalList`].
///
/// Created by [`PositionalList::elements`]. The iterator borrows the list, so
/// the list can not be changed while it is alive.
#[derive(Debug)]
pub struct Elements<'a, E> {
    cursor: Cursor<'a, E>,
}

impl<'a, E> Clone for Elements<'a, E> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor,
        }
    }
}

impl<'a, E> Elements<'a, E> {
    pub(super) fn new(list: &'a PositionalList<E>) -> Self {
        Self {
            cursor: Cursor::new(list),
        }
    }
}

impl<'a, E> Iterator for Elements<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor.advance()?;
        self.cursor.list.slots[index].element.as_ref()
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.len, Some(self.cursor.len))
    }
}

impl<'a, E> ExactSizeIterator for Elements<'a, E> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.cursor.len
    }
}

impl<'a, E> FusedIterator for Elements<'a, E> {}
