//! Positional containers: a doubly linked list with stable element handles and
//! a general ordered tree built on top of it.
//!
//! [`PositionalList`] hands out a [`ListPosition`] for every inserted element.
//! Positions survive unrelated insertions and removals and are invalidated for
//! good when their element is removed. [`LinkedTree`] stores the ordered
//! children of every node in a positional list and is navigated through
//! [`TreePosition`]s and the [`Tree`] trait.
//!
//! Both containers keep their slots in an arena and identify a slot by its
//! index and generation, so a stale or foreign position is detected in *O*(1)
//! and reported as [`Error::InvalidPosition`].
//!
//! ```
//! # use postree::{PositionalList, Error};
//! let mut list = PositionalList::new();
//! let p1 = list.add_last(1);
//! list.add_last(2);
//! list.add_first(0);
//! assert!(list.iter().eq(&[0, 1, 2]));
//!
//! assert_eq!(list.remove(p1), Ok(1));
//! assert!(list.iter().eq(&[0, 2]));
//! assert!(matches!(list.before(p1), Err(Error::InvalidPosition(_))));
//! ```
pub mod error;
pub mod list;
pub(crate) mod memory;
pub mod position;
pub mod tree;

pub use crate::error::{Error, InvalidPosition};
pub use crate::list::PositionalList;
pub use crate::position::{ListPosition, Position, TreePosition};
pub use crate::tree::{LinkedTree, Tree};
