//! Ordered trees of unbounded arity.
//!
//! Every node keeps its children in a [`PositionalList`](crate::PositionalList)
//! in insertion order and refers to its parent without owning it. Nodes are
//! addressed by [`TreePosition`](crate::TreePosition)s which, like list
//! positions, are only valid for the tree that issued them.
mod linked;
mod traits;

pub use linked::{Children, Elements, LinkedTree, Preorder, SubtreeDisplay};
pub use traits::Tree;
