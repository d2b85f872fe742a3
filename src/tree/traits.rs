use crate::error::Error;

/// Navigation and structural queries over an ordered tree.
///
/// Implementors provide the primitive accessors; counting, classification of
/// nodes and the depth/height measures are derived from them. Every method
/// taking a position fails with [`Error::InvalidPosition`] when the position
/// does not denote a node of this tree.
pub trait Tree {
    /// Handle to a node of the tree.
    type Position: Copy + Eq;

    /// Iterator created by [`Tree::children`].
    type Children<'a>: Iterator<Item = Self::Position>
    where
        Self: 'a;

    /// Iterator created by [`Tree::positions`].
    type Positions<'a>: Iterator<Item = Self::Position>
    where
        Self: 'a;

    /// Returns the number of nodes.
    fn len(&self) -> usize;

    /// Returns whether the tree has no node.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the root, or `None` if the tree is empty.
    fn root(&self) -> Option<Self::Position>;

    /// Returns the parent of a node, or `None` if it is the root.
    fn parent(&self, position: Self::Position) -> Result<Option<Self::Position>, Error>;

    /// Iterates over the children of a node in order.
    fn children(&self, position: Self::Position) -> Result<Self::Children<'_>, Error>;

    /// Returns whether the node is the root.
    fn is_root(&self, position: Self::Position) -> Result<bool, Error>;

    /// Iterates over all nodes, parents before their children.
    fn positions(&self) -> Self::Positions<'_>;

    /// Returns the number of children of a node.
    ///
    /// Walks the children once.
    fn num_children(&self, position: Self::Position) -> Result<usize, Error> {
        let mut count = 0;
        let mut children = self.children(position)?;

        while children.next().is_some() {
            count += 1;
        }

        Ok(count)
    }

    /// Returns whether the node has at least one child.
    fn is_internal(&self, position: Self::Position) -> Result<bool, Error> {
        Ok(self.num_children(position)? > 0)
    }

    /// Returns whether the node has no children.
    fn is_external(&self, position: Self::Position) -> Result<bool, Error> {
        Ok(self.num_children(position)? == 0)
    }

    /// Returns the number of edges between a node and the root.
    fn depth(&self, position: Self::Position) -> Result<usize, Error> {
        let mut depth = 0;
        let mut current = position;

        while let Some(parent) = self.parent(current)? {
            depth += 1;
            current = parent;
        }

        Ok(depth)
    }

    /// Returns the number of edges on the longest downward path from a node
    /// to a leaf.
    fn height(&self, position: Self::Position) -> Result<usize, Error> {
        let mut height = 0;
        let mut stack = vec![(position, 0)];

        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(self.children(node)?.map(|child| (child, depth + 1)));
        }

        Ok(height)
    }
}
