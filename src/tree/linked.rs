use std::collections::BTreeMap;
use std::fmt;
use std::iter::FusedIterator;
use std::mem::{replace, swap};

use tracing::{instrument, trace, warn};

use super::Tree;
use crate::error::{Error, InvalidPosition};
use crate::list::{self, PositionalList};
use crate::memory::{Slab, SlotKey};
use crate::position::{NodeIndex, OwnerId, TreePosition};

type NodeKey = SlotKey<NodeIndex>;
type NodeMap = BTreeMap<NodeKey, NodeKey>;

/// A general ordered tree whose nodes keep their children in positional lists.
///
/// All nodes live in one arena owned by the tree. A node owns the list of its
/// children's keys and refers to its parent by key, so the ownership graph is
/// acyclic.
///
/// # Examples
///
/// ```
/// # use postree::{LinkedTree, Tree};
/// let mut tree = LinkedTree::new();
/// let a = tree.add_root("A").unwrap();
/// let b = tree.add_child(a, "B").unwrap();
/// tree.add_child(a, "C").unwrap();
/// tree.add_child(b, "D").unwrap();
///
/// assert!(tree.iter().eq(&["A", "B", "D", "C"]));
/// assert_eq!(tree.to_string(), "A(B(D())C())");
/// assert_eq!(tree.parent(b).unwrap(), Some(a));
/// ```
pub struct LinkedTree<E> {
    owner: OwnerId,
    nodes: Slab<NodeIndex, TreeNode<E>>,
    root: Option<NodeKey>,
}

#[derive(Debug, Clone)]
struct TreeNode<E> {
    element: E,
    /// The parent of the node, if any. Not an owning link.
    parent: Option<NodeKey>,
    /// The children of the node in order.
    children: PositionalList<NodeKey>,
}

impl<E> TreeNode<E> {
    fn new(element: E, parent: Option<NodeKey>) -> Self {
        Self {
            element,
            parent,
            children: PositionalList::new(),
        }
    }

    /// Rewrites the links of a node that moved between arenas.
    fn relink(&mut self, rekey: &NodeMap) {
        self.parent = self.parent.and_then(|parent| rekey.get(&parent)).copied();
        self.children.update_each(|child| {
            if let Some(new) = rekey.get(child) {
                *child = *new;
            }
        });
    }
}

impl<E> LinkedTree<E> {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            owner: OwnerId::fresh(),
            nodes: Slab::with_capacity(capacity),
            root: None,
        }
    }

    /// Creates the root of an empty tree.
    ///
    /// # Errors
    ///
    /// [`Error::TreeAlreadyRooted`] when the tree is not empty.
    #[instrument(level = "trace", skip_all)]
    pub fn add_root(&mut self, element: E) -> Result<TreePosition, Error> {
        if !self.nodes.is_empty() {
            return Err(Error::TreeAlreadyRooted);
        }

        let root = self.nodes.insert(TreeNode::new(element, None));
        self.root = Some(root);
        Ok(self.position(root))
    }

    /// Appends a new node as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// When `parent` is not a node of this tree.
    pub fn add_child(&mut self, parent: TreePosition, element: E) -> Result<TreePosition, Error> {
        let parent = self.resolve(parent)?;
        let child = self.nodes.insert(TreeNode::new(element, Some(parent)));
        self.nodes[parent.index()].children.add_last(child);
        Ok(self.position(child))
    }

    /// Prepends a new node as the first child of `parent`.
    ///
    /// # Errors
    ///
    /// When `parent` is not a node of this tree.
    pub fn add_first_child(
        &mut self,
        parent: TreePosition,
        element: E,
    ) -> Result<TreePosition, Error> {
        let parent = self.resolve(parent)?;
        let child = self.nodes.insert(TreeNode::new(element, Some(parent)));
        self.nodes[parent.index()].children.add_first(child);
        Ok(self.position(child))
    }

    /// Builds a tree from a root element and a sequence of subtrees.
    ///
    /// The subtrees are taken from the front of `subtrees` until it is empty
    /// and become the root's children in that order. Empty subtrees are
    /// dropped. Positions issued by the subtrees are not valid in the new tree.
    ///
    /// # Examples
    ///
    /// ```
    /// # use postree::{LinkedTree, PositionalList, Tree};
    /// let mut b = LinkedTree::new();
    /// b.add_root('b').unwrap();
    /// let mut c = LinkedTree::new();
    /// let c_root = c.add_root('c').unwrap();
    /// c.add_child(c_root, 'd').unwrap();
    ///
    /// let mut subtrees = PositionalList::new();
    /// subtrees.add_last(b);
    /// subtrees.add_last(c);
    ///
    /// let tree = LinkedTree::from_subtrees('a', &mut subtrees);
    /// assert!(subtrees.is_empty());
    /// assert_eq!(tree.len(), 4);
    /// assert_eq!(tree.to_string(), "a(b()c(d()))");
    /// ```
    #[instrument(level = "trace", skip_all, fields(subtrees = subtrees.len()))]
    pub fn from_subtrees(element: E, subtrees: &mut PositionalList<LinkedTree<E>>) -> Self {
        let mut tree = Self::new();
        let root = tree.nodes.insert(TreeNode::new(element, None));
        tree.root = Some(root);

        while let Some(subtree) = subtrees.pop_first() {
            let Some(child) = tree.absorb(subtree) else {
                trace!("dropping empty subtree");
                continue;
            };

            tree.nodes[child.index()].parent = Some(root);
            tree.nodes[root.index()].children.add_last(child);
        }

        trace!(len = tree.nodes.len(), "assembled tree from subtrees");
        tree
    }

    /// Moves the nodes of `subtree` into this tree's arena, returning the new
    /// key of its root.
    fn absorb(&mut self, subtree: LinkedTree<E>) -> Option<NodeKey> {
        let root = subtree.root?;
        let nodes = &mut self.nodes;

        let rekey: NodeMap = subtree
            .nodes
            .into_iter()
            .map(|(old, node)| (old, nodes.insert(node)))
            .collect();

        for new in rekey.values() {
            self.nodes[new.index()].relink(&rekey);
        }

        rekey.get(&root).copied()
    }

    /// Borrows the element of a node.
    ///
    /// # Errors
    ///
    /// When `position` is not a node of this tree.
    pub fn get(&self, position: TreePosition) -> Result<&E, Error> {
        let key = self.resolve(position)?;
        Ok(&self.nodes[key.index()].element)
    }

    /// Mutably borrows the element of a node.
    ///
    /// # Errors
    ///
    /// When `position` is not a node of this tree.
    pub fn get_mut(&mut self, position: TreePosition) -> Result<&mut E, Error> {
        let key = self.resolve(position)?;
        Ok(&mut self.nodes[key.index()].element)
    }

    /// Replaces the element of a node, returning the previous one.
    ///
    /// # Errors
    ///
    /// When `position` is not a node of this tree.
    pub fn set(&mut self, position: TreePosition, element: E) -> Result<E, Error> {
        Ok(replace(self.get_mut(position)?, element))
    }

    /// Exchanges the elements stored at two nodes, leaving the structure as is.
    ///
    /// # Errors
    ///
    /// When either position is not a node of this tree.
    pub fn swap_elements(&mut self, v: TreePosition, w: TreePosition) -> Result<(), Error> {
        let v = self.resolve(v)?;
        let w = self.resolve(w)?;

        if let Some((v, w)) = self.nodes.get2_mut(v.index(), w.index()) {
            swap(&mut v.element, &mut w.element);
        }

        Ok(())
    }

    /// Iterates over the nodes in preorder.
    #[inline]
    pub fn preorder(&self) -> Preorder<'_, E> {
        Preorder::new(self)
    }

    /// Iterates over the elements in preorder.
    #[inline]
    pub fn elements(&self) -> Elements<'_, E> {
        Elements {
            preorder: self.preorder(),
        }
    }

    /// Alias of [`LinkedTree::elements`].
    #[inline]
    pub fn iter(&self) -> Elements<'_, E> {
        self.elements()
    }

    /// Renders the subtree rooted at `position` in the same format as the
    /// tree's [`Display`](fmt::Display) implementation.
    ///
    /// # Errors
    ///
    /// When `position` is not a node of this tree.
    pub fn display_subtree(&self, position: TreePosition) -> Result<SubtreeDisplay<'_, E>, Error> {
        let node = self.resolve(position)?;
        Ok(SubtreeDisplay { tree: self, node })
    }

    /// Ensures that `position` denotes a node of this tree.
    fn resolve(&self, position: TreePosition) -> Result<NodeKey, Error> {
        let key = position.key_for(self.owner)?;

        if self.nodes.contains(key) {
            Ok(key)
        } else {
            Err(InvalidPosition::Stale.into())
        }
    }

    #[inline]
    fn position(&self, key: NodeKey) -> TreePosition {
        TreePosition::new(self.owner, key)
    }
}

impl<E> Tree for LinkedTree<E> {
    type Position = TreePosition;
    type Children<'a> = Children<'a> where Self: 'a;
    type Positions<'a> = Preorder<'a, E> where Self: 'a;

    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn root(&self) -> Option<TreePosition> {
        self.root.map(|root| self.position(root))
    }

    fn parent(&self, position: TreePosition) -> Result<Option<TreePosition>, Error> {
        let key = self.resolve(position)?;
        let parent = self.nodes[key.index()].parent;
        Ok(parent.map(|parent| self.position(parent)))
    }

    fn children(&self, position: TreePosition) -> Result<Children<'_>, Error> {
        let key = self.resolve(position)?;
        Ok(Children {
            owner: self.owner,
            keys: self.nodes[key.index()].children.elements(),
        })
    }

    fn is_root(&self, position: TreePosition) -> Result<bool, Error> {
        let key = self.resolve(position)?;
        Ok(self.root == Some(key))
    }

    #[inline]
    fn positions(&self) -> Preorder<'_, E> {
        self.preorder()
    }
}

impl<E> Default for LinkedTree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Clone for LinkedTree<E> {
    /// Clones the nodes into a tree with its own identity; positions of
    /// `self` are not valid in the clone.
    fn clone(&self) -> Self {
        Self {
            owner: OwnerId::fresh(),
            nodes: self.nodes.clone(),
            root: self.root,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for LinkedTree<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedTree")
            .field("len", &self.nodes.len())
            .field("preorder", &self.elements().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, E> IntoIterator for &'a LinkedTree<E> {
    type Item = &'a E;
    type IntoIter = Elements<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements()
    }
}

/// Iterator over the children of a node.
///
/// Created by [`Tree::children`].
#[derive(Debug, Clone)]
pub struct Children<'a> {
    owner: OwnerId,
    keys: list::Elements<'a, NodeKey>,
}

impl<'a> Iterator for Children<'a> {
    type Item = TreePosition;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        Some(TreePosition::new(self.owner, *key))
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a> ExactSizeIterator for Children<'a> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.keys.len()
    }
}

impl<'a> FusedIterator for Children<'a> {}

/// Iterator over the nodes of a tree, each node before its descendants and
/// siblings in order.
///
/// Created by [`LinkedTree::preorder`]. Nodes are produced on demand; the
/// iterator keeps one cursor per level of the current path.
pub struct Preorder<'a, E> {
    tree: &'a LinkedTree<E>,
    /// The root, until it has been reported.
    pending: Option<NodeKey>,
    /// Cursors over the remaining children along the current path.
    stack: Vec<list::Elements<'a, NodeKey>>,
    remaining: usize,
}

impl<'a, E> Preorder<'a, E> {
    fn new(tree: &'a LinkedTree<E>) -> Self {
        Self {
            tree,
            pending: tree.root,
            stack: Vec::new(),
            remaining: tree.nodes.len(),
        }
    }

    /// Advances the iterator, failing once every node has been reported.
    ///
    /// # Errors
    ///
    /// [`Error::NoSuchElement`] when the iterator is exhausted.
    pub fn try_next(&mut self) -> Result<TreePosition, Error> {
        self.next().ok_or(Error::NoSuchElement)
    }

    fn next_key(&mut self) -> Option<NodeKey> {
        let key = match self.pending.take() {
            Some(root) => root,
            None => loop {
                let frame = self.stack.last_mut()?;

                match frame.next() {
                    Some(child) => break *child,
                    None => {
                        self.stack.pop();
                    }
                }
            },
        };

        let tree = self.tree;
        self.stack.push(tree.nodes[key.index()].children.elements());
        self.remaining = self.remaining.saturating_sub(1);
        Some(key)
    }
}

impl<'a, E> Iterator for Preorder<'a, E> {
    type Item = TreePosition;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next_key()?;
        Some(self.tree.position(key))
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, E> ExactSizeIterator for Preorder<'a, E> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<'a, E> FusedIterator for Preorder<'a, E> {}

/// Iterator over the elements of a tree in preorder.
///
/// Created by [`LinkedTree::elements`].
pub struct Elements<'a, E> {
    preorder: Preorder<'a, E>,
}

impl<'a, E> Iterator for Elements<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.preorder.next_key()?;
        let tree = self.preorder.tree;
        Some(&tree.nodes[key.index()].element)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.preorder.size_hint()
    }
}

impl<'a, E> ExactSizeIterator for Elements<'a, E> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.preorder.remaining
    }
}

impl<'a, E> FusedIterator for Elements<'a, E> {}

/// Renders a subtree as its element followed by the parenthesised renderings
/// of its children, e.g. `A(B()C())`.
///
/// Created by [`LinkedTree::display_subtree`].
pub struct SubtreeDisplay<'a, E> {
    tree: &'a LinkedTree<E>,
    node: NodeKey,
}

impl<'a, E: fmt::Display> fmt::Display for SubtreeDisplay<'a, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt_subtree(self.node, f)
    }
}

/// Renders the whole tree like [`SubtreeDisplay`]; an empty tree renders as
/// the empty string.
impl<E: fmt::Display> fmt::Display for LinkedTree<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_subtree(root, f),
            None => Ok(()),
        }
    }
}

impl<E: fmt::Display> LinkedTree<E> {
    /// Writes `element(` when a node is entered and `)` when its last child
    /// is done, keeping one children cursor per open node.
    fn fmt_subtree(&self, node: NodeKey, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<list::Elements<'_, NodeKey>> = Vec::new();
        let mut enter = Some(node);

        loop {
            if let Some(node) = enter.take() {
                match self.nodes.get(node) {
                    Some(data) => {
                        write!(f, "{}(", data.element)?;
                        stack.push(data.children.elements());
                    }
                    None => warn!(?node, "skipping unresolvable node while rendering tree"),
                }
            }

            let Some(frame) = stack.last_mut() else {
                return Ok(());
            };

            match frame.next() {
                Some(child) => enter = Some(*child),
                None => {
                    stack.pop();
                    f.write_str(")")?;
                }
            }
        }
    }
}
