//! This module implements rooted, labeled, n-ary phylogenetic trees together with the
//! structural editing operations the pruning code is built on.
//!
//! A `Tree` owns its nodes in a slab; a `Node` is a copyable handle into that slab.  Within a
//! node, the children form a singly-linked sibling chain bounded by `first_child` and
//! `last_child`.  There is no back link to the previous sibling, so finding the node before a
//! given child is a linear scan over the chain; this is an accepted O(degree) cost, cheap for
//! the low branching factors of phylogenetic trees.
//!
//! Every edit maintains the chain's denormalized bookkeeping (`child_count`, `last_child`,
//! the `parent` pointers of moved sub-chains) and `splice_out()` conserves total edge length
//! by adding the removed node's length onto each of its children's edges.

use slab::Slab;
use std::error;
use std::fmt;
use std::result;

/// A result type for tree editing operations
pub type Result<T> = result::Result<T, Error>;

/// The error raised when an editing operation cannot be applied
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {

    /// The operation needs a parent but the node has none
    NoParent,

    /// `unlink()` was called on the root
    UnlinkRoot,

    /// The insertion index is past the end of the child chain
    InvalidIndex(usize, usize),
}

/// The outcome of a successful `unlink()` call
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Unlink {

    /// The node was removed; if its parent was left with a single child, the parent was
    /// spliced out as well.
    Done,

    /// The node was already unlinked; nothing was changed
    AlreadyUnlinked,

    /// The node was removed, leaving the root with this sole remaining child.  A root with
    /// one child is a degenerate state; promoting the child to new root is the caller's
    /// decision, not ours.
    RootChild(Node),
}

/// The type used to represent tree nodes
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Node(usize);

impl Node {

    /// Access the ID of this node
    pub fn id(&self) -> usize {
        self.0
    }
}

/// The data stored for a node
struct NodeData {

    /// The node's label; empty if the node is unlabeled
    label: String,

    /// The length of the edge above this node, kept as the original input text.  The text is
    /// authoritative; numeric values are derived from it on demand so that unmodified edges
    /// round-trip byte-for-byte.
    edge_length: String,

    /// Parent; `None` for the root and for detached nodes
    parent: Option<Node>,

    /// First child in the sibling chain
    first_child: Option<Node>,

    /// Last child in the sibling chain
    last_child: Option<Node>,

    /// The next child of this node's parent
    next_sibling: Option<Node>,

    /// The number of children; always equals the length of the sibling chain starting at
    /// `first_child`.
    child_count: usize,

    /// Whether this node is currently attached to the tree structure.  Distinct from having
    /// no parent: a freshly detached node is parentless *and* marked unlinked, which is what
    /// guards against double-unlinking.
    linked: bool,
}

/// A rooted phylogenetic tree
pub struct Tree {

    /// The nodes of the tree
    nodes: Slab<NodeData>,

    /// The root of the tree
    root: Option<Node>,
}

impl Tree {

    /// Create a new, empty tree
    pub fn new() -> Tree {
        Tree {
            nodes: Slab::new(),
            root:  None,
        }
    }

    /// Create a new node with the given label and edge length text.  The node starts out
    /// detached: no parent, no children, not linked.
    pub fn new_node(&mut self, label: &str, edge_length: &str) -> Node {
        Node(self.nodes.insert(NodeData {
            label:        label.to_string(),
            edge_length:  edge_length.to_string(),
            parent:       None,
            first_child:  None,
            last_child:   None,
            next_sibling: None,
            child_count:  0,
            linked:       false,
        }))
    }

    /// Make the given node the root of the tree.  The root is part of the tree's structure,
    /// so it is marked linked even though it was never attached as a child.
    pub fn set_root(&mut self, root: Node) {
        self.nodes[root.0].linked = true;
        self.root = Some(root);
    }

    /// The root node of this tree
    pub fn root(&self) -> Option<Node> {
        self.root
    }

    /// The number of nodes allocated in this tree, including detached ones
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Access the label of a node
    pub fn label(&self, node: Node) -> &str {
        &self.nodes[node.0].label
    }

    /// Access the edge length text of a node
    pub fn edge_length(&self, node: Node) -> &str {
        &self.nodes[node.0].edge_length
    }

    /// Access the parent of a node
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.nodes[node.0].parent
    }

    /// Access the first child of a node
    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.nodes[node.0].first_child
    }

    /// Access the last child of a node
    pub fn last_child(&self, node: Node) -> Option<Node> {
        self.nodes[node.0].last_child
    }

    /// Access the next sibling of a node
    pub fn next_sibling(&self, node: Node) -> Option<Node> {
        self.nodes[node.0].next_sibling
    }

    /// The number of children of a node
    pub fn child_count(&self, node: Node) -> usize {
        self.nodes[node.0].child_count
    }

    /// Is this node currently attached to the tree?
    pub fn is_linked(&self, node: Node) -> bool {
        self.nodes[node.0].linked
    }

    /// Is this node a leaf?
    pub fn is_leaf(&self, node: Node) -> bool {
        self.nodes[node.0].child_count == 0
    }

    /// Is this node the root, that is, does it have no parent?
    pub fn is_root(&self, node: Node) -> bool {
        self.nodes[node.0].parent.is_none()
    }

    /// Iterator over the children of a node
    pub fn children(&self, node: Node) -> ChildIter {
        ChildIter {
            tree:  self,
            child: self.nodes[node.0].first_child,
        }
    }

    /// Append `child` to `parent`'s sibling chain.  O(1) thanks to `last_child`.  The caller
    /// must ensure that `child` is not attached anywhere else.
    pub fn add_child(&mut self, parent: Node, child: Node) {
        match self.nodes[parent.0].last_child {
            None       => self.nodes[parent.0].first_child = Some(child),
            Some(last) => self.nodes[last.0].next_sibling  = Some(child),
        }
        self.nodes[parent.0].last_child   = Some(child);
        self.nodes[parent.0].child_count += 1;
        let child = &mut self.nodes[child.0];
        child.parent       = Some(parent);
        child.next_sibling = None;
        child.linked       = true;
    }

    /// Remove `child` from its parent's sibling chain and mark it unlinked.  Returns the
    /// zero-based position the child held among its siblings, so that the caller can
    /// reinsert it at the same place later.  Fails with `Error::NoParent` on the root.
    pub fn remove_child(&mut self, child: Node) -> Result<usize> {
        let parent = match self.nodes[child.0].parent {
            Some(parent) => parent,
            None         => return Err(Error::NoParent),
        };

        // Easy special case: the child is an only child
        if self.nodes[parent.0].child_count == 1 {
            let parent = &mut self.nodes[parent.0];
            parent.first_child = None;
            parent.last_child  = None;
            parent.child_count = 0;
            self.clear_links(child);
            return Ok(0);
        }

        let (prev, index) = self.find_previous_sibling(parent, child);
        let next          = self.nodes[child.0].next_sibling;
        match prev {
            None       => self.nodes[parent.0].first_child = next,
            Some(prev) => self.nodes[prev.0].next_sibling  = next,
        }
        if self.nodes[parent.0].last_child == Some(child) {
            self.nodes[parent.0].last_child = prev;
        }
        self.nodes[parent.0].child_count -= 1;
        self.clear_links(child);
        Ok(index)
    }

    /// Substitute `new` for `old` in `old`'s parent's sibling chain.  This is a pure
    /// substitution: `old`'s children and edge length are untouched, it is merely taken out
    /// of the chain.  `old` must not be the root.
    pub fn replace_child(&mut self, old: Node, new: Node) {
        let parent = self.nodes[old.0].parent.expect("replace_child applied to the root");

        let (prev, _) = self.find_previous_sibling(parent, old);
        let next      = self.nodes[old.0].next_sibling;
        match prev {
            None       => self.nodes[parent.0].first_child = Some(new),
            Some(prev) => self.nodes[prev.0].next_sibling  = Some(new),
        }
        if self.nodes[parent.0].last_child == Some(old) {
            self.nodes[parent.0].last_child = Some(new);
        }
        let new = &mut self.nodes[new.0];
        new.next_sibling = next;
        new.parent       = Some(parent);
        new.linked       = true;
        self.clear_links(old);
    }

    /// Split the edge above `node` in half by grafting a new node with the given label
    /// between `node` and its parent.  Both halves of the split edge get half of `node`'s
    /// original length (an empty length stays empty).  Returns the new node.  `node` must
    /// not be the root.
    pub fn insert_node_above(&mut self, node: Node, label: &str) -> Node {
        let half = half_length(&self.nodes[node.0].edge_length);
        let new  = self.new_node(label, &half);
        self.nodes[node.0].edge_length = half;
        self.replace_child(node, new);
        self.add_child(new, node);
        new
    }

    /// Remove an internal node from the tree, reattaching its children to its parent in the
    /// position the node occupied among its siblings.  Total edge length is conserved: every
    /// child's edge absorbs the spliced-out node's edge length.  `node` must be neither the
    /// root nor a leaf.
    pub fn splice_out(&mut self, node: Node) {
        let parent = self.nodes[node.0].parent.expect("splice_out applied to the root");
        assert!(self.nodes[node.0].child_count > 0, "splice_out applied to a leaf");

        // The children now answer to their grandparent, and their edges absorb the length of
        // the edge above `node`.
        let mut current = self.nodes[node.0].first_child;
        while let Some(child) = current {
            let length = add_lengths(&self.nodes[node.0].edge_length,
                                     &self.nodes[child.0].edge_length);
            self.nodes[child.0].edge_length = length;
            self.nodes[child.0].parent      = Some(parent);
            current = self.nodes[child.0].next_sibling;
        }

        // Wire the whole child chain into the place `node` held in its parent's chain
        let first     = self.nodes[node.0].first_child;
        let last      = self.nodes[node.0].last_child;
        let next      = self.nodes[node.0].next_sibling;
        let (prev, _) = self.find_previous_sibling(parent, node);
        match prev {
            None       => self.nodes[parent.0].first_child = first,
            Some(prev) => self.nodes[prev.0].next_sibling  = first,
        }
        if let Some(last) = last {
            self.nodes[last.0].next_sibling = next;
        }
        if self.nodes[parent.0].last_child == Some(node) {
            self.nodes[parent.0].last_child = last;
        }

        // The node itself is gone, its children took its place
        let child_count = self.nodes[node.0].child_count;
        self.nodes[parent.0].child_count += child_count - 1;
        let node = &mut self.nodes[node.0];
        node.first_child  = None;
        node.last_child   = None;
        node.child_count  = 0;
        node.parent       = None;
        node.next_sibling = None;
        node.linked       = false;
    }

    /// Insert `node` as the `index`-th child of `parent` (0-based).  Fails with
    /// `Error::InvalidIndex` if `index` is greater than the current child count.
    pub fn insert_child(&mut self, parent: Node, node: Node, index: usize) -> Result<()> {
        let child_count = self.nodes[parent.0].child_count;
        if index > child_count {
            return Err(Error::InvalidIndex(index, child_count));
        }

        // Find the node just before the insertion point; `None` when inserting at the head
        let mut prev = None;
        for _ in 0..index {
            prev = match prev {
                None       => self.nodes[parent.0].first_child,
                Some(prev) => self.nodes[prev.0].next_sibling,
            };
        }

        let next = match prev {
            None       => self.nodes[parent.0].first_child,
            Some(prev) => self.nodes[prev.0].next_sibling,
        };
        self.nodes[node.0].next_sibling = next;
        match prev {
            None       => self.nodes[parent.0].first_child = Some(node),
            Some(prev) => self.nodes[prev.0].next_sibling  = Some(node),
        }
        if index == child_count {
            self.nodes[parent.0].last_child = Some(node);
        }
        self.nodes[node.0].parent = Some(parent);
        self.nodes[node.0].linked = true;
        self.nodes[parent.0].child_count += 1;
        Ok(())
    }

    /// The ordered sequence of `node`'s siblings, excluding `node` itself; empty for the
    /// root.
    pub fn siblings(&self, node: Node) -> Vec<Node> {
        let mut siblings = vec![];
        if let Some(parent) = self.nodes[node.0].parent {
            for sibling in self.children(parent) {
                if sibling != node {
                    siblings.push(sibling);
                }
            }
        }
        siblings
    }

    /// Detach every child of `node` in one pass.  The children are disowned, not destroyed;
    /// they stay allocated and can be reattached elsewhere.
    pub fn remove_children(&mut self, node: Node) {
        let mut current = self.nodes[node.0].first_child;
        while let Some(child) = current {
            current = self.nodes[child.0].next_sibling;
            self.clear_links(child);
        }
        let node = &mut self.nodes[node.0];
        node.first_child = None;
        node.last_child  = None;
        node.child_count = 0;
    }

    /// Swap `node` with its parent, which must be the root: `node` becomes the new root and
    /// its former parent becomes its child.  The edge that led to `node` now leads to the
    /// former parent, so the parent takes over `node`'s edge length and `node`'s own length
    /// becomes empty.  With `label_as_support` set, the parent's label is overwritten with
    /// `node`'s, for trees whose inner labels encode support values that must migrate with
    /// the rerooting.
    pub fn swap_with_parent(&mut self, node: Node, label_as_support: bool) {
        let parent = self.nodes[node.0].parent.expect("swap_with_parent applied to the root");
        assert!(self.nodes[parent.0].parent.is_none(),
                "swap_with_parent applied below a non-root node");

        let length = self.nodes[node.0].edge_length.clone();
        self.remove_child(node).expect("swap_with_parent applied to a detached node");
        self.add_child(node, parent);

        if label_as_support {
            let label = self.nodes[node.0].label.clone();
            self.nodes[parent.0].label = label;
        }

        self.nodes[node.0].edge_length   = String::new();
        self.nodes[parent.0].edge_length = length;
        self.set_root(node);
    }

    /// Remove `node` and its subtree from the tree.  If this leaves the parent as a
    /// redundant degree-1 internal node, the parent is spliced out as well.  If the *root*
    /// is left with a single child, that is reported as `Unlink::RootChild` instead; the
    /// tree is left in that degenerate state for the caller to resolve.
    ///
    /// Unlinking an already-unlinked node is a benign no-op: the chain repair assumes the
    /// node is still structurally present, so it must not run twice.
    pub fn unlink(&mut self, node: Node) -> Result<Unlink> {
        if !self.nodes[node.0].linked {
            return Ok(Unlink::AlreadyUnlinked);
        }
        let parent = match self.nodes[node.0].parent {
            Some(parent) => parent,
            None         => return Err(Error::UnlinkRoot),
        };

        self.remove_child(node)?;

        if self.nodes[parent.0].child_count == 1 {
            if let Some(only_child) = self.nodes[parent.0].first_child {
                if self.nodes[parent.0].parent.is_none() {
                    return Ok(Unlink::RootChild(only_child));
                }
                self.splice_out(parent);
            }
        }
        Ok(Unlink::Done)
    }

    /// The sequence of all linked nodes, children before parents, with the root last.  For a
    /// freshly built tree this is the order in which the nodes were constructed.  The
    /// pruning code consumes this sequence forward and reversed.
    pub fn nodes_in_order(&self) -> Vec<Node> {
        let mut order = vec![];
        let mut stack = match self.root {
            Some(root) => vec![root],
            None       => return order,
        };
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.children(node));
        }
        order.reverse();
        order
    }

    /// Clone the tree, keeping exactly the nodes for which the predicate holds and dropping
    /// the subtrees below rejected nodes.  Labels and edge length texts of kept nodes are
    /// copied unchanged.  The predicate is guaranteed to run on a node only after it ran on
    /// the node's parent; predicates that propagate state downward rely on this order.
    /// Rejecting the root yields an empty tree.
    pub fn clone_if<F>(&self, mut keep: F) -> Tree
    where F: FnMut(Node) -> bool
    {
        let mut clone = Tree::new();

        let root = match self.root {
            Some(root) => root,
            None       => return clone,
        };
        if !keep(root) {
            return clone;
        }
        let new_root = clone.new_node(self.label(root), self.edge_length(root));
        clone.set_root(new_root);

        let mut stack = vec![];
        self.push_children(&mut stack, root, new_root);
        while let Some((node, parent)) = stack.pop() {
            if !keep(node) {
                continue;
            }
            let copy = clone.new_node(self.label(node), self.edge_length(node));
            clone.add_child(parent, copy);
            self.push_children(&mut stack, node, copy);
        }
        clone
    }

    /// Push the children of `node`, paired with their parent's clone, onto the traversal
    /// stack in reverse order, so that they are popped left to right.
    fn push_children(&self, stack: &mut Vec<(Node, Node)>, node: Node, copy: Node) {
        let children = self.children(node).collect::<Vec<Node>>();
        for child in children.into_iter().rev() {
            stack.push((child, copy));
        }
    }

    /// Find the sibling just before `child` in `parent`'s chain, along with `child`'s
    /// position in the chain.  The chain is singly linked, so this is a linear scan from
    /// `first_child`; `None` means `child` is the first child.
    fn find_previous_sibling(&self, parent: Node, child: Node) -> (Option<Node>, usize) {
        let mut prev    = None;
        let mut index   = 0;
        let mut current = self.nodes[parent.0].first_child;
        while let Some(node) = current {
            if node == child {
                break;
            }
            prev    = Some(node);
            index  += 1;
            current = self.nodes[node.0].next_sibling;
        }
        (prev, index)
    }

    /// Reset the navigation fields of a node that was taken out of a chain, so that stale
    /// parent and sibling pointers cannot outlive the detachment.
    fn clear_links(&mut self, node: Node) {
        let node = &mut self.nodes[node.0];
        node.parent       = None;
        node.next_sibling = None;
        node.linked       = false;
    }
}

/// An iterator over the children of a node
pub struct ChildIter<'a> {
    tree:  &'a Tree,
    child: Option<Node>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = Node;
    fn next(&mut self) -> Option<Node> {
        match self.child {
            None       => None,
            Some(node) => {
                self.child = self.tree.next_sibling(node);
                Some(node)
            },
        }
    }
}

/// Builder to construct trees, one node at a time.  The Newick parser drives this interface.
pub struct TreeBuilder {

    /// The tree under construction
    current_tree: Option<Tree>,

    /// The trees built so far
    trees: Vec<Tree>,
}

impl TreeBuilder {

    /// Create a new tree builder
    pub fn new() -> TreeBuilder {
        TreeBuilder {
            current_tree: None,
            trees:        Vec::new(),
        }
    }

    /// Start the construction of a new tree
    pub fn new_tree(&mut self) {
        self.current_tree = Some(Tree::new());
    }

    /// Create a new leaf in the current tree
    pub fn new_leaf(&mut self, label: &str, edge_length: &str) -> Node {
        self.current_tree.as_mut().unwrap().new_node(label, edge_length)
    }

    /// Create a new internal node with the given list of children in the current tree
    pub fn new_node(&mut self, children: Vec<Node>, label: &str, edge_length: &str) -> Node {
        let tree = self.current_tree.as_mut().unwrap();
        let node = tree.new_node(label, edge_length);
        for child in children {
            tree.add_child(node, child);
        }
        node
    }

    /// Finish the construction of the current tree by giving it its root
    pub fn finish_tree(&mut self, root: Node) {
        let mut tree = self.current_tree.take().unwrap();
        tree.set_root(root);
        self.trees.push(tree);
    }

    /// Access the trees built so far
    pub fn trees(self) -> Vec<Tree> {
        self.trees
    }
}

/// Half of the given edge length text; "" halves to "".
fn half_length(length: &str) -> String {
    if length.is_empty() {
        String::new()
    } else {
        format!("{}", parse_length(length) / 2.0)
    }
}

/// The sum of two edge length texts.  An empty text counts as zero, and if both are empty
/// the sum stays empty, so that trees without edge lengths do not sprout zeros.
fn add_lengths(length1: &str, length2: &str) -> String {
    if length1.is_empty() && length2.is_empty() {
        String::new()
    } else {
        format!("{}", parse_length(length1) + parse_length(length2))
    }
}

/// The numeric value of an edge length text; unparseable text counts as zero
fn parse_length(length: &str) -> f64 {
    length.trim().parse().unwrap_or(0.0)
}

impl error::Error for Error {

    fn description(&self) -> &str {
        "tree editing error"
    }
}

impl fmt::Display for Error {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NoParent   => write!(f, "node has no parent to detach from"),
            Error::UnlinkRoot => write!(f, "cannot unlink the root"),
            Error::InvalidIndex(index, child_count) =>
                write!(f, "insertion index {} out of range for {} children", index, child_count),
        }
    }
}
