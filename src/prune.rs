//! This module implements the two label-driven pruning algorithms on top of the tree editing
//! operations: direct mode deletes exactly the labeled clades, reverse mode keeps only the
//! labeled nodes together with their ancestors and descendants.
//!
//! Both algorithms consume the tree's node sequence (children before parents) and a label
//! set.  The per-pass "seen" and "kept descendant" marks live in sets local to each pass
//! rather than on the nodes themselves, so stale marks cannot leak into a later pass.

use std::collections::HashSet;
use tree::{Node, Tree, Unlink};

/// The pruning mode requested on the command line
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {

    /// Delete the nodes whose labels are in the set
    Direct,

    /// Keep only the nodes whose labels are in the set, plus their ancestors and
    /// descendants
    Reverse,
}

/// Delete every node whose label is in the set, together with its subtree.  Redundant
/// degree-1 internal nodes left behind by a deletion are spliced out by `unlink()`'s
/// cascade.
///
/// The traversal runs over the node sequence in reverse, so parents are visited before
/// their children; once a node has been cut, its descendants inherit its mark and are
/// skipped instead of being unlinked from a subtree that is no longer part of the tree.
///
/// If the deletions leave the root with a single child, that child is returned as the
/// new-root candidate.  The tree is left in the degenerate single-child-root state; whether
/// to promote the candidate is the caller's policy.  Unlinking the root itself is reported
/// by `unlink()` and ignored here, so a label set containing the root's label leaves the
/// tree unchanged.
pub fn prune_direct(tree: &mut Tree, labels: &HashSet<String>) -> Option<Node> {

    let order          = tree.nodes_in_order();
    let mut seen       = HashSet::new();
    let mut root_child = None;

    for node in order.into_iter().rev() {
        if let Some(parent) = tree.parent(node) {
            if seen.contains(&parent) {
                // An ancestor was already cut; this whole subtree is gone with it
                seen.insert(node);
                continue;
            }
        }
        if labels.contains(tree.label(node)) {
            if let Ok(Unlink::RootChild(child)) = tree.unlink(node) {
                root_child = Some(child);
            }
            seen.insert(node);
        }
    }

    // A later deletion in the same pass can remove the reported child itself, leaving the
    // root with no children at all; only a candidate that survived the whole pass counts.
    match root_child {
        Some(child) if tree.is_linked(child) => Some(child),
        _                                    => None,
    }
}

/// Keep only the nodes whose labels are in the set, their ancestors, and their descendants;
/// drop everything else.  Consumes the tree and returns the filtered clone, which is empty
/// if no label matched.
///
/// The algorithm runs in two passes.  The mark pass walks the node sequence forward,
/// stopping at the root: a labeled node is marked seen and flagged as the top of a kept
/// clade, and every seen node propagates its mark to its parent, so that the ancestors of a
/// kept node stay connected to the root.  The filter pass clones the tree, keeping a node
/// if it is marked seen or if its parent belongs to a kept clade; in the latter case the
/// node joins the kept clade itself, so the flag propagates strictly downward.  The two
/// propagation directions are deliberately asymmetric: seen flows up during marking, clade
/// membership flows down during filtering.
pub fn prune_reverse(tree: Tree, labels: &HashSet<String>) -> Tree {

    let order    = tree.nodes_in_order();
    let mut seen = HashSet::new();
    let mut kept = HashSet::new();

    for node in order {
        let parent = match tree.parent(node) {
            Some(parent) => parent,
            None         => break,
        };
        if labels.contains(tree.label(node)) {
            seen.insert(node);
            kept.insert(node);
        }
        if seen.contains(&node) {
            seen.insert(parent);
        }
    }

    tree.clone_if(|node| {
        if seen.contains(&node) {
            return true;
        }
        if let Some(parent) = tree.parent(node) {
            if kept.contains(&parent) {
                kept.insert(node);
                return true;
            }
        }
        false
    })
}

#[cfg(test)]
mod tests {

    use super::*;
    use newick::{format_tree, parse_tree};
    use tree::TreeBuilder;

    /// Parse a single Newick string into a tree
    fn tree_from_newick(newick: &str) -> Tree {
        let mut builder = TreeBuilder::new();
        parse_tree(&mut builder, newick).unwrap();
        builder.trees().pop().unwrap()
    }

    /// Build a label set from a list of labels
    fn label_set(labels: &[&str]) -> HashSet<String> {
        labels.iter().map(|label| label.to_string()).collect()
    }

    /// Test that pruning a leaf splices out its degree-1 parent and that the surviving
    /// sibling's edge absorbs the parent's length
    #[test]
    fn direct_prunes_leaf_and_splices_parent() {
        let mut tree = tree_from_newick("((A:1,B:2)f:3,C:1)r;");
        assert_eq!(prune_direct(&mut tree, &label_set(&["A"])), None);
        assert_eq!(format_tree(&tree).unwrap(), "(B:5,C:1)r;");
    }

    /// Test that pruning an inner label removes its whole clade and that the root left with
    /// a single child is reported as the new-root candidate rather than collapsed
    #[test]
    fn direct_prunes_clade_and_reports_root_child() {
        let mut tree = tree_from_newick("((A,B)f,(C,(D,E)g)h)i;");
        let candidate = prune_direct(&mut tree, &label_set(&["f"]));
        let candidate = candidate.expect("the root should be left with a single child");
        assert_eq!(tree.label(candidate), "h");
        assert_eq!(tree.root().map(|root| tree.label(root).to_string()),
                   Some("i".to_string()));
        assert_eq!(tree.child_count(tree.root().unwrap()), 1);
        assert_eq!(format_tree(&tree).unwrap(), "((C,(D,E)g)h)i;");
    }

    /// Test that the descendants of a pruned clade are skipped, not unlinked a second time,
    /// when their own labels are in the set as well
    #[test]
    fn direct_skips_descendants_of_pruned_clade() {
        let mut tree = tree_from_newick("((A,B)f,(C,(D,E)g)h)i;");
        prune_direct(&mut tree, &label_set(&["f", "A", "B"]));
        assert_eq!(format_tree(&tree).unwrap(), "((C,(D,E)g)h)i;");
    }

    /// Test that no candidate is reported when the sole surviving root child is itself
    /// pruned later in the same pass
    #[test]
    fn direct_drops_candidate_pruned_in_same_pass() {
        let mut tree = tree_from_newick("((A,B)f,(C,D)h)i;");
        assert_eq!(prune_direct(&mut tree, &label_set(&["h", "f"])), None);
        let root = tree.root().unwrap();
        assert_eq!(tree.child_count(root), 0);
        assert_eq!(format_tree(&tree).unwrap(), "i;");
    }

    /// Test that several independent deletions in one pass each cascade correctly
    #[test]
    fn direct_prunes_multiple_labels() {
        let mut tree = tree_from_newick("((A:1,B:1)f:2,(C:1,(D:1,E:1)g:2)h:3)i;");
        assert_eq!(prune_direct(&mut tree, &label_set(&["A", "D"])), None);
        assert_eq!(format_tree(&tree).unwrap(), "(B:3,(C:1,E:3)h:3)i;");
    }

    /// Test that a label set naming the root leaves the tree unchanged
    #[test]
    fn direct_root_label_is_benign() {
        let mut tree = tree_from_newick("((A,B)f,C)i;");
        assert_eq!(prune_direct(&mut tree, &label_set(&["i"])), None);
        assert_eq!(format_tree(&tree).unwrap(), "((A,B)f,C)i;");
    }

    /// Test that a label matching nothing leaves the tree unchanged
    #[test]
    fn direct_unknown_label_is_noop() {
        let mut tree = tree_from_newick("((A:1,B:2)f:3,C:1)r;");
        assert_eq!(prune_direct(&mut tree, &label_set(&["Z"])), None);
        assert_eq!(format_tree(&tree).unwrap(), "((A:1,B:2)f:3,C:1)r;");
    }

    /// Test that reverse mode keeps the labeled clade with its descendants, the labeled
    /// leaf, and every ancestor needed to stay connected to the root
    #[test]
    fn reverse_keeps_clades_and_ancestors() {
        let tree   = tree_from_newick("((A:1,B:1)f:2,(C:1,(D:1,E:1)g:2)h:3)i;");
        let pruned = prune_reverse(tree, &label_set(&["f", "C"]));
        assert_eq!(format_tree(&pruned).unwrap(), "((A:1,B:1)f:2,(C:1)h:3)i;");
    }

    /// Test that descendants of a kept node are retained transitively, grandchildren
    /// included
    #[test]
    fn reverse_keeps_descendants_transitively() {
        let tree   = tree_from_newick("((A:1,B:1)f:2,(C:1,(D:1,E:1)g:2)h:3)i;");
        let pruned = prune_reverse(tree, &label_set(&["h"]));
        assert_eq!(format_tree(&pruned).unwrap(), "((C:1,(D:1,E:1)g:2)h:3)i;");
    }

    /// Test that reverse mode with no matching label prunes the tree down to nothing
    #[test]
    fn reverse_no_match_empties_tree() {
        let tree   = tree_from_newick("((A,B)f,C)i;");
        let pruned = prune_reverse(tree, &label_set(&["Z"]));
        assert_eq!(pruned.root(), None);
        assert_eq!(format_tree(&pruned), None);
    }

    /// Test that marks do not leak between passes: pruning the same tree shape twice with
    /// different labels gives independent results
    #[test]
    fn passes_are_independent() {
        let mut first = tree_from_newick("((A,B)f,(C,D)g)i;");
        prune_direct(&mut first, &label_set(&["A"]));
        assert_eq!(format_tree(&first).unwrap(), "(B,(C,D)g)i;");

        let mut second = tree_from_newick("((A,B)f,(C,D)g)i;");
        prune_direct(&mut second, &label_set(&["C"]));
        assert_eq!(format_tree(&second).unwrap(), "((A,B)f,D)i;");
    }
}
