//! This module implements the application logic of `nw_prune`, that is, the code that applies the
//! selected pruning algorithm to every tree read from the input.

use std::collections::HashSet;
use app;
use prune;
use prune::Mode;
use tree::Tree;

/// Prune every tree with the label set and mode from the configuration
pub fn prune_trees(cfg: &app::Config, trees: Vec<Tree>) -> Vec<Tree> {
    let labels: HashSet<String> = cfg.labels.iter().cloned().collect();
    trees.into_iter().map(|tree| prune_tree(cfg.mode, tree, &labels)).collect()
}

/// Prune a single tree.  In direct mode, a root left with a single child is written out as
/// is; collapsing the degenerate root is left to the user.
fn prune_tree(mode: Mode, mut tree: Tree, labels: &HashSet<String>) -> Tree {
    match mode {
        Mode::Direct => {
            prune::prune_direct(&mut tree, labels);
            tree
        },
        Mode::Reverse => prune::prune_reverse(tree, labels),
    }
}
