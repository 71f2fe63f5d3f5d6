//! End-to-end tests that run trees from Newick text through pruning and back to Newick text.

extern crate newick_prune;

use std::collections::HashSet;

use newick_prune::newick;
use newick_prune::prune;
use newick_prune::tree::TreeBuilder;

/// Prune a whole forest in direct mode and format the result, one line per surviving tree
fn prune_forest_direct(input: &str, labels: &[&str]) -> String {
    let mut builder = TreeBuilder::new();
    newick::parse_forest(&mut builder, input).unwrap();
    let labels: HashSet<String> = labels.iter().map(|label| label.to_string()).collect();
    let mut output = String::new();
    for mut tree in builder.trees() {
        prune::prune_direct(&mut tree, &labels);
        if let Some(newick) = newick::format_tree(&tree) {
            output.push_str(&newick);
            output.push('\n');
        }
    }
    output
}

/// Prune a whole forest in reverse mode and format the result
fn prune_forest_reverse(input: &str, labels: &[&str]) -> String {
    let mut builder = TreeBuilder::new();
    newick::parse_forest(&mut builder, input).unwrap();
    let labels: HashSet<String> = labels.iter().map(|label| label.to_string()).collect();
    let mut output = String::new();
    for tree in builder.trees() {
        let pruned = prune::prune_reverse(tree, &labels);
        if let Some(newick) = newick::format_tree(&pruned) {
            output.push_str(&newick);
            output.push('\n');
        }
    }
    output
}

/// Test direct pruning across a forest, with edge lengths conserved through the splices
#[test]
fn direct_prune_forest() {
    let input = "((A:1,B:2)f:3,C:1)r;\n((A:2,D:1)g:1,(B:1,C:1)h:1)s;\n";
    assert_eq!(prune_forest_direct(input, &["A"]),
               "(B:5,C:1)r;\n(D:2,(B:1,C:1)h:1)s;\n");
}

/// Test that pruning an inner label deletes the whole clade in every tree that has it
#[test]
fn direct_prune_inner_label() {
    let input = "((A,B)f,(C,D)g)r;\n(E,(A,B)f)s;\n";
    assert_eq!(prune_forest_direct(input, &["f"]), "((C,D)g)r;\n(E)s;\n");
}

/// Test that trees without any matching label pass through unchanged, byte for byte
#[test]
fn direct_prune_preserves_unmatched_trees() {
    let input = "((a:0.5,b:0.25)x:1.0,c)r;\n";
    assert_eq!(prune_forest_direct(input, &["Z"]), input);
}

/// Test reverse pruning across a forest; a tree with no matching label disappears from the
/// output entirely
#[test]
fn reverse_prune_forest() {
    let input = "((A:1,B:1)f:2,(C:1,(D:1,E:1)g:2)h:3)i;\n((X,Y)p,Z)q;\n";
    assert_eq!(prune_forest_reverse(input, &["f", "C"]),
               "((A:1,B:1)f:2,(C:1)h:3)i;\n");
}

/// Test that reverse pruning on a leaf label keeps exactly the path from the root to that
/// leaf
#[test]
fn reverse_prune_keeps_root_path() {
    let input = "((A:1,B:1)f:2,(C:1,(D:1,E:1)g:2)h:3)i;\n";
    assert_eq!(prune_forest_reverse(input, &["D"]),
               "(((D:1)g:2)h:3)i;\n");
}
