//! This crate implements structural editing and label-based pruning of rooted phylogenetic
//! trees read from Newick input.

extern crate slab;
#[macro_use]
extern crate clap;

pub mod app;
pub mod newick;
pub mod prune;
pub mod tree;
