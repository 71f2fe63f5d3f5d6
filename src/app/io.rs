//! This module contains all the code for reading the input of `nw_prune` and writing the pruned
//! trees back to screen or to a file.

use std::fs;
use std::io;
use std::io::Read;
use std::io::Write;
use app;
use newick;
use tree::{Tree, TreeBuilder};

/// Read the input from a file or, if the file name is "-", from stdin
pub fn read_input(file_name: &str) -> app::Result<Vec<Tree>> {
    let mut newick = String::from("");
    if file_name == "-" {
        io::stdin().read_to_string(&mut newick)?;
    } else {
        fs::File::open(file_name)?.read_to_string(&mut newick)?;
    }
    let mut builder = TreeBuilder::new();
    newick::parse_forest(&mut builder, &newick)?;
    Ok(builder.trees())
}

/// Write the pruned trees to a file or stdout, one tree per line.  Trees pruned down to
/// nothing produce no output line.
pub fn write_output(file_name: Option<&str>, trees: &[Tree]) -> app::Result<()> {
    let mut file: Box<io::Write> = match file_name {
        Some(file_name) => Box::new(fs::File::create(file_name)?),
        None            => Box::new(io::stdout()),
    };
    for tree in trees {
        if let Some(newick) = newick::format_tree(tree) {
            writeln!(file, "{}", newick)?;
        }
    }
    Ok(())
}
