//! This module contains all the command line parsing code and provides a `Config` struct that
//! encapsulates all the parsed configuration options.

use clap::{App, Arg};
use prune::Mode;

/// A structure to hold all the configuration parameters
pub struct Config {
    /// The name of the input file; "-" reads from stdin
    pub input: String,

    /// The name of the output file
    pub output: Option<String>,

    /// The labels to prune
    pub labels: Vec<String>,

    /// The pruning mode
    pub mode: Mode,
}

impl Config {
    /// Create a new config object from the command line arguments
    pub fn new() -> Self {
        // Define the acceptable arguments
        let args = [
            Arg::with_name("input")
                .required(true)
                .takes_value(true)
                .value_name("input")
                .help("input file")
                .long_help(
"input file; contains the trees in Newick format, one tree per line. Use \"-\" to read the \
trees from standard input."),
            Arg::with_name("labels")
                .required(true)
                .takes_value(true)
                .multiple(true)
                .value_name("label")
                .help("labels to prune")
                .long_help(
"labels of the nodes to prune; with -v, labels of the nodes to keep"),
            Arg::with_name("output")
                .required(false)
                .takes_value(true)
                .value_name("output")
                .short("o")
                .long("output")
                .help("output file")
                .long_help(
"output file; receives the pruned trees. If this option is absent, the trees are written to \
standard output."),
            Arg::with_name("reverse")
                .required(false)
                .takes_value(false)
                .short("v")
                .long("reverse")
                .help("keep the listed labels instead of removing them")
                .long_help(
"reverse the pruning: keep only the nodes whose labels are listed, together with their \
ancestors and descendants, and remove everything else"),
        ];

        // Parse the arguments
        let args = App::new("nw_prune")
            .version(crate_version!())
            .about("Prune labeled clades from phylogenetic trees in Newick format")
            .long_about("Prune labeled clades from phylogenetic trees in Newick format")
            .args(&args)
            .get_matches();

        let input = args.value_of("input").unwrap().to_string();
        let output = args.value_of("output").map(|s| s.to_string());
        let labels = args.values_of("labels").unwrap().map(|s| s.to_string()).collect();
        let mode = if args.is_present("reverse") {
            Mode::Reverse
        } else {
            Mode::Direct
        };

        Self {
            input,
            output,
            labels,
            mode,
        }
    }
}
