extern crate newick_prune;

use newick_prune::app;

/// Main function
fn main() {
    let cfg = app::Config::new();

    let trees = match app::read_input(&cfg.input) {
        Ok(trees) => trees,
        Err(e)    => {
            eprintln!("{}", e);
            std::process::exit(1);
        },
    };

    let pruned = app::prune_trees(&cfg, trees);

    if let Err(e) = app::write_output(cfg.output.as_ref().map(|s| s.as_str()), &pruned) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
