//! A module to parse Newick strings into trees and to convert a tree back to a Newick
//! string.
//!
//! # Parsing
//!
//! The two main parsing functions are `parse_tree()` and `parse_forest()`.  For
//! `parse_tree()`, the input has to consist of a single line that is a valid Newick string
//! representing a single tree.  For `parse_forest()`, the input has to be a multi-line text.
//! Each line encodes one of the trees in the forest.
//!
//! These functions take a mutable reference to a `tree::TreeBuilder` as their first
//! argument.  A `tree::TreeBuilder` implements the construction of the trees based on the
//! methods the Newick parser calls.
//!
//! The grammar for a Newick string used by the parser is the following:
//!
//! ```ignore
//! Newick     -> Tree ;
//! Tree       -> Subtree Label : EdgeLength
//! Label      -> string | Nothing
//! EdgeLength -> number | Nothing
//! Subtree    -> ( Trees ) | Nothing
//! Trees      -> Tree MoreTrees
//! MoreTrees  -> , Trees | Nothing
//! Nothing    ->
//! ```
//!
//! Labels of internal nodes and edge lengths are preserved verbatim: pruning redistributes
//! edge lengths and has to report trees whose untouched lengths round-trip exactly as they
//! appeared in the input, so the edge length text is stored on the node as is rather than
//! being parsed into a number and reformatted.
//!
//! # Formatting
//!
//! The two main formatting functions are `format_tree()` and `format_forest()`.  They take a
//! `tree::Tree` or a slice of trees and return a Newick string.  In the case of
//! `format_forest()`, each tree is placed on its own line in the output string; empty trees
//! have no Newick representation and contribute no line.

use std::error;
use std::fmt;
use std::fmt::Write;
use std::iter;
use std::result;
use std::str;
use tree::{Node, Tree, TreeBuilder};

/// The parser's result type
pub type Result<T> = result::Result<T, Error>;

/// The error raised when a parse error is encountered
#[derive(Debug)]
pub struct Error {

    /// The error message
    message: String,

    /// The position in the input text where the error occurred
    pos: Pos,
}

/// Representation of an input position
#[derive(Clone, Copy, Debug)]
struct Pos(usize, usize);

/// Parse a given one-line Newick string using the given tree builder
///
/// # Example
///
/// ```
/// # use newick_prune::tree;
/// # use newick_prune::newick::*;
/// let newick      = "((a:1,(b,(c,d))x:2.5),e);";
/// let mut builder = tree::TreeBuilder::new();
/// parse_tree(&mut builder, newick).unwrap();
/// let trees = builder.trees();
/// assert_eq!(newick, format_tree(&trees[0]).unwrap());
/// ```
pub fn parse_tree(builder: &mut TreeBuilder, newick: &str) -> Result<()> {
    Parser::new(builder, newick).parse_tree()
}

/// Parse a given multi-line Newick string using the given tree builder
///
/// # Example
///
/// ```
/// # use newick_prune::tree;
/// # use newick_prune::newick::*;
/// let newick      = "((a,(b,(c,d))),e);\n(a:12,(((b,c),d),e));\n";
/// let mut builder = tree::TreeBuilder::new();
/// parse_forest(&mut builder, newick).unwrap();
/// let trees = builder.trees();
/// assert_eq!(newick, format_forest(&trees));
/// ```
pub fn parse_forest(builder: &mut TreeBuilder, newick: &str) -> Result<()> {
    Parser::new(builder, newick).parse_forest()
}

/// Struct representing the state of the Newick parser
struct Parser<'b, 'i> {

    /// The builder used to build the tree
    builder: &'b mut TreeBuilder,

    /// The current input position
    pos: Pos,

    /// The iterator currently used
    chars: iter::Peekable<str::Chars<'i>>,
}

impl<'b, 'i> Parser<'b, 'i> {

    /// Create a new parser that parses the given Newick string and uses the given builder to
    /// construct the corresponding tree.
    fn new(builder: &'b mut TreeBuilder, newick: &'i str) -> Parser<'b, 'i> {
        Parser {
            builder,
            pos:   Pos(1, 1),
            chars: newick.chars().peekable(),
        }
    }

    /// Parse a tree from a one-line Newick string
    fn parse_tree(mut self) -> Result<()> {
        self.parse_one_tree()?;
        match self.chars.next() {
            None => Ok(()),
            _    => Self::error("expected a one-line input", self.pos),
        }
    }

    /// Parse a forest from a multi-line Newick string
    fn parse_forest(mut self) -> Result<()> {
        while self.chars.peek().is_some() {
            self.parse_one_tree()?;
            self.pos = Pos(self.pos.0 + 1, 1);
        }
        Ok(())
    }

    /// Parse a tree from a one-line Newick string.  Does not enforce that the input has just
    /// one line.  This is guaranteed because this function is called by `parse_tree()` or
    /// `parse_forest()`, which pass a single line to this function.
    fn parse_one_tree(&mut self) -> Result<()> {
        self.builder.new_tree();
        let root = self.parse_subtree()?;
        self.parse_symbol(';')?;
        self.skip_spaces();
        self.parse_eol()?;
        self.builder.finish_tree(root);
        Ok(())
    }

    /// Check that we're at the end of the line
    fn parse_eol(&mut self) -> Result<()> {
        let pos = self.pos;
        match self.chars.next() {
            None       => Ok(()),
            Some('\n') => Ok(()),
            _          => Self::error("expected end of line", pos),
        }
    }

    /// Parse the given symbol
    fn parse_symbol(&mut self, sym: char) -> Result<()> {
        let pos = self.pos;
        match self.chars.next() {
            Some(c) if c == sym => Ok(()),
            _                   => Self::error(&format!("expected `{}'", sym), pos),
        }
    }

    /// Skip over spaces
    fn skip_spaces(&mut self) {
        loop {
            match self.chars.peek() {
                Some('\n')                    => return,
                Some(&c) if c.is_whitespace() => self.chars.next(),
                _                             => return,
            };
        }
    }

    /// Parse one subtree
    fn parse_subtree(&mut self) -> Result<Node> {
        self.skip_spaces();
        match self.chars.peek() {

            Some('(') => {
                self.chars.next();
                let children = self.parse_subtrees()?;
                self.parse_symbol(')')?;
                let label  = self.parse_label()?;
                let length = self.parse_edge_length()?;
                Ok(self.builder.new_node(children, &label, &length))
            },

            _ => {
                let label  = self.parse_label()?;
                let length = self.parse_edge_length()?;
                Ok(self.builder.new_leaf(&label, &length))
            },
        }
    }

    /// Parse a list of subtrees
    fn parse_subtrees(&mut self) -> Result<Vec<Node>> {

        let mut nodes = vec![];
        let node = self.parse_subtree()?;
        nodes.push(node);

        loop {

            self.skip_spaces();
            match self.chars.peek() {

                Some(',') => {
                    self.chars.next();
                    let node = self.parse_subtree()?;
                    nodes.push(node);
                },

                _ => break,
            };
        }

        Ok(nodes)
    }

    /// Parse an edge length.  Returns the raw text between the `:` and the next delimiter,
    /// or the empty string if the node carries no edge length.
    fn parse_edge_length(&mut self) -> Result<String> {

        self.skip_spaces();

        match self.chars.peek() {
            Some(&c) if c == ':' => (),
            _                    => return Ok(String::new()),
        }

        self.chars.next();
        let mut length = String::new();

        loop {
            match self.chars.peek() {
                None                            => break,
                Some(&c)                        => match c {
                    ',' | ';' | ':' | '(' | ')' => break,
                    _                           => {
                        length.push(c);
                        self.chars.next();
                    },
                },
            };
        }

        Ok(length.trim().to_string())
    }

    /// Parse a node label
    fn parse_label(&mut self) -> Result<String> {

        let mut label = "".to_string();

        loop {
            match self.chars.peek() {
                None                            => break,
                Some(&c)                        => match c {
                    ',' | ';' | ':' | '(' | ')' => break,
                    _                           => {
                        label.push(c);
                        self.chars.next();
                    },
                },
            }
        }

        Ok(label.trim().to_string())
    }

    /// Report an error at the current position
    fn error<T>(message: &str, pos: Pos) -> Result<T> {
        Err(Error {
            message: message.to_string(),
            pos,
        })
    }
}

/// Format a tree into a Newick string.  Returns `None` for an empty tree (a tree whose every
/// node was pruned away has no root and no Newick representation).
///
/// # Example
///
/// ```
/// # use newick_prune::tree;
/// # use newick_prune::newick::*;
/// let newick      = "((a:1,(b,(c,d))):3,e:4.25);";
/// let mut builder = tree::TreeBuilder::new();
/// parse_tree(&mut builder, newick).unwrap();
/// let trees = builder.trees();
/// assert_eq!(newick, format_tree(&trees[0]).unwrap());
/// ```
pub fn format_tree(tree: &Tree) -> Option<String> {
    Formatter::new(tree).run()
}

/// Format a forest into a Newick string, one line per tree.  Empty trees have no Newick
/// representation and contribute no line.
pub fn format_forest(forest: &[Tree]) -> String {
    let mut newick = String::new();
    for tree in forest {
        if let Some(tree) = Formatter::new(tree).run() {
            write!(newick, "{}\n", tree).unwrap();
        }
    }
    newick
}

/// A step of the iterative formatting traversal
enum Visit {

    /// Format the subtree rooted in this node
    Subtree(Node),

    /// Close this node's child list and write its label and edge length
    Close(Node),

    /// Write the separator between two siblings
    Comma,
}

/// The state of the formatting process.  The traversal is iterative, so that very deep trees
/// do not overflow the stack.
struct Formatter<'a> {

    /// The tree being formatted
    tree: &'a Tree,

    /// The current string
    newick: String,
}

impl<'a> Formatter<'a> {

    /// Create a new formatter for the given tree
    fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            newick: String::new(),
        }
    }

    /// Format the tree into a Newick string
    fn run(mut self) -> Option<String> {

        let root = self.tree.root()?;

        let mut stack = vec![Visit::Subtree(root)];
        while let Some(visit) = stack.pop() {
            match visit {

                Visit::Subtree(node) => {
                    if self.tree.is_leaf(node) {
                        self.write_node(node);
                    } else {
                        self.newick.write_char('(').unwrap();
                        stack.push(Visit::Close(node));
                        let children = self.tree.children(node).collect::<Vec<Node>>();
                        for (i, child) in children.into_iter().enumerate().rev() {
                            stack.push(Visit::Subtree(child));
                            if i > 0 {
                                stack.push(Visit::Comma);
                            }
                        }
                    }
                },

                Visit::Close(node) => {
                    self.newick.write_char(')').unwrap();
                    self.write_node(node);
                },

                Visit::Comma => self.newick.write_char(',').unwrap(),
            }
        }

        self.newick.write_char(';').unwrap();
        Some(self.newick)
    }

    /// Write a node's label and, if present, its edge length
    fn write_node(&mut self, node: Node) {
        self.newick.write_str(self.tree.label(node)).unwrap();
        let length = self.tree.edge_length(node);
        if !length.is_empty() {
            write!(self.newick, ":{}", length).unwrap();
        }
    }
}


impl error::Error for Error {

    fn description(&self) -> &str {
        "Newick parse error"
    }
}

impl fmt::Display for Error {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at position {}", self.message, self.pos)
    }
}

impl fmt::Display for Pos {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.0, self.1)
    }
}
