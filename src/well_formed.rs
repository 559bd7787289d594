//! Structural verification of a [RadixTree](crate::RadixTree).

use std::{error::Error, fmt};

use crate::{
    RadixTree,
    list::{NodeIndex, Slots},
};

/// An issue with the well-formed-ness of the tree. Every node is
/// identified by the concatenation of prefixes on the path from the root
/// to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedTreeError {
    /// The edges of a node were not strictly ascending by label.
    UnsortedEdges {
        /// The path of the node owning the edges
        prefix: String,
    },
    /// An edge label did not match the first character of the child prefix,
    /// or the child prefix was empty.
    LabelMismatch {
        /// The path of the child node
        prefix: String,
        /// The label on the edge leading to it
        label: char,
    },
    /// A non-root node had neither edges nor a stored key.
    DeadLeaf {
        /// The path of the node
        prefix: String,
    },
    /// A non-root node without a stored key had a single edge, so it should
    /// have been merged with its child.
    Uncompressed {
        /// The path of the node
        prefix: String,
    },
    /// A stored key disagreed with the path that leads to it.
    KeyMismatch {
        /// The concatenated prefixes from the root
        path: String,
        /// The key stored in the terminal
        key: String,
    },
    /// The number of reachable keys differs from the recorded length.
    WrongLen {
        /// The length the tree reports
        expected: usize,
        /// The number of keys found while walking
        found: usize,
    },
}

impl fmt::Display for MalformedTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedTreeError::UnsortedEdges { prefix } => {
                write!(f, "The edges under [{prefix:?}] are not sorted and unique")
            }
            MalformedTreeError::LabelMismatch { prefix, label } => write!(
                f,
                "The edge labelled [{label:?}] leads to [{prefix:?}] which does not start with it"
            ),
            MalformedTreeError::DeadLeaf { prefix } => {
                write!(f, "The node at [{prefix:?}] has no edges and no key")
            }
            MalformedTreeError::Uncompressed { prefix } => write!(
                f,
                "The node at [{prefix:?}] has a single edge and no key, it should be merged"
            ),
            MalformedTreeError::KeyMismatch { path, key } => write!(
                f,
                "The key [{key:?}] is stored at the path [{path:?}]"
            ),
            MalformedTreeError::WrongLen { expected, found } => write!(
                f,
                "The tree reports {expected} keys but {found} were reachable"
            ),
        }
    }
}

impl Error for MalformedTreeError {}

/// Walks a tree from the root and reports the first broken invariant.
pub(crate) struct WellFormedChecker<'a, V> {
    nodes: &'a Slots<V>,
    found: usize,
}

impl<'a, V> WellFormedChecker<'a, V> {
    pub fn check(tree: &'a RadixTree<V>) -> Result<(), MalformedTreeError> {
        let mut checker = WellFormedChecker {
            nodes: &tree.nodes,
            found: 0,
        };
        let mut path = String::new();
        checker.visit(NodeIndex::ROOT, &mut path)?;

        if checker.found != tree.len() {
            return Err(MalformedTreeError::WrongLen {
                expected: tree.len(),
                found: checker.found,
            });
        }
        Ok(())
    }

    fn visit(&mut self, index: NodeIndex, path: &mut String) -> Result<(), MalformedTreeError> {
        let nodes = self.nodes;
        let node = &nodes[index];
        let restore = path.len();
        path.push_str(&node.prefix);

        if index != NodeIndex::ROOT {
            match (node.edge_len(), node.terminal()) {
                (0, None) => return Err(MalformedTreeError::DeadLeaf { prefix: path.clone() }),
                (1, None) => {
                    return Err(MalformedTreeError::Uncompressed { prefix: path.clone() });
                }
                _ => {}
            }
        }

        if let Some(terminal) = node.terminal() {
            if terminal.key() != path.as_str() {
                return Err(MalformedTreeError::KeyMismatch {
                    path: path.clone(),
                    key: terminal.key().to_owned(),
                });
            }
            self.found += 1;
        }

        if node.edges.windows(2).any(|pair| pair[0].label >= pair[1].label) {
            return Err(MalformedTreeError::UnsortedEdges { prefix: path.clone() });
        }

        for edge in &node.edges {
            let child = &nodes[edge.child];
            if child.label() != Some(edge.label) {
                let mut prefix = path.clone();
                prefix.push_str(&child.prefix);
                return Err(MalformedTreeError::LabelMismatch {
                    prefix,
                    label: edge.label,
                });
            }
            self.visit(edge.child, path)?;
        }

        path.truncate(restore);
        Ok(())
    }
}
