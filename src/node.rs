use crate::list::NodeIndex;

/// The payload of a node that completes a stored key. The full key is kept
/// alongside the value so that it can be handed back on removal without
/// walking the tree again.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
pub(crate) struct Terminal<V> {
    key: String,
    value: V,
}

impl<V> Terminal<V> {
    pub fn new(key: &str, value: V) -> Self {
        Self {
            key: key.to_owned(),
            value,
        }
    }
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn value(&self) -> &V {
        &self.value
    }
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }
    pub fn into_value(self) -> V {
        self.value
    }
    pub fn into_entry(self) -> (String, V) {
        (self.key, self.value)
    }
}

/// An outgoing edge of a [Node]. The label is always the first
/// character of the child's prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
pub(crate) struct Edge {
    pub(crate) label: char,
    pub(crate) child: NodeIndex,
}

impl Edge {
    pub fn new(label: char, child: NodeIndex) -> Self {
        Self { label, child }
    }
}

/// A radix tree node. It holds the segment of the key that leads to it
/// from its parent, its outgoing edges sorted by label, and a [Terminal]
/// if a stored key ends exactly here.
///
/// The root is the only node with an empty prefix. For the sake of
/// efficient serialization, if the `terminal` field is [Option::None] then
/// it will not serialize at all instead of just serializing as `null`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
pub(crate) struct Node<V> {
    /// The key segment relative to the parent.
    pub(crate) prefix: String,
    /// The outgoing edges, ascending by label with no duplicates.
    pub(crate) edges: Vec<Edge>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) terminal: Option<Terminal<V>>,
}

impl<V> Node<V> {
    /// Creates a new root node. This is just a node with an
    /// empty prefix.
    pub const fn root() -> Self {
        Node {
            prefix: String::new(),
            edges: Vec::new(),
            terminal: None,
        }
    }
    /// Creates an inner node holding only a prefix. Used as the
    /// intermediate node when an existing prefix is split.
    pub fn branch(prefix: String) -> Self {
        Self {
            prefix,
            edges: Vec::new(),
            terminal: None,
        }
    }
    /// Creates a leaf that completes a key.
    pub fn leaf(prefix: &str, terminal: Terminal<V>) -> Self {
        Self {
            prefix: prefix.to_owned(),
            edges: Vec::new(),
            terminal: Some(terminal),
        }
    }
    /// The label an edge pointing at this node must carry.
    pub fn label(&self) -> Option<char> {
        self.prefix.chars().next()
    }
    /// Binary search over the edges by label.
    fn search(&self, label: char) -> Result<usize, usize> {
        self.edges.binary_search_by(|edge| edge.label.cmp(&label))
    }
    /// Finds the edge carrying `label`, if there is one.
    pub fn edge_for_label(&self, label: char) -> Option<&Edge> {
        let position = self.search(label).ok()?;
        Some(&self.edges[position])
    }
    /// Adds an edge in sorted position. The label must not already
    /// be present, use [Node::replace_edge] if it may be.
    pub fn add_edge(&mut self, edge: Edge) {
        match self.search(edge.label) {
            Ok(_) => debug_assert!(false, "Duplicate edge label {:?}.", edge.label),
            Err(position) => self.edges.insert(position, edge),
        }
    }
    /// Overwrites the edge with the same label, or adds it in sorted
    /// position if there is none. Returns the replaced edge.
    pub fn replace_edge(&mut self, edge: Edge) -> Option<Edge> {
        match self.search(edge.label) {
            Ok(position) => Some(std::mem::replace(&mut self.edges[position], edge)),
            Err(position) => {
                self.edges.insert(position, edge);
                None
            }
        }
    }
    /// Removes the edge carrying `label`. Does nothing if it is absent.
    pub fn remove_edge(&mut self, label: char) -> Option<Edge> {
        let position = self.search(label).ok()?;
        Some(self.edges.remove(position))
    }
    pub fn edge_len(&self) -> usize {
        self.edges.len()
    }
    pub fn terminal(&self) -> Option<&Terminal<V>> {
        self.terminal.as_ref()
    }
}

/// Returns the byte length of the longest common prefix of `a` and `b`,
/// compared character by character without any normalization. The result
/// always lies on a character boundary of both strings.
pub(crate) fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, left), right)| left != right)
        .map(|((position, _), _)| position)
        .unwrap_or_else(|| a.len().min(b.len()))
}
