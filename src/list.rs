use std::{
    collections::HashMap,
    ops::{Index, IndexMut},
};

use crate::node::{Edge, Node};

/// The array that holds all the underlying node data. It works
/// by holding a freelist for filling tombstone slots, and by maintaining
/// a simple vector. Defragmentation happens when called manually.
///
/// The slots will always have a root. In practice, this means that it will
/// never error because the root was indexed and it did not exist. Great
/// care is put into maintaining the root within the list.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
pub(crate) struct Slots<V> {
    /// A list of optional slots containing nodes. These may be
    /// [Option::None] in the case of a tombstone, i.e., a node
    /// that once was but has since been split away or merged.
    slots: Vec<Option<Node<V>>>,
    /// A freelist of all the available space within the array.
    free_list: Vec<usize>,
}

impl<V> PartialEq for Slots<V>
where
    V: PartialEq,
{
    /// Performs a semantic comparison starting from the two roots and
    /// checking each subtree recursively. Slot positions are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.semantic_equals(NodeIndex::ROOT, other, NodeIndex::ROOT)
    }
}

/// Represents the index of a node within the [Slots]. Requires caution, as
/// defragmenting the slots will cause indices to be invalidated. Special care
/// is taken to handle this, and this is why the struct is invisible to the
/// end-developer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize),
    rkyv(derive(PartialEq, Debug))
)]
pub(crate) struct NodeIndex(u64);

impl NodeIndex {
    /// The root node, which always has an internal index of 0.
    pub const ROOT: NodeIndex = NodeIndex(0);
}

impl NodeIndex {
    /// Gets the internal position of the node as a [usize].
    pub fn position(&self) -> usize {
        self.0 as usize
    }
}

impl<V> Slots<V> {
    /// Creates a new [Slots] with a certain amount of capacity.
    pub fn with_capacity(cap: usize) -> Self {
        let mut new = Self {
            slots: Vec::with_capacity(cap.max(1)),
            free_list: vec![],
        };
        new.slots.push(Some(Node::root()));
        new
    }
    /// Gets the capacity of the [Slots].
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
    /// Reserves a certain quantity in the underlying [Vec] that makes
    /// up the [Slots].
    pub fn reserve(&mut self, quantity: usize) {
        self.slots.reserve(quantity);
    }
    /// Inserts a [Node] into the underlying [Vec], returning
    /// the new [NodeIndex].
    pub fn insert(&mut self, item: Node<V>) -> NodeIndex {
        match self.free_list.pop() {
            Some(avail) => {
                self.slots[avail] = Some(item);
                NodeIndex(avail as u64)
            }
            None => {
                self.slots.push(Some(item));
                NodeIndex((self.slots.len() - 1) as u64)
            }
        }
    }
    /// Removes a node from the underlying [Vec]. Removing the root
    /// swaps a fresh root back in.
    pub fn remove(&mut self, index: NodeIndex) -> Option<Node<V>> {
        if index == NodeIndex::ROOT {
            return Some(std::mem::replace(
                &mut self[NodeIndex::ROOT],
                Node::root(),
            ));
        }
        let pos = self.slots.get_mut(index.position())?;
        if pos.is_some() {
            self.free_list.push(index.position());
        }
        pos.take()
    }
    /// Adds an edge from `parent` to `child`, labelled by the first
    /// character of the child's prefix.
    pub fn attach(&mut self, parent: NodeIndex, child: NodeIndex) {
        let label = self[child]
            .label()
            .expect("Attached a node with an empty prefix.");
        self[parent].add_edge(Edge::new(label, child));
    }
    /// Folds the only child of `index` into it: the child's prefix is
    /// appended and its edges and terminal are adopted. The child's slot
    /// is released.
    pub fn merge_with_child(&mut self, index: NodeIndex) {
        debug_assert_eq!(self[index].edge_len(), 1);
        let child = self[index].edges[0].child;
        let child = self
            .remove(child)
            .expect("Merged a node whose child slot was empty.");
        let node = &mut self[index];
        node.prefix.push_str(&child.prefix);
        node.edges = child.edges;
        node.terminal = child.terminal;
    }
    /// Clears the underlying vector, reinserting the root node into
    /// the [Slots].
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.slots.push(Some(Node::root()));
    }
    /// The number of occupied slots, root included.
    #[cfg(test)]
    pub fn occupied(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }
    /// Defragments the slots and then removes any empty slots from the end
    /// of the memory, reducing the internal vector to the minimum
    /// possible capacity.
    pub fn shrink_to_fit(&mut self) {
        self.defragment();
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        self.slots.shrink_to_fit();
        self.free_list.shrink_to_fit();
    }
    fn get_defrag_map(&mut self) -> HashMap<NodeIndex, NodeIndex> {
        // Keeps track of the old positions so we can map
        // them to the new positions.
        let mut remapper = HashMap::<NodeIndex, NodeIndex>::new();

        // The drag trails behind the index whenever a tombstone was passed.
        let mut drag = 0;
        for index in 0..self.slots.len() {
            if self.slots[index].is_some() && drag == index {
                drag += 1;
            } else if self.slots[index].is_some() {
                remapper.insert(NodeIndex(index as u64), NodeIndex(drag as u64));
                self.slots.swap(index, drag);
                drag += 1;
            }
        }
        remapper
    }
    /// Defragments the slots, please note that this will correct all INTERNAL node
    /// indices but any existing (living) ones will become invalidated.
    fn defragment(&mut self) {
        let remapper = self.get_defrag_map();

        // We no longer need the free-list!
        self.free_list.clear();

        for node in self.slots.iter_mut().filter_map(Option::as_mut) {
            for edge in &mut node.edges {
                if let Some(moved) = remapper.get(&edge.child) {
                    edge.child = *moved;
                }
            }
        }
    }
    /// Checks that two subtrees are equal. Since two trees can be laid out
    /// differently in their slots, the comparison follows the edges rather
    /// than the slot positions.
    fn semantic_equals(&self, index: NodeIndex, other: &Self, other_index: NodeIndex) -> bool
    where
        V: PartialEq,
    {
        let (left, right) = (&self[index], &other[other_index]);
        if left.prefix != right.prefix || left.terminal != right.terminal {
            return false;
        }
        if left.edges.len() != right.edges.len() {
            return false;
        }
        left.edges.iter().zip(&right.edges).all(|(a, b)| {
            a.label == b.label && self.semantic_equals(a.child, other, b.child)
        })
    }
}

impl<V> Index<NodeIndex> for Slots<V> {
    type Output = Node<V>;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        self.slots[index.position()]
            .as_ref()
            .expect("Could not find node at requested index.")
    }
}

impl<V> IndexMut<NodeIndex> for Slots<V> {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        self.slots[index.position()]
            .as_mut()
            .expect("Could not find node at requested index.")
    }
}
