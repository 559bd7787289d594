//! A compressed radix tree (Patricia trie) keyed by strings.
//!
//! Keys sharing a prefix share the nodes that spell it, and every node
//! stores the longest run of characters common to all of its descendants.
//! Insertion splits a node when a new key diverges partway through its
//! prefix, and removal merges nodes back together so the tree stays
//! maximally compressed.
//!
//! ```
//! use rsradix::RadixTree;
//!
//! let mut tree = RadixTree::<usize>::new();
//! tree.insert("wolf", 3);
//! tree.insert("world", 2);
//!
//! assert_eq!(tree.get("wolf"), Some(&3));
//! assert_eq!(tree.get("wo"), None);
//! assert_eq!(tree.len(), 2);
//! ```

use std::ops::Index;

use list::{NodeIndex, Slots};
use node::{Edge, Node, Terminal, common_prefix_len};

mod list;
mod node;
pub mod well_formed;

pub use crate::well_formed::MalformedTreeError;

/// A map from strings to values of type `V`, stored as a radix tree.
///
/// Characters are compared ordinally, there is no case folding or
/// normalization of any kind.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
pub struct RadixTree<V> {
    /// The node pool, this is where the internal nodes are actually stored. The
    /// root always lives at [NodeIndex::ROOT].
    nodes: Slots<V>,
    /// The amount of keys in the tree.
    size: usize,
}

/// The end point of a successful walk, together with the node
/// that owns the edge leading to it.
#[derive(Debug)]
struct WalkTrajectory {
    parent: NodeIndex,
    end: NodeIndex,
}

impl<V> Default for RadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RadixTree<V> {
    /// Creates a new [RadixTree] with no keys. This will
    /// create a tree with a capacity of zero using the [RadixTree::with_capacity] method.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let tree = RadixTree::<&str>::new();
    /// assert_eq!(tree.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    /// Creates a new [RadixTree] with room for a certain amount of nodes
    /// before reallocating.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let tree = RadixTree::<usize>::with_capacity(20);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 20);
    /// ```
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Slots::with_capacity(nodes),
            size: 0,
        }
    }

    /// Walks the tree consuming whole node prefixes. The walk only succeeds
    /// if the key is used up exactly at a node boundary.
    fn internal_walk(&self, key: &str) -> Option<WalkTrajectory> {
        let mut search = key;
        let mut trajectory = WalkTrajectory {
            parent: NodeIndex::ROOT,
            end: NodeIndex::ROOT,
        };
        while let Some(label) = search.chars().next() {
            let child = self.nodes[trajectory.end].edge_for_label(label)?.child;
            search = search.strip_prefix(self.nodes[child].prefix.as_str())?;
            trajectory = WalkTrajectory {
                parent: trajectory.end,
                end: child,
            };
        }
        Some(trajectory)
    }

    /// Gets a value from the [RadixTree] according to the key.
    ///
    /// Matching is exact: a key that is only a prefix of stored keys, or
    /// that diverges partway through a node, is absent.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree = RadixTree::<&str>::new();
    /// tree.insert("hello", "world");
    /// assert_eq!(tree.get("hello"), Some(&"world"));
    /// assert_eq!(tree.get("hell"), None);
    /// assert_eq!(tree.get("helium"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&V> {
        let end = self.internal_walk(key)?.end;
        self.nodes[end].terminal().map(Terminal::value)
    }
    /// Gets a mutable reference to a value according to the key.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree = RadixTree::<&str>::new();
    /// tree.insert("hello", "world");
    ///
    /// *tree.get_mut("hello").unwrap() = "world2";
    /// assert_eq!(tree.get("hello"), Some(&"world2"));
    /// ```
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let end = self.internal_walk(key)?.end;
        self.nodes[end].terminal.as_mut().map(Terminal::value_mut)
    }
    /// Gets the stored key alongside its value.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let tree = RadixTree::from([("bear", 1)]);
    /// assert_eq!(tree.get_key_value("bear"), Some(("bear", &1)));
    /// ```
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        let end = self.internal_walk(key)?.end;
        self.nodes[end]
            .terminal()
            .map(|terminal| (terminal.key(), terminal.value()))
    }
    /// Checks if the [RadixTree] contains a key. This operation
    /// occurs in the same time as [RadixTree::get].
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
    /// Returns the amount of keys within the [RadixTree].
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree = RadixTree::<&str>::new();
    /// tree.insert("hello", "world");
    /// tree.insert("hello", "again");
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }
    /// Returns true if the [RadixTree] is empty,
    /// else it will return false.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Will clear the [RadixTree], including a value stored
    /// under the empty key.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree = RadixTree::<usize>::new();
    /// tree.insert("hello", 0);
    /// tree.insert("", 1);
    ///
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.get(""), None);
    /// ```
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.size = 0;
    }
    /// The amount of nodes the tree can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }
    /// Reserves capacity for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }
    /// Compacts the node pool. Nodes released by merges leave
    /// holes that are normally recycled by later insertions; this moves
    /// every live node to the front and gives the rest of the memory back.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree = RadixTree::<usize>::new();
    /// for (i, key) in ["a", "ab", "abc", "abd"].into_iter().enumerate() {
    ///     tree.insert(key, i);
    /// }
    /// tree.remove("ab");
    /// tree.remove("abc");
    /// tree.shrink_to_fit();
    ///
    /// assert_eq!(tree.get("abd"), Some(&3));
    /// assert_eq!(tree.get("a"), Some(&0));
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }
    /// Checks every structural invariant of the tree: sorted and unique
    /// edge labels, labels matching their child's first character, no
    /// keyless dead ends or chains, stored keys matching their path, and
    /// the length matching the number of stored keys.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let tree = RadixTree::from([("wolf", 3), ("world", 2)]);
    /// assert!(tree.check_well_formed().is_ok());
    /// ```
    pub fn check_well_formed(&self) -> Result<(), MalformedTreeError> {
        well_formed::WellFormedChecker::check(self)
    }

    /// Puts a new record in the [RadixTree], returning the old value
    /// if there previously was a value present. Overwriting does not
    /// change the length of the tree.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree = RadixTree::<usize>::new();
    /// assert_eq!(tree.insert("hello", 1), None);
    ///
    /// // Verify the key replacement.
    /// assert_eq!(tree.insert("hello", 2), Some(1));
    /// assert_eq!(tree.get("hello"), Some(&2));
    /// ```
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let mut search = key;
        let mut current = NodeIndex::ROOT;

        loop {
            let Some(label) = search.chars().next() else {
                // The key ends exactly at this node.
                let previous = self.nodes[current]
                    .terminal
                    .replace(Terminal::new(key, value));
                if previous.is_none() {
                    self.size += 1;
                }
                return previous.map(Terminal::into_value);
            };

            let Some(child) = self.nodes[current].edge_for_label(label).map(|e| e.child) else {
                let leaf = self.nodes.insert(Node::leaf(search, Terminal::new(key, value)));
                self.nodes[current].add_edge(Edge::new(label, leaf));
                self.size += 1;
                return None;
            };

            let common = common_prefix_len(&self.nodes[child].prefix, search);
            search = &search[common..];
            if common == self.nodes[child].prefix.len() {
                current = child;
                continue;
            }

            // The key diverges inside the child's prefix, so the shared part
            // moves into a new intermediate node.
            let remainder = self.nodes[child].prefix.split_off(common);
            let shared = std::mem::replace(&mut self.nodes[child].prefix, remainder);
            let intermediate = self.nodes.insert(Node::branch(shared));
            self.nodes[current].replace_edge(Edge::new(label, intermediate));
            self.nodes.attach(intermediate, child);

            let terminal = Terminal::new(key, value);
            if search.is_empty() {
                self.nodes[intermediate].terminal = Some(terminal);
            } else {
                let leaf = self.nodes.insert(Node::leaf(search, terminal));
                self.nodes.attach(intermediate, leaf);
            }
            self.size += 1;
            return None;
        }
    }
    /// Writes through an optional value: [Option::Some] inserts or
    /// overwrites, while [Option::None] leaves the tree untouched. It never
    /// removes a key, use [RadixTree::remove] for that.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree = RadixTree::<usize>::new();
    /// tree.set("apple", Some(4));
    /// tree.set("apple", None);
    ///
    /// assert_eq!(tree["apple"], 4);
    /// ```
    pub fn set(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }
    /// Deletes a record from the [RadixTree] according to the
    /// key. It will return the old value if it is present within the
    /// data structure.
    ///
    /// Removing a key that is only a prefix of stored keys does nothing.
    /// The empty key is never removed.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree = RadixTree::<usize>::new();
    /// tree.insert("wolf", 3);
    ///
    /// assert_eq!(tree.remove("w"), None);
    /// assert_eq!(tree.remove("wolf"), Some(3));
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }
    /// Deletes a record from the [RadixTree], returning the stored key and
    /// its value.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree = RadixTree::from([("hello", 12)]);
    /// assert_eq!(tree.remove_entry("hello"), Some(("hello".to_string(), 12)));
    /// assert_eq!(tree.remove_entry("hello"), None);
    /// ```
    pub fn remove_entry(&mut self, key: &str) -> Option<(String, V)> {
        if key.is_empty() {
            return None;
        }
        let WalkTrajectory { parent, end } = self.internal_walk(key)?;
        let terminal = self.nodes[end].terminal.take()?;
        self.size -= 1;

        match self.nodes[end].edge_len() {
            0 => {
                // A non-empty key never ends on the root, so the node has a label.
                if let Some(label) = self.nodes[end].label() {
                    self.nodes[parent].remove_edge(label);
                }
                self.nodes.remove(end);

                let owner = &self.nodes[parent];
                if parent != NodeIndex::ROOT && owner.edge_len() == 1 && owner.terminal.is_none()
                {
                    self.nodes.merge_with_child(parent);
                }
            }
            1 => self.nodes.merge_with_child(end),
            _ => {}
        }

        Some(terminal.into_entry())
    }
}

impl<V> Index<&str> for RadixTree<V> {
    type Output = V;

    /// Indexes into the [RadixTree] by key.
    ///
    /// # Panics
    /// If the key is not present.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let tree = RadixTree::from([("apple", 4)]);
    ///
    /// assert_eq!(tree["apple"], 4);
    /// ```
    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).expect("Invalid radix tree index")
    }
}

impl<V> PartialEq for RadixTree<V>
where
    V: PartialEq,
{
    /// Checks if two [RadixTree] hold the same keys and values. A compressed
    /// tree is determined entirely by its contents, so the order in which
    /// the keys were inserted does not matter.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.nodes == other.nodes
    }
}

impl<V> Eq for RadixTree<V> where V: Eq {}

impl<K, V> Extend<(K, V)> for RadixTree<V>
where
    K: AsRef<str>,
{
    /// Extends a [RadixTree] from an iterator of tuples. Later duplicates
    /// overwrite earlier ones.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let mut tree: RadixTree<&str> = RadixTree::new();
    /// tree.extend([("hello", "world"), ("hello", "there")]);
    ///
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.get("hello"), Some(&"there"));
    /// ```
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RadixTree<V>
where
    K: AsRef<str>,
{
    /// Creates a [RadixTree] from an iterator of tuples.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let tree: RadixTree<usize> = vec![("hello".to_string(), 4)].into_iter().collect();
    ///
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree["hello"], 4);
    /// ```
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = RadixTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for RadixTree<V>
where
    K: AsRef<str>,
{
    /// Creates a [RadixTree] from an array of tuples.
    ///
    /// ```
    /// use rsradix::RadixTree;
    ///
    /// let tree = RadixTree::from([("bear", 1), ("beer", 2)]);
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree["beer"], 2);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, V> arbitrary::Arbitrary<'a> for RadixTree<V>
where
    V: arbitrary::Arbitrary<'a>,
{
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let entries: Vec<(String, V)> = u.arbitrary()?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use arbitrary::Unstructured;

    use super::RadixTree;
    use crate::list::NodeIndex;

    /// A small alphabet so that generated keys share prefixes often.
    const ALPHABET: [char; 5] = ['a', 'b', 'c', 'é', '字'];

    fn small_key(u: &mut Unstructured<'_>) -> arbitrary::Result<String> {
        let len: usize = u.int_in_range(0..=6)?;
        (0..len).map(|_| u.choose(&ALPHABET).copied()).collect()
    }

    fn root_prefixes(tree: &RadixTree<i32>) -> Vec<&str> {
        tree.nodes[NodeIndex::ROOT]
            .edges
            .iter()
            .map(|edge| tree.nodes[edge.child].prefix.as_str())
            .collect()
    }

    #[test]
    pub fn tree_from_tuples() {
        let tree: RadixTree<i32> = RadixTree::from([("hello", 4)]);
        assert_eq!(tree.get("hello"), Some(&4));
    }

    #[test]
    pub fn insert_and_lookup() {
        let mut tree = RadixTree::new();
        tree.insert("wolf", 3);
        tree.insert("world", 2);
        tree.insert("bear", 1);
        tree.insert("wacker", 5);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree["bear"], 1);
        assert_eq!(tree["world"], 2);
        assert_eq!(tree["wolf"], 3);
        assert_eq!(tree["wacker"], 5);
        assert_eq!(root_prefixes(&tree), ["bear", "w"]);
        assert!(tree.check_well_formed().is_ok());
    }

    #[test]
    pub fn split_places_terminal_on_intermediate() {
        let mut tree = RadixTree::new();
        tree.insert("world", 1);
        tree.insert("wo", 2);

        assert_eq!(root_prefixes(&tree), ["wo"]);
        assert_eq!(tree.get("wo"), Some(&2));
        assert_eq!(tree.get("world"), Some(&1));
        assert_eq!(tree.get("w"), None);
        assert_eq!(tree.get("worlds"), None);
        assert!(tree.check_well_formed().is_ok());
    }

    #[test]
    pub fn overwrite_keeps_len() {
        let mut tree = RadixTree::new();
        assert_eq!(tree.insert("wolf", 3), None);
        assert_eq!(tree.insert("wolf", 7), Some(3));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("wolf"), Some(&7));
    }

    #[test]
    pub fn delete_size_one() {
        let mut tree = RadixTree::new();
        tree.insert("wolf", 3);
        assert_eq!(tree.len(), 1);

        assert_eq!(tree.remove("w"), None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("wolf"), Some(&3));

        assert_eq!(tree.remove("wolf"), Some(3));
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.get("wolf"), None);
        assert!(tree.nodes[NodeIndex::ROOT].edges.is_empty());
    }

    #[test]
    pub fn delete_merges_parent() {
        let mut tree = RadixTree::new();
        tree.insert("wolf", 3);
        tree.insert("world", 2);
        assert_eq!(tree.len(), 2);

        tree.remove("w");
        assert_eq!(tree.len(), 2);

        tree.remove("wolf");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("world"), Some(&2));
        assert_eq!(tree.get("wolf"), None);
        assert_eq!(root_prefixes(&tree), ["world"]);
        assert!(tree.check_well_formed().is_ok());
    }

    #[test]
    pub fn delete_merges_node_with_single_child() {
        let mut tree = RadixTree::new();
        tree.insert("wo", 1);
        tree.insert("world", 2);

        assert_eq!(tree.remove("wo"), Some(1));
        assert_eq!(root_prefixes(&tree), ["world"]);
        assert_eq!(tree.get("world"), Some(&2));
        assert!(tree.check_well_formed().is_ok());
    }

    #[test]
    pub fn delete_keeps_root_uncompressed() {
        let mut tree = RadixTree::new();
        tree.insert("bear", 1);
        tree.insert("wolf", 2);

        tree.remove("bear");
        assert_eq!(root_prefixes(&tree), ["wolf"]);
        assert!(tree.nodes[NodeIndex::ROOT].prefix.is_empty());
        assert!(tree.check_well_formed().is_ok());
    }

    #[test]
    pub fn delete_leaves_terminal_parent_alone() {
        let mut tree = RadixTree::new();
        tree.insert("wo", 1);
        tree.insert("wolf", 2);
        tree.insert("world", 3);

        tree.remove("wolf");
        assert_eq!(tree.get("wo"), Some(&1));
        assert_eq!(tree.get("world"), Some(&3));
        assert!(tree.check_well_formed().is_ok());
    }

    #[test]
    pub fn literal_construction() {
        let tree = RadixTree::from([("bear", 1), ("beer", 2), ("wolf", 3), ("world", 4)]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree["bear"], 1);
        assert_eq!(tree["beer"], 2);
        assert_eq!(tree["wolf"], 3);
        assert_eq!(tree["world"], 4);
    }

    #[test]
    pub fn empty_key_is_never_removed() {
        let mut tree = RadixTree::new();
        tree.insert("", 1);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(""), Some(&1));

        assert_eq!(tree.remove(""), None);
        assert_eq!(tree.len(), 1);

        tree.insert("", 2);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[""], 2);
        assert!(tree.check_well_formed().is_ok());
    }

    #[test]
    pub fn set_none_is_a_no_op() {
        let mut tree = RadixTree::new();
        tree.set("apple", Some(1));
        tree.set("apple", None);
        tree.set("pear", None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("apple"), Some(&1));
        assert_eq!(tree.get("pear"), None);
    }

    #[test]
    #[should_panic(expected = "Invalid radix tree index")]
    pub fn index_missing_key() {
        let tree = RadixTree::from([("apple", 1)]);
        let _value: i32 = tree["app"];
    }

    #[test]
    pub fn comparison_is_ordinal() {
        let tree = RadixTree::from([("Bear", 1), ("bear", 2), ("ﬁle", 3)]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get("BEAR"), None);
        assert_eq!(tree.get("file"), None);
        assert_eq!(tree.get("ﬁle"), Some(&3));
    }

    #[test]
    pub fn equality_ignores_insertion_order() {
        let a = RadixTree::from([("wolf", 1), ("world", 2), ("bear", 3)]);
        let mut b = RadixTree::from([("bear", 3), ("world", 2), ("x", 0), ("wolf", 1)]);
        assert_ne!(a, b);
        b.remove("x");
        assert_eq!(a, b);
    }

    #[test]
    pub fn freed_slots_are_reused() {
        let mut tree = RadixTree::new();
        tree.insert("wolf", 1);
        tree.insert("world", 2);
        let occupied = tree.nodes.occupied();

        tree.remove("wolf");
        assert!(tree.nodes.occupied() < occupied);

        tree.insert("wolf", 1);
        assert_eq!(tree.nodes.occupied(), occupied);

        tree.shrink_to_fit();
        assert_eq!(tree.get("wolf"), Some(&1));
        assert_eq!(tree.get("world"), Some(&2));
        assert!(tree.check_well_formed().is_ok());
    }

    #[test]
    pub fn test_arbitrary_insert() {
        let mut tree: RadixTree<String> = RadixTree::new();
        arbtest::arbtest(|u| {
            let key: String = u.arbitrary::<[char; 8]>()?.iter().collect();
            let value: String = u.arbitrary::<[char; 8]>()?.iter().collect();
            tree.insert(&key, value.clone());

            assert_eq!(tree.get(&key), Some(&value));

            Ok(())
        });
    }

    #[test]
    pub fn test_arbitrary_ops_against_hashmap() {
        arbtest::arbtest(|u| {
            let mut tree = RadixTree::<u8>::new();
            let mut twin = HashMap::<String, u8>::new();

            while !u.is_empty() {
                let key = small_key(u)?;
                match u.int_in_range(0..=3u8)? {
                    0 | 1 => {
                        let value = u.arbitrary()?;
                        assert_eq!(tree.insert(&key, value), twin.insert(key.clone(), value));
                    }
                    2 => {
                        let expected = if key.is_empty() {
                            None
                        } else {
                            twin.remove(&key)
                        };
                        assert_eq!(tree.remove(&key), expected);
                    }
                    _ => assert_eq!(tree.get(&key), twin.get(&key)),
                }

                assert_eq!(tree.len(), twin.len());
                if let Err(error) = tree.check_well_formed() {
                    panic!("{error}");
                }
            }

            for (key, value) in &twin {
                assert_eq!(tree.get(key), Some(value));
            }

            Ok(())
        });
    }

    #[test]
    pub fn test_arbitrary_prefix_removal() {
        arbtest::arbtest(|u| {
            let key = small_key(u)?;
            if key.chars().count() < 2 {
                return Ok(());
            }
            let mut tree = RadixTree::<u8>::new();
            tree.insert(&key, 1);
            let snapshot = tree.clone();

            let cut = u.int_in_range(1..=key.chars().count() - 1)?;
            let prefix: String = key.chars().take(cut).collect();
            assert_eq!(tree.remove(&prefix), None);
            assert_eq!(tree, snapshot);

            Ok(())
        });
    }

    #[cfg(feature = "arbitrary")]
    #[test]
    pub fn test_arbitrary_tree() {
        arbtest::arbtest(|u| {
            let tree: RadixTree<u8> = u.arbitrary()?;
            assert!(tree.check_well_formed().is_ok());
            Ok(())
        });
    }

    #[cfg(feature = "serde")]
    #[test]
    pub fn serde_json_round_trip() {
        let mut tree = RadixTree::from([("wolf", 3), ("world", 2), ("bear", 1)]);
        tree.remove("bear");

        let json = serde_json::to_string(&tree).unwrap();
        let restored: RadixTree<i32> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, tree);
        assert!(restored.check_well_formed().is_ok());
    }

    #[test]
    #[cfg(feature = "serde")]
    pub fn serde_round_trip_without_default_values() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Span {
            start: u32,
            end: u32,
        }

        let mut tree = RadixTree::new();
        tree.insert("", Span { start: 0, end: 0 });
        tree.insert("héllo", Span { start: 1, end: 6 });
        tree.insert("hélp", Span { start: 7, end: 11 });
        tree.insert("help", Span { start: 12, end: 16 });
        tree.insert("helping", Span { start: 17, end: 24 });
        tree.remove("help");
        tree.shrink_to_fit();
        tree.insert("hex", Span { start: 25, end: 28 });

        let json = serde_json::to_string(&tree).unwrap();
        let restored: RadixTree<Span> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, tree);
        assert_eq!(restored.len(), 5);
        assert_eq!(restored.get(""), Some(&Span { start: 0, end: 0 }));
        assert_eq!(restored.get("helping"), Some(&Span { start: 17, end: 24 }));
        assert!(restored.get("help").is_none());
        assert!(restored.check_well_formed().is_ok());
    }
}
