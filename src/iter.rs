//! Cursors and iterators over a trie.
//!
//! Both walk the node tree through parent and child links only. A full key is
//! rebuilt from the pieces on a node's root path when, and only when, it is
//! handed to the caller.

use std::fmt;
use std::iter::FusedIterator;

use once_cell::unsync::OnceCell;

use crate::key_converter::{Concat, PieceKey};
use crate::node::NodeId;
use crate::order::PieceOrder;
use crate::Trie;

/// A detached position in a trie: either an entry or the end.
///
/// A cursor does not borrow its trie. It stays usable until the next structural
/// change of the trie (creating nodes, erasing, clearing); after that every
/// operation taking it fails with [`Error::InvalidCursor`](crate::Error::InvalidCursor).
///
/// Two cursors are equal when they point at the same node, or are both the end.
///
/// # Examples
///
/// ```
/// use piece_trie::{Error, StringTrie};
///
/// let mut trie: StringTrie<i32> = StringTrie::default();
/// trie.emplace("abel", 16);
/// trie.emplace("gsd", 42);
///
/// let mut cursor = trie.begin();
/// assert_eq!(trie.entry(cursor)?.key(), "abel");
/// trie.advance(&mut cursor)?;
/// assert_eq!(trie.entry(cursor)?.value(), &42);
/// trie.advance(&mut cursor)?;
/// assert_eq!(cursor, trie.end());
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub(crate) node: Option<NodeId>,
    pub(crate) generation: u64,
}

impl Cursor {
    /// Returns `true` for the end cursor.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for Cursor {}

/// A dereferenced cursor: one stored key and its value.
///
/// The key is assembled on the first call to [`Entry::key`] and cached.
pub struct Entry<'a, K, V, C, O>
where
    K: PieceKey,
{
    trie: &'a Trie<K, V, C, O>,
    node: NodeId,
    value: &'a V,
    key: OnceCell<K>,
}

impl<'a, K, V, C, O> Entry<'a, K, V, C, O>
where
    K: PieceKey,
{
    pub(crate) fn new(trie: &'a Trie<K, V, C, O>, node: NodeId, value: &'a V) -> Self {
        Entry {
            trie,
            node,
            value,
            key: OnceCell::new(),
        }
    }

    /// The stored value.
    pub fn value(&self) -> &'a V {
        self.value
    }

    /// Returns `true` once the full key has been assembled.
    pub fn is_key_built(&self) -> bool {
        self.key.get().is_some()
    }
}

impl<'a, K, V, C, O> Entry<'a, K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    /// The full key, assembled from the pieces on the path from the root.
    pub fn key(&self) -> &K {
        self.key.get_or_init(|| self.trie.trace_key(self.node))
    }

    /// Splits the entry into its owned key and the value reference.
    pub fn into_pair(self) -> (K, &'a V) {
        let value = self.value;
        let key = match self.key.into_inner() {
            Some(key) => key,
            None => self.trie.trace_key(self.node),
        };
        (key, value)
    }
}

impl<'a, K, V, C, O> fmt::Debug for Entry<'a, K, V, C, O>
where
    K: PieceKey + Default + fmt::Debug,
    V: fmt::Debug,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", self.key())
            .field("value", self.value)
            .finish()
    }
}

/// Double-ended walk over the nodes that carry a value, in key order.
struct Walk<'a, K, V, C, O>
where
    K: PieceKey,
{
    trie: &'a Trie<K, V, C, O>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V, C, O> Walk<'a, K, V, C, O>
where
    K: PieceKey,
    O: PieceOrder<K::Piece>,
{
    fn new(trie: &'a Trie<K, V, C, O>) -> Self {
        Walk {
            trie,
            front: trie.first(),
            back: trie.last(),
            remaining: trie.len(),
        }
    }

    fn next(&mut self) -> Option<NodeId> {
        // front and back meet once every valued node has been yielded
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = self.trie.next_node(id);
        self.remaining -= 1;
        Some(id)
    }

    fn next_back(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = self.trie.prev_node(id);
        self.remaining -= 1;
        Some(id)
    }
}

/// An iterator over `(key, &value)` pairs in ascending key order.
///
/// Created by [`Trie::iter`].
pub struct Iter<'a, K, V, C, O>
where
    K: PieceKey,
{
    walk: Walk<'a, K, V, C, O>,
}

impl<'a, K, V, C, O> Iter<'a, K, V, C, O>
where
    K: PieceKey,
    O: PieceOrder<K::Piece>,
{
    pub(crate) fn new(trie: &'a Trie<K, V, C, O>) -> Self {
        Iter {
            walk: Walk::new(trie),
        }
    }
}

impl<'a, K, V, C, O> Iterator for Iter<'a, K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.next()?;
        let trie = self.walk.trie;
        Some((trie.trace_key(id), trie.value_of(id)?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walk.remaining, Some(self.walk.remaining))
    }
}

impl<'a, K, V, C, O> DoubleEndedIterator for Iter<'a, K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_back()?;
        let trie = self.walk.trie;
        Some((trie.trace_key(id), trie.value_of(id)?))
    }
}

impl<'a, K, V, C, O> ExactSizeIterator for Iter<'a, K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
}

impl<'a, K, V, C, O> FusedIterator for Iter<'a, K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
}

/// An iterator over the keys of a trie in ascending order.
///
/// Created by [`Trie::keys`].
pub struct Keys<'a, K, V, C, O>
where
    K: PieceKey,
{
    walk: Walk<'a, K, V, C, O>,
}

impl<'a, K, V, C, O> Keys<'a, K, V, C, O>
where
    K: PieceKey,
    O: PieceOrder<K::Piece>,
{
    pub(crate) fn new(trie: &'a Trie<K, V, C, O>) -> Self {
        Keys {
            walk: Walk::new(trie),
        }
    }
}

impl<'a, K, V, C, O> Iterator for Keys<'a, K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.walk.next().map(|id| self.walk.trie.trace_key(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walk.remaining, Some(self.walk.remaining))
    }
}

impl<'a, K, V, C, O> DoubleEndedIterator for Keys<'a, K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    fn next_back(&mut self) -> Option<K> {
        self.walk.next_back().map(|id| self.walk.trie.trace_key(id))
    }
}

impl<'a, K, V, C, O> ExactSizeIterator for Keys<'a, K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
}

/// An iterator over the values of a trie, in ascending key order.
///
/// Never assembles a key. Created by [`Trie::values`].
pub struct Values<'a, K, V, C, O>
where
    K: PieceKey,
{
    walk: Walk<'a, K, V, C, O>,
}

impl<'a, K, V, C, O> Values<'a, K, V, C, O>
where
    K: PieceKey,
    O: PieceOrder<K::Piece>,
{
    pub(crate) fn new(trie: &'a Trie<K, V, C, O>) -> Self {
        Values {
            walk: Walk::new(trie),
        }
    }
}

impl<'a, K, V, C, O> Iterator for Values<'a, K, V, C, O>
where
    K: PieceKey,
    O: PieceOrder<K::Piece>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        let id = self.walk.next()?;
        self.walk.trie.value_of(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walk.remaining, Some(self.walk.remaining))
    }
}

impl<'a, K, V, C, O> DoubleEndedIterator for Values<'a, K, V, C, O>
where
    K: PieceKey,
    O: PieceOrder<K::Piece>,
{
    fn next_back(&mut self) -> Option<&'a V> {
        let id = self.walk.next_back()?;
        self.walk.trie.value_of(id)
    }
}

impl<'a, K, V, C, O> ExactSizeIterator for Values<'a, K, V, C, O>
where
    K: PieceKey,
    O: PieceOrder<K::Piece>,
{
}

/// An owning iterator over `(key, value)` pairs in ascending key order.
///
/// Created by `Trie::into_iter`.
#[derive(Debug)]
pub struct IntoIter<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(entries: Vec<(K, V)>) -> Self {
        IntoIter {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use crate::{Error, StringTrie};

    fn sample() -> StringTrie<i32> {
        let mut trie = StringTrie::default();
        trie.emplace("gsd", 42);
        trie.emplace("whispy", 69);
        trie.emplace("xazax", 1337);
        trie.emplace("gs", -24);
        trie.emplace("abel", 16);
        trie
    }

    #[test]
    fn test_entry_builds_key_lazily() {
        let trie = sample();
        let entry = trie.entry(trie.find("whispy")).unwrap();

        assert!(!entry.is_key_built());
        assert_eq!(entry.value(), &69);
        assert!(!entry.is_key_built());

        assert_eq!(entry.key(), "whispy");
        assert!(entry.is_key_built());
        assert_eq!(entry.into_pair(), ("whispy".to_string(), &69));
    }

    #[test]
    fn test_entry_debug() {
        let trie = sample();
        let entry = trie.entry(trie.find("gs")).unwrap();
        assert_eq!(format!("{:?}", entry), r#"Entry { key: "gs", value: -24 }"#);
    }

    #[test]
    fn test_cursor_walk_matches_iter() {
        let trie = sample();
        let mut cursor = trie.begin();
        let mut walked = Vec::new();
        while !cursor.is_end() {
            walked.push(trie.entry(cursor).unwrap().into_pair());
            trie.advance(&mut cursor).unwrap();
        }

        let iterated: Vec<(String, &i32)> = trie.iter().collect();
        assert_eq!(walked, iterated);
    }

    #[test]
    fn test_end_cursor_is_not_dereferencable() {
        let mut trie = sample();
        let mut end = trie.end();

        assert_eq!(trie.entry(end).err(), Some(Error::InvalidCursor));
        assert_eq!(trie.advance(&mut end), Err(Error::InvalidCursor));
        assert_eq!(trie.erase_at(end), Err(Error::InvalidCursor));
        assert_eq!(trie.len(), 5);
    }

    #[test]
    fn test_retreat() {
        let trie = sample();
        let mut cursor = trie.end();

        trie.retreat(&mut cursor).unwrap();
        assert_eq!(trie.entry(cursor).unwrap().key(), "xazax");
        trie.retreat(&mut cursor).unwrap();
        assert_eq!(trie.entry(cursor).unwrap().key(), "whispy");

        let mut first = trie.begin();
        assert_eq!(trie.retreat(&mut first), Err(Error::InvalidCursor));
        assert_eq!(first, trie.begin());
    }

    #[test]
    fn test_double_ended_meet_in_middle() {
        let trie = sample();
        let mut iter = trie.keys();

        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next().as_deref(), Some("abel"));
        assert_eq!(iter.next_back().as_deref(), Some("xazax"));
        assert_eq!(iter.next().as_deref(), Some("gs"));
        assert_eq!(iter.next_back().as_deref(), Some("whispy"));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next().as_deref(), Some("gsd"));
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_values_in_key_order() {
        let trie = sample();
        let values: Vec<i32> = trie.values().copied().collect();
        assert_eq!(values, vec![16, -24, 42, 69, 1337]);

        let reversed: Vec<i32> = trie.values().rev().copied().collect();
        assert_eq!(reversed, vec![1337, 69, 42, -24, 16]);
    }

    #[test]
    fn test_into_iter_owns_entries() {
        let trie = sample();
        let entries: Vec<(String, i32)> = trie.into_iter().collect();
        assert_eq!(
            entries,
            vec![
                ("abel".to_string(), 16),
                ("gs".to_string(), -24),
                ("gsd".to_string(), 42),
                ("whispy".to_string(), 69),
                ("xazax".to_string(), 1337),
            ]
        );
    }

    #[test]
    fn test_empty_iterators() {
        let trie: StringTrie<i32> = StringTrie::default();
        assert_eq!(trie.iter().next(), None);
        assert_eq!(trie.keys().next_back(), None);
        assert_eq!(trie.values().len(), 0);
    }
}
