//! The main trie implementation.
//!
//! This module contains the `Trie` type, which provides the primary API for working
//! with the piecewise prefix tree, together with the node navigation the cursors
//! and iterators are built on.

use std::fmt;
use std::marker::PhantomData;

use slab::Slab;

use crate::iter::{Cursor, Entry, IntoIter, Iter, Keys, Values};
use crate::key_converter::{Concat, PieceKey, PushChar, PushPiece};
use crate::node::{node, node_mut, Arena, NodeId, TrieNode};
use crate::order::{NaturalOrder, PieceOrder};
use crate::util::{is_sorted_unique, search_children};
use crate::Error;

/// A trie keyed by `String`s whose pieces are `char`s.
pub type StringTrie<V, O = NaturalOrder> = Trie<String, V, PushChar, O>;

/// A trie keyed by `Vec<T>`s whose pieces are `T`s.
pub type VecTrie<T, V, O = NaturalOrder> = Trie<Vec<T>, V, PushPiece, O>;

/// A map from full keys to values, stored one key piece per node.
///
/// Keys sharing a prefix share the nodes of that prefix. Children of every node
/// are kept sorted by the piece order `O`, which makes iteration yield entries in
/// ascending full-key order without ever storing a full key. Full keys are only
/// assembled, through the concatenator `C`, when an entry is handed out.
///
/// # Examples
///
/// ```
/// use piece_trie::{PushChar, Trie};
///
/// let mut trie = Trie::<String, i32, _>::new(PushChar);
/// trie.emplace("gsd", 42);
/// trie.emplace("abel", 16);
///
/// assert_eq!(trie.get("gsd"), Some(&42));
/// let keys: Vec<String> = trie.keys().collect();
/// assert_eq!(keys, vec!["abel".to_string(), "gsd".to_string()]);
/// ```
pub struct Trie<K, V, C, O = NaturalOrder>
where
    K: PieceKey,
{
    /// Arena holding every node, the root included
    pub(crate) nodes: Arena<K::Piece, V>,

    /// The root node; it represents the empty key and is never removed
    pub(crate) root: NodeId,

    /// The number of values stored in the trie
    size: usize,

    /// Bumped on every structural change; cursors from older generations are rejected
    pub(crate) generation: u64,

    concat: C,
    order: O,
    _key: PhantomData<fn() -> K>,
}

impl<K, V, C> Trie<K, V, C, NaturalOrder>
where
    K: PieceKey,
{
    /// Creates an empty trie ordering pieces by their `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use piece_trie::{PushPiece, Trie};
    ///
    /// let trie = Trie::<Vec<u8>, i32, _>::new(PushPiece);
    /// assert!(trie.is_empty());
    /// ```
    pub fn new(concat: C) -> Self {
        Self::with_order(concat, NaturalOrder)
    }
}

impl<K, V, C, O> Trie<K, V, C, O>
where
    K: PieceKey,
{
    /// Creates an empty trie with a custom piece order.
    ///
    /// # Examples
    ///
    /// ```
    /// use piece_trie::{PushChar, ReverseOrder, Trie};
    ///
    /// let mut trie = Trie::<String, u8, _, _>::with_order(PushChar, ReverseOrder);
    /// trie.emplace("a", 1);
    /// trie.emplace("b", 2);
    /// assert_eq!(trie.keys().next(), Some("b".to_string()));
    /// ```
    pub fn with_order(concat: C, order: O) -> Self {
        let mut nodes = Slab::new();
        let root = NodeId(nodes.insert(TrieNode::root()));
        Trie {
            nodes,
            root,
            size: 0,
            generation: 0,
            concat,
            order,
            _key: PhantomData,
        }
    }

    /// Returns the number of values stored in the trie.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the trie contains no values.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Removes every entry. All cursors are invalidated.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = NodeId(self.nodes.insert(TrieNode::root()));
        self.size = 0;
        self.bump_generation();
    }

    /// Returns the concatenator used to rebuild full keys.
    pub fn concat(&self) -> &C {
        &self.concat
    }

    /// Returns the piece order children are sorted by.
    pub fn order(&self) -> &O {
        &self.order
    }

    /// Returns the end cursor, which points at no entry.
    pub fn end(&self) -> Cursor {
        self.cursor(None)
    }

    pub(crate) fn cursor(&self, node: Option<NodeId>) -> Cursor {
        Cursor {
            node,
            generation: self.generation,
        }
    }

    /// Maps a cursor back to its node, rejecting end and stale cursors.
    pub(crate) fn resolve(&self, cursor: Cursor) -> Result<NodeId, Error> {
        if cursor.generation != self.generation {
            return Err(Error::InvalidCursor);
        }
        let id = cursor.node.ok_or(Error::InvalidCursor)?;
        match self.nodes.get(id.0) {
            Some(n) if n.has_value() => Ok(id),
            _ => Err(Error::InvalidCursor),
        }
    }

    pub(crate) fn value_of(&self, id: NodeId) -> Option<&V> {
        node(&self.nodes, id).value.as_ref()
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Descends from `id` through first children until a node with a value.
    fn first_from(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            let current = node(&self.nodes, id);
            if current.has_value() {
                return Some(id);
            }
            id = current.first_child()?;
        }
    }

    /// Descends from `id` through last children down to a leaf.
    fn deepest_last(&self, mut id: NodeId) -> NodeId {
        while let Some(child) = node(&self.nodes, id).last_child() {
            id = child;
        }
        id
    }

    /// The node holding the smallest key, if any.
    pub(crate) fn first(&self) -> Option<NodeId> {
        self.first_from(self.root)
    }
}

impl<K, V, C, O> Trie<K, V, C, O>
where
    K: PieceKey,
    O: PieceOrder<K::Piece>,
{
    /// Walks the pieces of `key` from the root without creating nodes.
    fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        let mut current = self.root;
        for piece in key.pieces() {
            let children = &node(&self.nodes, current).children;
            let pos = search_children(&self.nodes, children, &piece, &self.order).ok()?;
            current = children[pos];
        }
        Some(current)
    }

    /// Like `find_node`, but path-only nodes count as absent.
    fn find_value_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        self.find_node(key)
            .filter(|&id| node(&self.nodes, id).has_value())
    }

    /// Walks the pieces of `key`, creating every missing node on the way.
    ///
    /// Returns the terminal node and whether any node was created.
    fn find_or_create<Q>(&mut self, key: &Q) -> (NodeId, bool)
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        let mut current = self.root;
        let mut created = false;
        for piece in key.pieces() {
            let search = search_children(
                &self.nodes,
                &node(&self.nodes, current).children,
                &piece,
                &self.order,
            );
            current = match search {
                Ok(pos) => node(&self.nodes, current).children[pos],
                Err(pos) => {
                    let child = NodeId(self.nodes.insert(TrieNode::new(piece, current)));
                    node_mut(&mut self.nodes, current).children.insert(pos, child);
                    debug_assert!(is_sorted_unique(
                        &self.nodes,
                        &node(&self.nodes, current).children,
                        &self.order
                    ));
                    created = true;
                    child
                }
            };
        }
        (current, created)
    }

    /// Returns the parent of `id` and the position of `id` among its siblings.
    ///
    /// `None` for the root.
    fn child_position(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let child = node(&self.nodes, id);
        let parent = child.parent?;
        let piece = child.piece.as_ref()?;
        let siblings = &node(&self.nodes, parent).children;
        let pos = search_children(&self.nodes, siblings, piece, &self.order).ok()?;
        debug_assert_eq!(siblings[pos], id);
        Some((parent, pos))
    }

    /// The node holding the largest key, if any.
    pub(crate) fn last(&self) -> Option<NodeId> {
        let id = self.deepest_last(self.root);
        if node(&self.nodes, id).has_value() {
            Some(id)
        } else {
            self.prev_node(id)
        }
    }

    /// The node holding the next key after `id`'s in ascending order.
    pub(crate) fn next_node(&self, id: NodeId) -> Option<NodeId> {
        let candidate = match node(&self.nodes, id).first_child() {
            Some(child) => child,
            None => self.next_sibling_upwards(id)?,
        };
        self.first_from(candidate)
    }

    /// Climbs from `id` while it is its parent's last child and returns the
    /// following sibling of the first node that is not.
    fn next_sibling_upwards(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            let (parent, pos) = self.child_position(id)?;
            if let Some(&sibling) = node(&self.nodes, parent).children.get(pos + 1) {
                return Some(sibling);
            }
            id = parent;
        }
    }

    /// The node holding the key right before `id`'s in ascending order.
    pub(crate) fn prev_node(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            let (parent, pos) = self.child_position(id)?;
            id = if pos == 0 {
                parent
            } else {
                self.deepest_last(node(&self.nodes, parent).children[pos - 1])
            };
            if node(&self.nodes, id).has_value() {
                return Some(id);
            }
        }
    }

    /// Detaches `id` and its now-empty ancestors, stopping at the first node
    /// that still has a value or children, or at the root.
    fn prune_from(&mut self, mut id: NodeId) {
        while node(&self.nodes, id).is_prunable() {
            let (parent, pos) = match self.child_position(id) {
                Some(found) => found,
                None => break,
            };
            node_mut(&mut self.nodes, parent).children.remove(pos);
            self.nodes.remove(id.0);
            id = parent;
        }
    }

    /// Takes the value out of `id` and prunes the path it leaves unused.
    fn remove_value(&mut self, id: NodeId) -> Option<V> {
        let value = node_mut(&mut self.nodes, id).value.take()?;
        self.size -= 1;
        self.bump_generation();
        self.prune_from(id);
        Some(value)
    }

    /// Returns a reference to the value stored for `key`, if any.
    ///
    /// Never inserts; usable on shared references.
    ///
    /// # Examples
    ///
    /// ```
    /// use piece_trie::StringTrie;
    ///
    /// let mut trie: StringTrie<i32> = StringTrie::default();
    /// trie.emplace("gsd", 42);
    ///
    /// assert_eq!(trie.get("gsd"), Some(&42));
    /// assert_eq!(trie.get("gs"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        let id = self.find_node(key)?;
        self.value_of(id)
    }

    /// Returns a mutable reference to the value stored for `key`, if any.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        let id = self.find_node(key)?;
        node_mut(&mut self.nodes, id).value.as_mut()
    }

    /// Returns the value stored for `key`, failing with [`Error::NotFound`]
    /// when the key is absent or only a prefix of stored keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use piece_trie::{Error, StringTrie};
    ///
    /// let mut trie: StringTrie<i32> = StringTrie::default();
    /// trie.emplace("gsd", 42);
    ///
    /// assert_eq!(trie.at("gsd"), Ok(&42));
    /// assert_eq!(trie.at("foo"), Err(Error::NotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        self.get(key).ok_or(Error::NotFound)
    }

    /// Mutable counterpart of [`Trie::at`].
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        self.get_mut(key).ok_or(Error::NotFound)
    }

    /// Returns `1` if `key` is stored, `0` otherwise.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        usize::from(self.contains_key(key))
    }

    /// Returns `true` if the trie contains a value for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        self.find_value_node(key).is_some()
    }

    /// Returns a cursor to the entry for `key`, or [`Trie::end`] if there is none.
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        self.cursor(self.find_value_node(key))
    }

    /// Stores `value` under `key` unless the key already has a value.
    ///
    /// Returns a cursor to the entry for `key` and whether `value` was stored.
    /// An existing value is left untouched. Creating nodes invalidates all
    /// earlier cursors.
    ///
    /// # Examples
    ///
    /// ```
    /// use piece_trie::StringTrie;
    ///
    /// let mut trie: StringTrie<i32> = StringTrie::default();
    ///
    /// let (_, inserted) = trie.emplace("gsd", 42);
    /// assert!(inserted);
    ///
    /// let (cursor, inserted) = trie.emplace("gsd", 43);
    /// assert!(!inserted);
    /// assert_eq!(trie.entry(cursor).unwrap().value(), &42);
    /// ```
    pub fn emplace<Q>(&mut self, key: &Q, value: V) -> (Cursor, bool)
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        let (id, created) = self.find_or_create(key);
        if created {
            self.bump_generation();
        }

        let slot = &mut node_mut(&mut self.nodes, id).value;
        let inserted = slot.is_none();
        if inserted {
            *slot = Some(value);
            self.size += 1;
        }
        (self.cursor(Some(id)), inserted)
    }

    /// Stores `value` under `key`, returning the value it replaced, if any.
    pub fn insert<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        let (id, created) = self.find_or_create(key);
        if created {
            self.bump_generation();
        }

        let replaced = node_mut(&mut self.nodes, id).value.replace(value);
        if replaced.is_none() {
            self.size += 1;
        }
        replaced
    }

    /// Removes `key`, returning its value if it was stored.
    ///
    /// Nodes that only existed to lead to `key` are removed with it; prefixes
    /// shared with other keys stay. A successful erase invalidates all cursors.
    ///
    /// # Examples
    ///
    /// ```
    /// use piece_trie::StringTrie;
    ///
    /// let mut trie: StringTrie<i32> = StringTrie::default();
    /// trie.emplace("gs", -24);
    /// trie.emplace("gsd", 42);
    ///
    /// assert_eq!(trie.erase("gs"), Some(-24));
    /// assert_eq!(trie.erase("gs"), None);
    /// assert_eq!(trie.count("gsd"), 1);
    /// ```
    pub fn erase<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: PieceKey<Piece = K::Piece> + ?Sized,
    {
        let id = self.find_value_node(key)?;
        self.remove_value(id)
    }

    /// Removes the entry `cursor` points at and returns its value.
    pub fn erase_at(&mut self, cursor: Cursor) -> Result<V, Error> {
        let id = self.resolve(cursor)?;
        self.remove_value(id).ok_or(Error::InvalidCursor)
    }

    /// Iterates over the stored values in key order without rebuilding any key.
    pub fn values(&self) -> Values<'_, K, V, C, O> {
        Values::new(self)
    }

    /// Returns a cursor to the entry with the smallest key, or [`Trie::end`]
    /// if the trie is empty.
    pub fn begin(&self) -> Cursor {
        self.cursor(self.first())
    }

    /// Moves `cursor` to the entry following it in key order, or to the end.
    ///
    /// Fails with [`Error::InvalidCursor`] on the end cursor or a stale one.
    pub fn advance(&self, cursor: &mut Cursor) -> Result<(), Error> {
        let id = self.resolve(*cursor)?;
        cursor.node = self.next_node(id);
        Ok(())
    }

    /// Moves `cursor` to the entry preceding it in key order. The end cursor
    /// moves to the last entry.
    ///
    /// Fails with [`Error::InvalidCursor`] when there is no preceding entry or
    /// the cursor is stale; the cursor is left unchanged then.
    pub fn retreat(&self, cursor: &mut Cursor) -> Result<(), Error> {
        let prev = if cursor.is_end() && cursor.generation == self.generation {
            self.last()
        } else {
            self.prev_node(self.resolve(*cursor)?)
        };
        cursor.node = Some(prev.ok_or(Error::InvalidCursor)?);
        Ok(())
    }

    /// Mutable access to the value `cursor` points at.
    pub fn value_at_mut(&mut self, cursor: Cursor) -> Result<&mut V, Error> {
        let id = self.resolve(cursor)?;
        node_mut(&mut self.nodes, id)
            .value
            .as_mut()
            .ok_or(Error::InvalidCursor)
    }
}

impl<K, V, C, O> Trie<K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    /// Rebuilds the full key of `id` by folding the pieces on its root path
    /// through the concatenator.
    pub(crate) fn trace_key(&self, id: NodeId) -> K {
        let mut reversed = Vec::new();
        let mut current = node(&self.nodes, id);
        while let Some(parent) = current.parent {
            if let Some(piece) = &current.piece {
                reversed.push(piece);
            }
            current = node(&self.nodes, parent);
        }

        let mut key = K::default();
        for piece in reversed.into_iter().rev() {
            self.concat.concat(&mut key, piece);
        }
        key
    }

    /// Dereferences `cursor` into its entry.
    ///
    /// The full key is rebuilt lazily, on the first call to [`Entry::key`].
    pub fn entry(&self, cursor: Cursor) -> Result<Entry<'_, K, V, C, O>, Error> {
        let id = self.resolve(cursor)?;
        let value = self.value_of(id).ok_or(Error::InvalidCursor)?;
        Ok(Entry::new(self, id, value))
    }

    /// Iterates over `(key, &value)` pairs in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use piece_trie::StringTrie;
    ///
    /// let mut trie: StringTrie<i32> = StringTrie::default();
    /// trie.emplace("whispy", 69);
    /// trie.emplace("gsd", 42);
    ///
    /// let entries: Vec<(String, &i32)> = trie.iter().collect();
    /// assert_eq!(entries, vec![("gsd".to_string(), &42), ("whispy".to_string(), &69)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V, C, O> {
        Iter::new(self)
    }

    /// Iterates over the keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V, C, O> {
        Keys::new(self)
    }
}

impl<K, V, C, O> Clone for Trie<K, V, C, O>
where
    K: PieceKey,
    V: Clone,
    C: Clone,
    O: Clone,
{
    /// Deep copy; the copy shares no node with `self`.
    fn clone(&self) -> Self {
        Trie {
            nodes: self.nodes.clone(),
            root: self.root,
            size: self.size,
            generation: self.generation,
            concat: self.concat.clone(),
            order: self.order.clone(),
            _key: PhantomData,
        }
    }
}

impl<K, V, C, O> Default for Trie<K, V, C, O>
where
    K: PieceKey,
    C: Default,
    O: Default,
{
    fn default() -> Self {
        Self::with_order(C::default(), O::default())
    }
}

impl<K, V, C, O> fmt::Debug for Trie<K, V, C, O>
where
    K: PieceKey + Default + fmt::Debug,
    V: fmt::Debug,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, O> PartialEq for Trie<K, V, C, O>
where
    K: PieceKey + Default + PartialEq,
    V: PartialEq,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<K, V, C, O> Eq for Trie<K, V, C, O>
where
    K: PieceKey + Default + Eq,
    V: Eq,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
}

impl<K, V, C, O> Extend<(K, V)> for Trie<K, V, C, O>
where
    K: PieceKey,
    O: PieceOrder<K::Piece>,
{
    /// Later values replace earlier ones for the same key.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(&key, value);
        }
    }
}

impl<K, V, C, O> FromIterator<(K, V)> for Trie<K, V, C, O>
where
    K: PieceKey,
    C: Default,
    O: PieceOrder<K::Piece> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut trie = Self::default();
        trie.extend(iter);
        trie
    }
}

impl<'a, K, V, C, O> IntoIterator for &'a Trie<K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V, C, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C, O> IntoIterator for Trie<K, V, C, O>
where
    K: PieceKey + Default,
    C: Concat<K, K::Piece>,
    O: PieceOrder<K::Piece>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut order = Vec::with_capacity(self.size);
        let mut current = self.first();
        while let Some(id) = current {
            order.push((self.trace_key(id), id));
            current = self.next_node(id);
        }

        let entries = order
            .into_iter()
            .filter_map(|(key, id)| {
                node_mut(&mut self.nodes, id)
                    .value
                    .take()
                    .map(|value| (key, value))
            })
            .collect();
        IntoIter::new(entries)
    }
}
