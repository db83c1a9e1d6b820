//! # Piece Trie
//!
//! A generic prefix tree that stores one key piece per node.
//!
//! A key is any type that can be viewed as a sequence of pieces ([`PieceKey`]),
//! for example a `String` as a sequence of `char`s. Keys sharing a prefix share
//! the nodes of that prefix, and the children of every node are kept sorted by a
//! pluggable piece order ([`PieceOrder`]), so entries come out in ascending
//! full-key order. Full keys are never stored; a concatenator ([`Concat`])
//! assembles them from the pieces on a node's root path when they are needed.
//!
//! ## Features
//!
//! - **Map API**: `emplace`, `insert`, `get`, `at`, `count`, `find`, `erase`
//! - **Any piece type**: chars, bytes, bits, path segments, ...
//! - **Custom orders**: natural, reversed, or any comparison closure
//! - **Checked cursors**: cursors carry a generation and fail cleanly after the
//!   trie changes shape instead of pointing at the wrong entry
//!
//! ## Example
//!
//! ```rust
//! use piece_trie::StringTrie;
//!
//! let mut trie: StringTrie<i32> = StringTrie::default();
//!
//! trie.emplace("gsd", 42);
//! trie.emplace("whispy", 69);
//! trie.emplace("gs", -24);
//!
//! assert_eq!(trie.get("gs"), Some(&-24));
//! assert_eq!(trie.len(), 3);
//!
//! let keys: Vec<String> = trie.keys().collect();
//! assert_eq!(keys, vec!["gs", "gsd", "whispy"]);
//! ```

mod iter;
mod key_converter;
mod node;
mod order;
mod trie;
mod util;

// Re-export public types
pub use crate::iter::{Cursor, Entry, IntoIter, Iter, Keys, Values};
pub use crate::key_converter::{Concat, PieceKey, PushChar, PushPiece};
pub use crate::order::{NaturalOrder, PieceOrder, ReverseOrder};
pub use crate::trie::{StringTrie, Trie, VecTrie};

/// Errors that can occur in trie operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The key is not stored in the trie
    NotFound,
    /// The cursor is the end cursor, or the trie changed shape since it was taken
    InvalidCursor,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound => write!(f, "Key is not stored in the trie"),
            Error::InvalidCursor => write!(f, "Cursor is past the end or out of date"),
        }
    }
}

impl std::error::Error for Error {}
