//! Defines how full keys are split into pieces and assembled back from them.
use std::iter::Cloned;
use std::slice;
use std::str::Chars;

/// A full key that can be viewed as an ordered sequence of key pieces.
///
/// The trie only ever walks the pieces of a key; it never stores the key itself.
pub trait PieceKey {
    /// The atomic unit labelling one edge of the trie.
    type Piece: Clone;

    /// Iterator over the pieces of a key, front to back.
    type Pieces<'a>: Iterator<Item = Self::Piece>
    where
        Self: 'a;

    /// Returns the pieces of this key in order.
    fn pieces(&self) -> Self::Pieces<'_>;
}

impl PieceKey for str {
    type Piece = char;
    type Pieces<'a> = Chars<'a>;

    fn pieces(&self) -> Self::Pieces<'_> {
        self.chars()
    }
}

impl PieceKey for String {
    type Piece = char;
    type Pieces<'a> = Chars<'a>;

    fn pieces(&self) -> Self::Pieces<'_> {
        self.chars()
    }
}

impl<T: Clone> PieceKey for [T] {
    type Piece = T;
    type Pieces<'a> = Cloned<slice::Iter<'a, T>> where Self: 'a;

    fn pieces(&self) -> Self::Pieces<'_> {
        self.iter().cloned()
    }
}

impl<T: Clone, const N: usize> PieceKey for [T; N] {
    type Piece = T;
    type Pieces<'a> = Cloned<slice::Iter<'a, T>> where Self: 'a;

    fn pieces(&self) -> Self::Pieces<'_> {
        self.iter().cloned()
    }
}

impl<T: Clone> PieceKey for Vec<T> {
    type Piece = T;
    type Pieces<'a> = Cloned<slice::Iter<'a, T>> where Self: 'a;

    fn pieces(&self) -> Self::Pieces<'_> {
        self.iter().cloned()
    }
}

/// Appends one key piece onto a partially built full key.
///
/// Only used when a full key is handed back to the caller; nodes store pieces.
/// Any `Fn(&mut K, &P)` closure is a concatenator.
pub trait Concat<K, P> {
    /// Appends `piece` to the end of `key`.
    fn concat(&self, key: &mut K, piece: &P);
}

impl<K, P, F> Concat<K, P> for F
where
    F: Fn(&mut K, &P),
{
    fn concat(&self, key: &mut K, piece: &P) {
        self(key, piece)
    }
}

/// Concatenator for `String` keys made of `char` pieces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushChar;

impl Concat<String, char> for PushChar {
    fn concat(&self, key: &mut String, piece: &char) {
        key.push(*piece);
    }
}

/// Concatenator for `Vec<T>` keys made of `T` pieces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushPiece;

impl<T: Clone> Concat<Vec<T>, T> for PushPiece {
    fn concat(&self, key: &mut Vec<T>, piece: &T) {
        key.push(piece.clone());
    }
}
