//! Orderings over individual key pieces.
//!
//! Sibling nodes are kept sorted by a [`PieceOrder`]; two pieces that compare
//! `Equal` label the same edge.
use std::cmp::Ordering;

/// A total order over key pieces.
///
/// Any `Fn(&P, &P) -> Ordering` closure is a piece order.
pub trait PieceOrder<P: ?Sized> {
    /// Compares two pieces.
    fn compare(&self, a: &P, b: &P) -> Ordering;
}

impl<P: ?Sized, F> PieceOrder<P> for F
where
    F: Fn(&P, &P) -> Ordering,
{
    fn compare(&self, a: &P, b: &P) -> Ordering {
        self(a, b)
    }
}

/// The piece type's own `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<P: Ord + ?Sized> PieceOrder<P> for NaturalOrder {
    fn compare(&self, a: &P, b: &P) -> Ordering {
        a.cmp(b)
    }
}

/// The reverse of the piece type's `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseOrder;

impl<P: Ord + ?Sized> PieceOrder<P> for ReverseOrder {
    fn compare(&self, a: &P, b: &P) -> Ordering {
        b.cmp(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order() {
        assert_eq!(NaturalOrder.compare(&'a', &'b'), Ordering::Less);
        assert_eq!(NaturalOrder.compare(&3, &3), Ordering::Equal);
    }

    #[test]
    fn test_reverse_order() {
        assert_eq!(ReverseOrder.compare(&'a', &'b'), Ordering::Greater);
        assert_eq!(ReverseOrder.compare(&1u8, &1u8), Ordering::Equal);
    }

    #[test]
    fn test_closure_order() {
        let case_insensitive =
            |a: &char, b: &char| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase());
        assert_eq!(case_insensitive.compare(&'A', &'a'), Ordering::Equal);
        assert_eq!(case_insensitive.compare(&'B', &'a'), Ordering::Greater);
    }
}
