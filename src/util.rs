use crate::node::{node, Arena, NodeId};
use crate::order::PieceOrder;

/// Searches a sorted child list for the child labelled `piece`.
///
/// Returns `Ok(position)` of the matching child, or `Err(position)` where a
/// child with that piece would have to be inserted to keep the list sorted.
pub(crate) fn search_children<P, V, O>(
    arena: &Arena<P, V>,
    children: &[NodeId],
    piece: &P,
    order: &O,
) -> Result<usize, usize>
where
    O: PieceOrder<P>,
{
    children.binary_search_by(|&child| match &node(arena, child).piece {
        Some(child_piece) => order.compare(child_piece, piece),
        // only the root lacks a piece and it is never anyone's child
        None => unreachable!("root node listed as a child"),
    })
}

/// Returns whether `children` is strictly ascending under `order`.
pub(crate) fn is_sorted_unique<P, V, O>(arena: &Arena<P, V>, children: &[NodeId], order: &O) -> bool
where
    O: PieceOrder<P>,
{
    children.windows(2).all(|pair| {
        match (&node(arena, pair[0]).piece, &node(arena, pair[1]).piece) {
            (Some(a), Some(b)) => order.compare(a, b).is_lt(),
            _ => false,
        }
    })
}
