/// Builds a [`Tree`] from a label and, optionally, a bracketed list of children.
///
/// Every child is either a label, which becomes a leaf, or an already-built `Tree` (usually a nested `tree!` invocation).
///
/// # Example
/// ```rust
/// use arbor_rewrite::{tree, Tree};
///
/// let leaf = tree!(7);
/// assert_eq!(leaf, Tree::leaf(7));
///
/// let nested = tree!(1 => [2, tree!(3 => [4, 5]), 6]);
/// assert_eq!(nested.node_count(), 6);
/// assert_eq!(nested.labels().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6]);
/// ```
///
/// [`Tree`]: tree/struct.Tree.html " "
#[macro_export]
macro_rules! tree {
    ($label:expr => [$($child:expr),* $(,)?]) => {
        $crate::Tree::with_children($label, [$($crate::Tree::from($child)),*])
    };
    ($label:expr $(,)?) => {
        $crate::Tree::leaf($label)
    };
}
