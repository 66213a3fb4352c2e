use alloc::vec::Vec;
use core::iter::FusedIterator;
use super::Tree;

/// An iterator over references to the nodes of a tree in pre-order (parents before children, children left to right).
///
/// Created by [`Tree::iter`]. The traversal keeps its own stack instead of recursing, so arbitrarily deep trees can be walked.
///
/// [`Tree::iter`]: struct.Tree.html#method.iter " "
#[derive(Clone, Debug)]
pub struct PreOrder<'a, T> {
    pending: Vec<&'a Tree<T>>,
}
impl<'a, T> PreOrder<'a, T> {
    #[inline(always)]
    pub(super) fn new(root: &'a Tree<T>) -> Self {
        let mut pending = Vec::with_capacity(1);
        pending.push(root);
        Self { pending }
    }
}
impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = &'a Tree<T>;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pending.pop()?;
        // Reversed so that the leftmost child is popped first
        self.pending.extend(node.children().iter().rev());
        Some(node)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pending.len(), None)
    }
}
impl<T> FusedIterator for PreOrder<'_, T> {}
