use alloc::vec::{self, Vec};
use crate::Tree;

/// The registrar handed to every `transform` call, through which the transform can emit extra trees ahead of its own result.
///
/// Registered sequences are only observable through a [`LazyRewrite`], which yields them as [`Fragment::Side`] values. The most recently registered sequence is drained first, each sequence in its own order, and the transform's result comes after all of them. The eager rewriter has no consumer for side output and discards it.
///
/// # Example
/// ```rust
/// use arbor_rewrite::{lazy_rewrite, Fragment, Policy, Tree};
///
/// let mut fragments = lazy_rewrite(
///     Tree::leaf("n"),
///     |_| Policy::Transform,
///     |_, side_output| {
///         side_output.register(vec![Tree::leaf("a"), Tree::leaf("b")]);
///         Tree::leaf("r")
///     },
/// );
/// let mut drained = Vec::new();
/// while fragments.has_more() {
///     drained.push(fragments.pull().unwrap().into_tree().into_label());
/// }
/// assert_eq!(drained, ["a", "b", "r"]);
/// ```
///
/// [`LazyRewrite`]: struct.LazyRewrite.html " "
/// [`Fragment::Side`]: enum.Fragment.html#variant.Side " "
#[derive(Debug)]
pub struct SideOutput<T> {
    sequences: Vec<Vec<Tree<T>>>,
}
impl<T> SideOutput<T> {
    #[inline(always)]
    pub(crate) const fn new() -> Self {
        Self {
            sequences: Vec::new(),
        }
    }
    /// Registers a sequence of trees to be emitted before the result of the current transform call, and before any sequence registered earlier during the same call.
    ///
    /// The sequence is collected right away. Empty sequences are ignored.
    pub fn register<I>(&mut self, sequence: I)
    where
        I: IntoIterator<Item = Tree<T>>,
    {
        let sequence: Vec<_> = sequence.into_iter().collect();
        if !sequence.is_empty() {
            self.sequences.push(sequence);
        }
    }
    /// Returns the number of non-empty sequences registered so far during the current transform call.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }
    /// Returns `true` if nothing has been registered during the current transform call, `false` otherwise.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
    /// Consumes the registrar, returning the sequences in registration order.
    #[inline(always)]
    pub(crate) fn into_sequences(self) -> vec::IntoIter<Vec<Tree<T>>> {
        self.sequences.into_iter()
    }
}
