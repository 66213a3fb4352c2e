use core::{
    convert::Infallible,
    fmt::{self, Formatter, Debug},
};
use crate::{Policy, Tree};
use super::SideOutput;

/// The caller-supplied half of a rewrite: a policy decision per label and a transform for whole subtrees.
///
/// Most callers never implement this trait directly and instead pass closures to [`rewrite`], [`lazy_rewrite`] or their fallible counterparts, which wrap them into [`FnRules`]/[`TryFnRules`]. Implementing it is useful for rule sets which carry state between passes; `&mut R` implements `Rules` as well, so a rule set can be lent to a [`Rewriter`] and reused afterwards.
///
/// Errors returned by either method abort the rewrite and are handed back to the caller unchanged, wrapped in [`RewriteError::Rule`].
///
/// [`rewrite`]: fn.rewrite.html " "
/// [`lazy_rewrite`]: fn.lazy_rewrite.html " "
/// [`FnRules`]: struct.FnRules.html " "
/// [`TryFnRules`]: struct.TryFnRules.html " "
/// [`Rewriter`]: struct.Rewriter.html " "
/// [`RewriteError::Rule`]: enum.RewriteError.html#variant.Rule " "
pub trait Rules<T> {
    /// The error produced by the rules. Use [`Infallible`] for rules which cannot fail.
    ///
    /// [`Infallible`]: https://doc.rust-lang.org/core/convert/enum.Infallible.html " "
    type Error;
    /// Decides how the node with the specified label is to be rewritten.
    fn pick(&mut self, label: &T) -> Result<Policy, Self::Error>;
    /// Transforms an entire subtree, optionally registering side output to be emitted before the result.
    fn transform(
        &mut self,
        tree: Tree<T>,
        side_output: &mut SideOutput<T>,
    ) -> Result<Tree<T>, Self::Error>;
}
impl<T, R: Rules<T> + ?Sized> Rules<T> for &mut R {
    type Error = R::Error;
    #[inline(always)]
    fn pick(&mut self, label: &T) -> Result<Policy, Self::Error> {
        (**self).pick(label)
    }
    #[inline(always)]
    fn transform(
        &mut self,
        tree: Tree<T>,
        side_output: &mut SideOutput<T>,
    ) -> Result<Tree<T>, Self::Error> {
        (**self).transform(tree, side_output)
    }
}

/// [`Rules`] made of two infallible closures.
///
/// [`Rules`]: trait.Rules.html " "
#[derive(Copy, Clone)]
pub struct FnRules<P, F> {
    pick: P,
    transform: F,
}
impl<P, F> FnRules<P, F> {
    /// Groups a policy picker and a transform function.
    #[inline(always)]
    pub const fn new(pick: P, transform: F) -> Self {
        Self { pick, transform }
    }
    /// Splits the rules back into the picker and the transform function.
    #[inline(always)]
    #[allow(clippy::missing_const_for_fn)] // const fn cannot evaluate drop
    pub fn into_inner(self) -> (P, F) {
        (self.pick, self.transform)
    }
}
impl<T, P, F> Rules<T> for FnRules<P, F>
where
    P: FnMut(&T) -> Policy,
    F: FnMut(Tree<T>, &mut SideOutput<T>) -> Tree<T>,
{
    type Error = Infallible;
    #[inline(always)]
    fn pick(&mut self, label: &T) -> Result<Policy, Self::Error> {
        Ok((self.pick)(label))
    }
    #[inline(always)]
    fn transform(
        &mut self,
        tree: Tree<T>,
        side_output: &mut SideOutput<T>,
    ) -> Result<Tree<T>, Self::Error> {
        Ok((self.transform)(tree, side_output))
    }
}
impl<P, F> Debug for FnRules<P, F> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRules").finish_non_exhaustive()
    }
}

/// [`Rules`] made of two fallible closures sharing an error type.
///
/// [`Rules`]: trait.Rules.html " "
#[derive(Copy, Clone)]
pub struct TryFnRules<P, F> {
    pick: P,
    transform: F,
}
impl<P, F> TryFnRules<P, F> {
    /// Groups a fallible policy picker and a fallible transform function.
    #[inline(always)]
    pub const fn new(pick: P, transform: F) -> Self {
        Self { pick, transform }
    }
    /// Splits the rules back into the picker and the transform function.
    #[inline(always)]
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_inner(self) -> (P, F) {
        (self.pick, self.transform)
    }
}
impl<T, E, P, F> Rules<T> for TryFnRules<P, F>
where
    P: FnMut(&T) -> Result<Policy, E>,
    F: FnMut(Tree<T>, &mut SideOutput<T>) -> Result<Tree<T>, E>,
{
    type Error = E;
    #[inline(always)]
    fn pick(&mut self, label: &T) -> Result<Policy, Self::Error> {
        (self.pick)(label)
    }
    #[inline(always)]
    fn transform(
        &mut self,
        tree: Tree<T>,
        side_output: &mut SideOutput<T>,
    ) -> Result<Tree<T>, Self::Error> {
        (self.transform)(tree, side_output)
    }
}
impl<P, F> Debug for TryFnRules<P, F> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryFnRules").finish_non_exhaustive()
    }
}
