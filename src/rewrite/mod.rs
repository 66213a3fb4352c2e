//! Everything related to rewriting trees according to per-node policies.
//!
//! The module is home to the following items:
//! - [`rewrite`] and [`try_rewrite`]: *eager rewriting*, which recursively produces the final tree in one call
//! - [`lazy_rewrite`] and [`try_lazy_rewrite`]: *lazy rewriting*, which produces the same computation one [`Fragment`] at a time through a [`LazyRewrite`] pull sequence
//! - [`Rules`], the trait for the caller's side of a rewrite, along with the closure adapters [`FnRules`] and [`TryFnRules`]
//! - [`SideOutput`], the registrar through which transforms emit extra trees
//! - [`Rewriter`] and [`RewriteConfig`], for running rewrites with limits or with a reusable rule set
//!
//! Both forms implement the same contract. Draining a lazy rewrite and keeping only its last fragment gives exactly the tree the eager rewrite returns for the same input and rules.
//!
//! # Example
//! ```rust
//! use arbor_rewrite::{lazy_rewrite, rewrite, tree, Fragment, Policy, SideOutput, Tree};
//!
//! fn pick(label: &&str) -> Policy {
//!     if *label == "+" { Policy::PushDown } else { Policy::Skip }
//! }
//! fn fold(node: Tree<&'static str>, _: &mut SideOutput<&'static str>) -> Tree<&'static str> {
//!     // By the time a push-down transform runs, all children have been rewritten already.
//!     assert_eq!(node.child_count(), 2);
//!     Tree::leaf("3")
//! }
//!
//! assert_eq!(rewrite(tree!("+" => ["1", "2"]), pick, fold), Tree::leaf("3"));
//!
//! // The lazy form also yields the rewritten children on the way to the root:
//! let fragments: Vec<_> = lazy_rewrite(tree!("+" => ["1", "2"]), pick, fold)
//!     .map(Result::unwrap)
//!     .collect();
//! assert_eq!(fragments, [
//!     Fragment::Rewritten { depth: 1, tree: Tree::leaf("1") },
//!     Fragment::Rewritten { depth: 1, tree: Tree::leaf("2") },
//!     Fragment::Rewritten { depth: 0, tree: Tree::leaf("3") },
//! ]);
//! ```
//!
//! [`rewrite`]: fn.rewrite.html " "
//! [`try_rewrite`]: fn.try_rewrite.html " "
//! [`lazy_rewrite`]: fn.lazy_rewrite.html " "
//! [`try_lazy_rewrite`]: fn.try_lazy_rewrite.html " "
//! [`Fragment`]: enum.Fragment.html " "
//! [`LazyRewrite`]: struct.LazyRewrite.html " "
//! [`Rules`]: trait.Rules.html " "
//! [`FnRules`]: struct.FnRules.html " "
//! [`TryFnRules`]: struct.TryFnRules.html " "
//! [`SideOutput`]: struct.SideOutput.html " "
//! [`Rewriter`]: struct.Rewriter.html " "
//! [`RewriteConfig`]: struct.RewriteConfig.html " "

mod config;
mod lazy;
mod recursive;
mod rules;
mod side_output;
#[cfg(test)]
mod tests;

pub use config::RewriteConfig;
pub use lazy::{Fragment, LazyRewrite};
pub use rules::{Rules, FnRules, TryFnRules};
pub use side_output::SideOutput;

use core::convert::Infallible;
use thiserror::Error;
use crate::{Policy, Tree};

/// The error type produced by rewrites.
///
/// `E` is the error type of the [`Rules`] driving the rewrite, which is [`Infallible`] for the closure-based entry points that cannot fail.
///
/// [`Rules`]: trait.Rules.html " "
/// [`Infallible`]: https://doc.rust-lang.org/core/convert/enum.Infallible.html " "
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum RewriteError<E> {
    /// A fragment was pulled from a [`LazyRewrite`] which had nothing more to produce, either because it was drained or because it failed earlier.
    ///
    /// [`LazyRewrite`]: struct.LazyRewrite.html " "
    #[error("the rewrite has no more fragments to produce")]
    Exhausted,
    /// A node kept mapping to `RepeatTransform` for more consecutive transform calls than the configured limit allows.
    #[error("a node was transformed more than {limit} times in a row under the repeat-transform policy")]
    RepeatLimitExceeded {
        /// The configured repeat limit.
        limit: usize,
    },
    /// The rewrite had to descend deeper than the configured depth limit.
    #[error("the rewrite descended past the depth limit of {limit}")]
    DepthLimitExceeded {
        /// The configured depth limit.
        limit: usize,
    },
    /// The `pick` or `transform` function of the rules failed.
    #[error("a rewrite rule failed: {0}")]
    Rule(E),
}
impl<E> RewriteError<E> {
    /// Returns the error produced by the rules, or `None` if the engine itself produced the error.
    #[inline]
    #[allow(clippy::missing_const_for_fn)] // const fn cannot evaluate drop
    pub fn into_rule_error(self) -> Option<E> {
        match self {
            Self::Rule(error) => Some(error),
            _ => None,
        }
    }
}
impl RewriteError<Infallible> {
    /// Converts an error of infallible rules into one for any other rule error type.
    #[inline]
    pub fn widen<E>(self) -> RewriteError<E> {
        match self {
            Self::Exhausted => RewriteError::Exhausted,
            Self::RepeatLimitExceeded { limit } => RewriteError::RepeatLimitExceeded { limit },
            Self::DepthLimitExceeded { limit } => RewriteError::DepthLimitExceeded { limit },
            Self::Rule(never) => match never {},
        }
    }
}

/// A rule set together with the limits to apply while rewriting with it.
///
/// The free functions in this module cover the common case of closures without limits. A `Rewriter` is needed for anything else: limits, custom [`Rules`] implementations, or running several rewrites with the same rules.
///
/// # Example
/// ```rust
/// use arbor_rewrite::{FnRules, Policy, RewriteConfig, RewriteError, Rewriter, SideOutput, Tree};
///
/// // This rule set never stops transforming.
/// let rules = FnRules::new(
///     |_: &u32| Policy::RepeatTransform,
///     |node: Tree<u32>, _: &mut SideOutput<u32>| node,
/// );
/// let mut rewriter = Rewriter::new(rules)
///     .with_config(RewriteConfig::new().with_repeat_limit(16));
///
/// assert_eq!(
///     rewriter.rewrite(Tree::leaf(0)),
///     Err(RewriteError::RepeatLimitExceeded { limit: 16 }),
/// );
/// ```
///
/// [`Rules`]: trait.Rules.html " "
#[derive(Copy, Clone, Debug, Default)]
pub struct Rewriter<R> {
    rules: R,
    config: RewriteConfig,
}
impl<R> Rewriter<R> {
    /// Creates a rewriter with the specified rules and no limits.
    #[inline(always)]
    pub const fn new(rules: R) -> Self {
        Self {
            rules,
            config: RewriteConfig::UNLIMITED,
        }
    }
    /// Replaces the limits used by the rewriter.
    #[inline(always)]
    #[allow(clippy::missing_const_for_fn)] // const fn cannot evaluate drop
    pub fn with_config(self, config: RewriteConfig) -> Self {
        Self { config, ..self }
    }
    /// Returns the limits used by the rewriter.
    #[inline(always)]
    pub const fn config(&self) -> RewriteConfig {
        self.config
    }
    /// Returns a reference to the rules of the rewriter.
    #[inline(always)]
    pub const fn rules(&self) -> &R {
        &self.rules
    }
    /// Returns a *mutable* reference to the rules of the rewriter.
    #[inline(always)]
    pub fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }
    /// Consumes the rewriter and returns its rules.
    #[inline(always)]
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_rules(self) -> R {
        self.rules
    }
}

/// Rewrites a tree eagerly, returning the final result.
///
/// `pick` decides the [`Policy`] of every visited node from its label, and `transform` is applied to whole subtrees as the policies demand. Side output registered by `transform` is discarded; use [`lazy_rewrite`] to observe it.
///
/// Rewriting recurses once per tree level, and a `RepeatTransform` loop that never settles never returns. See [`Rewriter`] for limits.
///
/// [`Policy`]: ../enum.Policy.html " "
/// [`lazy_rewrite`]: fn.lazy_rewrite.html " "
/// [`Rewriter`]: struct.Rewriter.html " "
pub fn rewrite<T, P, F>(tree: Tree<T>, pick: P, transform: F) -> Tree<T>
where
    P: FnMut(&T) -> Policy,
    F: FnMut(Tree<T>, &mut SideOutput<T>) -> Tree<T>,
{
    crate::util::into_ok(Rewriter::new(FnRules::new(pick, transform)).rewrite(tree))
}
/// Rewrites a tree eagerly with fallible rules, stopping at the first error they produce.
///
/// # Errors
/// Produces [`RewriteError::Rule`] with the error of `pick` or `transform`, unchanged.
///
/// [`RewriteError::Rule`]: enum.RewriteError.html#variant.Rule " "
pub fn try_rewrite<T, E, P, F>(tree: Tree<T>, pick: P, transform: F) -> Result<Tree<T>, RewriteError<E>>
where
    P: FnMut(&T) -> Result<Policy, E>,
    F: FnMut(Tree<T>, &mut SideOutput<T>) -> Result<Tree<T>, E>,
{
    Rewriter::new(TryFnRules::new(pick, transform)).rewrite(tree)
}
/// Creates a lazy rewrite of a tree, which produces the computation of [`rewrite`] one [`Fragment`] at a time, interleaved with the side output of `transform`.
///
/// Nothing is computed until the first fragment is pulled.
///
/// [`rewrite`]: fn.rewrite.html " "
/// [`Fragment`]: enum.Fragment.html " "
pub fn lazy_rewrite<T, P, F>(tree: Tree<T>, pick: P, transform: F) -> LazyRewrite<T, FnRules<P, F>>
where
    T: Clone,
    P: FnMut(&T) -> Policy,
    F: FnMut(Tree<T>, &mut SideOutput<T>) -> Tree<T>,
{
    LazyRewrite::new(tree, FnRules::new(pick, transform), RewriteConfig::UNLIMITED)
}
/// Creates a lazy rewrite of a tree with fallible rules.
///
/// The first error produced by the rules is yielded by the pull that triggered it, after which the sequence is exhausted.
pub fn try_lazy_rewrite<T, E, P, F>(
    tree: Tree<T>,
    pick: P,
    transform: F,
) -> LazyRewrite<T, TryFnRules<P, F>>
where
    T: Clone,
    P: FnMut(&T) -> Result<Policy, E>,
    F: FnMut(Tree<T>, &mut SideOutput<T>) -> Result<Tree<T>, E>,
{
    LazyRewrite::new(tree, TryFnRules::new(pick, transform), RewriteConfig::UNLIMITED)
}
