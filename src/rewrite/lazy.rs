use core::{
    fmt::{self, Formatter, Debug},
    iter::FusedIterator,
    mem,
};
use alloc::vec::{self, Vec};
use tracing::{debug, trace};
use crate::{util::Stack, Policy, Tree};
use super::{RewriteConfig, RewriteError, Rewriter, Rules, SideOutput};

/// A single item produced by a [`LazyRewrite`].
///
/// [`LazyRewrite`]: struct.LazyRewrite.html " "
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fragment<T> {
    /// A tree registered as side output by a transform call. Side output is yielded before the result of the node whose transform registered it.
    Side(Tree<T>),
    /// The final rewrite of a node the engine visited, with the root at depth 0. The last fragment of every successful rewrite is the result for the root.
    Rewritten {
        /// How many levels below the root the rewritten node sits.
        depth: usize,
        /// The rewritten subtree.
        tree: Tree<T>,
    },
}
impl<T> Fragment<T> {
    /// Returns a reference to the tree carried by the fragment.
    #[inline]
    pub const fn tree(&self) -> &Tree<T> {
        match self {
            Self::Side(tree) | Self::Rewritten { tree, .. } => tree,
        }
    }
    /// Consumes the fragment and returns the tree it carries.
    #[inline]
    #[allow(clippy::missing_const_for_fn)] // const fn cannot evaluate drop
    pub fn into_tree(self) -> Tree<T> {
        match self {
            Self::Side(tree) | Self::Rewritten { tree, .. } => tree,
        }
    }
    /// Returns `true` if the fragment is side output, `false` otherwise.
    #[inline]
    pub const fn is_side_output(&self) -> bool {
        matches!(self, Self::Side(_))
    }
    /// Returns `true` if the fragment is the final result for the root, `false` otherwise.
    #[inline]
    pub const fn is_root_result(&self) -> bool {
        matches!(self, Self::Rewritten { depth: 0, .. })
    }
    /// Returns the depth of the rewritten node, or `None` for side output.
    #[inline]
    pub const fn depth(&self) -> Option<usize> {
        match self {
            Self::Side(_) => None,
            Self::Rewritten { depth, .. } => Some(*depth),
        }
    }
}

/// A rewrite which is performed on demand, one [`Fragment`] per pull.
///
/// Created by [`lazy_rewrite`], [`try_lazy_rewrite`] and [`Rewriter::lazy`]. Every fragment is computed only when requested, and the engine keeps its own stack of pending nodes, so arbitrarily deep trees never exhaust the call stack.
///
/// The order of the fragments is fully determined by the input and the rules:
/// - side output registered by a transform call comes right after that call, most recently registered sequence first;
/// - the final rewrite of every child the engine descends into comes before the final rewrite of its parent, children in order;
/// - the last fragment is the final rewrite of the root, and its tree is exactly what the eager rewrite returns.
///
/// Once the root has been produced or an error has been yielded, the sequence is exhausted: [`has_more`] returns `false`, [`pull`] fails with [`RewriteError::Exhausted`] and the iterator implementation returns `None`.
///
/// Rewritten children are handed out *and* kept for their parent, which is why `T` has to be `Clone` to pull fragments. Pulling every fragment therefore clones each node once per ancestor the engine descends through, which costs O(nodes × depth) on deep trees. [`finish`] and [`collect_side_output`] never hand out children and move them into their parents instead, so they run in time linear in the number of visited nodes without the engine cloning anything.
///
/// [`Fragment`]: enum.Fragment.html " "
/// [`lazy_rewrite`]: fn.lazy_rewrite.html " "
/// [`try_lazy_rewrite`]: fn.try_lazy_rewrite.html " "
/// [`Rewriter::lazy`]: struct.Rewriter.html#method.lazy " "
/// [`has_more`]: #method.has_more " "
/// [`pull`]: #method.pull " "
/// [`finish`]: #method.finish " "
/// [`collect_side_output`]: #method.collect_side_output " "
/// [`RewriteError::Exhausted`]: enum.RewriteError.html#variant.Exhausted " "
pub struct LazyRewrite<T, R> {
    rules: R,
    config: RewriteConfig,
    frames: Stack<Frame<T>>,
    emitted: usize,
    finished: bool,
}
impl<T, R> LazyRewrite<T, R> {
    pub(crate) fn new(tree: Tree<T>, rules: R, config: RewriteConfig) -> Self {
        let mut frames = Stack::new();
        frames.push(Frame::new(tree));
        Self {
            rules,
            config,
            frames,
            emitted: 0,
            finished: false,
        }
    }
    /// Returns `true` if pulling would produce another fragment or an error, `false` if the sequence is exhausted.
    #[inline(always)]
    pub const fn has_more(&self) -> bool {
        !self.finished
    }
    /// Returns how many fragments have been produced so far.
    #[inline(always)]
    pub const fn fragments_emitted(&self) -> usize {
        self.emitted
    }
    /// Returns the limits the rewrite runs with.
    #[inline(always)]
    pub const fn config(&self) -> RewriteConfig {
        self.config
    }
}
impl<T: Clone, R: Rules<T>> LazyRewrite<T, R> {
    /// Computes and returns the next fragment.
    ///
    /// # Errors
    /// Fails with [`RewriteError::Exhausted`] if the sequence has already produced the root or an error. Otherwise fails if the rules fail or a configured limit is exceeded, exhausting the sequence.
    ///
    /// [`RewriteError::Exhausted`]: enum.RewriteError.html#variant.Exhausted " "
    #[inline]
    pub fn pull(&mut self) -> Result<Fragment<T>, RewriteError<R::Error>> {
        self.step(true)
    }
    /// Drains the sequence and returns the final rewrite of the root, discarding everything else.
    ///
    /// Rewritten children are moved into their parents without being cloned.
    ///
    /// # Errors
    /// Fails with the first error produced while draining, or with [`RewriteError::Exhausted`] if the root had already been pulled.
    ///
    /// [`RewriteError::Exhausted`]: enum.RewriteError.html#variant.Exhausted " "
    pub fn finish(mut self) -> Result<Tree<T>, RewriteError<R::Error>> {
        loop {
            if let Fragment::Rewritten { depth: 0, tree } = self.step(false)? {
                return Ok(tree);
            }
        }
    }
    /// Drains the sequence, returning all side output in the order it was produced along with the final rewrite of the root.
    ///
    /// # Errors
    /// Same as [`finish`].
    ///
    /// [`finish`]: #method.finish " "
    pub fn collect_side_output(mut self) -> Result<(Vec<Tree<T>>, Tree<T>), RewriteError<R::Error>> {
        let mut side_output = Vec::new();
        loop {
            match self.step(false)? {
                Fragment::Side(tree) => side_output.push(tree),
                Fragment::Rewritten { depth: 0, tree } => return Ok((side_output, tree)),
                Fragment::Rewritten { .. } => {}
            }
        }
    }

    /// Fuses the sequence around `advance`. With `yield_children` off, only side output and the root come out.
    fn step(&mut self, yield_children: bool) -> Result<Fragment<T>, RewriteError<R::Error>> {
        if self.finished {
            return Err(RewriteError::Exhausted);
        }
        let fragment = self.advance(yield_children);
        if fragment.is_err() {
            self.finished = true;
            self.frames.clear();
        }
        fragment
    }
    fn advance(&mut self, yield_children: bool) -> Result<Fragment<T>, RewriteError<R::Error>> {
        loop {
            let depth = self.frames.len().wrapping_sub(1);
            let frame = match self.frames.last_mut() {
                Some(frame) => frame,
                None => return Err(RewriteError::Exhausted),
            };
            if let Some(sequence) = frame.side_output.last_mut() {
                match sequence.next() {
                    Some(tree) => {
                        self.emitted += 1;
                        return Ok(Fragment::Side(tree));
                    }
                    None => {
                        frame.side_output.pop();
                        continue;
                    }
                }
            }
            match mem::replace(&mut frame.stage, Stage::Vacant) {
                Stage::Initial(tree) => {
                    let policy = self.rules.pick(tree.label()).map_err(RewriteError::Rule)?;
                    trace!(%policy, depth, "picked policy");
                    let stage = match policy {
                        Policy::Skip => Stage::Ready(tree),
                        Policy::Transform => Stage::Ready(run_transform(&mut self.rules, frame, tree)?),
                        Policy::RepeatTransform => {
                            frame.repeats += 1;
                            self.config.check_repeat::<R::Error>(frame.repeats)?;
                            Stage::Initial(run_transform(&mut self.rules, frame, tree)?)
                        }
                        Policy::PassThrough | Policy::PushDown => {
                            let (label, children) = tree.into_parts();
                            frame.descend(label, policy, children)
                        }
                        Policy::PullUp => {
                            let (label, children) =
                                run_transform(&mut self.rules, frame, tree)?.into_parts();
                            frame.descend(label, policy, children)
                        }
                    };
                    frame.stage = stage;
                }
                Stage::Descending { label, policy } => match frame.pending.next() {
                    Some(child) => {
                        frame.stage = Stage::Descending { label, policy };
                        self.config.check_depth::<R::Error>(depth + 1)?;
                        self.frames.push(Frame::new(child));
                    }
                    None => {
                        let rebuilt = Tree::with_children(label, mem::take(&mut frame.done));
                        let result = if policy == Policy::PushDown {
                            run_transform(&mut self.rules, frame, rebuilt)?
                        } else {
                            rebuilt
                        };
                        frame.stage = Stage::Ready(result);
                    }
                },
                Stage::Ready(tree) => {
                    self.frames.pop();
                    match self.frames.last_mut() {
                        Some(parent) if !yield_children => {
                            parent.done.push(tree);
                            continue;
                        }
                        Some(parent) => parent.done.push(tree.clone()),
                        None => {
                            self.finished = true;
                            debug!(fragments = self.emitted + 1, "lazy rewrite finished");
                        }
                    }
                    self.emitted += 1;
                    return Ok(Fragment::Rewritten { depth, tree });
                }
                Stage::Vacant => unreachable!("rewrite frame resumed after a failure"),
            }
        }
    }
}
impl<T: Clone, R: Rules<T>> Iterator for LazyRewrite<T, R> {
    type Item = Result<Fragment<T>, RewriteError<R::Error>>;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            None
        } else {
            Some(self.pull())
        }
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (if self.finished { 0 } else { 1 }, None)
    }
}
impl<T: Clone, R: Rules<T>> FusedIterator for LazyRewrite<T, R> {}
impl<T, R> Debug for LazyRewrite<T, R> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRewrite")
            .field("config", &self.config)
            .field("pending_nodes", &self.frames.len())
            .field("emitted", &self.emitted)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<R> Rewriter<R> {
    /// Creates a lazy rewrite of a tree with the rules and limits of the rewriter.
    #[inline]
    pub fn lazy<T: Clone>(self, tree: Tree<T>) -> LazyRewrite<T, R>
    where
        R: Rules<T>,
    {
        LazyRewrite::new(tree, self.rules, self.config)
    }
}

/// One node on the engine's stack, along with everything needed to resume it.
struct Frame<T> {
    stage: Stage<T>,
    /// Children which still have to be rewritten.
    pending: vec::IntoIter<Tree<T>>,
    /// Children which have been rewritten already.
    done: Vec<Tree<T>>,
    /// Side output still to be yielded, drained from the back.
    side_output: Vec<vec::IntoIter<Tree<T>>>,
    /// Consecutive `RepeatTransform` transform calls on this node.
    repeats: usize,
}
impl<T> Frame<T> {
    fn new(tree: Tree<T>) -> Self {
        Self {
            stage: Stage::Initial(tree),
            pending: Vec::new().into_iter(),
            done: Vec::new(),
            side_output: Vec::new(),
            repeats: 0,
        }
    }
    fn descend(&mut self, label: T, policy: Policy, children: Vec<Tree<T>>) -> Stage<T> {
        self.done = Vec::with_capacity(children.len());
        self.pending = children.into_iter();
        Stage::Descending { label, policy }
    }
}

enum Stage<T> {
    /// A policy has yet to be picked for the tree.
    Initial(Tree<T>),
    /// The children are being rewritten; the label waits for them.
    Descending { label: T, policy: Policy },
    /// The final rewrite of the node, ready to be yielded.
    Ready(Tree<T>),
    /// Placeholder while the stage is being processed.
    Vacant,
}

fn run_transform<T, R: Rules<T>>(
    rules: &mut R,
    frame: &mut Frame<T>,
    tree: Tree<T>,
) -> Result<Tree<T>, RewriteError<R::Error>> {
    let mut side_output = SideOutput::new();
    let result = rules.transform(tree, &mut side_output).map_err(RewriteError::Rule)?;
    if !side_output.is_empty() {
        debug!(sequences = side_output.len(), "side output registered");
        frame.side_output.extend(side_output.into_sequences().map(Vec::into_iter));
    }
    Ok(result)
}
