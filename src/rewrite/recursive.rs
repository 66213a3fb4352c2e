use alloc::vec::Vec;
use tracing::{debug, trace};
use crate::{Policy, Tree};
use super::{RewriteError, Rewriter, Rules, SideOutput};

impl<R> Rewriter<R> {
    /// Rewrites a tree eagerly, returning the final result.
    ///
    /// Side output registered by the transform function is discarded.
    ///
    /// # Errors
    /// Fails if the rules fail or if one of the configured limits is exceeded. The input tree is consumed either way.
    pub fn rewrite<T>(&mut self, tree: Tree<T>) -> Result<Tree<T>, RewriteError<R::Error>>
    where
        R: Rules<T>,
    {
        let result = self.rewrite_at(tree, 0)?;
        debug!("eager rewrite finished");
        Ok(result)
    }

    fn rewrite_at<T>(&mut self, mut tree: Tree<T>, depth: usize) -> Result<Tree<T>, RewriteError<R::Error>>
    where
        R: Rules<T>,
    {
        let mut repeats = 0_usize;
        loop {
            let policy = self.rules.pick(tree.label()).map_err(RewriteError::Rule)?;
            trace!(%policy, depth, "picked policy");
            return match policy {
                Policy::Skip => Ok(tree),
                Policy::Transform => self.transform(tree),
                Policy::RepeatTransform => {
                    repeats += 1;
                    self.config.check_repeat::<R::Error>(repeats)?;
                    tree = self.transform(tree)?;
                    continue;
                }
                Policy::PassThrough => {
                    let (label, children) = tree.into_parts();
                    self.rebuild(label, children, depth)
                }
                Policy::PushDown => {
                    let (label, children) = tree.into_parts();
                    let rebuilt = self.rebuild(label, children, depth)?;
                    self.transform(rebuilt)
                }
                Policy::PullUp => {
                    let (label, children) = self.transform(tree)?.into_parts();
                    self.rebuild(label, children, depth)
                }
            };
        }
    }
    /// Rewrites `children` one level below `depth` and attaches the results to a fresh node labelled `label`.
    fn rebuild<T>(
        &mut self,
        label: T,
        children: Vec<Tree<T>>,
        depth: usize,
    ) -> Result<Tree<T>, RewriteError<R::Error>>
    where
        R: Rules<T>,
    {
        let mut rewritten = Vec::with_capacity(children.len());
        for child in children {
            self.config.check_depth::<R::Error>(depth + 1)?;
            rewritten.push(self.rewrite_at(child, depth + 1)?);
        }
        Ok(Tree::with_children(label, rewritten))
    }
    fn transform<T>(&mut self, tree: Tree<T>) -> Result<Tree<T>, RewriteError<R::Error>>
    where
        R: Rules<T>,
    {
        // Nothing consumes side output here.
        let mut side_output = SideOutput::new();
        self.rules.transform(tree, &mut side_output).map_err(RewriteError::Rule)
    }
}
