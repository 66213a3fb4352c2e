//! Ordered n-ary trees, the structure every rewrite consumes and produces.
//!
//! A [`Tree`] is a label plus an ordered, possibly empty list of child trees. Unlike arena-based trees, every node owns its children directly, which is what lets a rewrite move whole subtrees in and out of transform functions without any key bookkeeping.
//!
//! # Example
//! ```rust
//! use arbor_rewrite::{tree, Tree};
//!
//! // The macro builds nested trees in one go. Branch children are written as nested invocations.
//! let mut expr = tree!("+" => ["1", tree!("*" => ["2", "3"])]);
//!
//! assert_eq!(expr.child_count(), 2);
//! assert!(expr.child(0).unwrap().is_leaf());
//! assert_eq!(expr.child(1).unwrap().label(), &"*");
//!
//! // Children can be added at either end:
//! expr.add_child(Tree::leaf("4"));
//! expr.prepend_child(Tree::leaf("0"));
//! assert_eq!(expr.to_string(), "(+ 0 1 (* 2 3) 4)");
//!
//! // Out-of-range indices are reported, not panicked on:
//! assert!(expr.child(10).is_err());
//! ```
//!
//! [`Tree`]: struct.Tree.html " "

mod iter;
mod macros;

pub use iter::PreOrder;

use alloc::vec::Vec;
use core::{
    fmt::{self, Formatter, Display},
    mem::{self, ManuallyDrop},
    ptr,
};
use thiserror::Error;

/// A node of an ordered n-ary tree: a label and the children below it.
///
/// Leaves are simply nodes with an empty child list; there is no separate leaf type.
///
/// Cloning and dropping keep their own stack instead of recursing, so chains of any depth can be copied and freed. Comparison, hashing and formatting still recurse.
#[derive(Debug, Default, PartialEq, Eq, Hash)]
pub struct Tree<T> {
    label: T,
    children: Vec<Tree<T>>,
}
impl<T> Tree<T> {
    /// Creates a node without children.
    #[inline(always)]
    pub const fn leaf(label: T) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }
    /// Creates a node with the specified children, in iteration order.
    #[inline]
    pub fn with_children<I>(label: T, children: I) -> Self
    where
        I: IntoIterator<Item = Tree<T>>,
    {
        Self {
            label,
            children: children.into_iter().collect(),
        }
    }

    /// Returns a reference to the label of the node.
    #[inline(always)]
    pub const fn label(&self) -> &T {
        &self.label
    }
    /// Returns a *mutable* reference to the label of the node.
    #[inline(always)]
    pub fn label_mut(&mut self) -> &mut T {
        &mut self.label
    }
    /// Replaces the label of the node, returning the previous one.
    #[inline(always)]
    pub fn set_label(&mut self, label: T) -> T {
        mem::replace(&mut self.label, label)
    }
    /// Consumes the node and returns its label, dropping the children.
    #[inline(always)]
    #[allow(clippy::missing_const_for_fn)] // const fn cannot evaluate drop
    pub fn into_label(self) -> T {
        self.into_parts().0
    }
    /// Splits the node into its label and its children.
    #[inline(always)]
    pub fn into_parts(self) -> (T, Vec<Tree<T>>) {
        let this = ManuallyDrop::new(self);
        // Both fields are read exactly once and `this` is never dropped.
        unsafe { (ptr::read(&this.label), ptr::read(&this.children)) }
    }

    /// Returns the children of the node, in order.
    #[inline(always)]
    pub fn children(&self) -> &[Tree<T>] {
        &self.children
    }
    /// Returns the children of the node as a *mutable* slice. The number of children cannot be changed through it.
    #[inline(always)]
    pub fn children_mut(&mut self) -> &mut [Tree<T>] {
        &mut self.children
    }
    /// Returns the number of direct children of the node.
    #[inline(always)]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
    /// Returns `true` if the node has no children, `false` otherwise.
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
    /// Returns a reference to the child at the specified index.
    ///
    /// # Errors
    /// Fails with [`IndexOutOfBounds`] if `index >= child_count()`.
    ///
    /// [`IndexOutOfBounds`]: struct.IndexOutOfBounds.html " "
    #[inline]
    pub fn child(&self, index: usize) -> Result<&Tree<T>, IndexOutOfBounds> {
        let len = self.children.len();
        self.children.get(index).ok_or(IndexOutOfBounds { index, len })
    }
    /// Returns a *mutable* reference to the child at the specified index.
    ///
    /// # Errors
    /// Same as [`child`].
    ///
    /// [`child`]: #method.child " "
    #[inline]
    pub fn child_mut(&mut self, index: usize) -> Result<&mut Tree<T>, IndexOutOfBounds> {
        let len = self.children.len();
        self.children
            .get_mut(index)
            .ok_or(IndexOutOfBounds { index, len })
    }

    /// Appends a child after all existing ones.
    #[inline(always)]
    pub fn add_child(&mut self, child: Tree<T>) {
        self.children.push(child)
    }
    /// Inserts a child before all existing ones.
    ///
    /// This shifts every existing child and is therefore *O*(*n*) in the number of children.
    #[inline(always)]
    pub fn prepend_child(&mut self, child: Tree<T>) {
        self.children.insert(0, child)
    }
    /// Removes and returns the child at the specified index, shifting the ones after it to the left.
    ///
    /// # Errors
    /// Fails with [`IndexOutOfBounds`] if `index >= child_count()`, leaving the node untouched.
    ///
    /// [`IndexOutOfBounds`]: struct.IndexOutOfBounds.html " "
    #[inline]
    pub fn remove_child(&mut self, index: usize) -> Result<Tree<T>, IndexOutOfBounds> {
        let len = self.children.len();
        if index < len {
            Ok(self.children.remove(index))
        } else {
            Err(IndexOutOfBounds { index, len })
        }
    }
    /// Detaches all children from the node, turning it into a leaf, and returns them.
    #[inline(always)]
    pub fn take_children(&mut self) -> Vec<Tree<T>> {
        mem::take(&mut self.children)
    }
    /// Replaces all children of the node, returning the previous ones.
    #[inline]
    pub fn replace_children<I>(&mut self, children: I) -> Vec<Tree<T>>
    where
        I: IntoIterator<Item = Tree<T>>,
    {
        mem::replace(&mut self.children, children.into_iter().collect())
    }

    /// Returns an iterator over all nodes of the tree in pre-order, starting with `self`.
    #[inline(always)]
    pub fn iter(&self) -> PreOrder<'_, T> {
        PreOrder::new(self)
    }
    /// Returns an iterator over the labels of all nodes of the tree in pre-order.
    #[inline]
    pub fn labels(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(Tree::label)
    }
    /// Returns the total number of nodes in the tree, including `self`.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
    /// Builds a tree of the same shape with every label passed through `f`, visiting labels in pre-order.
    pub fn map<U, F>(self, mut f: F) -> Tree<U>
    where
        F: FnMut(T) -> U,
    {
        self.map_with(&mut f)
    }
    fn map_with<U, F>(self, f: &mut F) -> Tree<U>
    where
        F: FnMut(T) -> U,
    {
        let (label, children) = self.into_parts();
        Tree {
            label: f(label),
            children: children
                .into_iter()
                .map(|child| child.map_with(f))
                .collect(),
        }
    }
}
impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        let mut pending = Vec::new();
        let mut current = CloneFrame::new(self);
        loop {
            let source = current.source;
            if let Some(child) = source.children.get(current.children.len()) {
                pending.push(mem::replace(&mut current, CloneFrame::new(child)));
                continue;
            }
            let finished = current.finish();
            match pending.pop() {
                Some(mut parent) => {
                    parent.children.push(finished);
                    current = parent;
                }
                None => return finished,
            }
        }
    }
}
/// A node being cloned, along with the copies of the children finished so far.
struct CloneFrame<'a, T> {
    source: &'a Tree<T>,
    children: Vec<Tree<T>>,
}
impl<'a, T: Clone> CloneFrame<'a, T> {
    fn new(source: &'a Tree<T>) -> Self {
        Self {
            source,
            children: Vec::with_capacity(source.children.len()),
        }
    }
    fn finish(self) -> Tree<T> {
        Tree {
            label: self.source.label.clone(),
            children: self.children,
        }
    }
}
impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        // Detached nodes are dropped with an empty child list.
        let mut pending = mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
impl<T> From<T> for Tree<T> {
    #[inline(always)]
    fn from(label: T) -> Self {
        Self::leaf(label)
    }
}
impl<T> Extend<Tree<T>> for Tree<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = Tree<T>>>(&mut self, iter: I) {
        self.children.extend(iter)
    }
}
impl<T: Default> FromIterator<Tree<T>> for Tree<T> {
    /// Collects the trees as children of a node with the default label.
    #[inline]
    fn from_iter<I: IntoIterator<Item = Tree<T>>>(iter: I) -> Self {
        Self::with_children(T::default(), iter)
    }
}
impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a Tree<T>;
    type IntoIter = PreOrder<'a, T>;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
/// Formats the tree as an s-expression: leaves print as their label, branches as `(label child...)`.
impl<T: Display> Display for Tree<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.children.is_empty() {
            return Display::fmt(&self.label, f);
        }
        write!(f, "({}", self.label)?;
        for child in &self.children {
            write!(f, " {}", child)?;
        }
        f.write_str(")")
    }
}

/// The error type returned by methods on [`Tree`] which address a child by its index, produced when the index is not smaller than the number of children.
///
/// [`Tree`]: struct.Tree.html " "
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("child index {index} is out of bounds for a node with {len} children")]
pub struct IndexOutOfBounds {
    /// The index which was requested.
    pub index: usize,
    /// The number of children the node had at the time.
    pub len: usize,
}
