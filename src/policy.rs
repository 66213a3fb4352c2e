use core::fmt::{self, Formatter, Display};

/// How a single node is handled by a rewrite, as decided by the caller's `pick` function from the node's label.
///
/// The policy is consulted once per node. The only exception is [`RepeatTransform`], which re-consults it on every transform result.
///
/// [`RepeatTransform`]: #variant.RepeatTransform " "
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Keep the node as it is. Neither the node nor its children are visited any further, and `transform` is not called.
    Skip,
    /// Replace the node with `transform(node)`. The original children are *not* rewritten by the engine; descending into them is up to the transform function.
    Transform,
    /// Replace the node with `transform(node)`, then rewrite the result from scratch, picking a policy for its label again.
    ///
    /// The rewrite only terminates once `pick` returns some other policy for the current label. A label that keeps mapping to this policy loops forever unless a repeat limit is configured.
    RepeatTransform,
    /// Keep the label, rewrite every child and attach the results to a fresh node. `transform` is not called on the node itself.
    PassThrough,
    /// Rewrite every child first, attach the results to a fresh node with the original label, then replace that rebuilt node with `transform(rebuilt)`.
    PushDown,
    /// Call `transform(node)` first, then keep the label of the result and rewrite the *result's* children, attaching them to a fresh node.
    PullUp,
}
impl Policy {
    /// All policies, in declaration order.
    pub const ALL: [Policy; 6] = [
        Self::Skip,
        Self::Transform,
        Self::RepeatTransform,
        Self::PassThrough,
        Self::PushDown,
        Self::PullUp,
    ];

    /// Returns `true` if the policy calls `transform` on the node it is applied to, `false` otherwise.
    #[inline]
    pub const fn calls_transform(self) -> bool {
        !matches!(self, Self::Skip | Self::PassThrough)
    }
    /// Returns `true` if the engine itself rewrites children under this policy, `false` if the children are left to the transform function or kept as they are.
    #[inline]
    pub const fn descends(self) -> bool {
        matches!(self, Self::PassThrough | Self::PushDown | Self::PullUp)
    }
}
impl Display for Policy {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Skip => "skip",
            Self::Transform => "transform",
            Self::RepeatTransform => "repeat-transform",
            Self::PassThrough => "pass-through",
            Self::PushDown => "push-down",
            Self::PullUp => "pull-up",
        })
    }
}
