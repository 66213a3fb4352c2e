use tracing::warn;
use super::RewriteError;

/// Optional limits guarding a rewrite against runaway rule sets.
///
/// By default no limits are set: a `RepeatTransform` loop on a label that never changes policy runs forever, and nesting depth is only bounded by the input tree (and, for the recursive rewriter, by the call stack). Configuring a limit turns those hazards into a [`RewriteError`].
///
/// # Example
/// ```rust
/// use arbor_rewrite::RewriteConfig;
///
/// let config = RewriteConfig::new()
///     .with_repeat_limit(64)
///     .with_depth_limit(1024);
/// assert_eq!(config.repeat_limit(), Some(64));
/// assert_eq!(config.depth_limit(), Some(1024));
/// assert_eq!(RewriteConfig::default(), RewriteConfig::UNLIMITED);
/// ```
///
/// [`RewriteError`]: enum.RewriteError.html " "
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RewriteConfig {
    repeat_limit: Option<usize>,
    depth_limit: Option<usize>,
}
impl RewriteConfig {
    /// A configuration without any limits. Same as `RewriteConfig::default()`.
    pub const UNLIMITED: Self = Self {
        repeat_limit: None,
        depth_limit: None,
    };

    /// Creates a configuration without any limits.
    #[inline(always)]
    pub const fn new() -> Self {
        Self::UNLIMITED
    }
    /// Limits the number of consecutive `RepeatTransform` transform calls on a single node. A limit of zero forbids `RepeatTransform` entirely.
    #[inline(always)]
    pub const fn with_repeat_limit(self, limit: usize) -> Self {
        Self {
            repeat_limit: Some(limit),
            ..self
        }
    }
    /// Limits how deep the engine descends into children, with the root at depth 0. A limit of zero only allows rewriting the root itself.
    #[inline(always)]
    pub const fn with_depth_limit(self, limit: usize) -> Self {
        Self {
            depth_limit: Some(limit),
            ..self
        }
    }
    /// Returns the configured repeat limit, if any.
    #[inline(always)]
    pub const fn repeat_limit(&self) -> Option<usize> {
        self.repeat_limit
    }
    /// Returns the configured depth limit, if any.
    #[inline(always)]
    pub const fn depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }

    /// Fails if `repeats` consecutive transform calls would exceed the repeat limit.
    pub(crate) fn check_repeat<E>(&self, repeats: usize) -> Result<(), RewriteError<E>> {
        match self.repeat_limit {
            Some(limit) if repeats > limit => {
                warn!(limit, "repeat limit exceeded");
                Err(RewriteError::RepeatLimitExceeded { limit })
            }
            _ => Ok(()),
        }
    }
    /// Fails if a child at `depth` would exceed the depth limit.
    pub(crate) fn check_depth<E>(&self, depth: usize) -> Result<(), RewriteError<E>> {
        match self.depth_limit {
            Some(limit) if depth > limit => {
                warn!(limit, "depth limit exceeded");
                Err(RewriteError::DepthLimitExceeded { limit })
            }
            _ => Ok(()),
        }
    }
}
