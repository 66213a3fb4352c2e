use core::convert::Infallible;
use crate::RewriteError;

/// How many rewrite frames fit on the lazy engine's stack before it spills to the heap.
#[cfg(feature = "smallvec")]
const INLINE_STACK_SIZE: usize = 8;

#[cfg(feature = "smallvec")]
pub(crate) type Stack<T> = smallvec::SmallVec<[T; INLINE_STACK_SIZE]>;
#[cfg(not(feature = "smallvec"))]
pub(crate) type Stack<T> = alloc::vec::Vec<T>;

/// Unwraps the result of a rewrite whose rules cannot fail and which runs without limits.
#[inline]
#[track_caller]
pub(crate) fn into_ok<T>(result: Result<T, RewriteError<Infallible>>) -> T {
    match result {
        Ok(value) => value,
        Err(RewriteError::Rule(never)) => match never {},
        Err(error) => unreachable!("unlimited rewrite failed: {}", error),
    }
}
