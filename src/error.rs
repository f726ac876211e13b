use std::collections::TryReserveError;
use std::fmt;

use thiserror::Error;

/// Returned by [`SmallVector::try_push`](crate::SmallVector::try_push) when the storage
/// could not grow. Hands the rejected value back to the caller.
#[derive(Error)]
#[error("failed to grow SmallVector storage: {source}")]
pub struct TryPushError<T> {
    value: T,
    #[source]
    source: TryReserveError,
}

impl<T> TryPushError<T> {
    pub(crate) fn new(value: T, source: TryReserveError) -> Self {
        Self { value, source }
    }

    /// The value that was not appended.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the error, returning the value that was not appended.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// The allocation error that caused the failure.
    pub fn reserve_error(&self) -> &TryReserveError {
        &self.source
    }
}

impl<T> fmt::Debug for TryPushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryPushError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
