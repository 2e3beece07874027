use super::Error;

/// Error reported by a [`Store`](crate::store::Store) implementation.
#[derive(Debug)]
pub(super) struct StoreError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a store backend error.
    ///
    /// Store implementations use this to surface their own failures (I/O,
    /// constraint violations, failed commits) through the mapper.
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Store(StoreError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error came from the store.
    pub fn is_store(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Store(_))
    }
}
