//! Interceptor registry.
//!
//! An ordered arena of (fulfillment, rejection) handler pairs. Slots are
//! tombstoned on removal instead of compacted, so an [`InterceptorId`] stays
//! valid across unrelated registrations and removals. Each client owns two
//! managers with the same implementation: one over outgoing configs, one over
//! incoming responses.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Fulfillment handler: receives the previous link's resolved value.
pub type FulfilledFn<T> = Arc<dyn Fn(T) -> Result<T> + Send + Sync>;

/// Rejection handler: receives the previous link's rejection and may recover
/// by returning `Ok`.
pub type RejectedFn<T> = Arc<dyn Fn(Error) -> Result<T> + Send + Sync>;

/// One registered handler pair.
pub struct Interceptor<T> {
    pub(crate) fulfilled: FulfilledFn<T>,
    pub(crate) rejected: Option<RejectedFn<T>>,
}

impl<T> Clone for Interceptor<T> {
    fn clone(&self) -> Self {
        Self {
            fulfilled: Arc::clone(&self.fulfilled),
            rejected: self.rejected.as_ref().map(Arc::clone),
        }
    }
}

impl<T> fmt::Debug for Interceptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("has_rejected", &self.rejected.is_some())
            .finish()
    }
}

/// Stable handle returned by [`InterceptorManager::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptorId(usize);

/// Ordered, independently-removable registry of interceptors.
pub struct InterceptorManager<T> {
    slots: Vec<Option<Interceptor<T>>>,
}

impl<T> Default for InterceptorManager<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> InterceptorManager<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fulfillment handler with no rejection handler.
    pub fn register<F>(&mut self, fulfilled: F) -> InterceptorId
    where
        F: Fn(T) -> Result<T> + Send + Sync + 'static,
    {
        self.push(Interceptor {
            fulfilled: Arc::new(fulfilled),
            rejected: None,
        })
    }

    /// Registers a fulfillment/rejection handler pair.
    pub fn register_with_rejected<F, R>(&mut self, fulfilled: F, rejected: R) -> InterceptorId
    where
        F: Fn(T) -> Result<T> + Send + Sync + 'static,
        R: Fn(Error) -> Result<T> + Send + Sync + 'static,
    {
        self.push(Interceptor {
            fulfilled: Arc::new(fulfilled),
            rejected: Some(Arc::new(rejected)),
        })
    }

    fn push(&mut self, interceptor: Interceptor<T>) -> InterceptorId {
        self.slots.push(Some(interceptor));
        InterceptorId(self.slots.len() - 1)
    }

    /// Tombstones the record behind `id`. Other records keep their positions
    /// and handles. Returns `false` if the id was already removed or unknown.
    pub fn remove(&mut self, id: InterceptorId) -> bool {
        match self.slots.get_mut(id.0) {
            Some(slot @ Some(_)) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Visits live records in registration order, skipping tombstones.
    pub fn for_each(&self, mut visit: impl FnMut(&Interceptor<T>)) {
        for interceptor in self.slots.iter().flatten() {
            visit(interceptor);
        }
    }

    /// Clones the live records, in registration order, for one execution.
    pub(crate) fn snapshot(&self) -> Vec<Interceptor<T>> {
        self.slots.iter().flatten().cloned().collect()
    }

    /// Number of live (non-removed) records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Returns `true` if no live records remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> fmt::Debug for InterceptorManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorManager")
            .field("live", &self.len())
            .field("slots", &self.slots.len())
            .finish()
    }
}
