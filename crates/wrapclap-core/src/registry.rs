//! Parameter lookup by id.
//!
//! The adapter resolves automation targets through the [`ParameterRegistry`]
//! trait. Lookups happen on the audio thread, so implementations must not
//! allocate or block.
//!
//! [`ParameterList`] is the stock implementation: an ordered list of
//! descriptors plus an id index built once at setup time.

use std::sync::Arc;

use fxhash::FxHashMap;

use crate::error::{AdapterError, AdapterResult};
use crate::parameter::ParameterDescriptor;
use crate::types::ParameterId;

/// Id-to-descriptor lookup used during event conversion.
pub trait ParameterRegistry: Send + Sync {
    /// Returns the descriptor for `id`, or `None` if it is unknown.
    ///
    /// Called on the audio thread. Must be lock-free and allocation-free.
    fn descriptor(&self, id: ParameterId) -> Option<&ParameterDescriptor>;
}

impl<R: ParameterRegistry + ?Sized> ParameterRegistry for Arc<R> {
    #[inline]
    fn descriptor(&self, id: ParameterId) -> Option<&ParameterDescriptor> {
        (**self).descriptor(id)
    }
}

/// Ordered collection of descriptors with constant-time id lookup.
#[derive(Debug, Clone, Default)]
pub struct ParameterList {
    descriptors: Vec<ParameterDescriptor>,
    by_id: FxHashMap<ParameterId, usize>,
}

impl ParameterList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from descriptors, keeping their order.
    ///
    /// Fails on the first repeated id.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ParameterDescriptor>,
    ) -> AdapterResult<Self> {
        let mut list = Self::new();
        for descriptor in descriptors {
            list.push(descriptor)?;
        }
        Ok(list)
    }

    /// Append a descriptor. Fails if its id is already present.
    pub fn push(&mut self, descriptor: ParameterDescriptor) -> AdapterResult<()> {
        let id = descriptor.id();
        if self.by_id.contains_key(&id) {
            return Err(AdapterError::DuplicateParameter { id });
        }
        self.by_id.insert(id, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns the descriptor at `index` in declaration order.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ParameterDescriptor> {
        self.descriptors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.descriptors.iter()
    }
}

impl ParameterRegistry for ParameterList {
    #[inline]
    fn descriptor(&self, id: ParameterId) -> Option<&ParameterDescriptor> {
        self.by_id.get(&id).map(|&index| &self.descriptors[index])
    }
}
