//! Load balancing across discovered service instances
//!
//! A [`LoadBalanceAlgorithm`] picks one instance out of the candidates a
//! discovery collaborator returned. New policies are added as new
//! implementations of the trait.

mod random;

pub use random::RandomAlgorithm;

use crate::{DiscoveryError, Result, ServiceInstance};
use std::sync::Arc;

/// Strategy for choosing one instance from a set of candidates
pub trait LoadBalanceAlgorithm: Send + Sync {
    /// Choose one of `instances`
    ///
    /// Fails with [`DiscoveryError::InvalidArgument`] when `instances` is empty.
    fn choose<'a>(&self, instances: &'a [ServiceInstance]) -> Result<&'a ServiceInstance>;

    /// Strategy name, for logs
    fn name(&self) -> &'static str;

    /// Choose from any sequence of instances, consuming it once
    fn choose_from<I>(&self, instances: I) -> Result<ServiceInstance>
    where
        I: IntoIterator<Item = ServiceInstance>,
        Self: Sized,
    {
        let mut iter = instances.into_iter();
        let first = iter.next().ok_or_else(no_instances)?;

        let mut list = Vec::with_capacity(iter.size_hint().0 + 1);
        list.push(first);
        list.extend(iter);

        self.choose(&list).cloned()
    }
}

pub(crate) fn no_instances() -> DiscoveryError {
    DiscoveryError::invalid_argument("at least one service instance is required")
}

impl<T: LoadBalanceAlgorithm + ?Sized> LoadBalanceAlgorithm for Arc<T> {
    fn choose<'a>(&self, instances: &'a [ServiceInstance]) -> Result<&'a ServiceInstance> {
        (**self).choose(instances)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: LoadBalanceAlgorithm + ?Sized> LoadBalanceAlgorithm for Box<T> {
    fn choose<'a>(&self, instances: &'a [ServiceInstance]) -> Result<&'a ServiceInstance> {
        (**self).choose(instances)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
