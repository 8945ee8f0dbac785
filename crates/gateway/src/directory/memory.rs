//! In-memory [`CustomerDirectory`] backed by a lock-free snapshot.

use std::{collections::HashMap, sync::Arc};

use arc_swap::ArcSwap;
use tracing::warn;

use super::{CustomerDirectory, CustomerRecord};
use crate::phone::PhoneKey;

/// Customer directory keyed by [`PhoneKey`].
///
/// Internally backed by [`ArcSwap`] so readers never block and the background
/// refresh task can atomically swap in a completely new map.
#[derive(Clone, Debug)]
pub struct InMemoryDirectory {
    inner: Arc<ArcSwap<HashMap<PhoneKey, CustomerRecord>>>,
}

impl InMemoryDirectory {
    /// Create a new, empty directory.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::new(Arc::new(HashMap::new()))),
        }
    }

    /// Atomically replace every customer.
    ///
    /// When two records share a phone key the later one wins.
    pub fn replace_all(&self, customers: Vec<CustomerRecord>) {
        let mut map = HashMap::with_capacity(customers.len());
        for customer in customers {
            let phone = customer.phone.clone();
            if let Some(previous) = map.insert(phone, customer) {
                warn!(
                    replaced = %previous.id,
                    "duplicate phone key in customer data; keeping the later record"
                );
            }
        }
        self.inner.store(Arc::new(map));
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerDirectory for InMemoryDirectory {
    fn find_by_phone(&self, phone: &PhoneKey) -> Option<CustomerRecord> {
        self.inner.load().get(phone).cloned()
    }

    fn customer_count(&self) -> usize {
        self.inner.load().len()
    }
}
