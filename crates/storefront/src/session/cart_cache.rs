use std::time::Duration;

use moka::sync::Cache;

use super::CartCache;
use crate::api::Cart;

/// How long a fetched cart is served without going back to the API.
pub const CART_TTL: Duration = Duration::from_secs(30);

/// Single-slot in-memory cart cache.
#[derive(Clone)]
pub struct MemoryCartCache {
    cache: Cache<(), Cart>,
}

impl MemoryCartCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(CART_TTL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }
}

impl Default for MemoryCartCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CartCache for MemoryCartCache {
    fn get(&self) -> Option<Cart> {
        self.cache.get(&())
    }

    fn set(&self, cart: Cart) {
        self.cache.insert((), cart);
    }

    fn invalidate(&self) {
        self.cache.invalidate(&());
    }
}
