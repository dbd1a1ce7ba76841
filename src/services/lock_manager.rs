use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::CityId;

/// One async mutex per city, created on first use.
///
/// Holding the guard serializes assignments for that city; other cities proceed
/// independently.
#[derive(Default)]
pub struct CityLockManager {
    locks: DashMap<CityId, Arc<Mutex<()>>>,
}

pub type CityGuard = OwnedMutexGuard<()>;

impl CityLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, city_id: CityId) -> CityGuard {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = self
            .locks
            .entry(city_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    pub fn tracked_cities(&self) -> usize {
        self.locks.len()
    }
}
