/// The audio store service
///
/// One explicit value wires the substrate, accountant and migration together
/// and exposes the entry points callers use. No entry point returns an error:
/// a failure shows up as `stored == false` or an empty result, and the caller
/// falls back to streaming from the original source.
use std::sync::Arc;

use cadenza_core::{
    CadenzaResult, CapacityBudget, CleanupReport, Config, MigrationReport, MigrationStats,
    StorageInfo, StoreResult,
};
use cadenza_storage::{open_substrate, Clock, KeyValueStore, StorageAccountant, StoreOutcome};
use tracing::debug;

use crate::tracks::{AudioReference, MigrationService};

#[derive(Clone)]
pub struct AudioStore {
    accountant: Arc<StorageAccountant>,
    migration: MigrationService,
}

impl AudioStore {
    pub fn new(substrate: Arc<dyn KeyValueStore>, budget: CapacityBudget) -> Self {
        Self::from_accountant(StorageAccountant::new(substrate, budget))
    }

    pub fn with_clock(
        substrate: Arc<dyn KeyValueStore>,
        budget: CapacityBudget,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::from_accountant(StorageAccountant::with_clock(substrate, budget, clock))
    }

    /// Open the configured substrate and build the service over it
    pub fn open(config: &Config) -> CadenzaResult<Self> {
        let substrate = open_substrate(&config.substrate)?;
        debug!(
            "Opened {:?} substrate with a {} byte budget",
            config.substrate.backend, config.budget.max_storage_size
        );
        Ok(Self::new(substrate, config.budget))
    }

    fn from_accountant(accountant: StorageAccountant) -> Self {
        let accountant = Arc::new(accountant);
        Self {
            migration: MigrationService::new(accountant.clone()),
            accountant,
        }
    }

    pub fn accountant(&self) -> &StorageAccountant {
        &self.accountant
    }

    pub fn migration(&self) -> &MigrationService {
        &self.migration
    }

    pub fn store_audio_safely(&self, key: &str, payload: &[u8]) -> StoreResult {
        StoreResult::from_stored(self.accountant.store(key, payload))
    }

    /// Like [`store_audio_safely`](Self::store_audio_safely), with the reason
    /// a payload was refused
    pub fn store_audio_detailed(&self, key: &str, payload: &[u8]) -> StoreOutcome {
        self.accountant.store_detailed(key, payload)
    }

    pub fn get_audio_safely(&self, key: &str) -> Option<Vec<u8>> {
        self.accountant.get(key)
    }

    pub fn remove_audio_safely(&self, key: &str) {
        self.accountant.delete(key)
    }

    pub fn get_storage_info(&self) -> StorageInfo {
        self.accountant.stats().into()
    }

    pub async fn migrate_user_tracks(&self, user_id: &str) -> MigrationReport {
        self.migration.migrate_user_tracks(user_id).await
    }

    pub fn check_migration_needed(&self, user_id: &str) -> bool {
        self.migration.check_migration_needed(user_id)
    }

    pub fn get_migration_stats(&self, user_id: &str) -> MigrationStats {
        self.migration.get_migration_stats(user_id)
    }

    pub async fn emergency_migration(&self, user_id: &str) -> bool {
        self.migration.emergency_migration(user_id).await
    }

    /// Classify a track reference; `None` when it cannot be played
    pub fn resolve_audio_url(&self, reference: &str) -> Option<AudioReference> {
        Some(AudioReference::resolve(reference)).filter(AudioReference::is_resolvable)
    }

    /// Free at least `required_bytes * 1.2` bytes if that many are evictable
    pub fn cleanup(&self, required_bytes: u64) -> CleanupReport {
        self.accountant.cleanup().perform_cleanup(required_bytes)
    }

    pub fn emergency_cleanup(&self) -> CleanupReport {
        self.accountant.cleanup().emergency_cleanup()
    }
}
