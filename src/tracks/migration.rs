/// Relocation of inline track audio into keyed storage
///
/// A pass walks the user's collection in order and stores every inline,
/// unmigrated payload under `track_audio_<id>`. A stored track has its
/// reference rewritten to `stored:<key>`; a track whose payload could not be
/// stored keeps its inline data and is flagged as streaming. The collection
/// is written back once, at the end, and only if a track changed.
use std::collections::HashSet;
use std::sync::Arc;

use cadenza_core::keys::{stored_reference, track_audio_key, tracks_key};
use cadenza_core::{MigrationReport, MigrationStats};
use cadenza_storage::{KeyValueStore, StorageAccountant};
use tracing::{debug, info, warn};

use super::model::{parse_collection, TrackRecord};

#[derive(Clone)]
pub struct MigrationService {
    accountant: Arc<StorageAccountant>,
}

impl MigrationService {
    pub fn new(accountant: Arc<StorageAccountant>) -> Self {
        Self { accountant }
    }

    /// The user's track collection. Missing or unreadable collections are empty.
    pub fn load_tracks(&self, user_id: &str) -> Vec<TrackRecord> {
        let key = tracks_key(user_id);
        let bytes = match self.accountant.substrate().get(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return Vec::new();
            }
        };

        parse_collection(&bytes).unwrap_or_else(|| {
            warn!("Ignoring unparseable track collection {}", key);
            Vec::new()
        })
    }

    fn save_tracks(&self, user_id: &str, tracks: &[TrackRecord]) -> bool {
        let key = tracks_key(user_id);
        let bytes = match serde_json::to_vec(tracks) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode track collection {}: {}", key, e);
                return false;
            }
        };

        match self.accountant.substrate().set(&key, &bytes) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to rewrite track collection {}: {}", key, e);
                false
            }
        }
    }

    pub async fn migrate_user_tracks(&self, user_id: &str) -> MigrationReport {
        let mut tracks = self.load_tracks(user_id);
        let mut report = MigrationReport::default();
        let mut changed = false;

        let mut written = HashSet::new();

        for track in tracks.iter_mut() {
            if !track.needs_migration() {
                continue;
            }

            migrate_track(&self.accountant, track, &mut written, &mut report);
            changed = true;

            tokio::task::yield_now().await;
        }

        if changed && !self.save_tracks(user_id, &tracks) {
            // Payloads already written are overwritten in place on the next pass
            warn!(
                "Migration of {} stored {} payloads but the collection was not updated",
                user_id, report.migrated
            );
        }

        info!(
            "Migrated {} tracks for {} ({} failed, {} bytes)",
            report.migrated, user_id, report.failed, report.total_size
        );
        report
    }

    pub fn check_migration_needed(&self, user_id: &str) -> bool {
        self.load_tracks(user_id)
            .iter()
            .any(TrackRecord::needs_migration)
    }

    /// Dry run over the collection; writes nothing
    pub fn get_migration_stats(&self, user_id: &str) -> MigrationStats {
        let tracks = self.load_tracks(user_id);
        let pending: Vec<&TrackRecord> = tracks.iter().filter(|t| t.needs_migration()).collect();

        MigrationStats {
            total_tracks: tracks.len(),
            needs_migration: pending.len(),
            estimated_size: pending
                .iter()
                .filter_map(|t| t.inline_payload())
                .map(|payload| payload.len() as u64)
                .sum(),
        }
    }

    pub async fn emergency_migration(&self, user_id: &str) -> bool {
        warn!("Running emergency migration for {}", user_id);
        self.migrate_user_tracks(user_id).await.migrated > 0
    }
}

/// Store one track's inline payload and update the record.
///
/// A track without a usable id, or whose id maps to a key already written in
/// this pass, keeps its inline data and streams.
fn migrate_track(
    accountant: &StorageAccountant,
    track: &mut TrackRecord,
    written: &mut HashSet<String>,
    report: &mut MigrationReport,
) {
    let Some(payload) = track.inline_payload() else {
        return;
    };
    let size = payload.len() as u64;
    report.total_size += size;

    let key = match track.track_id() {
        Some(track_id) => track_audio_key(&track_id),
        None => {
            warn!("Inline track without a usable id falls back to streaming");
            fall_back_to_streaming(track, report);
            return;
        }
    };
    if written.contains(&key) {
        warn!("{} was already written in this pass, streaming the duplicate", key);
        fall_back_to_streaming(track, report);
        return;
    }

    let outcome = accountant.store_detailed(&key, payload.as_bytes());
    if outcome.is_stored() {
        debug!("Moved {} bytes of inline audio to {}", size, key);
        written.insert(key.clone());
        track.audio_url = Some(stored_reference(&key));
        track.audio_key = Some(key);
        track.audio_size = Some(size);
        track.is_streaming = Some(false);
        report.migrated += 1;
    } else {
        info!("{} falls back to streaming: {:?}", key, outcome);
        fall_back_to_streaming(track, report);
    }
}

fn fall_back_to_streaming(track: &mut TrackRecord, report: &mut MigrationReport) {
    track.is_streaming = Some(true);
    report.failed += 1;
}
