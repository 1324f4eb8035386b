/// Integration tests for track migration through the audio store service
use std::sync::Arc;

use cadenza::{AudioReference, AudioStore, TrackRecord};
use cadenza_core::{CapacityBudget, MigrationReport};
use cadenza_storage::{KeyValueStore, ManualClock, MemoryStore};
use cadenza_test::{
    audio_data_uri, init_test_logging, inline_track, seed_tracks, stored_track, streaming_track,
    FlakyStore,
};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn service_over(substrate: Arc<dyn KeyValueStore>) -> AudioStore {
    init_test_logging();
    AudioStore::with_clock(
        substrate,
        CapacityBudget::default(),
        Arc::new(ManualClock::new(1_700_000_000_000)),
    )
}

fn collection(store: &dyn KeyValueStore, user: &str) -> Vec<Value> {
    let bytes = store.get(&format!("tracks_{}", user)).unwrap().unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_migration_moves_inline_audio() {
    let substrate = Arc::new(MemoryStore::unbounded());
    let store = service_over(substrate.clone());
    let original = vec![
        inline_track(1, 4_096),
        stored_track(2),
        inline_track(3, 1_024),
        streaming_track(4, "https://cdn.example/4.mp3"),
    ];
    seed_tracks(substrate.as_ref(), "alice", &original);

    assert!(store.check_migration_needed("alice"));
    let stats = store.get_migration_stats("alice");
    assert_eq!(stats.total_tracks, 4);
    assert_eq!(stats.needs_migration, 2);
    assert_eq!(stats.estimated_size, 4_096 + 1_024);

    let report = store.migrate_user_tracks("alice").await;
    assert_eq!(
        report,
        MigrationReport {
            migrated: 2,
            failed: 0,
            total_size: 4_096 + 1_024,
        }
    );

    let tracks = collection(substrate.as_ref(), "alice");
    assert_eq!(tracks[0]["audioUrl"], "stored:track_audio_1");
    assert_eq!(tracks[0]["audioKey"], "track_audio_1");
    assert_eq!(tracks[0]["isStreaming"], false);
    // Fields owned by the application survive the rewrite
    assert_eq!(tracks[0]["title"], original[0]["title"]);
    assert_eq!(tracks[0]["artist"], original[0]["artist"]);
    assert_eq!(tracks[1], original[1]);
    assert_eq!(tracks[3], original[3]);

    // The stored payload is exactly the inline one
    let payload = store.get_audio_safely("track_audio_3").unwrap();
    assert_eq!(Value::String(String::from_utf8(payload).unwrap()), original[2]["audioUrl"]);
}

#[tokio::test]
async fn test_second_migration_is_a_no_op() {
    let substrate = Arc::new(MemoryStore::unbounded());
    let store = service_over(substrate.clone());
    seed_tracks(
        substrate.as_ref(),
        "bob",
        &[inline_track(10, 512), inline_track(11, 512)],
    );

    assert_eq!(store.migrate_user_tracks("bob").await.migrated, 2);
    let after_first = collection(substrate.as_ref(), "bob");

    let second = store.migrate_user_tracks("bob").await;
    assert_eq!(second.migrated, 0);
    assert_eq!(second.failed, 0);
    assert_eq!(collection(substrate.as_ref(), "bob"), after_first);
    assert!(!store.check_migration_needed("bob"));
}

#[tokio::test]
async fn test_failed_store_falls_back_to_streaming() {
    let substrate = Arc::new(FlakyStore::new());
    let store = service_over(substrate.clone());
    let original = inline_track(5, 2_048);
    seed_tracks(substrate.as_ref(), "carol", &[original.clone()]);
    substrate.reject_writes_with_prefix("track_audio_");

    let report = store.migrate_user_tracks("carol").await;
    assert_eq!(report.migrated, 0);
    assert_eq!(report.failed, 1);

    let tracks = collection(substrate.as_ref(), "carol");
    assert_eq!(tracks[0]["isStreaming"], true);
    // No data loss: the inline payload is still attached
    assert_eq!(tracks[0]["audioUrl"], original["audioUrl"]);
    assert_eq!(store.get_audio_safely("track_audio_5"), None);

    // Streaming is terminal for the pass that chose it
    assert!(!store.check_migration_needed("carol"));
    assert_eq!(store.migrate_user_tracks("carol").await.failed, 0);
}

#[tokio::test]
async fn test_oversize_track_streams_and_others_migrate() {
    let substrate = Arc::new(MemoryStore::unbounded());
    let store = service_over(substrate.clone());
    seed_tracks(
        substrate.as_ref(),
        "dave",
        &[inline_track(1, 11 * 1024 * 1024), inline_track(2, 2_048)],
    );

    let report = store.migrate_user_tracks("dave").await;
    assert_eq!(report.migrated, 1);
    assert_eq!(report.failed, 1);

    let tracks: Vec<TrackRecord> = collection(substrate.as_ref(), "dave")
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();
    assert!(tracks[0].is_streaming());
    assert!(tracks[0].inline_payload().is_some());
    assert!(tracks[1].is_stored());
}

#[tokio::test]
async fn test_emergency_migration_reports_progress() {
    let substrate = Arc::new(MemoryStore::unbounded());
    let store = service_over(substrate.clone());
    seed_tracks(substrate.as_ref(), "erin", &[inline_track(1, 256)]);

    assert!(store.emergency_migration("erin").await);
    assert!(!store.emergency_migration("erin").await);
}

#[tokio::test]
async fn test_migrated_references_resolve_to_stored_audio() {
    let substrate = Arc::new(MemoryStore::unbounded());
    let store = service_over(substrate.clone());
    seed_tracks(substrate.as_ref(), "frank", &[inline_track(9, 600)]);
    store.migrate_user_tracks("frank").await;

    let tracks = collection(substrate.as_ref(), "frank");
    let reference = tracks[0]["audioUrl"].as_str().unwrap();
    match store.resolve_audio_url(reference) {
        Some(AudioReference::StoredKey(key)) => {
            assert_eq!(store.get_audio_safely(&key), Some(audio_data_uri(600).into_bytes()));
        }
        other => panic!("Expected a stored key, got {:?}", other),
    }
}
