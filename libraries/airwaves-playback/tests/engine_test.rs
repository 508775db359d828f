//! Integration tests for the playback engine
//!
//! Every test drives the engine the way the command layer does: a catalog
//! passed by reference and monotonically increasing timestamps.

use airwaves_core::{Catalog, Collection, CollectionKind, Track, TrackId, User, Username};
use airwaves_playback::{
    PlaybackConfig, PlaybackEngine, PlaybackError, PlaybackEvent, PlaybackState, RepeatMode,
};
use std::time::Duration;

// ===== Test Helpers =====

fn track(name: &str, secs: u64) -> Track {
    Track::new(name, Duration::from_secs(secs)).unwrap()
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn alice() -> Username {
    Username::new("alice")
}

/// Catalog with one collection of the given kind and tracks
fn catalog_with(kind: CollectionKind, tracks: &[(&str, u64)]) -> (Catalog, airwaves_core::CollectionId) {
    let mut catalog = Catalog::new();
    catalog.add_user(User::new("alice", 23, "Bucharest")).unwrap();
    let collection = Collection::with_tracks(
        "Source",
        Username::new("owner"),
        kind,
        tracks.iter().map(|(n, d)| track(n, *d)).collect(),
    );
    let id = collection.id.clone();
    catalog.add_collection(collection).unwrap();
    (catalog, id)
}

/// Catalog with a single library track
fn catalog_with_track(name: &str, duration_secs: u64) -> (Catalog, TrackId) {
    let mut catalog = Catalog::new();
    let song = track(name, duration_secs);
    let id = song.id.clone();
    catalog.add_track(song);
    (catalog, id)
}

// ===== Loading =====

#[test]
fn loading_empty_playlist_keeps_prior_source() {
    let (mut catalog, album_id) = catalog_with(CollectionKind::Album, &[("A", 200), ("B", 100)]);
    let empty = Collection::new("Empty", Username::new("owner"), CollectionKind::Playlist);
    let empty_id = empty.id.clone();
    catalog.add_collection(empty).unwrap();

    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &album_id).unwrap();
    engine.advance_all(&catalog, 10);

    let err = engine
        .load_collection(&catalog, &alice(), &empty_id)
        .unwrap_err();
    assert_eq!(err, PlaybackError::EmptySource);

    // Prior session untouched, still 190s into A
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.track_name.as_deref(), Some("A"));
    assert_eq!(status.remaining, secs(190));
}

#[test]
fn load_replaces_prior_source_and_resets_everything() {
    let (catalog, id) = catalog_with(CollectionKind::Playlist, &[("A", 200), ("B", 100)]);

    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.repeat(&alice()).unwrap();
    engine.shuffle(&catalog, &alice(), 42).unwrap();
    engine.advance_all(&catalog, 120);

    engine.load_collection(&catalog, &alice(), &id).unwrap();
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.track_name.as_deref(), Some("A"));
    assert_eq!(status.remaining, secs(200));
    assert_eq!(status.repeat, RepeatMode::NoRepeat);
    assert!(!status.shuffle);
    assert_eq!(status.state, PlaybackState::Playing);
}

#[test]
fn load_unknown_reference_fails() {
    let (catalog, _) = catalog_with(CollectionKind::Album, &[("A", 10)]);
    let mut engine = PlaybackEngine::default();
    let err = engine
        .load_collection(&catalog, &alice(), &airwaves_core::CollectionId::generate())
        .unwrap_err();
    assert_eq!(err, PlaybackError::SourceNotFound);
}

// ===== Advancing and the completion policy =====

#[test]
fn advance_spans_multiple_tracks_in_one_delta() {
    // Worked example from the design discussion: [A:200, B:100], NoRepeat
    let (catalog, id) = catalog_with(CollectionKind::Album, &[("A", 200), ("B", 100)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();

    engine.advance_all(&catalog, 250);
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.track_name.as_deref(), Some("B"));
    assert_eq!(status.remaining, secs(50));

    engine.advance_all(&catalog, 300);
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.state, PlaybackState::Stopped);
    assert_eq!(status.remaining, Duration::ZERO);
    assert_eq!(status.track_name, None);
}

#[test]
fn no_repeat_boundary_at_total_duration() {
    let tracks = [("A", 120), ("B", 60), ("C", 120)];
    let total: u64 = tracks.iter().map(|(_, d)| d).sum();

    // Advancing by exactly the total duration stops the session
    let (catalog, id) = catalog_with(CollectionKind::Album, &tracks);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, total);
    assert_eq!(engine.status(&catalog, &alice()).state, PlaybackState::Stopped);

    // One second less leaves the last track with one second remaining
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, total - 1);
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.track_name.as_deref(), Some("C"));
    assert_eq!(status.remaining, secs(1));
}

#[test]
fn repeat_all_is_periodic() {
    let tracks = [("A", 70), ("B", 30), ("C", 50)];
    let total: u64 = tracks.iter().map(|(_, d)| d).sum();
    let extra = 85;

    let (catalog, id) = catalog_with(CollectionKind::Playlist, &tracks);

    let mut looped = PlaybackEngine::default();
    looped.load_collection(&catalog, &alice(), &id).unwrap();
    looped.repeat(&alice()).unwrap(); // RepeatAll
    looped.advance_all(&catalog, total + extra);

    let mut direct = PlaybackEngine::default();
    direct.load_collection(&catalog, &alice(), &id).unwrap();
    direct.repeat(&alice()).unwrap();
    direct.advance_all(&catalog, extra);

    assert_eq!(
        looped.status(&catalog, &alice()),
        direct.status(&catalog, &alice())
    );
}

#[test]
fn repeat_once_allows_exactly_one_extra_pass() {
    let tracks = [("A", 40), ("B", 60)];
    let total: u64 = tracks.iter().map(|(_, d)| d).sum();
    let (catalog, id) = catalog_with(CollectionKind::Playlist, &tracks);

    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.repeat(&alice()).unwrap(); // RepeatAll
    engine.repeat(&alice()).unwrap(); // RepeatOnce

    // First exhaustion wraps back to A for the bonus pass
    engine.advance_all(&catalog, total);
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.track_name.as_deref(), Some("A"));
    assert_eq!(status.remaining, secs(40));

    // Second exhaustion stops; a third pass never happens
    engine.advance_all(&catalog, 2 * total);
    assert_eq!(engine.status(&catalog, &alice()).state, PlaybackState::Stopped);
}

#[test]
fn repeat_once_spanning_both_passes_in_one_delta() {
    let (catalog, id) = catalog_with(CollectionKind::Playlist, &[("A", 40), ("B", 60)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.repeat(&alice()).unwrap();
    engine.repeat(&alice()).unwrap(); // RepeatOnce

    // 100 (first pass) + 100 (bonus pass) consumed in a single delta
    engine.advance_all(&catalog, 230);
    assert_eq!(engine.status(&catalog, &alice()).state, PlaybackState::Stopped);
}

#[test]
fn repeat_current_song_wraps_modulo_duration() {
    let (catalog, id) = catalog_with_track("Loop", 30);
    let mut engine = PlaybackEngine::default();
    engine.load_track(&catalog, &alice(), &id).unwrap();
    assert_eq!(engine.repeat(&alice()).unwrap(), RepeatMode::RepeatCurrentSong);

    // remaining = 30 - (95 mod 30)
    engine.advance_all(&catalog, 95);
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.track_name.as_deref(), Some("Loop"));
    assert_eq!(status.remaining, secs(30 - 95 % 30));
}

#[test]
fn repeat_infinite_survives_huge_deltas() {
    let (catalog, id) = catalog_with_track("Loop", 30);
    let mut engine = PlaybackEngine::default();
    engine.load_track(&catalog, &alice(), &id).unwrap();
    engine.repeat(&alice()).unwrap();
    assert_eq!(engine.repeat(&alice()).unwrap(), RepeatMode::RepeatInfinite);

    let big = 1_000_007;
    engine.advance_all(&catalog, big);
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.remaining, secs(30 - big % 30));
}

#[test]
fn single_track_no_repeat_just_stops() {
    let (catalog, id) = catalog_with_track("Once", 30);
    let mut engine = PlaybackEngine::default();
    engine.load_track(&catalog, &alice(), &id).unwrap();

    engine.advance_all(&catalog, 30);
    assert_eq!(engine.status(&catalog, &alice()).state, PlaybackState::Stopped);
}

// ===== Time handling =====

#[test]
fn zero_delta_changes_nothing() {
    let (catalog, id) = catalog_with(CollectionKind::Album, &[("A", 200)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, 50);

    let before = engine.status(&catalog, &alice());
    engine.advance_all(&catalog, 50);
    assert_eq!(engine.status(&catalog, &alice()), before);
}

#[test]
fn time_never_moves_backward() {
    let (catalog, id) = catalog_with(CollectionKind::Album, &[("A", 200)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, 100);

    let before = engine.status(&catalog, &alice());
    engine.advance_all(&catalog, 40); // out of order
    assert_eq!(engine.status(&catalog, &alice()), before);
    assert_eq!(engine.last_timestamp(), 100);
}

#[test]
fn pause_freezes_remaining_time() {
    let (catalog, id) = catalog_with(CollectionKind::Album, &[("A", 200)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, 30);

    assert_eq!(engine.play_pause(&alice()).unwrap(), PlaybackState::Paused);
    engine.advance_all(&catalog, 500);
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.state, PlaybackState::Paused);
    assert_eq!(status.remaining, secs(170));

    assert_eq!(engine.play_pause(&alice()).unwrap(), PlaybackState::Playing);
    engine.advance_all(&catalog, 570);
    assert_eq!(engine.status(&catalog, &alice()).remaining, secs(100));
}

// ===== Shuffle =====

#[test]
fn shuffle_keeps_current_track_playing_and_is_deterministic() {
    let tracks = [("A", 10), ("B", 10), ("C", 10), ("D", 10), ("E", 10)];
    let (catalog, id) = catalog_with(CollectionKind::Playlist, &tracks);

    let run = |seed: u64| {
        let mut engine = PlaybackEngine::default();
        engine.load_collection(&catalog, &alice(), &id).unwrap();
        engine.repeat(&alice()).unwrap(); // RepeatAll so skipping wraps
        assert!(engine.shuffle(&catalog, &alice(), seed).unwrap());

        // Enabling shuffle never interrupts the running track
        let status = engine.status(&catalog, &alice());
        assert_eq!(status.track_name.as_deref(), Some("A"));
        assert!(status.shuffle);

        let mut order = vec![status.track_name.unwrap()];
        for _ in 1..tracks.len() {
            engine.skip_next(&catalog, &alice()).unwrap();
            order.push(engine.status(&catalog, &alice()).track_name.unwrap());
        }
        order
    };

    let first = run(42);
    assert_eq!(first, run(42), "same seed must give the same order");
    assert_eq!(first[0], "A");

    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["A", "B", "C", "D", "E"], "order is a permutation");
}

#[test]
fn disabling_shuffle_preserves_playing_track_identity() {
    let tracks = [("A", 10), ("B", 10), ("C", 10), ("D", 10), ("E", 10)];
    let (catalog, id) = catalog_with(CollectionKind::Playlist, &tracks);

    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.shuffle(&catalog, &alice(), 42).unwrap();
    engine.skip_next(&catalog, &alice()).unwrap();
    engine.skip_next(&catalog, &alice()).unwrap();

    let playing = engine.status(&catalog, &alice()).track_name;
    assert!(!engine.shuffle(&catalog, &alice(), 7).unwrap());
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.track_name, playing);
    assert!(!status.shuffle);
}

#[test]
fn shuffle_rejected_for_podcasts_and_single_tracks() {
    let (catalog, id) = catalog_with(CollectionKind::Podcast, &[("Ep 1", 1000), ("Ep 2", 900)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    assert_eq!(
        engine.shuffle(&catalog, &alice(), 42).unwrap_err(),
        PlaybackError::ShuffleUnsupported
    );

    let (catalog, track_id) = catalog_with_track("Single", 100);
    engine.load_track(&catalog, &alice(), &track_id).unwrap();
    assert_eq!(
        engine.shuffle(&catalog, &alice(), 42).unwrap_err(),
        PlaybackError::ShuffleUnsupported
    );
}

// ===== Skipping =====

#[test]
fn skip_next_follows_completion_policy_at_the_end() {
    let (catalog, id) = catalog_with(CollectionKind::Album, &[("A", 10), ("B", 10)]);

    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.skip_next(&catalog, &alice()).unwrap();
    assert_eq!(engine.status(&catalog, &alice()).track_name.as_deref(), Some("B"));
    engine.skip_next(&catalog, &alice()).unwrap();
    assert_eq!(engine.status(&catalog, &alice()).state, PlaybackState::Stopped);

    // Under RepeatAll the same skip wraps instead
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.repeat(&alice()).unwrap();
    engine.skip_next(&catalog, &alice()).unwrap();
    engine.skip_next(&catalog, &alice()).unwrap();
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.track_name.as_deref(), Some("A"));
    assert_eq!(status.remaining, secs(10));
}

#[test]
fn skip_prev_restarts_after_threshold_else_goes_back() {
    // Assumes the default 3s prev_restart_threshold; the boundary is a
    // configurable policy constant, not engine law.
    let (catalog, id) = catalog_with(CollectionKind::Album, &[("A", 200), ("B", 100)]);
    let mut engine = PlaybackEngine::new(PlaybackConfig::default());
    engine.load_collection(&catalog, &alice(), &id).unwrap();

    engine.advance_all(&catalog, 250); // 50s into B
    engine.skip_prev(&catalog, &alice()).unwrap();
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.track_name.as_deref(), Some("B"));
    assert_eq!(status.remaining, secs(100), "well into the track: restart");

    engine.skip_prev(&catalog, &alice()).unwrap();
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.track_name.as_deref(), Some("A"));
    assert_eq!(status.remaining, secs(200), "fresh track: go back");

    engine.skip_prev(&catalog, &alice()).unwrap();
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.track_name.as_deref(), Some("A"), "first track restarts");
    assert_eq!(status.remaining, secs(200));
}

#[test]
fn custom_prev_threshold_is_honored() {
    let (catalog, id) = catalog_with(CollectionKind::Album, &[("A", 200), ("B", 100)]);
    let mut engine = PlaybackEngine::new(PlaybackConfig {
        prev_restart_threshold: Duration::from_secs(60),
    });
    engine.load_collection(&catalog, &alice(), &id).unwrap();

    engine.advance_all(&catalog, 250); // 50s into B, below the 60s threshold
    engine.skip_prev(&catalog, &alice()).unwrap();
    assert_eq!(engine.status(&catalog, &alice()).track_name.as_deref(), Some("A"));
}

// ===== Errors and recovery =====

#[test]
fn operations_without_a_source_fail_cleanly() {
    let (catalog, _) = catalog_with(CollectionKind::Album, &[("A", 10)]);
    let mut engine = PlaybackEngine::default();

    assert_eq!(engine.play_pause(&alice()).unwrap_err(), PlaybackError::NoSource);
    assert_eq!(engine.repeat(&alice()).unwrap_err(), PlaybackError::NoSource);
    assert_eq!(
        engine.shuffle(&catalog, &alice(), 42).unwrap_err(),
        PlaybackError::NoSource
    );
    assert_eq!(
        engine.skip_next(&catalog, &alice()).unwrap_err(),
        PlaybackError::NoSource
    );
    assert_eq!(engine.status(&catalog, &alice()), airwaves_playback::PlaybackStatus::stopped());
}

#[test]
fn exhausted_session_rejects_transport_controls() {
    let (catalog, id) = catalog_with(CollectionKind::Album, &[("A", 10)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, 10);

    assert_eq!(engine.play_pause(&alice()).unwrap_err(), PlaybackError::InvalidState);
    assert_eq!(engine.repeat(&alice()).unwrap_err(), PlaybackError::InvalidState);
    assert_eq!(
        engine.skip_prev(&catalog, &alice()).unwrap_err(),
        PlaybackError::InvalidState
    );
}

#[test]
fn deleted_collection_stops_session_on_next_advance() {
    let (mut catalog, id) = catalog_with(CollectionKind::Playlist, &[("A", 200), ("B", 100)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, 10);

    catalog.remove_collection(&id).unwrap();

    // Pure status already reports stopped, without mutating
    assert_eq!(engine.status(&catalog, &alice()).state, PlaybackState::Stopped);

    // The real transition happens on the next advance, silently
    engine.advance_all(&catalog, 20);
    assert_eq!(engine.status(&catalog, &alice()).state, PlaybackState::Stopped);
    let events = engine.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::SourceInvalidated { username } if *username == alice())));
}

#[test]
fn deletion_notification_stops_sessions_immediately() {
    let (mut catalog, id) = catalog_with(CollectionKind::Playlist, &[("A", 200)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();

    let removed = catalog.remove_collection(&id).unwrap();
    engine.collection_removed(&removed.id);
    assert_eq!(engine.status(&catalog, &alice()).state, PlaybackState::Stopped);
}

#[test]
fn deleted_library_track_stops_single_track_session() {
    let (mut catalog, id) = catalog_with_track("Gone", 100);
    let mut engine = PlaybackEngine::default();
    engine.load_track(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, 10);

    catalog.remove_track(&id).unwrap();
    engine.advance_all(&catalog, 20);
    assert_eq!(engine.status(&catalog, &alice()).state, PlaybackState::Stopped);
}

#[test]
fn playlist_edit_under_cursor_restarts_at_that_position() {
    let (mut catalog, id) = catalog_with(CollectionKind::Playlist, &[("A", 200), ("B", 100), ("C", 50)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, 30); // 170s left in A

    // The catalog collaborator removes the playing track
    let a_id = catalog
        .collection(&id)
        .unwrap()
        .track_at(0)
        .unwrap()
        .id
        .clone();
    catalog.collection_mut(&id).unwrap().remove_track(&a_id);

    engine.advance_all(&catalog, 40);
    let status = engine.status(&catalog, &alice());
    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.track_name.as_deref(), Some("B"));
    assert_eq!(status.remaining, secs(90), "B restarted, then played 10s");
}

// ===== Events =====

#[test]
fn track_change_and_stop_events_are_recorded() {
    let (catalog, id) = catalog_with(CollectionKind::Album, &[("A", 100), ("B", 100)]);
    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();

    engine.advance_all(&catalog, 150);
    engine.advance_all(&catalog, 200);

    let events = engine.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::TrackChanged { username, .. } if *username == alice())));
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::SessionStopped { username } if *username == alice())));
    assert!(engine.drain_events().is_empty(), "drain empties the queue");
}

// ===== Multi-user =====

#[test]
fn advance_all_broadcasts_to_every_playing_session() {
    let (mut catalog, id) = catalog_with(CollectionKind::Album, &[("A", 200), ("B", 100)]);
    catalog.add_user(User::new("bob", 30, "Cluj")).unwrap();
    let bob = Username::new("bob");

    let mut engine = PlaybackEngine::default();
    engine.load_collection(&catalog, &alice(), &id).unwrap();
    engine.advance_all(&catalog, 100);
    engine.load_collection(&catalog, &bob, &id).unwrap();
    engine.play_pause(&bob).unwrap();

    engine.advance_all(&catalog, 150);
    assert_eq!(engine.status(&catalog, &alice()).remaining, secs(50));
    assert_eq!(
        engine.status(&catalog, &bob).remaining,
        secs(200),
        "paused session frozen"
    );
}
