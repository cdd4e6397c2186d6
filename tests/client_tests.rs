//! Client cache and filter pipeline tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use subtrack::api::types::StreamerResponse;
use subtrack::client::{SortKey, StreamerCache, StreamerFilter, sort_streamers};
use subtrack::stats;
use subtrack::storage::{HistoryEntry, Platform};

fn streamer(id: &str, name: &str, platform: &str, counts: &[(i64, i64)]) -> StreamerResponse {
    StreamerResponse {
        id: id.into(),
        name: name.into(),
        platform: platform.into(),
        history: counts
            .iter()
            .map(|&(count, timestamp)| HistoryEntry { count, timestamp })
            .collect(),
    }
}

fn roster() -> Vec<StreamerResponse> {
    vec![
        streamer("1", "Ana", "YouTube", &[(1_000, 100), (5_000, 900)]),
        streamer("2", "Bogdan", "Twitch", &[(120_000, 500)]),
        streamer("3", "Cleo", "TikTok", &[(800, 200), (790, 700)]),
        streamer("4", "Dana", "Twitch", &[(42_000, 300)]),
    ]
}

#[test]
fn test_filter_then_sort_pipeline() {
    let cache = StreamerCache::new();
    cache.replace_all(roster());

    // Twitch only, at least 40k subs, biggest first
    let filter = StreamerFilter {
        platforms: Some([Platform::Twitch].into_iter().collect()),
        min_subs: Some(40_000),
        ..Default::default()
    };
    let mut view = filter.apply(&cache.snapshot());
    sort_streamers(&mut view, SortKey::Followers, true);

    let names: Vec<&str> = view.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Bogdan", "Dana"]);

    // The cache itself is untouched by filtering
    assert_eq!(cache.len(), 4);
}

#[test]
fn test_filter_change_requires_no_reload() {
    let cache = StreamerCache::new();
    let reloads = Arc::new(AtomicUsize::new(0));
    let reloads_clone = reloads.clone();
    cache.subscribe(move |_| {
        reloads_clone.fetch_add(1, Ordering::SeqCst);
    });

    cache.replace_all(roster());
    assert_eq!(reloads.load(Ordering::SeqCst), 1);

    // Different filters over the same snapshot: pure transforms, no
    // further notifications
    let snapshot = cache.snapshot();
    for needle in ["ana", "twitch", "tok", "zzz"] {
        let filter = StreamerFilter {
            search: Some(needle.into()),
            ..Default::default()
        };
        let _ = filter.apply(&snapshot);
    }
    assert_eq!(reloads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_optimistic_mutations_flow_into_rendered_stats() {
    let cache = StreamerCache::new();
    cache.replace_all(roster());

    // A new observation arrives for Cleo
    cache.append_entry(
        "3",
        HistoryEntry {
            count: 1_200,
            timestamp: 1_000,
        },
    );

    let cleo = cache.find("3").expect("cleo cached");
    assert_eq!(stats::latest_count(&cleo.history), 1_200);
    assert_eq!(stats::tracked_growth(&cleo.history), 400);

    // Dashboard summary reflects the patched mirror
    let summary = stats::summarize(&cache.snapshot());
    assert_eq!(summary.total_streamers, 4);
    assert_eq!(
        summary.total_subs,
        5_000 + 120_000 + 1_200 + 42_000
    );
    assert_eq!(summary.top_streamer.as_deref(), Some("Bogdan"));
}

#[test]
fn test_sort_keys_cover_all_columns() {
    let mut view = roster();

    sort_streamers(&mut view, SortKey::Name, false);
    assert_eq!(view[0].name, "Ana");

    sort_streamers(&mut view, SortKey::Platform, false);
    assert_eq!(view[0].platform, "TikTok");

    sort_streamers(&mut view, SortKey::LastUpdate, true);
    assert_eq!(view[0].name, "Ana"); // ts 900 is the freshest

    sort_streamers(&mut view, SortKey::Followers, false);
    assert_eq!(view[0].name, "Cleo");
}
