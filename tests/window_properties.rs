#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use redis_perf_monitor::config::MonitorConfig;
use redis_perf_monitor::metrics::{AggregateResult, PerfMonitor};
use redis_perf_monitor::store::MemoryStore;

fn monitor_with(max_retained: usize) -> (Arc<MemoryStore>, PerfMonitor) {
    let store = Arc::new(MemoryStore::new());
    let cfg = MonitorConfig {
        max_retained,
        ..MonitorConfig::default()
    };
    (store.clone(), PerfMonitor::new(store, &cfg))
}

#[tokio::test]
async fn two_samples_then_clear() {
    let (_, m) = monitor_with(20_000);
    m.record("m", 100, 1_000).await.unwrap();
    m.record("m", 300, 2_000).await.unwrap();

    let stats = m.stats("m").await.unwrap().expect("window has data");
    assert_eq!(
        stats,
        AggregateResult {
            metric: "m".into(),
            min: 100,
            max: 300,
            avg: 200,
            count: 2,
        }
    );

    m.clear("m").await.unwrap();
    assert_eq!(m.stats("m").await.unwrap(), None);
}

#[tokio::test]
async fn stats_match_direct_reduction_below_the_cap() {
    let (_, m) = monitor_with(50);
    let durations: Vec<u64> = (0..50).map(|i| (i * 37 + 11) % 97).collect();
    for (i, d) in durations.iter().enumerate() {
        m.record("q", *d, i as i64).await.unwrap();
    }

    let stats = m.stats("q").await.unwrap().unwrap();
    let sum: u64 = durations.iter().sum();
    assert_eq!(stats.count, durations.len());
    assert_eq!(stats.min, *durations.iter().min().unwrap());
    assert_eq!(stats.max, *durations.iter().max().unwrap());
    assert_eq!(stats.avg, (sum as f64 / durations.len() as f64).round() as u64);
}

#[tokio::test]
async fn trim_fires_only_past_twice_the_cap() {
    let (store, m) = monitor_with(3);
    let samples_key = "monitor_m_samples";
    let timestamps_key = "monitor_m_timestamps";

    let mut lens = Vec::new();
    for (i, d) in [10u64, 20, 30, 40, 50, 60, 70].into_iter().enumerate() {
        m.record("m", d, i as i64).await.unwrap();
        lens.push(store.len(samples_key));
        assert_eq!(store.len(samples_key), store.len(timestamps_key));
    }
    // Grows to 6 untouched; the 7th append (len 7 > 6) trims to 3.
    assert_eq!(lens, vec![1, 2, 3, 4, 5, 6, 3]);

    let window = m.window("m").await.unwrap();
    assert_eq!(window.durations, vec![50.0, 60.0, 70.0]);
    assert_eq!(window.timestamps, vec![4, 5, 6]);

    let stats = m.stats("m").await.unwrap().unwrap();
    assert_eq!((stats.min, stats.max, stats.avg, stats.count), (50, 70, 60, 3));
}

#[tokio::test]
async fn stored_count_never_exceeds_twice_the_cap() {
    let (store, m) = monitor_with(4);
    for i in 0..100u64 {
        m.record("m", i, i as i64).await.unwrap();
        let len = store.len("monitor_m_samples");
        assert!(len <= 8, "len {len} after {i}");
        assert_eq!(len, store.len("monitor_m_timestamps"));
    }
}

#[tokio::test]
async fn clear_on_unknown_metric_is_a_no_op() {
    let (_, m) = monitor_with(10);
    m.clear("never-recorded").await.unwrap();
    assert_eq!(m.stats("never-recorded").await.unwrap(), None);
}

#[tokio::test]
async fn record_after_clear_starts_fresh() {
    let (_, m) = monitor_with(10);
    m.record("m", 1, 1).await.unwrap();
    m.record("m", 999, 2).await.unwrap();
    m.clear("m").await.unwrap();
    m.record("m", 42, 3).await.unwrap();

    let stats = m.stats("m").await.unwrap().unwrap();
    assert_eq!((stats.min, stats.max, stats.avg, stats.count), (42, 42, 42, 1));
    assert_eq!(m.window("m").await.unwrap().timestamps, vec![3]);
}

#[tokio::test]
async fn metrics_do_not_share_windows() {
    let (_, m) = monitor_with(10);
    m.record("a", 5, 1).await.unwrap();
    m.record("a_samples", 500, 1).await.unwrap();

    assert_eq!(m.stats("a").await.unwrap().unwrap().max, 5);
    assert_eq!(m.stats("a_samples").await.unwrap().unwrap().max, 500);
}

#[tokio::test]
async fn concurrent_records_keep_lists_aligned() {
    let (store, m) = monitor_with(16);
    let m = Arc::new(m);

    let mut handles = Vec::new();
    for worker in 0..8u64 {
        let m = m.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..50u64 {
                m.record("shared", worker * 100 + i, i as i64).await.unwrap();
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let len = store.len("monitor_shared_samples");
    assert!(len <= 32);
    assert_eq!(len, store.len("monitor_shared_timestamps"));
    assert_eq!(m.stats("shared").await.unwrap().unwrap().count, len);
}

#[tokio::test]
async fn invalid_names_fail_fast() {
    let (_, m) = monitor_with(10);
    assert!(m.record("bad name", 1, 1).await.is_err());
    assert!(m.register_metric("", "empty", None).is_err());
}
