//! Timing metrics with rolling averages.
//!
//! Each [`SearchEngine`](crate::search::SearchEngine) owns a
//! [`SearchMetrics`] collector and records into it as it builds corpora and
//! answers queries. Samples live in memory, bounded by count and by a time
//! window; lifetime totals survive pruning.
//!
//! ## Metrics
//!
//! - **index_build**: one sample per corpus build (tokenize, embed, index)
//! - **query_embedding**: embedding the query text
//! - **search**: end-to-end `search` latency
//!
//! ```
//! use polysearch_core::metrics::SearchMetrics;
//!
//! let metrics = SearchMetrics::new();
//! metrics.record_search(1.5, 2.0, 3, 0, Some(0.8));
//! assert_eq!(metrics.snapshot().search.rolling_count, 1);
//! ```

use instant::Instant;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Default window for rolling averages (5 minutes).
const DEFAULT_WINDOW_SECS: u64 = 300;

/// Maximum samples kept per metric.
const MAX_SAMPLES: usize = 1000;

#[derive(Clone, Debug)]
struct TimingSample {
    timestamp: Instant,
    duration_ms: f64,
}

/// Rolling statistics for a single metric.
#[derive(Debug, Default)]
struct MetricData {
    samples: VecDeque<TimingSample>,
    total_count: u64,
    total_duration_ms: f64,
}

impl MetricData {
    fn record(&mut self, duration_ms: f64) {
        self.total_count += 1;
        self.total_duration_ms += duration_ms;

        self.samples.push_back(TimingSample {
            timestamp: Instant::now(),
            duration_ms,
        });

        while self.samples.len() > MAX_SAMPLES {
            self.samples.pop_front();
        }
    }

    /// Drops samples older than the window.
    fn prune(&mut self, window: Duration) {
        // checked_sub: the window may reach back before the clock's epoch
        let Some(cutoff) = Instant::now().checked_sub(window) else {
            return;
        };

        while let Some(front) = self.samples.front() {
            if front.timestamp < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    fn in_window(&self, window: Duration) -> impl Iterator<Item = &TimingSample> {
        let cutoff = Instant::now().checked_sub(window);
        self.samples
            .iter()
            .filter(move |s| cutoff.map_or(true, |c| s.timestamp >= c))
    }

    fn stats(&self, window: Duration) -> TimingStats {
        let (sum, count) = self
            .in_window(window)
            .fold((0.0, 0usize), |(sum, count), s| (sum + s.duration_ms, count + 1));

        TimingStats {
            rolling_count: count,
            rolling_avg_ms: (count > 0).then(|| sum / count as f64),
            lifetime_count: self.total_count,
            lifetime_avg_ms: (self.total_count > 0)
                .then(|| self.total_duration_ms / self.total_count as f64),
        }
    }
}

/// Point-in-time facts about the most recent search.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LastSearch {
    /// Results returned after truncation
    pub result_count: usize,
    /// Languages that failed for that query
    pub failure_count: usize,
    /// Fused score of the first result
    pub top_score: Option<f32>,
}

/// Rolling and lifetime statistics for one metric.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TimingStats {
    /// Samples inside the rolling window
    pub rolling_count: usize,
    /// Mean duration inside the window, in milliseconds
    pub rolling_avg_ms: Option<f64>,
    /// Samples since the collector was created
    pub lifetime_count: u64,
    /// Mean duration since the collector was created, in milliseconds
    pub lifetime_avg_ms: Option<f64>,
}

/// Copy of all metrics at one instant.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Per-corpus build time
    pub index_build: TimingStats,
    /// Query embedding time
    pub query_embedding: TimingStats,
    /// End-to-end search latency
    pub search: TimingStats,
    /// Most recent search, if any
    pub last_search: Option<LastSearch>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    index_build: MetricData,
    query_embedding: MetricData,
    search: MetricData,
    last_search: Option<LastSearch>,
}

/// Thread-safe timing collector.
///
/// Cloning shares the underlying storage. A poisoned lock drops the sample
/// rather than panicking; metrics never fail a search.
#[derive(Clone, Debug)]
pub struct SearchMetrics {
    inner: Arc<RwLock<MetricsInner>>,
    window: Duration,
}

impl SearchMetrics {
    /// Creates a collector with the default 5 minute window.
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW_SECS)
    }

    /// Creates a collector with a custom window.
    pub fn with_window(window_secs: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsInner::default())),
            window: Duration::from_secs(window_secs),
        }
    }

    /// Records the build time of one corpus.
    pub fn record_index_build(&self, duration_ms: f64) {
        if let Ok(mut inner) = self.inner.write() {
            inner.index_build.record(duration_ms);
        }
    }

    /// Records a completed search.
    ///
    /// `embed_ms` is the query embedding share of `total_ms`.
    pub fn record_search(
        &self,
        embed_ms: f64,
        total_ms: f64,
        result_count: usize,
        failure_count: usize,
        top_score: Option<f32>,
    ) {
        if let Ok(mut inner) = self.inner.write() {
            inner.query_embedding.record(embed_ms);
            inner.search.record(total_ms);
            inner.last_search = Some(LastSearch {
                result_count,
                failure_count,
                top_score,
            });
        }
    }

    /// Drops samples outside the window.
    pub fn prune(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.index_build.prune(self.window);
            inner.query_embedding.prune(self.window);
            inner.search.prune(self.window);
        }
    }

    /// Returns current statistics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let Ok(inner) = self.inner.read() else {
            return MetricsSnapshot::default();
        };

        MetricsSnapshot {
            index_build: inner.index_build.stats(self.window),
            query_embedding: inner.query_embedding.stats(self.window),
            search: inner.search.stats(self.window),
            last_search: inner.last_search.clone(),
        }
    }

    /// Rolling window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Resets every counter and sample.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = MetricsInner::default();
        }
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Milliseconds elapsed since `start`.
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
