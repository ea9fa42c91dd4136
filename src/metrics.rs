//! Performance metrics and statistics tracking for the prediction service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for prediction traffic
pub struct ServiceMetrics {
    /// Successfully served predictions
    pub predictions_served: AtomicU64,
    /// Requests rejected by validation
    pub rejected: AtomicU64,
    /// Requests failed on inference or persistence
    pub failed: AtomicU64,
    /// Positive (attrition) decisions
    pub positives: AtomicU64,
    /// End-to-end latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Probability distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            positives: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a successfully served prediction
    pub fn record_prediction(&self, latency: Duration, probability: f64, prediction: u8) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);
        if prediction == 1 {
            self.positives.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            // Keep only the most recent window for memory efficiency
            if latencies.len() > 10000 {
                latencies.drain(0..5000);
            }
        }

        let bucket = (probability * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.score_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a validation rejection
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an inference or persistence failure
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get latency statistics
    pub fn get_latency_stats(&self) -> LatencyStats {
        let latencies = match self.latencies.read() {
            Ok(latencies) => latencies,
            Err(_) => return LatencyStats::default(),
        };
        if latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = latencies.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get probability distribution
    pub fn get_score_distribution(&self) -> [u64; 10] {
        self.score_buckets.read().map(|b| *b).unwrap_or([0; 10])
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let positives = self.positives.load(Ordering::Relaxed);
        let positive_rate = if served > 0 {
            (positives as f64 / served as f64) * 100.0
        } else {
            0.0
        };

        let latency = self.get_latency_stats();

        info!(
            served = served,
            rejected = rejected,
            failed = failed,
            positive_rate = format!("{:.1}%", positive_rate),
            throughput = format!("{:.1} req/s", self.get_throughput()),
            "Prediction service metrics"
        );
        info!(
            mean_us = latency.mean_us,
            p50_us = latency.p50_us,
            p95_us = latency.p95_us,
            p99_us = latency.p99_us,
            "Latency (end-to-end)"
        );

        let score_dist = self.get_score_distribution();
        let total: u64 = score_dist.iter().sum();
        if total > 0 {
            for (i, &count) in score_dist.iter().enumerate() {
                let pct = (count as f64 / total as f64) * 100.0;
                info!(
                    bucket = format!("{:.1}-{:.1}", i as f64 / 10.0, (i + 1) as f64 / 10.0),
                    count = count,
                    pct = format!("{:.1}%", pct),
                    "Probability distribution"
                );
            }
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// End-to-end latency statistics
#[derive(Debug, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
