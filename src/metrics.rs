//! Submission counters and inference latency for one session.

use crate::types::prediction::DisplayMessage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome counters for the submissions handled in this process
pub struct SessionMetrics {
    /// Total submissions
    pub submissions: AtomicU64,
    /// Submissions that displayed a result
    pub results: AtomicU64,
    /// Submissions rejected for blank fields
    pub empty_fields: AtomicU64,
    /// Submissions rejected for non-numeric fields
    pub invalid_numbers: AtomicU64,
    /// Submissions that failed after parsing
    pub errors: AtomicU64,
    /// Inference times (in microseconds)
    inference_times: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            submissions: AtomicU64::new(0),
            results: AtomicU64::new(0),
            empty_fields: AtomicU64::new(0),
            invalid_numbers: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            inference_times: RwLock::new(Vec::with_capacity(256)),
            start_time: Instant::now(),
        }
    }

    /// Record the message a submission ended with
    pub fn record_submission(&self, message: &DisplayMessage) {
        self.submissions.fetch_add(1, Ordering::Relaxed);

        let counter = match message {
            DisplayMessage::Result(_) => &self.results,
            DisplayMessage::EmptyField => &self.empty_fields,
            DisplayMessage::InvalidNumber => &self.invalid_numbers,
            DisplayMessage::Error => &self.errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record model inference time
    pub fn record_inference_time(&self, duration: Duration) {
        if let Ok(mut times) = self.inference_times.write() {
            times.push(duration.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Get inference time statistics
    pub fn get_inference_stats(&self) -> InferenceStats {
        let mut sorted: Vec<u64> = match self.inference_times.read() {
            Ok(times) => times.clone(),
            Err(_) => return InferenceStats::default(),
        };
        if sorted.is_empty() {
            return InferenceStats::default();
        }
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        InferenceStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Share of submissions that produced a result, in percent
    pub fn success_rate(&self) -> f64 {
        let total = self.submissions.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        self.results.load(Ordering::Relaxed) as f64 / total as f64 * 100.0
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let stats = self.get_inference_stats();

        info!(
            submissions = self.submissions.load(Ordering::Relaxed),
            results = self.results.load(Ordering::Relaxed),
            empty_fields = self.empty_fields.load(Ordering::Relaxed),
            invalid_numbers = self.invalid_numbers.load(Ordering::Relaxed),
            errors = self.errors.load(Ordering::Relaxed),
            success_rate = format!("{:.1}%", self.success_rate()),
            uptime_s = self.start_time.elapsed().as_secs(),
            "Session summary"
        );
        if stats.count > 0 {
            info!(
                calls = stats.count,
                mean_us = stats.mean_us,
                p50_us = stats.p50_us,
                p99_us = stats.p99_us,
                max_us = stats.max_us,
                "Inference times"
            );
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference time statistics
#[derive(Debug, Default, PartialEq)]
pub struct InferenceStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}
