// src/utils/metrics.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{Duration, Instant};

pub struct Metrics {
    start_time: Instant,
    alerts_triggered: AtomicU64,
    alerts_failed: AtomicU64,
    dispatch_failures: AtomicU64,
    acquire_time: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            alerts_triggered: AtomicU64::new(0),
            alerts_failed: AtomicU64::new(0),
            dispatch_failures: AtomicU64::new(0),
            acquire_time: AtomicU64::new(0),
        }
    }

    pub fn record_submission(&self, acquire: Duration, success: bool) {
        self.acquire_time
            .fetch_add(acquire.as_micros() as u64, Ordering::SeqCst);
        if success {
            self.alerts_triggered.fetch_add(1, Ordering::SeqCst);
        } else {
            self.alerts_failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn record_dispatch_failure(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub fn alerts_triggered(&self) -> u64 {
        self.alerts_triggered.load(Ordering::SeqCst)
    }

    pub fn alerts_failed(&self) -> u64 {
        self.alerts_failed.load(Ordering::SeqCst)
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Monitor {
    metrics: Arc<Metrics>,
    log_interval: Duration,
}

impl Monitor {
    pub fn new(metrics: Arc<Metrics>, log_interval: Duration) -> Self {
        Self {
            metrics,
            log_interval,
        }
    }

    pub fn start(&self) {
        let metrics = self.metrics.clone();
        let log_interval = self.log_interval;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(log_interval).await;
                tracing::info!(
                    alerts_triggered = metrics.alerts_triggered(),
                    alerts_failed = metrics.alerts_failed(),
                    dispatch_failures = metrics.dispatch_failures.load(Ordering::SeqCst),
                    uptime_s = metrics.uptime().as_secs(),
                    "Node metrics"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_counters() {
        let metrics = Metrics::new();
        metrics.record_submission(Duration::from_millis(5), true);
        metrics.record_submission(Duration::from_millis(5), false);
        metrics.record_submission(Duration::from_millis(5), true);

        assert_eq!(metrics.alerts_triggered(), 2);
        assert_eq!(metrics.alerts_failed(), 1);
    }
}
