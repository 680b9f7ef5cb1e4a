use std::sync::Mutex;

/// Point-in-time copy of the engine counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub armed: usize,
    pub delivered: usize,
    pub removed: usize,
    pub rejected: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_armed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.armed += 1;
        }
    }

    pub fn record_delivered(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.delivered += 1;
        }
    }

    pub fn record_removed(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.removed += count;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
