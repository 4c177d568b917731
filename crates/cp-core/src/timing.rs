//! Lightweight wall-clock timing for the tick pipeline.
//!
//! Off by default. Turn on with `enable_timing()` or the `CP_TIMING`
//! environment variable, which is read once per process.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static ENV_ENABLED: OnceLock<bool> = OnceLock::new();

pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

fn env_enabled() -> bool {
    *ENV_ENABLED.get_or_init(|| std::env::var_os("CP_TIMING").is_some())
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || env_enabled()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
    enabled: bool,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    /// Elapsed seconds, or `None` when timing is disabled.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }

    /// Stop and feed the elapsed time into an accumulator.
    pub fn stop_into(self, acc: &AccumulatingTimer) {
        let label = self.label;
        if let Some(elapsed) = self.stop() {
            tracing::trace!(label, elapsed_s = elapsed, "timing");
            acc.record(elapsed);
        }
    }
}

/// Accumulates total time and call count across many measurements.
pub struct AccumulatingTimer {
    total_ns: AtomicU64,
    count: AtomicU64,
}

impl Default for AccumulatingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AccumulatingTimer {
    pub const fn new() -> Self {
        Self {
            total_ns: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    pub fn record(&self, duration_s: f64) {
        let nanos = (duration_s * 1e9) as u64;
        self.total_ns.fetch_add(nanos, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_ns.load(Ordering::Relaxed) as f64 / 1e9
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn average_seconds(&self) -> f64 {
        let count = self.count();
        if count > 0 {
            self.total_seconds() / count as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        self.total_ns.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }
}

/// Per-stage tick timers.
pub mod tick_timing {
    use super::AccumulatingTimer;

    /// Time spent evaluating the control policy
    pub static POLICY: AccumulatingTimer = AccumulatingTimer::new();
    /// Time spent in integrator steps
    pub static INTEGRATOR: AccumulatingTimer = AccumulatingTimer::new();

    pub fn reset_all() {
        POLICY.reset();
        INTEGRATOR.reset();
    }

    pub fn log_summary() {
        if !super::is_enabled() {
            return;
        }
        for (stage, timer) in [("policy", &POLICY), ("integrator", &INTEGRATOR)] {
            if timer.count() > 0 {
                tracing::info!(
                    stage,
                    calls = timer.count(),
                    total_s = timer.total_seconds(),
                    avg_us = timer.average_seconds() * 1e6,
                    "tick stage timing"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulating_timer_averages() {
        let t = AccumulatingTimer::new();
        assert_eq!(t.average_seconds(), 0.0);
        t.record(0.002);
        t.record(0.004);
        assert_eq!(t.count(), 2);
        assert!((t.total_seconds() - 0.006).abs() < 1e-9);
        assert!((t.average_seconds() - 0.003).abs() < 1e-9);
        t.reset();
        assert_eq!(t.count(), 0);
    }

    #[test]
    fn env_flag_is_cached_after_first_read() {
        let flag = env_enabled();
        assert_eq!(ENV_ENABLED.get().copied(), Some(flag));
        assert_eq!(env_enabled(), flag);
    }

    #[test]
    fn timer_respects_enable_flag() {
        enable_timing();
        let timer = Timer::start("test");
        assert!(timer.stop().is_some());
    }
}
