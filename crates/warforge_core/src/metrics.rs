//! Counters and logging setup.
//!
//! Each simulation owns one [`Metrics`]; nothing here is process-global
//! except the tracing subscriber.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use warforge_data::OverrideKind;

/// Atomic counters for one simulation.
pub struct Metrics {
    generations: AtomicU64,
    ticks: AtomicU64,
    overrides_applied: AtomicU64,
    overrides_rejected: AtomicU64,
    enhancer_fallbacks: AtomicU64,
    /// Rejections per override kind.
    pub rejections: Mutex<BTreeMap<OverrideKind, u64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generations: AtomicU64::new(0),
            ticks: AtomicU64::new(0),
            overrides_applied: AtomicU64::new(0),
            overrides_rejected: AtomicU64::new(0),
            enhancer_fallbacks: AtomicU64::new(0),
            rejections: Mutex::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    pub fn record_generation(&self, duration: Duration, entities: usize, pois: usize) {
        self.generations.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            entities,
            pois,
            duration_ms = duration.as_millis() as u64,
            "Generation complete"
        );
    }

    /// Records a tick; logs at info level every 100 ticks.
    pub fn record_tick(&self, duration: Duration, living: usize, combat_events: usize) {
        self.ticks.fetch_add(1, Ordering::Relaxed);

        let tick = self.ticks.load(Ordering::Relaxed);
        if tick % 100 == 0 {
            tracing::info!(
                tick,
                living,
                combat_events,
                duration_ms = duration.as_millis() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn record_override_applied(&self, kind: OverrideKind) {
        self.overrides_applied.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(kind = %kind, "Override applied");
    }

    pub fn record_override_rejected(&self, kind: OverrideKind, reason: &str) {
        self.overrides_rejected.fetch_add(1, Ordering::Relaxed);
        let mut rejections = self.rejections.lock().unwrap_or_else(|e| e.into_inner());
        *rejections.entry(kind).or_insert(0) += 1;
        tracing::warn!(kind = %kind, reason, "Override rejected");
    }

    pub fn record_enhancer_fallback(&self) {
        self.enhancer_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn generations(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn overrides_applied(&self) -> u64 {
        self.overrides_applied.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn overrides_rejected(&self) -> u64 {
        self.overrides_rejected.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn enhancer_fallbacks(&self) -> u64 {
        self.enhancer_fallbacks.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rejections_for(&self, kind: OverrideKind) -> u64 {
        let rejections = self.rejections.lock().unwrap_or_else(|e| e.into_inner());
        rejections.get(&kind).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Install the global fmt subscriber at INFO on stderr. Later calls are no-ops.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
