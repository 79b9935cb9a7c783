use rocket_prometheus::prometheus::{IntCounterVec, Opts, Registry};

use crate::error::ErrorCategory;

#[derive(Clone, Debug)]
pub struct DashboardMetrics {
    fallbacks: IntCounterVec,
}

impl DashboardMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let fallbacks = IntCounterVec::new(
            Opts::new(
                "dashboard_fallbacks_total",
                "Dashboard responses replaced by a safe default",
            ),
            &["entrypoint", "category"],
        )?;
        Ok(Self { fallbacks })
    }

    pub fn register(&self, registry: &Registry) -> anyhow::Result<()> {
        registry.register(Box::new(self.fallbacks.clone()))?;
        Ok(())
    }

    pub fn record_fallback(&self, entrypoint: &str, category: ErrorCategory) {
        let category: &'static str = category.into();
        self.fallbacks
            .with_label_values(&[entrypoint, category])
            .inc();
    }

    pub fn fallbacks(&self, entrypoint: &str, category: ErrorCategory) -> u64 {
        let category: &'static str = category.into();
        self.fallbacks
            .with_label_values(&[entrypoint, category])
            .get()
    }
}
