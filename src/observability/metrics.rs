use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub commits_total: IntCounterVec,
    pub drafts_active: IntGauge,
    pub commit_latency_seconds: HistogramVec,
    pub transitions_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let commits_total = IntCounterVec::new(
            Opts::new("commits_total", "Total draft commits by outcome"),
            &["outcome"],
        )
        .expect("valid commits_total metric");

        let drafts_active = IntGauge::new("drafts_active", "Current number of in-progress drafts")
            .expect("valid drafts_active metric");

        let commit_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "commit_latency_seconds",
                "Latency of draft commit processing in seconds",
            ),
            &["outcome"],
        )
        .expect("valid commit_latency_seconds metric");

        let transitions_total = IntCounterVec::new(
            Opts::new("transitions_total", "Booking status transitions by target status"),
            &["status"],
        )
        .expect("valid transitions_total metric");

        registry
            .register(Box::new(commits_total.clone()))
            .expect("register commits_total");
        registry
            .register(Box::new(drafts_active.clone()))
            .expect("register drafts_active");
        registry
            .register(Box::new(commit_latency_seconds.clone()))
            .expect("register commit_latency_seconds");
        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register transitions_total");

        Self {
            registry,
            commits_total,
            drafts_active,
            commit_latency_seconds,
            transitions_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
