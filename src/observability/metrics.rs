use prometheus::{Encoder, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub assignment_decisions_total: IntCounterVec,
    pub assignment_latency_seconds: HistogramVec,
    pub candidate_rejections_total: IntCounterVec,
    pub manual_assignments_total: IntCounter,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let assignment_decisions_total = IntCounterVec::new(
            Opts::new(
                "assignment_decisions_total",
                "Automatic assignment decisions by outcome",
            ),
            &["outcome"],
        )
        .expect("valid assignment_decisions_total metric");

        let assignment_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "assignment_latency_seconds",
                "Latency of automatic assignment decisions in seconds",
            ),
            &["outcome"],
        )
        .expect("valid assignment_latency_seconds metric");

        let candidate_rejections_total = IntCounterVec::new(
            Opts::new(
                "candidate_rejections_total",
                "Candidates rejected during ranking by kind",
            ),
            &["kind"],
        )
        .expect("valid candidate_rejections_total metric");

        let manual_assignments_total = IntCounter::new(
            "manual_assignments_total",
            "Assignments recorded by administrators",
        )
        .expect("valid manual_assignments_total metric");

        registry
            .register(Box::new(assignment_decisions_total.clone()))
            .expect("register assignment_decisions_total");
        registry
            .register(Box::new(assignment_latency_seconds.clone()))
            .expect("register assignment_latency_seconds");
        registry
            .register(Box::new(candidate_rejections_total.clone()))
            .expect("register candidate_rejections_total");
        registry
            .register(Box::new(manual_assignments_total.clone()))
            .expect("register manual_assignments_total");

        Self {
            registry,
            assignment_decisions_total,
            assignment_latency_seconds,
            candidate_rejections_total,
            manual_assignments_total,
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
