use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub trips_created_total: IntCounter,
    pub accept_attempts_total: IntCounterVec,
    pub accept_latency_seconds: HistogramVec,
    pub trips_pending: IntGauge,
    pub drivers_active: IntGauge,
    pub alerts_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let trips_created_total =
            IntCounter::new("trips_created_total", "Total trips requested by riders")
                .expect("valid trips_created_total metric");

        let accept_attempts_total = IntCounterVec::new(
            Opts::new("accept_attempts_total", "Accept attempts by outcome"),
            &["outcome"],
        )
        .expect("valid accept_attempts_total metric");

        let accept_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "accept_latency_seconds",
                "Latency of the accept race in seconds",
            ),
            &["outcome"],
        )
        .expect("valid accept_latency_seconds metric");

        let trips_pending = IntGauge::new("trips_pending", "Trips currently open for matching")
            .expect("valid trips_pending metric");

        let drivers_active = IntGauge::new("drivers_active", "Drivers currently marked active")
            .expect("valid drivers_active metric");

        let alerts_total = IntCounter::new("alerts_total", "Total SOS alerts recorded")
            .expect("valid alerts_total metric");

        registry
            .register(Box::new(trips_created_total.clone()))
            .expect("register trips_created_total");
        registry
            .register(Box::new(accept_attempts_total.clone()))
            .expect("register accept_attempts_total");
        registry
            .register(Box::new(accept_latency_seconds.clone()))
            .expect("register accept_latency_seconds");
        registry
            .register(Box::new(trips_pending.clone()))
            .expect("register trips_pending");
        registry
            .register(Box::new(drivers_active.clone()))
            .expect("register drivers_active");
        registry
            .register(Box::new(alerts_total.clone()))
            .expect("register alerts_total");

        Self {
            registry,
            trips_created_total,
            accept_attempts_total,
            accept_latency_seconds,
            trips_pending,
            drivers_active,
            alerts_total,
        }
    }

    pub fn observe_accept(&self, outcome: &str, elapsed_seconds: f64) {
        self.accept_attempts_total
            .with_label_values(&[outcome])
            .inc();
        self.accept_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed_seconds);
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
