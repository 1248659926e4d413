//! Prometheus metrics for the scanner service.

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,

    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,

    pub scan_cycles_total: IntCounter,
    pub scan_cycles_failed: IntCounter,
    pub scan_cycle_duration_seconds: Histogram,
    pub candidates_emitted_total: IntCounter,
    pub symbols_dropped_total: IntCounter,
    pub advisory_failures_total: IntCounter,
    pub subscription_evictions_total: IntCounter,

    pub database_connected: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests received")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        let scan_cycles_total = IntCounter::new("scan_cycles_total", "Scan cycles completed")?;
        let scan_cycles_failed = IntCounter::new("scan_cycles_failed", "Scan cycles aborted")?;
        let scan_cycle_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "scan_cycle_duration_seconds",
            "Wall-clock duration of a scan cycle",
        ))?;
        let candidates_emitted_total =
            IntCounter::new("candidates_emitted_total", "Candidates persisted across cycles")?;
        let symbols_dropped_total = IntCounter::new(
            "symbols_dropped_total",
            "Symbols dropped from a cycle by per-symbol errors",
        )?;
        let advisory_failures_total = IntCounter::new(
            "advisory_failures_total",
            "Advisory calls that failed and were skipped",
        )?;
        let subscription_evictions_total = IntCounter::new(
            "subscription_evictions_total",
            "Symbols evicted from the live subscription set",
        )?;

        let database_connected =
            Gauge::new("database_connected", "1 when the candidate store is reachable")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(scan_cycles_total.clone()))?;
        registry.register(Box::new(scan_cycles_failed.clone()))?;
        registry.register(Box::new(scan_cycle_duration_seconds.clone()))?;
        registry.register(Box::new(candidates_emitted_total.clone()))?;
        registry.register(Box::new(symbols_dropped_total.clone()))?;
        registry.register(Box::new(advisory_failures_total.clone()))?;
        registry.register(Box::new(subscription_evictions_total.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            scan_cycles_total,
            scan_cycles_failed,
            scan_cycle_duration_seconds,
            candidates_emitted_total,
            symbols_dropped_total,
            advisory_failures_total,
            subscription_evictions_total,
            database_connected,
        })
    }

    /// Export all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics encoding: {}", e)))
    }
}
