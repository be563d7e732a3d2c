//! Prometheus metrics for the signal engine and the ops HTTP server.

use prometheus::{
    Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,

    // Cycle / pipeline
    pub cycles_total: IntCounter,
    pub candidates_processed_total: IntCounter,
    pub candidate_failures_total: IntCounter,
    pub pipeline_duration_seconds: Histogram,

    // Market data
    pub snapshot_cache_hits_total: IntCounter,
    pub snapshot_cache_misses_total: IntCounter,
    pub snapshot_fallbacks_total: IntCounter,

    // Analysis / decision
    pub analysis_failures_total: IntCounterVec,
    pub decision_failures_total: IntCounter,

    // Signals
    pub signals_generated_total: IntCounter,
    pub signals_rejected_total: IntCounterVec,
    pub signal_publish_failures_total: IntCounter,

    // Execution
    pub route_failures_total: IntCounter,
    pub executions_total: IntCounterVec,

    // HTTP server
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: Gauge,
    pub http_request_duration_seconds: Histogram,

    // Connectivity
    pub database_connected: Gauge,
    pub cache_connected: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total =
            IntCounter::with_opts(Opts::new("cycles_total", "Completed analysis cycles"))?;
        let candidates_processed_total = IntCounter::with_opts(Opts::new(
            "candidates_processed_total",
            "Candidates run through the pipeline",
        ))?;
        let candidate_failures_total = IntCounter::with_opts(Opts::new(
            "candidate_failures_total",
            "Candidates dropped from a cycle due to a pipeline failure",
        ))?;
        let pipeline_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "pipeline_duration_seconds",
            "Per-candidate pipeline duration",
        ))?;

        let snapshot_cache_hits_total = IntCounter::with_opts(Opts::new(
            "snapshot_cache_hits_total",
            "Market snapshots served from cache",
        ))?;
        let snapshot_cache_misses_total = IntCounter::with_opts(Opts::new(
            "snapshot_cache_misses_total",
            "Market snapshots fetched from external sources",
        ))?;
        let snapshot_fallbacks_total = IntCounter::with_opts(Opts::new(
            "snapshot_fallbacks_total",
            "Zero-valued fallback snapshots returned",
        ))?;

        let analysis_failures_total = IntCounterVec::new(
            Opts::new(
                "analysis_failures_total",
                "Analyzer calls replaced by defaults",
            ),
            &["analyzer"],
        )?;
        let decision_failures_total = IntCounter::with_opts(Opts::new(
            "decision_failures_total",
            "Reasoning-model calls mapped to the safe default decision",
        ))?;

        let signals_generated_total = IntCounter::with_opts(Opts::new(
            "signals_generated_total",
            "Signals accepted by the risk gate",
        ))?;
        let signals_rejected_total = IntCounterVec::new(
            Opts::new("signals_rejected_total", "Decisions filtered by the gate"),
            &["reason"],
        )?;
        let signal_publish_failures_total = IntCounter::with_opts(Opts::new(
            "signal_publish_failures_total",
            "Best-effort broadcast failures",
        ))?;

        let route_failures_total = IntCounter::with_opts(Opts::new(
            "route_failures_total",
            "Route resolutions that failed after retries",
        ))?;
        let executions_total = IntCounterVec::new(
            Opts::new("executions_total", "Trade execution attempts"),
            &["status"],
        )?;

        let http_requests_total =
            IntCounter::with_opts(Opts::new("http_requests_total", "Total HTTP requests"))?;
        let http_requests_in_flight = Gauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration",
        ))?;

        let database_connected = Gauge::with_opts(Opts::new(
            "database_connected",
            "1 when the signal database is reachable",
        ))?;
        let cache_connected = Gauge::with_opts(Opts::new(
            "cache_connected",
            "1 when the Redis broadcast channel is reachable",
        ))?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(candidates_processed_total.clone()))?;
        registry.register(Box::new(candidate_failures_total.clone()))?;
        registry.register(Box::new(pipeline_duration_seconds.clone()))?;
        registry.register(Box::new(snapshot_cache_hits_total.clone()))?;
        registry.register(Box::new(snapshot_cache_misses_total.clone()))?;
        registry.register(Box::new(snapshot_fallbacks_total.clone()))?;
        registry.register(Box::new(analysis_failures_total.clone()))?;
        registry.register(Box::new(decision_failures_total.clone()))?;
        registry.register(Box::new(signals_generated_total.clone()))?;
        registry.register(Box::new(signals_rejected_total.clone()))?;
        registry.register(Box::new(signal_publish_failures_total.clone()))?;
        registry.register(Box::new(route_failures_total.clone()))?;
        registry.register(Box::new(executions_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;
        registry.register(Box::new(cache_connected.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            candidates_processed_total,
            candidate_failures_total,
            pipeline_duration_seconds,
            snapshot_cache_hits_total,
            snapshot_cache_misses_total,
            snapshot_fallbacks_total,
            analysis_failures_total,
            decision_failures_total,
            signals_generated_total,
            signals_rejected_total,
            signal_publish_failures_total,
            route_failures_total,
            executions_total,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            database_connected,
            cache_connected,
        })
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&self.registry.gather())
    }
}
