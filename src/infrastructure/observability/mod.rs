//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_cache_lookup, record_cache_sweep,
    record_http_request, record_upstream_call, PrometheusMetrics,
};
