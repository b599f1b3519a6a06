pub fn init() {
    // Honor RUST_LOG if set, default to info. Always write to stderr: in stdio
    // mode stdout carries the MCP stream.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log a metrics-like line; there is no exporter behind it.
pub fn log_metric(tool: &str, metric: &str, value: f64) {
    tracing::debug!(tool = tool, metric = metric, value = value, "metric");
}
