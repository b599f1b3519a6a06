use std::time::Duration;

use crate::infra::config::UpstreamConfig;

/// Build the shared reqwest client. Transport timeouts come from config only;
/// the query path itself never imposes one.
pub fn make_http_client(cfg: &UpstreamConfig) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms));
    if let Some(ms) = cfg.timeout_ms {
        builder = builder.timeout(Duration::from_millis(ms));
    }
    builder.build()
}
