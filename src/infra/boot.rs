use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use crate::clients::dummyjson::ProductsRemote;
use crate::infra::config::{Config, Mode};
use crate::infra::runtime::limits::make_http_client;
use crate::tools::products::{ProductQueryExecutor, ProductsRouter, ProductsSvc};

/// Wire the upstream client into an executor. Shared by the server and CLI.
pub fn build_executor(cfg: &Config) -> anyhow::Result<ProductQueryExecutor> {
    let http = make_http_client(&cfg.upstream).context("building HTTP client")?;
    let remote = ProductsRemote::new(&cfg.upstream.base_url, http)
        .with_context(|| format!("invalid upstream base URL {:?}", cfg.upstream.base_url))?;
    Ok(ProductQueryExecutor::new(Arc::new(remote)))
}

pub fn make_factory(
    executor: ProductQueryExecutor,
) -> impl Fn() -> (ProductsSvc, ProductsRouter) + Send + Sync + Clone + 'static {
    move || (ProductsSvc::new(executor.clone()), ProductsSvc::router())
}

pub async fn run_server(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        upstream = %cfg.upstream.base_url,
        "BOOT products-mcp-gateway"
    );
    let factory = make_factory(build_executor(&cfg)?);

    match cfg.mode {
        Mode::Stdio => {
            crate::infra::runtime::mcp_transport::serve_stdio(factory)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        Mode::Http => {
            let app = crate::infra::http_app::build_app(factory);
            let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
            tracing::info!(%addr, "listening");
            axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
        }
    }
    Ok(())
}
