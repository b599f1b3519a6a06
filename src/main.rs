use std::process::ExitCode;

use products_mcp_gateway::{cli, infra};

#[tokio::main]
async fn main() -> ExitCode {
    infra::logging::init();
    cli::run().await
}
