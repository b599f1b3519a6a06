use clap::{Args, Parser, Subcommand};
use rmcp::model::JsonObject;
use serde_json::Value as JsonValue;
use std::process::ExitCode;

use crate::core::schema::normalize;
use crate::domain::Product;
use crate::infra::boot;
use crate::infra::config::{Config, Mode};

#[derive(Parser)]
#[command(name = "products-mcp-gateway")]
#[command(about = "MCP server exposing a product lookup tool")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server (default)
    Serve {
        /// Transport to serve on; overrides MODE
        #[arg(long, value_enum)]
        mode: Option<Mode>,
        /// HTTP port for http mode; overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run get_products once and print the result
    Query(QueryArgs),
    /// Validate configuration
    Config,
    /// Health check a server running in http mode
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct QueryArgs {
    #[arg(long)]
    pub id: Option<String>,
    /// Free-text search; other filters are ignored when set
    #[arg(long)]
    pub q: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub rating: Option<f64>,
    #[arg(long)]
    pub skip: Option<f64>,
    #[arg(long)]
    pub limit: Option<f64>,
    #[arg(long)]
    pub select: Option<String>,
    #[arg(long = "sort-by")]
    pub sort_by: Option<String>,
    #[arg(long)]
    pub order: Option<String>,
    /// Print the exact tool response text instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    /// Same argument object an MCP host would send.
    pub fn to_arguments(&self) -> JsonObject {
        let mut args = JsonObject::new();
        let mut put = |name: &str, v: Option<JsonValue>| {
            if let Some(v) = v {
                args.insert(name.to_owned(), v);
            }
        };
        put("id", self.id.clone().map(JsonValue::from));
        put("q", self.q.clone().map(JsonValue::from));
        put("category", self.category.clone().map(JsonValue::from));
        put("brand", self.brand.clone().map(JsonValue::from));
        put("price", self.price.map(JsonValue::from));
        put("rating", self.rating.map(JsonValue::from));
        put("skip", self.skip.map(JsonValue::from));
        put("limit", self.limit.map(JsonValue::from));
        put("select", self.select.clone().map(JsonValue::from));
        put("sortBy", self.sort_by.clone().map(JsonValue::from));
        put("order", self.order.clone().map(JsonValue::from));
        args
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    run_commands(cli.command.unwrap_or(Commands::Serve { mode: None, port: None })).await
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Serve { mode, port } => match serve(mode, port).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Fatal error in server");
                eprintln!("Fatal error: {e:#}");
                ExitCode::FAILURE
            }
        },
        Commands::Query(args) => match query(&args).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Query failed: {e:#}");
                ExitCode::FAILURE
            }
        },
        Commands::Config => match Config::load() {
            Ok(cfg) => {
                println!("✅ Configuration is valid");
                println!("  Mode: {}", cfg.mode);
                println!("  Port: {}", cfg.port);
                println!("  Upstream: {}", cfg.upstream.base_url);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {e:#}");
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn serve(mode: Option<Mode>, port: Option<u16>) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;
    if let Some(mode) = mode {
        cfg.mode = mode;
    }
    if let Some(port) = port {
        cfg.port = port;
    }
    cfg.validate()?;
    boot::run_server(cfg).await
}

async fn query(args: &QueryArgs) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    query_with(&cfg, args).await
}

async fn query_with(cfg: &Config, args: &QueryArgs) -> anyhow::Result<()> {
    let params = normalize(&args.to_arguments())?;
    let executor = boot::build_executor(cfg)?;

    if args.json {
        let resp = serde_json::to_value(executor.execute(&params).await?)?;
        let blocks = resp["content"].as_array().cloned().unwrap_or_default();
        for block in &blocks {
            if let Some(text) = block["text"].as_str() {
                println!("{text}");
            }
        }
        return Ok(());
    }

    let list = executor.fetch(&params).await?;
    println!(
        "🛒 {} of {} products (skip {}, limit {})",
        list.products.len(),
        meta(&list.total),
        meta(&list.skip),
        meta(&list.limit)
    );
    for raw in &list.products {
        let p: Product = serde_json::from_value(raw.clone()).unwrap_or_default();
        let id = p.id.map(|id| id.to_string()).unwrap_or_else(|| "?".into());
        let brand = p.brand.as_deref().unwrap_or("-");
        println!("  {id}. {} [{brand}, {}] ${:.2} ★{:.1}", p.title, p.category, p.price, p.rating);
    }
    Ok(())
}

/// Upstream list metadata is relayed as-is; render whatever came back.
fn meta(v: &Option<JsonValue>) -> String {
    v.as_ref().map(JsonValue::to_string).unwrap_or_else(|| "?".into())
}

async fn health_check(url: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url.trim_end_matches('/')))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        anyhow::bail!("HTTP {}", response.status())
    }
}
