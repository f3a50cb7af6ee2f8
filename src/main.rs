use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flowrun::engine::executor::Executor;
use flowrun::engine::graph::GraphStore;
use flowrun::engine::registry::NodeRegistry;
use flowrun::engine::run::RunStore;
use flowrun::nodes::code_review;
use flowrun::server;

#[derive(Parser)]
#[command(name = "flowrun", about = "Graph run engine over HTTP")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // All node bindings happen here, before any run can start.
    let mut registry = NodeRegistry::new();
    code_review::register(&mut registry);

    let graphs = Arc::new(GraphStore::new());
    let runs = Arc::new(RunStore::new());
    let executor = Arc::new(Executor::new(
        Arc::clone(&graphs),
        runs,
        Arc::new(registry),
    ));

    let sample_id = graphs.create(code_review::sample_graph());
    info!(graph_id = %sample_id, "seeded sample code review graph");

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, server::router(executor)).await?;
    Ok(())
}
