//! stocktake-server: serve the API, or print its rendered documentation.
//!
//! `stocktake-server` (or `stocktake-server serve`) listens on `LISTEN_ADDR`;
//! `stocktake-server docs` writes the reStructuredText documentation to stdout.

use clap::{Parser, Subcommand};
use stocktake::{
    app, load_config, render_all, resources, store, ApiBuilder, AppConfig, AppState, DocTable, RenderContext,
};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "stocktake-server")]
#[command(about = "Inventory backend: customers, units and stocktaking items", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Overrides LISTEN_ADDR
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the API documentation and exit
    Docs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stocktake=info,stocktake_server=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config()?;
    match cli.command.unwrap_or(Command::Serve { addr: None }) {
        Command::Docs => {
            print!("{}", render_all(&doc_table(&config)?, &RenderContext::from(&config)));
            Ok(())
        }
        Command::Serve { addr } => {
            if let Some(addr) = addr {
                config.listen_addr = addr;
            }
            serve(config).await
        }
    }
}

/// Descriptors only; no store is opened.
fn doc_table(config: &AppConfig) -> Result<DocTable, stocktake::DocError> {
    let mut builder = ApiBuilder::new(config);
    for resource in resources::all() {
        builder = builder.resource(resource.as_ref())?;
    }
    Ok(builder.finish().1)
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = store::open(&config.database, &resources::models()).await?;
    let state = AppState::new(config.clone(), store);
    let tasks = state.tasks.clone();
    let (router, docs) = app(state)?;

    if let Some(path) = config.docs.output.clone() {
        let text = render_all(&docs, &RenderContext::from(&config));
        tasks.submit(move || match std::fs::write(&path, text) {
            Ok(()) => tracing::info!(path = %path.display(), "api documentation written"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "writing api documentation failed"),
        });
    }

    let listener = TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(
        "stocktake listening on http://{}{}",
        listener.local_addr()?,
        config.api_prefix()
    );
    axum::serve(listener, router).await?;
    Ok(())
}
