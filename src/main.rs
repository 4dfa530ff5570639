//! # Santuri MCP CLI (`santuri-mcp`)
//!
//! Starts the MCP server (stdio or HTTP) or runs a single tool call from the
//! command line.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `santuri-mcp serve mcp` | Serve MCP over stdio |
//! | `santuri-mcp serve http` | Serve the JSON HTTP tool API |
//! | `santuri-mcp search "<query>"` | Search documentation once |
//! | `santuri-mcp sources` | List documentation sources |
//! | `santuri-mcp source <id>` | Show one source by id or slug |
//!
//! Connection settings come from `SANTURI_API_KEY`, `SANTURI_API_URL`,
//! `SANTURI_STACK_ID` and `SANTURI_TIMEOUT_SECS`. Logs go to stderr and are
//! filtered with `RUST_LOG`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use santuri_mcp::client::{ApiClient, DocsApi};
use santuri_mcp::config::{self, ApiConfig};
use santuri_mcp::traits::{ToolContext, ToolRegistry, ToolResult};
use santuri_mcp::{mcp, server, sources};

/// Santuri MCP server: documentation search for AI tools.
#[derive(Parser)]
#[command(name = "santuri-mcp", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a server.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },

    /// Search documentation and print the results.
    Search {
        /// The search query.
        query: String,

        /// Maximum number of results (1-50).
        #[arg(long)]
        limit: Option<u32>,
    },

    /// List documentation sources in the configured stack.
    Sources {
        /// Only show sources in this category (exact match).
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a single source by id or slug.
    Source {
        /// Source id or slug.
        id: String,
    },
}

#[derive(Subcommand)]
enum ServeService {
    /// Serve MCP over stdin/stdout.
    Mcp,

    /// Serve the JSON HTTP tool API.
    Http {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:7331")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the MCP transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let cfg = config::get_config();
    let client = ApiClient::new(cfg.clone()).context("Failed to initialize API client")?;
    let ctx = Arc::new(ToolContext::new(cfg, Arc::new(client)));
    log_startup(ctx.config());
    let tools = Arc::new(ToolRegistry::with_builtins());

    match cli.command {
        Commands::Serve { service } => match service {
            ServeService::Mcp => {
                mcp::serve_stdio(ctx, tools).await?;
            }
            ServeService::Http { bind } => {
                server::run_server(&bind, server::AppState::new(ctx, tools)).await?;
            }
        },
        Commands::Search { query, limit } => {
            let mut params = serde_json::json!({ "query": query });
            if let Some(limit) = limit {
                params["limit"] = limit.into();
            }
            let result = tools.dispatch("search_documentation", params, &ctx).await;
            print_result(&result);
        }
        Commands::Sources { category } => {
            let params = serde_json::json!({ "category": category });
            let result = tools.dispatch("list_sources", params, &ctx).await;
            print_result(&result);
        }
        Commands::Source { id } => {
            let source = ctx
                .api()
                .get_source(&id, ctx.stack_id())
                .await
                .with_context(|| format!("Failed to look up source '{}'", id))?;
            match source {
                Some(source) => println!("{}", sources::render_source(&source)),
                None => anyhow::bail!(
                    "No source with id or slug '{}' in {}",
                    id,
                    ctx.scope_description()
                ),
            }
        }
    }

    Ok(())
}

fn log_startup(cfg: &ApiConfig) {
    tracing::info!(
        api_url = %cfg.api_url,
        mode = if cfg.is_authenticated() {
            "authenticated"
        } else {
            "anonymous (rate-limited)"
        },
        stack = %cfg
            .stack_id
            .as_deref()
            .unwrap_or("not configured (using all sources)"),
        "Santuri MCP initialized"
    );
}

/// Print a tool result; error-flagged results go to stderr and exit non-zero.
fn print_result(result: &ToolResult) {
    if result.is_error {
        eprintln!("{}", result.text());
        std::process::exit(1);
    }
    println!("{}", result.text());
}
