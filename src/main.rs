//! `route-rules`: inspect and exercise a route file from the command line.
//!
//! ```text
//! route-rules --config routes.toml check
//! route-rules --config routes.toml list
//! route-rules --config routes.toml match GET /blog/hello --host example.com
//! route-rules --config routes.toml watch      # stdin: METHOD PATH [HOST]
//! ```

use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use route_rules::config::watcher::RouteFileWatcher;
use route_rules::config::{load_table, ObservabilityConfig};
use route_rules::observability::logging::init_logging;
use route_rules::routing::{MatchedRoute, RouteRequest, RuleTable, SharedRuleTable};

#[derive(Parser)]
#[command(name = "route-rules")]
#[command(about = "Compile and query URL routing rules", long_about = None)]
struct Cli {
    /// Route file (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, validate and build the rule table
    Check,
    /// Print flattened rules in priority order
    List,
    /// Match a single request
    Match {
        method: String,
        path: String,
        #[arg(long, default_value = "")]
        host: String,
        #[arg(long)]
        ajax: bool,
    },
    /// Match requests read from stdin against the hot-reloaded table
    Watch,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, table) = match load_table(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            tracing::error!(path = ?cli.config, error = %e, "Failed to load route file");
            return Err(e.into());
        }
    };
    init_logging(&config.observability);

    match cli.command {
        Commands::Check => {
            println!(
                "ok: {} rules, {} properties",
                table.len(),
                table.properties().len()
            );
        }
        Commands::List => {
            for (i, rule) in table.rules().iter().enumerate() {
                println!("{i:>4}  {rule}");
            }
            for (name, value) in table.properties() {
                println!("      property {name} = {value}");
            }
        }
        Commands::Match {
            method,
            path,
            host,
            ajax,
        } => {
            let req = RouteRequest::new(&method, &path)
                .with_hostname(&host)
                .with_ajax(ajax);
            if !print_match(&table, &req)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Watch => watch(cli.config, table).await?,
    }

    Ok(ExitCode::SUCCESS)
}

async fn watch(path: PathBuf, table: RuleTable) -> Result<(), Box<dyn std::error::Error>> {
    let shared = Arc::new(SharedRuleTable::new(table));

    let (watcher, mut updates) = RouteFileWatcher::new(&path);
    let _watcher = watcher.run()?;

    let swapper = Arc::clone(&shared);
    tokio::spawn(async move {
        while let Some(table) = updates.recv().await {
            swapper.replace(table);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
            if !line.trim().is_empty() {
                eprintln!("expected: METHOD PATH [HOST] [ajax]");
            }
            continue;
        };
        let host = parts.next().unwrap_or("");
        let ajax = parts.next().is_some_and(|flag| flag.eq_ignore_ascii_case("ajax"));

        let req = RouteRequest::new(method, path)
            .with_hostname(host)
            .with_ajax(ajax);
        print_match(&shared.load(), &req)?;
    }

    tracing::info!("stdin closed, stopping");
    Ok(())
}

fn print_match(table: &RuleTable, req: &RouteRequest<'_>) -> serde_json::Result<bool> {
    match table.match_request(req) {
        Some(route) => {
            println!("{}", serde_json::to_string_pretty(&report(&route))?);
            Ok(true)
        }
        None => {
            println!("no match");
            Ok(false)
        }
    }
}

fn report(route: &MatchedRoute) -> serde_json::Value {
    json!({
        "rule": route.to_string(),
        "name": route.name(),
        "target_type": route.target_type().as_str(),
        "target": route.target().to_string(),
        "args": route.args(),
    })
}
