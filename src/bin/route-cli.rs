use std::path::{Path, PathBuf};
use std::process::ExitCode;

use axum::http::Method;
use clap::{Parser, Subcommand};

use route_trie::config::load_config;
use route_trie::http::{build_router, Handler};
use route_trie::Router;

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and test route-server configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered route
    Routes {
        config: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show which route serves a request
    Match {
        config: PathBuf,
        method: String,
        path: String,
    },
    /// Validate a configuration and build its route table
    Check { config: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Commands::Routes { config, json } => {
            let router = load(&config)?;
            let routes = router.routes();
            if json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            } else {
                for route in routes {
                    println!("{:<8} {:<40} handlers={}", route.method, route.pattern, route.handlers);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Match { config, method, path } => {
            let router = load(&config)?;
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;

            match router.match_route(&method, &path) {
                Some(matched) => {
                    let output = serde_json::json!({
                        "pattern": matched.pattern,
                        "params": matched.params,
                        "handlers": matched.handlers.len(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    let allowed = router.allowed_methods(&path);
                    if allowed.is_empty() {
                        println!("404 no route matched");
                    } else {
                        let allow: Vec<_> = allowed.iter().map(Method::as_str).collect();
                        println!("405 method not allowed (allow: {})", allow.join(", "));
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Check { config } => {
            let router = load(&config)?;
            println!("OK: {} routes", router.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(path: &Path) -> Result<Router<Handler>, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    Ok(build_router(&config)?)
}
