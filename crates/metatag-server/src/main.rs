//! Metatag: page metadata resolution server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod admin;
mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("METATAG_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

fn print_usage() {
    println!("Metatag: page metadata resolution server");
    println!();
    println!("Usage: metatag [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Start the server");
    println!("  import <snapshot> [data-dir]    Load a content snapshot (JSON)");
    println!("  validate [data-dir]             Check the store for malformed rules");
    println!("  resolve <path> [lang] [domain]  Print resolved metatags for a path");
    println!("  help                            Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--import" | "import" => {
                if args.len() < 3 {
                    eprintln!("Usage: metatag import <snapshot.json> [data-dir]");
                    std::process::exit(1);
                }
                let snapshot = PathBuf::from(&args[2]);
                let data_dir = args.get(3).map(PathBuf::from).unwrap_or_else(resolve_data_dir);
                let report = admin::run_import(&snapshot, &data_dir)?;
                admin::print_import_report(&report);
                std::process::exit(if report.skipped.is_empty() { 0 } else { 1 });
            }
            "--validate" | "validate" => {
                let data_dir = args.get(2).map(PathBuf::from).unwrap_or_else(resolve_data_dir);
                let report = admin::validate(&data_dir);
                admin::print_validation_report(&report);
                std::process::exit(if report.is_ok() { 0 } else { 1 });
            }
            "--resolve" | "resolve" => {
                if args.len() < 3 {
                    eprintln!("Usage: metatag resolve <path> [lang] [domain]");
                    std::process::exit(1);
                }
                let rendered = admin::resolve_once(
                    &resolve_data_dir(),
                    &args[2],
                    args.get(3).map(String::as_str),
                    args.get(4).map(String::as_str),
                )?;
                println!("{}", rendered);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_usage();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'metatag help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = metatag_core::MetatagConfig::from_env(&data_dir)?;
    let port = config.port;
    info!(
        "Site base URL: {}, front page: {}, default language: {}",
        config.base_url, config.front_page, config.default_language
    );

    let store = metatag_store::SqliteStore::open(&config.data_paths.db)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;

    let state = Arc::new(AppState::new(config, store));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Metatag server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
