use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use termenu::core::config::{self, ConfigError, ResolvedConfig};
use termenu::menus::build_app;
use termenu::tui::{self, theme::Theme};

#[derive(Parser)]
#[command(name = "termenu", version, about = "Menu-driven terminal launcher")]
struct Args {
    /// Config file (defaults to ~/.termenu/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Items shown per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Where log output goes; never the terminal
    #[arg(long, default_value = "termenu.log")]
    log_file: PathBuf,

    /// Log level, overriding the config file
    #[arg(long)]
    log_level: Option<LevelFilter>,
}

fn load(args: &Args) -> Result<ResolvedConfig, ConfigError> {
    let file = config::load_config(args.config.as_deref())?;
    config::resolve(&file, args.page_size)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let loaded = load(&args);

    // Initialize file logger - the terminal belongs to the UI
    let level = args
        .log_level
        .or_else(|| loaded.as_ref().ok()?.log_level.parse().ok())
        .unwrap_or(LevelFilter::Debug);
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let resolved = match loaded {
        Ok(resolved) => resolved,
        Err(e) => {
            log::error!("Configuration failed: {}", e);
            eprintln!("termenu: {e}");
            std::process::exit(2);
        }
    };

    let app = match build_app(&resolved) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Could not build menus: {}", e);
            eprintln!("termenu: {e}");
            std::process::exit(2);
        }
    };

    log::info!(
        "termenu starting: '{}' with {} menus, page size {}",
        resolved.title,
        resolved.menus.len(),
        resolved.page_size
    );

    tui::run(app, Theme::from_map(&resolved.style)).await
}
