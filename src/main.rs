use clap::Parser;
use docchat::api::DocumentId;
use docchat::core::config;
use docchat::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "docchat", about = "Chat with your PDF documents from the terminal")]
struct Args {
    /// Backend API root, e.g. http://localhost:8000/api/v1
    #[arg(long)]
    base_url: Option<String>,

    /// Open this document id on startup
    #[arg(short, long)]
    document: Option<String>,

    /// Log level for docchat.log (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to docchat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("docchat.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    let file_config = config::load_config()?;
    let resolved = config::resolve(&file_config, args.base_url.as_deref());
    log::info!("docchat starting up, backend at {}", resolved.base_url);

    tui::run(resolved, args.document.map(DocumentId::new))?;
    Ok(())
}
