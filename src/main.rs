use chatbox::core::config::{self, ChatConfig, CliOverrides};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "chatbox", about = "Terminal chat panel")]
struct Args {
    /// Identity to post as (overrides config and CHATBOX_CLIENT_ID)
    #[arg(long)]
    client_id: Option<String>,

    /// Author whose messages get the featured badge
    #[arg(long)]
    featured_author: Option<String>,

    /// Make every send fail, to exercise the error path
    #[arg(long)]
    fail_sends: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to chatbox.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("chatbox.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {}", e);
        ChatConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            client_id: args.client_id.as_deref(),
            featured_author: args.featured_author.as_deref(),
            fail_sends: args.fail_sends,
        },
    );

    log::info!(
        "Chatbox starting up as {:?} (featured author: {:?})",
        resolved.client_id,
        resolved.appearance.featured_author
    );

    chatbox::tui::run(resolved)
}
