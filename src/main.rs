mod api;
mod app;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod logging;
mod nav;
mod preview_content;
mod state;
mod theme;
mod tui;
mod ui;
mod upload;
mod worker;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use crate::api::client::HttpFileApi;
use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, LogConfig, ServerConfig, ThemeConfig};
use crate::event::{Event, EventHandler};
use crate::state::SharedUiState;
use crate::tui::{install_panic_hook, Tui};
use crate::worker::Worker;

/// A terminal browser for webfs file servers.
#[derive(Parser, Debug)]
#[command(name = "wfs", version, about)]
struct Cli {
    /// Remote directory to open (relative to the served root)
    #[arg(default_value = "/")]
    path: String,

    /// Server URL, e.g. http://127.0.0.1:8000
    #[arg(short, long)]
    server: Option<String>,

    /// Route prefix the file API is mounted under
    #[arg(long)]
    prefix: Option<String>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in manage mode
    #[arg(short, long)]
    manage: bool,

    /// Color scheme: dark or light
    #[arg(long)]
    theme: Option<String>,

    /// Directory downloads are saved to
    #[arg(long)]
    download_dir: Option<String>,

    /// Log filter, e.g. info or debug
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Config overrides from command-line flags.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                url: self.server.clone(),
                prefix: self.prefix.clone(),
                ..Default::default()
            },
            general: GeneralConfig {
                manage: self.manage.then_some(true),
                download_dir: self.download_dir.clone(),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                ..Default::default()
            },
            log: LogConfig {
                level: self.log_level.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    // A broken log file should not keep the browser from starting.
    if let Err(e) = logging::init(config.log_level(), &config.log_file()) {
        eprintln!("warning: {}", e);
    }

    let api = HttpFileApi::new(config.api_base(), config.request_timeout())?;
    info!(base = %api.base().prefix(), path = %cli.path, "starting");

    install_panic_hook();

    let ui_state = SharedUiState::new(config.theme_scheme());
    let mut app = App::new(&config, ui_state, &cli.path);
    let mut events = EventHandler::new(Duration::from_millis(100));
    let mut worker = Worker::new(Arc::new(api), events.sender(), config.download_dir());

    let mut tui = Tui::new()?;
    worker.dispatch_all(app.start());

    let result = run(&mut tui, &mut app, &mut events, &mut worker).await;
    tui.restore()?;
    if let Err(e) = &result {
        error!(error = %e, "exiting with error");
    }
    result
}

async fn run(
    tui: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
    worker: &mut Worker,
) -> error::Result<()> {
    loop {
        tui.draw(app)?;

        let commands = match events.next().await? {
            Event::Key(key) => handler::handle_key_event(app, key),
            Event::Tick => {
                app.clear_expired_status();
                Vec::new()
            }
            Event::Resize(_, _) => Vec::new(),
            Event::ListingLoaded {
                ticket,
                path,
                result,
            } => app.handle_listing_loaded(ticket, &path, result),
            Event::TextLoaded {
                ticket,
                target,
                result,
            } => {
                app.handle_text_loaded(ticket, target, result);
                Vec::new()
            }
            Event::UploadProgress {
                index,
                status,
                message,
            } => {
                app.handle_upload_progress(index, status, message);
                Vec::new()
            }
            Event::UploadFinished => app.handle_upload_finished(),
            Event::OperationComplete(result) => app.handle_operation_complete(result),
        };
        worker.dispatch_all(commands);

        if app.should_quit {
            info!("quit");
            return Ok(());
        }
    }
}
