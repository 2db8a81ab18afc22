mod api;
mod model;
mod screens;
mod session;
mod ui;

use anyhow::{Context, Result};
use api::{EntityService, RestClient};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use model::Gym;
use ratatui::{backend::CrosstermBackend, Terminal};
use session::Session;
use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{run_app, App};

#[derive(Parser, Debug)]
#[command(name = "gym-console")]
#[command(about = "TUI console for the gym challenge platform", long_about = None)]
struct Args {
    /// REST API base URL
    #[arg(short, long, env = "GYM_API_URL", default_value = "http://localhost:3000")]
    server: String,

    /// Where the session token is kept between runs
    #[arg(long, env = "GYM_SESSION_FILE", default_value = ".gym-session.json")]
    session_file: PathBuf,

    /// Gym whose challenges the owner view manages
    #[arg(long, env = "GYM_ID")]
    gym_id: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "GYM_TIMEOUT_SECS", default_value_t = 5)]
    timeout_secs: u64,

    /// Log file (the terminal is taken by the UI)
    #[arg(long, env = "GYM_LOG_FILE", default_value = "gym-console.log")]
    log_file: PathBuf,

    /// Check connection and list gyms without starting TUI
    #[arg(long)]
    check: bool,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        original_hook(panic_info);
    }));

    let session = Session::load(&args.session_file)?;
    let request_timeout = Duration::from_secs(args.timeout_secs);
    let client = RestClient::new(&args.server, session, request_timeout)
        .context("cannot build HTTP client")?;
    info!(server = %client.base_url(), gym_id = ?args.gym_id, "starting");

    // Check mode - test connection and exit
    if args.check {
        println!("Testing {}...", client.base_url());
        match timeout(request_timeout, EntityService::<Gym>::list(&client)).await {
            Ok(Ok(gyms)) => {
                println!("✅ Server is healthy!");
                println!("Found {} gyms:", gyms.len());
                for g in gyms {
                    println!("  - {} ({})", g.name, g.id.unwrap_or_default());
                }
            }
            Ok(Err(e)) => {
                eprintln!("❌ API call failed: {}", e);
                eprintln!("Make sure the gym API is running on {}", client.base_url());
                std::process::exit(1);
            }
            Err(_) => {
                eprintln!("❌ API call timed out after {} seconds", args.timeout_secs);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let app = App::new(client, args.gym_id);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    cleanup_terminal();
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
