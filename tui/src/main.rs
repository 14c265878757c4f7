//! Smart Editor Entry Point
//!
//! Launches the billing counter's sale-line editor in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (service at http://localhost:8080/process-sale)
//! smart-editor
//!
//! # Custom service and config file
//! smart-editor --service-url http://billing:8080/process-sale --config ./counter.toml
//!
//! # Verbose logging (written to the log file, never the screen)
//! RUST_LOG=debug smart-editor
//! ```

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use smart_editor_core::{
    default_config_path, load_config_from_path, ConfigOverrides, EditorConfig,
    HttpRecognitionClient, LoggingConfig,
};
use smart_editor_tui::App;

/// Smart Editor - free-text sale-line entry for the billing counter
#[derive(Parser, Debug)]
#[command(name = "smart-editor")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "SMART_EDITOR_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Recognition service endpoint
    #[arg(short = 'u', long, value_name = "URL")]
    service_url: Option<String>,

    /// Recognition request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Confidence above which a chip is shown as high-confidence (0..1)
    #[arg(long, value_name = "THRESHOLD")]
    confidence_threshold: Option<f64>,

    /// Log file path
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(url) = &self.service_url {
            overrides = overrides.with_service_url(url.clone());
        }
        if let Some(ms) = self.timeout_ms {
            overrides = overrides.with_timeout_ms(ms);
        }
        if let Some(threshold) = self.confidence_threshold {
            overrides = overrides.with_high_confidence_threshold(threshold);
        }
        if let Some(path) = &self.log_file {
            overrides = overrides.with_log_file(path.clone());
        }
        overrides
    }
}

/// Load file and environment configuration, then apply CLI flags
fn resolve_config(args: &Args) -> Result<EditorConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(path).context("Failed to load configuration")?;
    args.overrides()
        .apply(&mut config)
        .context("Invalid command-line option")?;
    Ok(config)
}

/// Initialize logging to a file; the terminal belongs to the UI
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    if let Some(parent) = logging.file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logging.file)
        .with_context(|| format!("Failed to open log file: {:?}", logging.file))?;

    let level = &logging.level;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "smart_editor={level},smart_editor_tui={level},smart_editor_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    init_logging(&config.logging)?;

    tracing::info!(
        service = %config.service.url,
        source = %config.source(),
        "Starting smart editor"
    );

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: smart-editor requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  - Running in a non-interactive environment (CI, container)");
        eprintln!("  - SSH without -t flag");
        eprintln!("  - Piped stdin/stdout");
        std::process::exit(1);
    }

    let client = Arc::new(
        HttpRecognitionClient::from_config(&config.service)
            .context("Failed to create recognition client")?,
    );

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(client, &config.display);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Editor exited with error");
    }
    if let Some(farewell) = app.farewell() {
        println!("{farewell}");
    }

    // Propagate any errors
    result
}
