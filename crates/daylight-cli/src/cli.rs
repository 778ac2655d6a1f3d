//! Command-line surface: parsing and dispatch.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use daylight::{FileStorage, OsColorScheme, StoreConfig, ThemeStore};

use crate::output::render;

#[derive(Parser, Debug)]
#[command(
    name = "daylight",
    version,
    about = "Show, set and toggle the light/dark/system theme preference"
)]
pub struct Cli {
    /// Preferences file (defaults to the platform config directory)
    #[arg(long, global = true, env = "DAYLIGHT_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// YAML file with store settings
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the preference, resolved theme and style flag (default)
    Show,
    /// Set the preference
    Set {
        #[arg(value_parser = ["light", "dark", "system"])]
        preference: String,
    },
    /// Light -> dark -> system; from system, the opposite of the OS theme
    Toggle,
    /// Follow OS color scheme changes
    Watch {
        /// Stop after this many notifications
        #[arg(long)]
        count: Option<usize>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Builds a file-backed store from the command line and runs the command.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => StoreConfig::default(),
    };
    let path = cli.store.clone().unwrap_or_else(FileStorage::default_path);
    tracing::debug!(path = %path.display(), "using preferences file");

    let mut store = ThemeStore::builder()
        .storage(FileStorage::new(path))
        .color_scheme(OsColorScheme::with_poll_interval(config.poll_interval()))
        .config(config)
        .build();

    let command = cli.command.unwrap_or(Command::Show);
    execute(&command, cli.output, &mut store, out)?;
    store.close();
    Ok(())
}

/// Runs one command against `store`.
pub fn execute(
    command: &Command,
    format: OutputFormat,
    store: &mut ThemeStore,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Show => render(&store.snapshot(), format, out),
        Command::Set { preference } => {
            store.set_preference_str(preference);
            render(&store.snapshot(), format, out)
        }
        Command::Toggle => {
            store.toggle_preference();
            render(&store.snapshot(), format, out)
        }
        Command::Watch { count } => watch(store, *count, format, out),
    }
}

fn watch(
    store: &mut ThemeStore,
    count: Option<usize>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    render(&store.snapshot(), format, out)?;

    let mut seen = 0;
    while count.map_or(true, |limit| seen < limit) {
        if !store.is_subscribed() {
            break;
        }
        if store.wait_for_signal(Duration::from_millis(500)) {
            seen += 1;
            render(&store.snapshot(), format, out)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<StoreConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("invalid config {}", path.display()))
}
