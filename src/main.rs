use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use techlag::config::LagConfig;
use techlag::logging::{self, LogLevel};
use tracing::debug;

#[derive(Parser)]
#[command(name = "techlag")]
#[command(version, about = "Get technical lag for a PyPI package")]
struct Cli {
    /// Package to analyze
    package: String,

    /// Version to analyze
    version: String,

    /// Logging level for output
    #[arg(short, long, value_enum)]
    logging: Option<LogLevel>,

    /// Log file
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Config file (defaults to $XDG_CONFIG_HOME/techlag/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Package index base URL
    #[arg(long)]
    registry: Option<String>,

    /// Python interpreter used to introspect setup.py
    #[arg(long)]
    python: Option<String>,

    /// Report a package already on its own dependency path instead of recursing into it
    #[arg(long)]
    detect_cycles: bool,
}

impl Cli {
    fn apply_overrides(&self, mut config: LagConfig) -> LagConfig {
        if let Some(registry) = &self.registry {
            config.registry_url = registry.clone();
        }
        if let Some(python) = &self.python {
            config.python = python.clone();
        }
        if self.detect_cycles {
            config.detect_cycles = true;
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(cli.logging, cli.logfile.as_deref())?;
    debug!("Executed as: {:?}", std::env::args().collect::<Vec<_>>());

    let config = cli.apply_overrides(LagConfig::load(cli.config.as_deref())?);
    debug!("Config: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(techlag::lag::run(&config, &cli.package, &cli.version, &mut out))?;

    out.flush()?;
    Ok(())
}
