//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Command line for the WellSight viewer.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "wellsight", about = "Reservoir simulation summary viewer")]
pub struct ViewerArgs {
    /// Path to configuration file (defaults to <config dir>/wellsight/config.json5).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Summary fixtures to open (JSON5).
    pub fixtures: Vec<PathBuf>,

    /// Live streams to connect to, as host:port.
    #[arg(long, value_parser = parse_endpoint)]
    pub connect: Vec<(String, u16)>,

    /// Number of synthetic demo sources to add.
    #[arg(long, default_value_t = 0)]
    pub demo: usize,

    /// Seed for demo data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Pull new samples this many times before rendering.
    #[arg(long, default_value_t = 0)]
    pub refresh: usize,

    /// Item name filter.
    #[arg(long)]
    pub name: Option<String>,

    /// Well/group/region name filter.
    #[arg(long)]
    pub secondary: Option<String>,

    /// Index filter.
    #[arg(long)]
    pub index: Option<String>,

    /// Catalog positions for the left axis; the first replaces, the rest append.
    #[arg(long, value_delimiter = ',')]
    pub left: Vec<usize>,

    /// Catalog positions for the right axis; the first replaces, the rest append.
    #[arg(long, value_delimiter = ',')]
    pub right: Vec<usize>,

    /// Show values under a cursor at this time (Unix milliseconds).
    #[arg(long, allow_hyphen_values = true)]
    pub cursor: Option<i64>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ViewerArgs {
    /// Configuration file to load, if any.
    ///
    /// An explicit `--config` is always returned. Otherwise the default
    /// location is used only when that file exists.
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }

        dirs::config_dir()
            .map(|dir| dir.join("wellsight").join("config.json5"))
            .filter(|path| path.exists())
    }
}

/// Parse a `host:port` endpoint.
pub fn parse_endpoint(value: &str) -> Result<(String, u16), String> {
    let (host, port) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected host:port, got '{}'", value))?;
    if host.is_empty() {
        return Err(format!("missing host in '{}'", value));
    }
    let port = port
        .parse::<u16>()
        .map_err(|e| format!("invalid port in '{}': {}", value, e))?;
    Ok((host.to_string(), port))
}
