//! Types and functions for parsing and validating configuration from a YAML file.

use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use tracing::info;
use url::Url;

use crate::utils::{deserialize_using_parse, Millis};
use crate::window::LevelOrder;

/// Depth levels offered by the exchange's partial book depth streams.
const STREAM_DEPTH_LEVELS: [usize; 3] = [5, 10, 20];

static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| {
    // infallible, the pattern is a literal
    Regex::new(r"^[a-z0-9]{2,20}$").unwrap()
});

/// Instrument symbol, e.g. "BNBBTC". Case-insensitive, held lowercase.
/// Shown uppercase in the table header and used lowercase in the stream name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Symbol(String);

impl Symbol {
    pub fn lower(&self) -> &str {
        self.0.as_str()
    }

    pub fn upper(&self) -> String {
        self.0.to_uppercase()
    }
}

impl std::str::FromStr for Symbol {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_lowercase();
        if !SYMBOL_RE.is_match(&symbol) {
            bail!("invalid symbol: {s:?}");
        }
        Ok(Self(symbol))
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.upper())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_using_parse(deserializer)
    }
}

/// A target structure for deserializing the YAML config file.
/// Missing fields take their default value.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the viewer endpoint listens on.
    pub addr: SocketAddr,
    /// Instrument to stream. The operator is asked for it when absent.
    pub symbol: Option<Symbol>,
    /// Number of levels shown per side.
    pub depth: usize,
    pub level_order: LevelOrder,
    /// How long to wait for the exchange to acknowledge a close before dropping the connection.
    pub close_timeout_ms: Millis,
    pub ws_base_url: String,
    /// Push interval of the depth stream, 100 or 1000.
    pub update_speed_ms: Millis,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            symbol: None,
            depth: 15,
            level_order: LevelOrder::default(),
            close_timeout_ms: 1_000,
            ws_base_url: "wss://stream.binance.com:9443/ws".to_owned(),
            update_speed_ms: 100,
        }
    }
}

impl Config {
    /// Validate the configuration.
    pub fn validate(self) -> anyhow::Result<Self> {
        let max_depth = STREAM_DEPTH_LEVELS[STREAM_DEPTH_LEVELS.len() - 1];
        if self.depth > max_depth {
            bail!("depth too large, partial depth streams are limited to {max_depth} levels")
        } else if self.depth < 1 {
            bail!("depth must be greater than 0")
        }
        if !matches!(self.update_speed_ms, 100 | 1000) {
            bail!("update_speed_ms must be 100 or 1000")
        }
        if self.close_timeout_ms == 0 {
            bail!("close_timeout_ms must be greater than 0")
        }
        Url::parse(&self.ws_base_url).context("invalid ws_base_url")?;
        Ok(self)
    }

    /// The configured symbol, or one asked for on the terminal.
    pub fn symbol_or_prompt(&self) -> anyhow::Result<Symbol> {
        match &self.symbol {
            Some(symbol) => Ok(symbol.clone()),
            None => prompt_symbol(std::io::stdin().lock(), std::io::stdout()),
        }
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }

    /// Smallest partial depth stream covering the configured depth.
    pub fn stream_depth(&self) -> usize {
        STREAM_DEPTH_LEVELS
            .into_iter()
            .find(|&levels| levels >= self.depth)
            .unwrap_or(STREAM_DEPTH_LEVELS[STREAM_DEPTH_LEVELS.len() - 1])
    }

    /// Subscription identifier, e.g. "bnbbtc@depth20@100ms".
    pub fn stream_name(&self, symbol: &Symbol) -> String {
        format!(
            "{}@depth{}@{}ms",
            symbol.lower(),
            self.stream_depth(),
            self.update_speed_ms
        )
    }

    pub fn stream_url(&self, symbol: &Symbol) -> Result<Url, url::ParseError> {
        let base = self.ws_base_url.trim_end_matches('/');
        Url::parse(&format!("{base}/{}", self.stream_name(symbol)))
    }
}

/// Parse the config file and validate it. A missing file yields the defaults.
pub fn read_config(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let config = match std::fs::File::open(path) {
        Ok(f) => serde_yaml::from_reader(f)
            .with_context(|| format!("failed to parse config file {}", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no config file, using defaults");
            Config::default()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open config file {}", path.display()))
        }
    };
    Config::validate(config).context("invalid config")
}

/// Ask the operator which instrument to stream.
pub fn prompt_symbol(mut input: impl BufRead, mut output: impl Write) -> anyhow::Result<Symbol> {
    writeln!(
        output,
        "For which assets do you want to get orders? (e.g. BNBBTC, BTCUSDT...)"
    )?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read symbol")?;
    line.parse()
}
