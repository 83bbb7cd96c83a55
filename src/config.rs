//! Configuration management for the cycle expander.
//!
//! Handles:
//! - Command-line argument parsing
//! - User and project TOML configuration files
//! - Per-program modelines
//!
//! Priority, lowest first: defaults < user config < project config <
//! modeline < command line.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// File name of the project configuration looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".ccx.toml";

/// Number of lines scanned at the top and bottom of a program for a modeline
const MODELINE_SCAN_LINES: usize = 5;

/// Unit convention of the emitted `G4` dwell word
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DwellUnit {
    /// `G4 S<seconds>`
    #[default]
    Seconds,
    /// `G4 P<milliseconds>`
    Milliseconds,
}

impl DwellUnit {
    /// Word letter used in the dwell command
    pub fn letter(self) -> char {
        match self {
            DwellUnit::Seconds => 'S',
            DwellUnit::Milliseconds => 'P',
        }
    }
}

impl fmt::Display for DwellUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DwellUnit::Seconds => write!(f, "seconds"),
            DwellUnit::Milliseconds => write!(f, "milliseconds"),
        }
    }
}

impl FromStr for DwellUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "sec" | "seconds" => Ok(DwellUnit::Seconds),
            "ms" | "milliseconds" => Ok(DwellUnit::Milliseconds),
            other => bail!("Unknown dwell unit '{}'", other),
        }
    }
}

/// Settings that drive a conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpanderConfig {
    /// Drop an emitted line identical to the one right before it
    pub suppress_duplicate_lines: bool,
    /// Letter convention of generated dwell commands
    pub dwell_unit: DwellUnit,
    /// Round generated numbers to this many decimals; exact values when unset
    pub precision: Option<usize>,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            suppress_duplicate_lines: false,
            dwell_unit: DwellUnit::default(),
            precision: None,
        }
    }
}

/// A partial set of overrides from one configuration source
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub suppress_duplicate_lines: Option<bool>,
    pub dwell_unit: Option<DwellUnit>,
    pub precision: Option<usize>,
}

impl ConfigLayer {
    /// Parse a layer from TOML content
    pub fn from_toml_str(content: &str, source_path: Option<&Path>) -> Result<Self> {
        toml::from_str(content).with_context(|| match source_path {
            Some(path) => format!("Failed to parse config TOML: {}", path.display()),
            None => "Failed to parse config TOML".to_string(),
        })
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content, Some(path))
    }

    /// Detect a modeline in the program content
    ///
    /// Only the first and last few lines are checked, and only comments:
    /// `; ccx: dwell_unit=milliseconds suppress_duplicates=true precision=3`
    pub fn from_modeline(content: &str) -> Option<Self> {
        let lines: Vec<&str> = content.lines().collect();
        let check_lines: Vec<&str> = if lines.len() <= 2 * MODELINE_SCAN_LINES {
            lines
        } else {
            let mut check = Vec::new();
            check.extend_from_slice(&lines[..MODELINE_SCAN_LINES]);
            check.extend_from_slice(&lines[lines.len() - MODELINE_SCAN_LINES..]);
            check
        };

        let modeline_re = regex::Regex::new(r"^\s*[;(].*\bccx:\s*([^)]*)").ok()?;
        let setting_re = regex::Regex::new(r"(\w+)\s*=\s*([\w.]+)").ok()?;

        for line in check_lines {
            let Some(captures) = modeline_re.captures(line) else {
                continue;
            };
            let settings = captures.get(1)?.as_str();

            let mut layer = ConfigLayer::default();
            for setting in setting_re.captures_iter(settings) {
                let (key, value) = (&setting[1], &setting[2]);
                if let Err(e) = layer.set(key, value) {
                    log::warn!("Ignoring modeline setting {}={}: {}", key, value, e);
                }
            }
            return Some(layer);
        }

        None
    }

    /// Set one key from its textual value
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "suppress_duplicates" | "suppress_duplicate_lines" => {
                self.suppress_duplicate_lines = Some(
                    value
                        .parse()
                        .with_context(|| format!("'{}' is not a boolean", value))?,
                );
            }
            "dwell_unit" => self.dwell_unit = Some(value.parse()?),
            "precision" => {
                self.precision = Some(
                    value
                        .parse()
                        .with_context(|| format!("'{}' is not a precision", value))?,
                );
            }
            other => bail!("unknown key '{}'", other),
        }
        Ok(())
    }

    /// Apply the overrides carried by this layer
    pub fn apply_to(&self, config: &mut ExpanderConfig) {
        if let Some(suppress) = self.suppress_duplicate_lines {
            config.suppress_duplicate_lines = suppress;
        }
        if let Some(unit) = self.dwell_unit {
            config.dwell_unit = unit;
        }
        if let Some(precision) = self.precision {
            config.precision = Some(precision);
        }
    }
}

/// Format of the statistics report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsFormat {
    Text,
    Json,
}

/// Command-line arguments of `ccx`
#[derive(Debug, Default, Parser)]
#[command(name = "ccx")]
#[command(about = "Expand canned drilling cycles into explicit G0/G1/G4 moves")]
#[command(version)]
pub struct Args {
    /// Program to convert ('-' or omitted for stdin)
    pub input: Option<PathBuf>,

    /// Write the converted program to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Derive the output file name from the input (drills.nc -> drills.expanded.nc)
    #[arg(long, conflicts_with = "output")]
    pub derive_output: bool,

    /// Drop generated lines identical to the previous line
    #[arg(long)]
    pub suppress_duplicates: bool,

    /// Unit convention of emitted dwell commands
    #[arg(long, value_enum)]
    pub dwell_unit: Option<DwellUnit>,

    /// Decimal places of generated numbers
    #[arg(long)]
    pub precision: Option<usize>,

    /// Project configuration file (defaults to ./.ccx.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print conversion statistics to stderr
    #[arg(long, value_enum)]
    pub stats: Option<StatsFormat>,

    /// Log level for the converter
    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

impl Args {
    /// Overrides given on the command line
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            suppress_duplicate_lines: self.suppress_duplicates.then_some(true),
            dwell_unit: self.dwell_unit,
            precision: self.precision,
        }
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Input file, `None` for stdin
    pub input: Option<PathBuf>,
    /// Output file, `None` for stdout
    pub output: Option<PathBuf>,
    /// Statistics report format
    pub stats: Option<StatsFormat>,
    /// Log level
    pub log_level: String,
    /// Expander settings from defaults and configuration files
    pub expander: ExpanderConfig,
    /// Path of the project config that was loaded (for logging)
    pub project_config_path: Option<PathBuf>,
    cli_layer: ConfigLayer,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        let project_dir = std::env::current_dir().context("Failed to read working directory")?;
        Self::from_args_in(Args::parse(), dirs::config_dir(), &project_dir)
    }

    /// Create configuration from explicit arguments and directories (useful for testing)
    pub fn from_args_in(
        args: Args,
        user_config_dir: Option<PathBuf>,
        project_dir: &Path,
    ) -> Result<Self> {
        let mut expander = ExpanderConfig::default();

        // User-global config: ~/.config/ccx/config.toml
        if let Some(config_dir) = user_config_dir {
            let user_path = config_dir.join("ccx").join("config.toml");
            if user_path.is_file() {
                ConfigLayer::load(&user_path)?.apply_to(&mut expander);
                log::debug!("Loaded user config: {}", user_path.display());
            }
        }

        // Project config: explicit path must exist, the default one may not
        let project_config_path = match &args.config {
            Some(path) => Some(path.clone()),
            None => Some(project_dir.join(PROJECT_CONFIG_FILE)).filter(|p| p.is_file()),
        };
        if let Some(path) = &project_config_path {
            ConfigLayer::load(path)?.apply_to(&mut expander);
            log::debug!("Loaded project config: {}", path.display());
        }

        let input = args
            .input
            .clone()
            .filter(|path| path.as_os_str() != "-");
        let output = match (&args.output, args.derive_output) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => match &input {
                Some(path) => Some(derive_output_path(path)),
                None => bail!("--derive-output needs an input file"),
            },
            (None, false) => None,
        };

        Ok(Config {
            input,
            output,
            stats: args.stats,
            log_level: args.log_level.clone(),
            expander,
            project_config_path,
            cli_layer: args.layer(),
        })
    }

    /// Check whether a project configuration file was found
    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }

    /// Settings for a given program: files, then its modeline, then the command line
    pub fn expander_config_for(&self, program: &str) -> ExpanderConfig {
        let mut config = self.expander.clone();
        if let Some(layer) = ConfigLayer::from_modeline(program) {
            log::debug!("Applying modeline settings: {:?}", layer);
            layer.apply_to(&mut config);
        }
        self.cli_layer.apply_to(&mut config);
        config
    }
}

/// `drills.nc` -> `drills.expanded.nc`; `drills` -> `drills.expanded`
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}.expanded.{}", stem, ext.to_string_lossy()),
        None => format!("{}.expanded", stem),
    };
    input.with_file_name(name)
}
