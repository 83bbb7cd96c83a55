//! Command-line front end
//!
//! Reads a program from a file or stdin, converts it and writes the result
//! to a file or stdout. Statistics go to stderr so stdout stays a program.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{Config, StatsFormat};
use crate::expander::CycleExpander;
use crate::stats::ProgramStats;

/// Run the `ccx` command
pub fn run() -> Result<()> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if let Some(path) = &config.project_config_path {
        log::info!("Using project config: {}", path.display());
    }

    let program = read_input(config.input.as_deref())?;

    let expander_config = config.expander_config_for(&program);
    log::debug!(
        "Expanding with dwell unit {}, precision {:?}, duplicate suppression {}",
        expander_config.dwell_unit,
        expander_config.precision,
        expander_config.suppress_duplicate_lines
    );

    let mut expander = CycleExpander::new(expander_config);
    expander.set_program(&program);
    let output = expander.convert();

    write_output(config.output.as_deref(), &output)?;

    if let Some(format) = config.stats {
        let report = render_stats(expander.stats(), format)?;
        eprintln!("{}", report);
    }

    Ok(())
}

/// Read the whole program from a file, or stdin when no path is given
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read program: {}", path.display())),
        None => {
            let mut program = String::new();
            io::stdin()
                .read_to_string(&mut program)
                .context("Failed to read program from stdin")?;
            Ok(program)
        }
    }
}

/// Write the converted program to a file, or stdout when no path is given
pub fn write_output(path: Option<&Path>, output: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("Failed to write program: {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .context("Failed to write program to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Render statistics for the terminal
pub fn render_stats(stats: &ProgramStats, format: StatsFormat) -> Result<String> {
    match format {
        StatsFormat::Json => {
            serde_json::to_string_pretty(stats).context("Failed to serialize statistics")
        }
        StatsFormat::Text => Ok(format!(
            "input: {} lines, {} chars ({} cycles, {} holes)\noutput: {} lines, {} chars",
            stats.input_lines,
            stats.input_chars,
            stats.cycles_count,
            stats.holes_count,
            stats.output_lines,
            stats.output_chars
        )),
    }
}
