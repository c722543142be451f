//! Retro Builder
//!
//! Reads a game list, finds each game in local ROM collections and lays the
//! results out as `Roms/<SYSTEM>/` plus a `BIOS/` folder, ready to copy onto
//! a handheld's SD card.

use anyhow::{Context, Result};
use clap::Parser;
use retro_config::BuilderConfig;
use retro_organizer::Organizer;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "retro-builder", version, about)]
struct Cli {
    /// Game list (CSV or TSV) with name and system columns
    catalog: PathBuf,

    /// Directories to search for ROM files
    #[arg(long = "rom-dirs", required = true, num_args = 1..)]
    rom_dirs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "muOS_Complete")]
    output: PathBuf,

    /// Match only; leave ROMs where they are
    #[arg(long)]
    no_copy: bool,

    /// Configuration file (defaults to the system and user config)
    #[arg(long, env = "RETRO_BUILDER_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => BuilderConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BuilderConfig::load_default().context("Failed to load configuration")?,
    };
    if cli.no_copy {
        config.placement.copy_roms = false;
    }

    info!("Retro Builder v{}", env!("CARGO_PKG_VERSION"));
    info!("Game list: {}", cli.catalog.display());
    info!("Output: {}", cli.output.display());

    let organizer = Organizer::new(config, &cli.catalog, cli.rom_dirs, &cli.output);
    let report = organizer.run().await.context("Organization failed")?;

    info!(
        "Done: {} of {} games ready",
        report.stats.found, report.stats.total
    );
    Ok(())
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::try_parse_from([
            "retro-builder",
            "games.csv",
            "--rom-dirs",
            "/mnt/roms",
            "/media/usb",
        ])
        .unwrap();

        assert_eq!(cli.catalog, PathBuf::from("games.csv"));
        assert_eq!(cli.rom_dirs.len(), 2);
        assert_eq!(cli.output, PathBuf::from("muOS_Complete"));
        assert!(!cli.no_copy);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_requires_rom_dirs() {
        assert!(Cli::try_parse_from(["retro-builder", "games.csv"]).is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "retro-builder",
            "games.tsv",
            "--rom-dirs",
            "/roms",
            "-o",
            "/sdcard",
            "--no-copy",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(cli.output, PathBuf::from("/sdcard"));
        assert!(cli.no_copy);
        assert!(cli.verbose);
    }
}
