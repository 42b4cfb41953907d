//! Builds `loot.json` for a treasure datapack.

use anyhow::{Context, Result, bail};
use clap::Parser;
use lootscan_loot::{ExtractorSettings, LootExtractor, write_dataset};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "lootscan")]
#[command(about = "Resolve and deduplicate the chest loot of a treasure datapack", long_about = None)]
struct Cli {
    /// Datapack root directory
    #[arg(default_value = "pack")]
    pack_dir: PathBuf,

    /// Directory the dataset is written to
    #[arg(default_value = "out")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = ExtractorSettings::default();
    let output_file = settings.output_file.clone();
    let extraction = LootExtractor::new(&cli.pack_dir, settings)
        .extract()
        .with_context(|| format!("failed to read loot tables of {}", cli.pack_dir.display()))?;

    let path = write_dataset(&extraction.dataset, &cli.out_dir, &output_file)
        .context("failed to write loot dataset")?;
    info!(path = %path.display(), items = extraction.dataset.item_count(), "Done");

    for failure in &extraction.failures {
        error!(
            biome = %failure.biome,
            rarity = %failure.rarity,
            error = %failure.error,
            "Bucket failed"
        );
    }
    if !extraction.is_complete() {
        bail!("{} loot bucket(s) failed to resolve", extraction.failures.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn paths_default_to_pack_and_out() {
        let cli = Cli::try_parse_from(["lootscan"]).unwrap();
        assert_eq!(cli.pack_dir, PathBuf::from("pack"));
        assert_eq!(cli.out_dir, PathBuf::from("out"));

        let cli = Cli::try_parse_from(["lootscan", "datapack"]).unwrap();
        assert_eq!(cli.pack_dir, PathBuf::from("datapack"));
        assert_eq!(cli.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn help_is_not_a_path() {
        let err = Cli::try_parse_from(["lootscan", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(Cli::try_parse_from(["lootscan", "a", "b", "c"]).is_err());
    }
}
