//! seedtree — derive public key nodes from entropy
//!
//! Reads a profile list from TOML, runs the derivation pipeline once per
//! profile and prints the public key, chain code and fingerprints. Private
//! keys are never printed.
//!
//! # Usage
//!
//! ```bash
//! SEEDTREE_ENTROPY=000102030405060708090a0b0c0d0e0f seedtree --config seedtree.toml
//! seedtree --config seedtree.toml --random --json
//! seedtree --config seedtree.toml --validate
//! ```

mod config;
mod report;

use anyhow::{Context, Result};
use std::path::PathBuf;
use zeroize::Zeroizing;

fn main() -> Result<()> {
    // Security hardening: disable core dumps to prevent seed material leaking to disk
    seedtree_core::memory::disable_core_dumps();

    // Small flag set, parsed by hand
    let args: Vec<String> = std::env::args().collect();

    let mut config_path = PathBuf::from("seedtree.toml");
    let mut validate_only = false;
    let mut json = false;
    let mut random = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i < args.len() {
                    config_path = PathBuf::from(&args[i]);
                } else {
                    anyhow::bail!("--config requires a path argument");
                }
            }
            "--validate" => {
                validate_only = true;
            }
            "--json" => {
                json = true;
            }
            "--random" => {
                random = true;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("seedtree {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other => {
                anyhow::bail!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    // Load config
    let mut cli_config = config::CliConfig::from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Apply env overrides
    cli_config.apply_env_overrides();

    // Validate
    cli_config
        .validate()
        .context("Configuration validation failed")?;

    // Init logger
    std::env::set_var("RUST_LOG", &cli_config.general.log_level);
    env_logger::init();

    if validate_only {
        println!("✅ Configuration is valid.");
        println!("  Log level:     {}", cli_config.general.log_level);
        println!("  Entropy len:   {} bytes", cli_config.general.entropy_len);
        for profile in &cli_config.profiles {
            println!(
                "  Profile:       {} ({} {})",
                profile.label, profile.curve, profile.path
            );
        }
        return Ok(());
    }

    let entropy = if random {
        log::warn!("using fresh random entropy; it is not stored anywhere");
        seedtree_core::generate_entropy(cli_config.general.entropy_len)
            .context("Failed to generate entropy")?
    } else {
        read_entropy()?
    };
    let passphrase = Zeroizing::new(std::env::var("SEEDTREE_PASSPHRASE").unwrap_or_default());

    let reports = report::derive_profiles(&cli_config.profiles, &entropy, &passphrase)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("Failed to encode JSON")?
        );
    } else {
        print!("{}", report::render_text(&reports));
    }

    Ok(())
}

/// Hex entropy from `SEEDTREE_ENTROPY`.
fn read_entropy() -> Result<Zeroizing<Vec<u8>>> {
    let encoded = Zeroizing::new(
        std::env::var("SEEDTREE_ENTROPY")
            .context("SEEDTREE_ENTROPY is not set (or pass --random)")?,
    );
    let entropy = hex::decode(encoded.trim()).context("SEEDTREE_ENTROPY is not valid hex")?;
    Ok(Zeroizing::new(entropy))
}

fn print_help() {
    println!(
        r#"seedtree — deterministic key tree derivation

USAGE:
    seedtree [OPTIONS]

OPTIONS:
    -c, --config <PATH>   Config file path (default: seedtree.toml)
    --validate            Validate config file and exit
    --json                Print results as JSON
    --random              Use fresh OS entropy instead of SEEDTREE_ENTROPY
    -h, --help            Show this help message
    -V, --version         Show version

ENVIRONMENT VARIABLES:
    SEEDTREE_ENTROPY      Entropy as hex (16, 20, 24, 28 or 32 bytes)
    SEEDTREE_PASSPHRASE   Optional passphrase
    SEEDTREE_LOG_LEVEL    Log level (error/warn/info/debug/trace)
    SEEDTREE_ENTROPY_LEN  Entropy length in bytes for --random

EXAMPLES:
    # Derive every profile in the config
    SEEDTREE_ENTROPY=000102030405060708090a0b0c0d0e0f seedtree -c seedtree.toml

    # Try a configuration with throwaway entropy
    seedtree -c seedtree.toml --random --json

    # Validate configuration
    seedtree -c seedtree.toml --validate
"#
    );
}
