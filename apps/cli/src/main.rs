//! Offline encode/decode/check utility over JSON files.
//!
//! Works on the same artifacts the editing UI exchanges with the
//! external system: a flat record (JSON string map), a nested protocol,
//! and the institution's unit table.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rearc_codec::{decode, encode, CrossRefRegistry};
use rearc_model::{FlatRecord, Protocol};
use rearc_rules::RuleEngine;
use rearc_units::UnitConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rearc", version, about = "Registry protocol mapping tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a flat record into a nested protocol with field states.
    Decode {
        /// Flat record as a JSON string map.
        record: PathBuf,
        /// Unit table as a JSON map of field name to unit code.
        #[arg(long)]
        units: Option<PathBuf>,
    },
    /// Encode a nested protocol into the flat record.
    Encode {
        /// Nested protocol as produced by `decode`.
        protocol: PathBuf,
        #[arg(long)]
        units: Option<PathBuf>,
    },
    /// Report validation states and completeness for a flat record.
    Check {
        record: PathBuf,
        #[arg(long)]
        units: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct DecodeReport {
    protocol: Protocol,
    states: rearc_rules::Evaluation,
    completeness: rearc_rules::Completeness,
}

#[derive(Serialize)]
struct CheckReport {
    valid: bool,
    violations: Vec<CheckViolation>,
    completeness: rearc_rules::Completeness,
}

#[derive(Serialize)]
struct CheckViolation {
    field: String,
    violation: rearc_rules::Violation,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    match Cli::parse().command {
        Command::Decode { record, units } => {
            let units = load_units(units.as_deref())?;
            let flat = load_json::<FlatRecord>(&record)?;
            let mut protocol = decode(&flat, &units).context("decoding failed")?;
            let engine = RuleEngine::new(units);
            let states = engine.evaluate(&mut protocol);
            let completeness = engine.completeness(&protocol, &states);
            tracing::info!(
                record_id = protocol.record_id,
                filled = completeness.filled,
                total = completeness.total,
                "decoded record"
            );
            print_json(&DecodeReport {
                protocol,
                states,
                completeness,
            })
        }
        Command::Encode { protocol, units } => {
            let units = load_units(units.as_deref())?;
            let mut protocol = load_json::<Protocol>(&protocol)?;
            let engine = RuleEngine::new(units.clone());
            let eval = engine.evaluate(&mut protocol);
            let completeness = engine.completeness(&protocol, &eval);
            let flat = encode(
                &protocol,
                &eval,
                completeness,
                &CrossRefRegistry::new(),
                &units,
            )
            .context("encoding failed")?;
            tracing::info!(
                record_id = protocol.record_id,
                valid = eval.is_valid(),
                "encoded record"
            );
            print_json(&flat)
        }
        Command::Check { record, units } => {
            let units = load_units(units.as_deref())?;
            let flat = load_json::<FlatRecord>(&record)?;
            let mut protocol = decode(&flat, &units).context("decoding failed")?;
            let engine = RuleEngine::new(units);
            let eval = engine.evaluate(&mut protocol);
            let completeness = engine.completeness(&protocol, &eval);
            let violations = eval
                .violations()
                .map(|(field, violation)| CheckViolation {
                    field: field.to_string(),
                    violation: violation.clone(),
                })
                .collect();
            print_json(&CheckReport {
                valid: eval.is_valid(),
                violations,
                completeness,
            })
        }
    }
}

fn load_units(path: Option<&Path>) -> Result<UnitConfig> {
    match path {
        Some(path) => load_json(path),
        None => Ok(UnitConfig::new()),
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("cannot parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
