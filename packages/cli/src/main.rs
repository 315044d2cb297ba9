#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for coverage map lookups.
//!
//! Runs the same locality, street, number and coverage lookups the site
//! uses, against the database named by `DATABASE_URL`, and prints the
//! result as JSON. `operator-name` needs no database.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use coverage_map_address_models::BoundingBox;
use coverage_map_database::store::PgAddressStore;
use coverage_map_resolver::{Resolver, ResolverConfig, normalize_operator_name};
use serde::Serialize;

/// Query the coverage map address and coverage store.
#[derive(Parser)]
#[command(name = "coverage_map_cli")]
#[command(about = "Query the coverage map address and coverage store")]
struct Cli {
    /// Resolver config file (TOML). `COVERAGE_MAP_*` variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Suggest localities for a partial name.
    Localities {
        /// Partial locality name.
        query: String,

        /// Maximum number of candidates.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Suggest canonical streets under a locality.
    Streets {
        /// Locality code from `localities`.
        locality_code: String,

        /// Partial street name.
        query: String,
    },

    /// Suggest building numbers under a locality and street.
    Numbers {
        /// Locality code from `localities`.
        locality_code: String,

        /// Partial building number.
        query: String,

        /// Raw street spelling from `streets` (repeatable). Omit for
        /// localities without streets.
        #[arg(long = "street")]
        streets: Vec<String>,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List buildings an operator serves inside a map viewport.
    Coverage {
        /// Operator id.
        operator_id: i64,

        /// Viewport as `west,south,east,north`.
        #[arg(long, allow_hyphen_values = true)]
        bbox: String,
    },

    /// Show the display name derived from a registered business name.
    OperatorName {
        /// Registered business name.
        raw: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OperatorName<'a> {
    raw: &'a str,
    display_name: String,
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn connect(config: ResolverConfig) -> Result<Resolver, Box<dyn std::error::Error>> {
    let db = coverage_map_database::db::connect_from_env().await?;
    let store = PgAddressStore::new(Arc::from(db));
    Ok(Resolver::new(Arc::new(store), config))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    if let Commands::OperatorName { raw } = &cli.command {
        return print_json(&OperatorName {
            raw,
            display_name: normalize_operator_name(raw),
        });
    }

    let config = ResolverConfig::load(cli.config.as_deref())?;
    log::debug!("Resolver config: {config:?}");
    let resolver = connect(config).await?;

    match cli.command {
        Commands::Localities { query, limit } => {
            print_json(&resolver.resolve_localities(&query, limit).await)
        }
        Commands::Streets {
            locality_code,
            query,
        } => print_json(&resolver.resolve_streets(&locality_code, &query).await),
        Commands::Numbers {
            locality_code,
            query,
            streets,
            limit,
        } => print_json(
            &resolver
                .resolve_numbers(&locality_code, &streets, &query, limit)
                .await,
        ),
        Commands::Coverage { operator_id, bbox } => {
            let bbox = BoundingBox::from_bbox_str(&bbox)
                .ok_or_else(|| format!("Invalid bbox {bbox:?}, expected west,south,east,north"))?;
            print_json(&resolver.query_coverage_box(operator_id, &bbox).await)
        }
        Commands::OperatorName { .. } => Ok(()),
    }
}
