#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the `SeniAURA` territorial analytics.
//!
//! Loads the dataset once, then runs one analytical tool and prints its
//! result as JSON, or starts the API server.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use seniaura_analytics_models::{FilterSpec, HealthIndicator, Pathology};

#[derive(Parser)]
#[command(name = "seniaura_cli", about = "Territorial cardiovascular health analytics")]
struct Cli {
    /// Configuration file (defaults to `SENIAURA_CONFIG`, then the
    /// built-in layout)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print dataset and catalogue statistics
    Summary,
    /// Evaluate range filters (`VARIABLE=LOW:HIGH`)
    Filter {
        /// Range filter, repeatable
        #[arg(long = "range", value_parser = commands::parse_filter)]
        ranges: Vec<FilterSpec>,
    },
    /// Rank territories by diagnostic gap
    Gap {
        /// Health measure (`INCI`, `MORT`, `PREV`)
        #[arg(long, default_value = "INCI")]
        indicator: HealthIndicator,
        /// Pathology (`AVC`, `CardIsch`, `InsuCard`, `CNR`)
        #[arg(long, default_value = "AVC")]
        pathology: Pathology,
        /// Context variable, repeatable
        #[arg(long = "context", required = true)]
        context: Vec<String>,
        /// Number of territories to list
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Cluster territories with K-Means
    Cluster {
        /// Variable, repeatable
        #[arg(long = "var", required = true)]
        variables: Vec<String>,
        /// Number of clusters
        #[arg(short, long, default_value_t = 3)]
        k: usize,
    },
    /// Profile territories against the regional distribution
    Radar {
        /// Axis variable, repeatable
        #[arg(long = "var", required = true)]
        variables: Vec<String>,
        /// Territory code, repeatable
        #[arg(long = "territory")]
        territories: Vec<String>,
    },
    /// Regress health outcomes on candidate determinants
    Screen {
        /// Outcome column, repeatable (defaults to the standard list)
        #[arg(long = "outcome")]
        outcomes: Vec<String>,
        /// Determinant column, repeatable (defaults to the standard list)
        #[arg(long = "determinant")]
        determinants: Vec<String>,
        /// Write all results to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Number of pairs to print
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// Start the API server on `BIND_ADDR:PORT`
    Serve,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let config = seniaura_territory::config::load_config(cli.config.as_deref())?;
    let dataset = seniaura_territory::load(&config)?;

    match cli.command {
        Commands::Summary => commands::summary(&dataset),
        Commands::Filter { ranges } => commands::filter(&dataset, &ranges)?,
        Commands::Gap {
            indicator,
            pathology,
            context,
            limit,
        } => commands::gap(&dataset, indicator, pathology, context, limit)?,
        Commands::Cluster { variables, k } => commands::cluster(&dataset, variables, k)?,
        Commands::Radar {
            variables,
            territories,
        } => commands::radar(&dataset, variables, territories)?,
        Commands::Screen {
            outcomes,
            determinants,
            output,
            top,
        } => commands::screen(&dataset, &outcomes, &determinants, output.as_deref(), top)?,
        Commands::Serve => {
            let (bind_addr, port) = seniaura_server::bind_from_env();
            actix_web::rt::System::new().block_on(seniaura_server::run_server(
                Arc::new(dataset),
                bind_addr,
                port,
            ))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_defaults_to_stroke_incidence() {
        let cli = Cli::try_parse_from(["seniaura_cli", "gap", "--context", "APL"]).unwrap();
        match cli.command {
            Commands::Gap {
                indicator,
                pathology,
                context,
                limit,
            } => {
                assert_eq!(indicator, HealthIndicator::Inci);
                assert_eq!(pathology, Pathology::Avc);
                assert_eq!(context, ["APL"]);
                assert_eq!(limit, None);
            }
            _ => panic!("expected the gap subcommand"),
        }
    }

    #[test]
    fn gap_parses_health_target_names() {
        let cli = Cli::try_parse_from([
            "seniaura_cli",
            "gap",
            "--indicator",
            "MORT",
            "--pathology",
            "InsuCard",
            "--context",
            "APL",
            "--context",
            "MED_SL",
            "--limit",
            "5",
        ])
        .unwrap();
        let Commands::Gap {
            indicator,
            pathology,
            context,
            limit,
        } = cli.command
        else {
            panic!("expected the gap subcommand");
        };
        assert_eq!(indicator, HealthIndicator::Mort);
        assert_eq!(pathology, Pathology::InsuCard);
        assert_eq!(context.len(), 2);
        assert_eq!(limit, Some(5));
    }

    #[test]
    fn unknown_pathology_is_rejected() {
        assert!(
            Cli::try_parse_from([
                "seniaura_cli",
                "gap",
                "--pathology",
                "Flu",
                "--context",
                "APL"
            ])
            .is_err()
        );
    }

    #[test]
    fn filter_ranges_and_global_config() {
        let cli = Cli::try_parse_from([
            "seniaura_cli",
            "filter",
            "--range",
            "APL=1:3",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        let Commands::Filter { ranges } = cli.command else {
            panic!("expected the filter subcommand");
        };
        assert_eq!(ranges, [FilterSpec::new("APL", 1.0, 3.0)]);
    }
}
