use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "densegroup")]
#[command(
    about = "Group named items into labeled clusters by embedding density",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: .densegroup.toml in this or a parent directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Vector store directory
    #[arg(long = "store-dir", global = true)]
    pub store_dir: Option<PathBuf>,

    /// Collection name inside the store
    #[arg(long, global = true, env = "COLLECTION_NAME")]
    pub collection: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed the items of a CSV file and add them to the store
    Index {
        /// CSV file with `id` and `name` columns
        input: PathBuf,

        /// Ignore any saved checkpoint and embed everything again
        #[arg(long = "no-resume")]
        no_resume: bool,
    },

    /// Cluster the stored items and write grouped records
    Cluster {
        /// Smallest cluster to keep; also the neighbor rank for density
        #[arg(short = 'm', long = "min-cluster-size", env = "MIN_CLUSTER_SIZE")]
        min_cluster_size: Option<usize>,

        /// Directory for the record files (default: current directory)
        #[arg(short, long = "output-dir")]
        output_dir: Option<PathBuf>,

        /// Record file format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Number of groups to preview
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Show the size of the collection and a sample item
    Inspect,

    /// Remove every item from the collection
    Clear,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cluster_flags() {
        let cli = Cli::try_parse_from([
            "densegroup",
            "cluster",
            "--min-cluster-size",
            "3",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbosity, 2);
        match cli.command {
            Commands::Cluster {
                min_cluster_size,
                format,
                top,
                ..
            } => {
                assert_eq!(min_cluster_size, Some(3));
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(top, 5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_index_requires_input() {
        assert!(Cli::try_parse_from(["densegroup", "index"]).is_err());
    }
}
