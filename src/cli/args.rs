//! Command-line argument parsing
//!
//! This module defines the CLI structure using clap derive macros:
//! workspace materialization (`clone`), empty-workspace creation
//! (`init`), referenced-file downloads (`download`) and image metadata
//! inspection (`inspect`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// METS workspace resolver - fetch and cache digitised documents
#[derive(Parser, Debug)]
#[command(
    name = "mets_workspace",
    version,
    about = "Resolve, download and cache METS-described document workspaces",
    long_about = "A tool for materializing digitised-document workspaces from METS manifests.
Referenced files are fetched at most once, written atomically, and laid out by file group;
page images can be inspected for normalized technical metadata."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Materialize a workspace from a manifest URL or path
    Clone(CloneArgs),

    /// Create an empty workspace
    Init(InitArgs),

    /// Download files referenced by an existing workspace
    Download(DownloadArgs),

    /// Print normalized technical metadata of an image
    Inspect(InspectArgs),
}

/// Arguments for the clone command
#[derive(Args, Debug, Clone)]
pub struct CloneArgs {
    /// Manifest URL or local path
    #[arg(value_name = "METS_URL")]
    pub mets_url: String,

    /// Destination directory (a fresh temporary directory if omitted)
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Basename to store the manifest under
    #[arg(long, value_name = "NAME")]
    pub mets_basename: Option<String>,

    /// Keep an existing manifest instead of re-fetching it
    #[arg(long)]
    pub no_clobber: bool,

    /// Download all referenced files immediately
    #[arg(short = 'a', long)]
    pub download: bool,
}

/// Arguments for the init command
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Workspace directory (a fresh temporary directory if omitted)
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

/// Arguments for the download command
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Workspace directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Restrict to one file group
    #[arg(short, long, value_name = "GROUP")]
    pub group: Option<String>,

    /// Number of concurrent download workers
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,
}

/// Arguments for the inspect command
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Image file to inspect
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Emit JSON instead of the tagged single-line form
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level implied by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.global.very_verbose {
            "debug"
        } else if self.global.verbose {
            "info"
        } else if self.global.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_args_parse() {
        let cli = Cli::try_parse_from([
            "mets_workspace",
            "clone",
            "https://example.org/data/mets.xml",
            "--directory",
            "/tmp/ws",
            "--download",
        ])
        .unwrap();

        match cli.command {
            Commands::Clone(args) => {
                assert_eq!(args.mets_url, "https://example.org/data/mets.xml");
                assert_eq!(args.directory, Some(PathBuf::from("/tmp/ws")));
                assert!(args.download);
                assert!(!args.no_clobber);
            }
            other => panic!("expected clone, got {:?}", other),
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["mets_workspace", "-v", "init"]).unwrap();
        assert_eq!(cli.log_level(), "info");

        let cli = Cli::try_parse_from(["mets_workspace", "--very-verbose", "init"]).unwrap();
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::try_parse_from(["mets_workspace", "-q", "init"]).unwrap();
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn test_inspect_args_parse() {
        let cli =
            Cli::try_parse_from(["mets_workspace", "inspect", "page.tif", "--json"]).unwrap();
        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(args.image, PathBuf::from("page.tif"));
                assert!(args.json);
            }
            other => panic!("expected inspect, got {:?}", other),
        }
    }
}
