//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// repolens - browse GitHub repositories without cloning
///
/// Imports a snapshot of a repository into a local cache and serves its
/// tree and files from there.
#[derive(Parser, Debug)]
#[command(name = "repolens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "REPOLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the repository cache
    #[arg(long, global = true, env = "REPOLENS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// GitHub access token (raises rate limits, allows private repositories)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a repository snapshot into the cache
    Import(ImportArgs),

    /// Refresh a cached repository from its default branch
    Update(KeyArgs),

    /// List cached repositories
    List(ListArgs),

    /// Show metadata of a cached repository
    Info(InfoArgs),

    /// Show the file tree of a cached repository
    Tree(TreeArgs),

    /// Print a file from a cached repository
    Cat(CatArgs),

    /// Remove a repository from the cache
    Rm(RmArgs),

    /// Print the local directory of a cached repository
    Path(KeyArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the import command
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Repository URL or owner/repo, optionally with @branch or /tree/<branch>
    pub reference: String,
}

/// Arguments naming one cached repository
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Cache key (see `repolens list`) or owner/repo
    pub key: String,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Cache key or owner/repo
    pub key: String,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the tree command
#[derive(Parser, Debug)]
pub struct TreeArgs {
    /// Cache key or owner/repo
    pub key: String,

    /// Output format (plain prints one file path per line)
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the cat command
#[derive(Parser, Debug)]
pub struct CatArgs {
    /// Cache key or owner/repo
    pub key: String,

    /// File path relative to the repository root
    pub path: String,

    /// Print the full read result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the rm command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Cache key or owner/repo
    pub key: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., network.stall_timeout_secs)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_import() {
        let cli = Cli::parse_from(["repolens", "import", "octo/hello@dev"]);
        match cli.command {
            Commands::Import(args) => assert_eq!(args.reference, "octo/hello@dev"),
            _ => panic!("expected Import command"),
        }
    }

    #[test]
    fn cli_parses_cat() {
        let cli = Cli::parse_from(["repolens", "cat", "octo_hello", "src/main.rs", "--json"]);
        match cli.command {
            Commands::Cat(args) => {
                assert_eq!(args.key, "octo_hello");
                assert_eq!(args.path, "src/main.rs");
                assert!(args.json);
            }
            _ => panic!("expected Cat command"),
        }
    }

    #[test]
    fn cli_parses_list_format() {
        let cli = Cli::parse_from(["repolens", "list", "--format", "json"]);
        match cli.command {
            Commands::List(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("expected List command"),
        }
    }

    #[test]
    fn list_defaults_to_table() {
        let cli = Cli::parse_from(["repolens", "list"]);
        match cli.command {
            Commands::List(args) => assert_eq!(args.format, OutputFormat::Table),
            _ => panic!("expected List command"),
        }
    }

    #[test]
    fn cli_parses_rm_yes() {
        let cli = Cli::parse_from(["repolens", "rm", "octo_hello", "-y"]);
        match cli.command {
            Commands::Rm(args) => {
                assert_eq!(args.key, "octo_hello");
                assert!(args.yes);
            }
            _ => panic!("expected Rm command"),
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "repolens",
            "tree",
            "octo_hello",
            "--data-dir",
            "/tmp/lens",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/lens")));
        assert!(matches!(cli.command, Commands::Tree(_)));
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["repolens", "config", "init", "--force"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Init { force }),
            }) => assert!(force),
            _ => panic!("expected Config Init"),
        }
    }

    #[test]
    fn cli_parses_config_without_action() {
        let cli = Cli::parse_from(["repolens", "config"]);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs { action: None })
        ));
    }

    #[test]
    fn cat_requires_path() {
        assert!(Cli::try_parse_from(["repolens", "cat", "octo_hello"]).is_err());
    }

    #[test]
    fn cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
