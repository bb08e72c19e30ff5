mod impact;
mod refs;
mod show;
mod symbols;
mod view;

use blastscope_api::SymbolService;
use blastscope_core::config::BlastscopeConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "blastscope",
    version,
    about = "Trace how a code change spreads through a codebase",
    long_about = "Blastscope maps the lines touched by a diff onto the symbols that contain them, \
                  then follows references outward until no new symbol is reached. The result is \
                  the set of code a reviewer should look at, grouped by file."
)]
pub struct Cli {
    /// TOML configuration file (defaults to ~/.blastscope/config.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Symbol service endpoint, e.g. http://localhost:4444/v1
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Answer symbol queries from a JSON snapshot instead of a live server
    #[arg(long, global = true, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the blast radius of a diff
    #[command(
        long_about = "Reads a unified diff from a file, from stdin, or from `git diff <REV>`, \
                      resolves the changed symbols and propagates through their references."
    )]
    Impact {
        /// Diff file to read; `-` or omitted reads stdin
        #[arg(value_name = "DIFF")]
        diff: Option<PathBuf>,

        /// Run `git diff <REV>` instead of reading a diff
        #[arg(long, value_name = "REV", conflicts_with = "diff")]
        rev: Option<String>,

        /// Repository the git diff runs in
        #[arg(long, value_name = "PATH", default_value = ".")]
        repo: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Stop after this many symbols
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Also print the source of affected symbols outside the diff
        #[arg(long)]
        related: bool,
    },
    /// Show which files use the symbols defined in a file
    Refs {
        #[arg(value_name = "FILE")]
        file: String,

        /// Print a Mermaid diagram instead of a table
        #[arg(long)]
        mermaid: bool,
    },
    /// List the definitions in a file
    Symbols {
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Print a symbol's source and its references
    Show {
        #[arg(value_name = "FILE")]
        file: String,

        #[arg(value_name = "SYMBOL")]
        symbol: String,

        /// Lines of context around each reference
        #[arg(long)]
        context: Option<u32>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Mermaid,
    Json,
}

/// Resolved configuration plus the service it points at.
pub struct Session {
    pub config: BlastscopeConfig,
    pub service: Arc<dyn SymbolService>,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = BlastscopeConfig::load(cli.config.as_deref())?;
        if let Some(url) = &cli.base_url {
            config.service.base_url = url.clone();
        }
        if let Some(path) = &cli.snapshot {
            config.service.snapshot = Some(path.clone());
        }
        let service = blastscope_runtime::build_symbol_service(&config.service)?;
        Ok(Self { config, service })
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = blastscope_runtime::init_logging("cli", cli.verbose);

    let session = Session::open(&cli)?;
    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Impact {
            diff,
            rev,
            repo,
            format,
            max_nodes,
            related,
        } => {
            let source = impact::DiffSource::pick(diff, rev, repo);
            rt.block_on(impact::run(&session, source, format, max_nodes, related))
        }
        Commands::Refs { file, mermaid } => rt.block_on(refs::run(&session, &file, mermaid)),
        Commands::Symbols { file } => rt.block_on(symbols::run(&session, &file)),
        Commands::Show {
            file,
            symbol,
            context,
        } => rt.block_on(show::run(&session, &file, &symbol, context)),
    }
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
    fn test_impact_defaults() {
        let cli = Cli::parse_from(["blastscope", "impact", "change.diff"]);
        match cli.command {
            Commands::Impact {
                diff, format, repo, ..
            } => {
                assert_eq!(diff, Some(PathBuf::from("change.diff")));
                assert_eq!(format, OutputFormat::Table);
                assert_eq!(repo, PathBuf::from("."));
            }
            _ => panic!("expected impact"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "blastscope",
            "show",
            "src/lib.rs",
            "run",
            "--snapshot",
            "snap.json",
            "--context",
            "3",
        ]);
        assert_eq!(cli.snapshot, Some(PathBuf::from("snap.json")));
        assert!(matches!(cli.command, Commands::Show { context: Some(3), .. }));
    }

    #[test]
    fn test_rev_conflicts_with_diff_file() {
        assert!(Cli::try_parse_from(["blastscope", "impact", "a.diff", "--rev", "HEAD~1"]).is_err());
    }
}
