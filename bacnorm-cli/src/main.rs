use anyhow::{Context, Result, bail};
use bacnorm_ingest::{StatementKind, normalize};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod state;

use config::{Config, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "bacnorm",
    version,
    about = "Normalize BAC Credomatic CSV statement exports"
)]
struct Cli {
    /// Config file (default: ~/.bacnorm/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a credit card statement export (9 columns, no header)
    CreditCard(NormalizeArgs),

    /// Normalize an account statement export (17 columns, no header)
    Account(NormalizeArgs),

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// Path to the CSV export
    file: PathBuf,

    /// Output format (default: from config, csv)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print row count and per-currency totals to stderr
    #[arg(long)]
    summary: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = config::resolve_config_path(cli.config.as_deref(), state::home_dir().as_deref());
    let cfg = config::load_config_or_default(config_path.as_deref())?;
    init_tracing(&cfg.log.filter);

    match cli.command {
        Command::CreditCard(args) => {
            run_normalize(StatementKind::CreditCard, &args, &cfg)?;
        }

        Command::Account(args) => {
            run_normalize(StatementKind::BankAccount, &args, &cfg)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                let path = config_path.context("HOME is not set; pass --config")?;
                config::init_config(&path)?;
            }
            ConfigCommand::Show => {
                match &config_path {
                    Some(path) => println!("# {}", path.display()),
                    None => println!("# defaults (HOME is not set)"),
                }
                print!("{}", config::render_config(&cfg)?);
            }
        },
    }

    Ok(())
}

/// RUST_LOG wins over the config file's `log.filter`. Logs go to stderr.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_normalize(kind: StatementKind, args: &NormalizeArgs, cfg: &Config) -> Result<()> {
    if !args.file.exists() {
        bail!("CSV not found: {}", args.file.display());
    }

    let table = normalize(kind, &args.file)
        .with_context(|| format!("normalizing {} statement {}", kind, args.file.display()))?;

    let format = args.format.unwrap_or(cfg.output.format);
    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            output::write_table(&table, format, cfg.output.pretty, BufWriter::new(file))?;
            info!(rows = table.len(), path = %path.display(), "wrote normalized table");
        }
        None => {
            output::write_table(&table, format, cfg.output.pretty, io::stdout().lock())?;
        }
    }

    if args.summary {
        eprint!("{}", output::render_summary(&table, &args.file));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_normalize_args() {
        let cli = Cli::try_parse_from([
            "bacnorm",
            "account",
            "estado.csv",
            "--format",
            "json",
            "-o",
            "out.json",
            "--summary",
        ])
        .unwrap();

        match cli.command {
            Command::Account(args) => {
                assert_eq!(args.file, PathBuf::from("estado.csv"));
                assert_eq!(args.format, Some(OutputFormat::Json));
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
                assert!(args.summary);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["bacnorm", "config", "show", "--config", "/tmp/b.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/b.toml")));
        assert!(matches!(
            cli.command,
            Command::Config {
                command: ConfigCommand::Show
            }
        ));
    }
}
