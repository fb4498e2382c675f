//! # cccd entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cccd_cli::analyze::{run_analyze, run_batch_analyze, AnalyzeArgs, BatchAnalyzeArgs};
use cccd_cli::checksum::{run_check_digit, run_verify, CheckDigitArgs, VerifyArgs};
use cccd_cli::config::{run_config, ConfigArgs};
use cccd_cli::generate::{run_generate, GenerateArgs};
use cccd_cli::jurisdictions::{run_jurisdictions, JurisdictionsArgs};
use cccd_cli::registry::{run_registry, RegistryArgs};

/// Generate, verify and analyze 12-digit CCCD-format identifiers.
#[derive(Parser, Debug)]
#[command(name = "cccd", version, about, long_about = None)]
struct Cli {
    /// Verbose logging when RUST_LOG is unset (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write JSON output to this file instead of stdout.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the check digit for an 11-digit body.
    CheckDigit(CheckDigitArgs),

    /// Verify format and checksum of one or more identifiers.
    Verify(VerifyArgs),

    /// Generate random identifiers.
    Generate(GenerateArgs),

    /// Decode and score one identifier.
    Analyze(AnalyzeArgs),

    /// Analyze a list of identifiers from a file or stdin.
    BatchAnalyze(BatchAnalyzeArgs),

    /// List or search the jurisdiction table.
    Jurisdictions(JurisdictionsArgs),

    /// Print the active limits and legal basis.
    Config(ConfigArgs),

    /// Query the business-registry API.
    Registry(RegistryArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let output = cli.output.as_deref();
    let result = match &cli.command {
        Commands::CheckDigit(args) => run_check_digit(args, output),
        Commands::Verify(args) => run_verify(args, output),
        Commands::Generate(args) => run_generate(args, output),
        Commands::Analyze(args) => run_analyze(args, output),
        Commands::BatchAnalyze(args) => run_batch_analyze(args, output),
        Commands::Jurisdictions(args) => run_jurisdictions(args, output),
        Commands::Config(args) => run_config(args, output),
        Commands::Registry(args) => run_registry(args, output),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cccd_cli::registry::RegistryCommand;
    use cccd_core::{Region, Sex};

    #[test]
    fn cli_parse_check_digit() {
        let cli = Cli::try_parse_from(["cccd", "check-digit", "04920150301"]).unwrap();
        if let Commands::CheckDigit(args) = cli.command {
            assert_eq!(args.body, "04920150301");
        } else {
            panic!("expected check-digit");
        }
    }

    #[test]
    fn cli_parse_verify_many() {
        let cli =
            Cli::try_parse_from(["cccd", "verify", "001200011504", "001200011505"]).unwrap();
        if let Commands::Verify(args) = cli.command {
            assert_eq!(args.identifiers.len(), 2);
        } else {
            panic!("expected verify");
        }
    }

    #[test]
    fn cli_parse_verify_requires_identifier() {
        assert!(Cli::try_parse_from(["cccd", "verify"]).is_err());
    }

    #[test]
    fn cli_parse_generate_full() {
        let cli = Cli::try_parse_from([
            "cccd",
            "generate",
            "--jurisdiction",
            "001,079",
            "--jurisdiction",
            "048",
            "--sex",
            "female",
            "--from",
            "1980",
            "--to",
            "1990",
            "--quantity",
            "25",
            "--batch",
            "--no-validate",
            "--seed",
            "42",
            "--output",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        if let Commands::Generate(args) = cli.command {
            let codes: Vec<&str> = args.jurisdiction.iter().map(|c| c.as_str()).collect();
            assert_eq!(codes, vec!["001", "079", "048"]);
            assert_eq!(args.sex, Some(Sex::Female));
            assert_eq!(args.from, Some(1980));
            assert_eq!(args.to, Some(1990));
            assert_eq!(args.quantity, Some(25));
            assert!(args.batch);
            assert!(args.no_validate);
            assert_eq!(args.seed, Some(42));
        } else {
            panic!("expected generate");
        }
    }

    #[test]
    fn cli_parse_generate_rejects_bad_code() {
        assert!(Cli::try_parse_from(["cccd", "generate", "--jurisdiction", "1"]).is_err());
        assert!(Cli::try_parse_from(["cccd", "generate", "--sex", "other"]).is_err());
    }

    #[test]
    fn cli_parse_analyze_flags() {
        let cli =
            Cli::try_parse_from(["cccd", "analyze", "001200011504", "--detailed"]).unwrap();
        if let Commands::Analyze(args) = cli.command {
            assert!(args.detailed);
            assert!(!args.location);
        } else {
            panic!("expected analyze");
        }
    }

    #[test]
    fn cli_parse_batch_analyze_stdin() {
        let cli = Cli::try_parse_from(["cccd", "batch-analyze", "-"]).unwrap();
        if let Commands::BatchAnalyze(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("-"));
        } else {
            panic!("expected batch-analyze");
        }
    }

    #[test]
    fn cli_parse_jurisdictions_filters() {
        let cli = Cli::try_parse_from([
            "cccd",
            "jurisdictions",
            "--region",
            "south",
            "--search",
            "giang",
        ])
        .unwrap();
        if let Commands::Jurisdictions(args) = cli.command {
            assert_eq!(args.region, Some(Region::South));
            assert_eq!(args.search.as_deref(), Some("giang"));
        } else {
            panic!("expected jurisdictions");
        }
    }

    #[test]
    fn cli_parse_jurisdictions_stats_conflicts_with_filters() {
        assert!(Cli::try_parse_from(["cccd", "jurisdictions", "--stats", "--region", "north"])
            .is_err());
    }

    #[test]
    fn cli_parse_registry_company() {
        let cli = Cli::try_parse_from(["cccd", "registry", "company", "0101243150"]).unwrap();
        if let Commands::Registry(args) = cli.command {
            assert!(matches!(
                args.command,
                RegistryCommand::Company { ref tax_code } if tax_code == "0101243150"
            ));
        } else {
            panic!("expected registry");
        }
    }

    #[test]
    fn cli_parse_verbose_is_global() {
        let cli = Cli::try_parse_from(["cccd", "config", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
