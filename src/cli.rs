//! CLI argument parsing for lsqcalc

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::format::FormatMode;

/// Output format for fit and summary reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    #[default]
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV derivation table for spreadsheet analysis
    Csv,
    /// Tab-separated derivation table for pasting into a spreadsheet
    Tsv,
}

#[derive(Parser, Debug)]
#[command(name = "lsqcalc")]
#[command(version)]
#[command(about = "Least-squares line fitting and standard-error calculator", long_about = None)]
pub struct Cli {
    /// Rounding policy for displayed numbers (overrides the saved preference)
    #[arg(long, value_enum, global = true)]
    pub mode: Option<FormatMode>,

    /// Significant figures or decimal places to display
    #[arg(long, value_name = "N", global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub digits: Option<u32>,

    /// Preference file (default: $LSQCALC_CONFIG or ~/.config/lsqcalc/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Write debug logs to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fit a line to X Y points read from a file or stdin
    Fit {
        /// Point file; one "X Y" pair per line, separated by commas, tabs or spaces
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Fit a line from directly entered sums
    Stats(StatsArgs),

    /// Mean, standard deviation and standard error for each file (or stdin)
    Se {
        files: Vec<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Interactive calculator (default)
    Session,

    /// Show or change the saved display preference
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sufficient statistics as free text; an omitted or unparseable value is unset
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub n: Option<String>,

    /// ΣX
    #[arg(long, value_name = "SUM", allow_hyphen_values = true)]
    pub sum_x: Option<String>,

    /// ΣY
    #[arg(long, value_name = "SUM", allow_hyphen_values = true)]
    pub sum_y: Option<String>,

    /// ΣX²
    #[arg(long, value_name = "SUM", allow_hyphen_values = true)]
    pub sum_x2: Option<String>,

    /// ΣXY
    #[arg(long, value_name = "SUM", allow_hyphen_values = true)]
    pub sum_xy: Option<String>,

    /// Σ(Y-aX-b)², needed for standard errors
    #[arg(long, value_name = "SUM", allow_hyphen_values = true)]
    pub sum_residuals: Option<String>,

    /// Output format (text or json)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective preference
    Show,
    /// Save the preference given by --mode and --digits
    Set,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_session() {
        let cli = Cli::parse_from(["lsqcalc"]);
        assert!(cli.command.is_none());
        assert!(cli.mode.is_none());
        assert!(cli.digits.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_fit_file_and_output() {
        let cli = Cli::parse_from(["lsqcalc", "fit", "data.csv", "--output", "json"]);
        match cli.command {
            Some(Command::Fit { file, output }) => {
                assert_eq!(file, Some(PathBuf::from("data.csv")));
                assert_eq!(output, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_fit_defaults_to_stdin_text() {
        let cli = Cli::parse_from(["lsqcalc", "fit"]);
        match cli.command {
            Some(Command::Fit { file, output }) => {
                assert!(file.is_none());
                assert_eq!(output, OutputFormat::Text);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_format_flags_after_subcommand() {
        let cli = Cli::parse_from(["lsqcalc", "fit", "--mode", "dec", "--digits", "2"]);
        assert_eq!(cli.mode, Some(FormatMode::DecimalPlaces));
        assert_eq!(cli.digits, Some(2));
    }

    #[test]
    fn test_cli_stats_accepts_negative_sums() {
        let cli = Cli::parse_from([
            "lsqcalc", "stats", "--n", "3", "--sum-x", "-6", "--sum-y", "12",
        ]);
        match cli.command {
            Some(Command::Stats(args)) => {
                assert_eq!(args.n.as_deref(), Some("3"));
                assert_eq!(args.sum_x.as_deref(), Some("-6"));
                assert!(args.sum_xy.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_stats_args_default_is_unset_text() {
        let args = StatsArgs::default();
        assert!(args.n.is_none());
        assert!(args.sum_residuals.is_none());
        assert_eq!(args.output, OutputFormat::Text);
    }

    #[test]
    fn test_cli_se_multiple_files() {
        let cli = Cli::parse_from(["lsqcalc", "se", "a.txt", "b.txt"]);
        match cli.command {
            Some(Command::Se { files, .. }) => assert_eq!(files.len(), 2),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_config_set() {
        let cli = Cli::parse_from(["lsqcalc", "config", "set", "--mode", "dec", "--digits", "3"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Set
            })
        ));
        assert_eq!(cli.mode, Some(FormatMode::DecimalPlaces));
        assert_eq!(cli.digits, Some(3));
    }

    #[test]
    fn test_cli_rejects_zero_digits() {
        assert!(Cli::try_parse_from(["lsqcalc", "--digits", "0"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["lsqcalc", "--mode", "hex"]).is_err());
    }
}
