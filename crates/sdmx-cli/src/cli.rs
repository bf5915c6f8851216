//! CLI argument definitions for the SDMX query tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sdmx_registry::Provider;

#[derive(Parser)]
#[command(
    name = "sdmx",
    version,
    about = "Query ECB, IMF, INSEE and OECD statistical services over SDMX-ML",
    long_about = "Query statistical data services that publish SDMX-ML.\n\n\
                  Lists data-flows, downloads observations as tables, fetches\n\
                  code lists and series revision histories."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Provider configuration file (TOML) replacing the built-in one.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECONDS", default_value_t = 60, global = true)]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the data-flows a provider publishes.
    Flows(ProviderArgs),

    /// Download the observations of a data-flow.
    Data(DataArgs),

    /// Download code lists, for the whole provider or one data-flow.
    Codelist(CodelistArgs),

    /// Download the revision history of a series.
    Revisions(RevisionsArgs),

    /// List the query options a provider accepts.
    Options(ProviderArgs),

    /// List the supported providers.
    Providers,
}

#[derive(Parser)]
pub struct ProviderArgs {
    /// Statistical provider.
    #[arg(value_enum, value_name = "PROVIDER")]
    pub provider: ProviderArg,
}

#[derive(Parser)]
pub struct DataArgs {
    /// Statistical provider.
    #[arg(value_enum, value_name = "PROVIDER")]
    pub provider: ProviderArg,

    /// Data-flow identifier (case-insensitive).
    #[arg(value_name = "FLOW")]
    pub flow: String,

    /// Query option as NAME=VALUE; repeatable.
    ///
    /// Names the provider does not accept are ignored. Run `sdmx options
    /// PROVIDER` to list them.
    #[arg(long = "option", short = 'o', value_name = "NAME=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Write the full table to a CSV file instead of printing it.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of rows to print.
    #[arg(long = "limit", value_name = "N", default_value_t = 20)]
    pub limit: usize,
}

#[derive(Parser)]
pub struct CodelistArgs {
    /// Statistical provider.
    #[arg(value_enum, value_name = "PROVIDER")]
    pub provider: ProviderArg,

    /// Restrict to the code lists of one data-flow.
    #[arg(long = "flow", value_name = "FLOW")]
    pub flow: Option<String>,

    /// Write the full table to a CSV file instead of printing it.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of rows to print.
    #[arg(long = "limit", value_name = "N", default_value_t = 50)]
    pub limit: usize,
}

#[derive(Parser)]
pub struct RevisionsArgs {
    /// Statistical provider.
    #[arg(value_enum, value_name = "PROVIDER")]
    pub provider: ProviderArg,

    /// Series key: an IDBANK for INSEE, FLOW.KEY for ECB.
    #[arg(value_name = "SERIES_KEY")]
    pub key: String,

    /// Write the full table to a CSV file instead of printing it.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of rows to print.
    #[arg(long = "limit", value_name = "N", default_value_t = 20)]
    pub limit: usize,
}

/// CLI provider choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Ecb,
    Imf,
    Insee,
    Oecd,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Ecb => Provider::Ecb,
            ProviderArg::Imf => Provider::Imf,
            ProviderArg::Insee => Provider::Insee,
            ProviderArg::Oecd => Provider::Oecd,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Parses `NAME=VALUE`; the value may itself contain `=`.
fn parse_option(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing option name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("start_period=2020").unwrap(),
            ("start_period".to_string(), "2020".to_string())
        );
        assert_eq!(
            parse_option("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert!(parse_option("start_period").is_err());
        assert!(parse_option("=2020").is_err());
    }

    #[test]
    fn test_data_command_arguments() {
        let cli = Cli::try_parse_from([
            "sdmx",
            "data",
            "ecb",
            "EXR",
            "-o",
            "start_period=2020",
            "--option",
            "end_period=2021",
            "--limit",
            "5",
        ])
        .unwrap();
        let Command::Data(args) = cli.command else {
            panic!("expected data command");
        };
        assert_eq!(args.provider, ProviderArg::Ecb);
        assert_eq!(args.flow, "EXR");
        assert_eq!(args.options.len(), 2);
        assert_eq!(args.options[1].0, "end_period");
        assert_eq!(args.limit, 5);
        assert_eq!(cli.timeout, 60);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sdmx", "flows", "insee", "--timeout", "5"]).unwrap();
        assert_eq!(cli.timeout, 5);
        assert!(matches!(cli.command, Command::Flows(ProviderArgs { provider: ProviderArg::Insee })));
    }

    #[test]
    fn test_provider_conversion() {
        assert_eq!(Provider::from(ProviderArg::Oecd), Provider::Oecd);
        assert!(Cli::try_parse_from(["sdmx", "flows", "bis"]).is_err());
    }
}
