//! Command line interface
//!
//! Accepts both the single-dash long flags of the original tool
//! (`-generate`, `-import <WIF>`, `-type p2tr`, `-testnet`) and the usual
//! double-dash form.

use std::ffi::OsString;

use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};

use crate::config::KeygenConfig;
use crate::error::Result;
use crate::keys::KeyPair;
use crate::network::Network;
use crate::report::{OutputFormat, Report};

/// Long flags that may also be written with a single dash
const LONG_FLAGS: [&str; 6] = ["generate", "import", "type", "testnet", "json", "log-level"];

#[derive(Parser, Debug)]
#[command(name = "btc-keygen")]
#[command(about = "Generate or import a Bitcoin key pair and derive its address", version)]
pub struct Cli {
    /// Generate a new key pair
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub generate: bool,

    /// Import a private key in WIF format
    #[arg(long, value_name = "WIF", value_parser = NonEmptyStringValueParser::new())]
    pub import: Option<String>,

    /// Address type: p2pkh, p2sh, p2wpkh, p2tr (default: p2pkh)
    #[arg(long = "type", value_name = "TYPE")]
    pub address_type: Option<String>,

    /// Use testnet parameters
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub testnet: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log level written to stderr (trace, debug, info, warn, error)
    #[arg(long, env = "BTC_KEYGEN_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Parse (already normalised) arguments and require exactly one key source.
    ///
    /// `-generate=false` counts as absent, so the check runs on the parsed
    /// values rather than on which flags were present.
    pub fn try_parse_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Self::try_parse_from(args)?;

        match (cli.generate, cli.import.is_some()) {
            (true, true) => Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "--generate and --import cannot be used together",
            )),
            (false, false) => Err(Self::command().error(
                ErrorKind::MissingRequiredArgument,
                "one of --generate or --import <WIF> is required",
            )),
            _ => Ok(cli),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// `-testnet` wins over the configured default
    pub fn network(&self, config: &KeygenConfig) -> Network {
        if self.testnet {
            Network::Testnet
        } else {
            config.network
        }
    }

    pub fn address_tag(&self, config: &KeygenConfig) -> String {
        self.address_type
            .clone()
            .unwrap_or_else(|| config.address_type.clone())
    }
}

/// Rewrite `-flag` / `-flag=value` to `--flag` for the known long flags.
///
/// The first item (program name) and anything that is not a known flag are
/// passed through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(idx, arg)| {
            let arg: OsString = arg.into();
            if idx == 0 {
                return arg;
            }
            match arg.to_str() {
                Some(s) if is_single_dash_long_flag(s) => OsString::from(format!("-{}", s)),
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_long_flag(arg: &str) -> bool {
    if arg.starts_with("--") {
        return false;
    }
    match arg.strip_prefix('-') {
        Some(rest) => {
            let name = rest.split('=').next().unwrap_or(rest);
            LONG_FLAGS.contains(&name)
        }
        None => false,
    }
}

/// Acquire the key and build the report.
///
/// Key generation and WIF import failures are returned as errors; an
/// unknown address type is carried inside the report.
pub fn run(cli: &Cli, config: &KeygenConfig) -> Result<Report> {
    let network = cli.network(config);
    let address_tag = cli.address_tag(config);

    let key = match &cli.import {
        Some(wif) => KeyPair::from_wif(wif, network)?,
        None => KeyPair::generate(network)?,
    };

    tracing::info!(
        source = ?key.source(),
        network = %network,
        address_type = %address_tag,
        "Key pair ready"
    );

    Ok(Report::build(&key, &address_tag, network))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeygenError;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        let mut argv = vec!["btc-keygen"];
        argv.extend_from_slice(args);
        Cli::try_parse_args(normalize_args(argv))
    }

    #[test]
    fn test_normalize_single_dash_flags() {
        let args = normalize_args(["btc-keygen", "-generate", "-type=p2tr", "-testnet", "-x"]);
        assert_eq!(
            args,
            vec![
                OsString::from("btc-keygen"),
                OsString::from("--generate"),
                OsString::from("--type=p2tr"),
                OsString::from("--testnet"),
                OsString::from("-x"),
            ]
        );

        let untouched = normalize_args(["-generate", "--import", "cXYZ"]);
        assert_eq!(untouched[0], OsString::from("-generate"));
        assert_eq!(untouched[1], OsString::from("--import"));
    }

    #[test]
    fn test_parse_original_flags() {
        let cli = parse(&["-import", "cWIF", "-type", "p2sh", "-testnet"]).unwrap();
        assert_eq!(cli.import.as_deref(), Some("cWIF"));
        assert_eq!(cli.address_type.as_deref(), Some("p2sh"));
        assert!(cli.testnet);
        assert!(!cli.generate);
        assert_eq!(cli.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_key_source_is_required() {
        let err = parse(&["-type", "p2tr"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_generate_and_import_conflict() {
        let err = parse(&["-generate", "-import", "cWIF"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_bool_flags_take_explicit_values() {
        let cli = parse(&["-generate=true", "-testnet=false"]).unwrap();
        assert!(cli.generate);
        assert!(!cli.testnet);
        assert_eq!(cli.network(&KeygenConfig::default()), Network::Mainnet);

        let cli = parse(&["-import=cWIF", "-testnet=true"]).unwrap();
        assert_eq!(cli.import.as_deref(), Some("cWIF"));
        assert!(cli.testnet);

        // A bare flag never swallows the next argument
        let cli = parse(&["-testnet", "-generate"]).unwrap();
        assert!(cli.testnet && cli.generate);
    }

    #[test]
    fn test_generate_false_counts_as_absent() {
        let err = parse(&["-generate=false"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let cli = parse(&["-generate=false", "-import", "cWIF"]).unwrap();
        assert!(!cli.generate);
        assert_eq!(cli.import.as_deref(), Some("cWIF"));
    }

    #[test]
    fn test_empty_import_is_usage_error() {
        let err = parse(&["-import", ""]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_defaults_come_from_config() {
        let cli = parse(&["--generate"]).unwrap();
        let config = KeygenConfig {
            network: Network::Testnet,
            address_type: "p2wpkh".to_string(),
            ..KeygenConfig::default()
        };
        assert_eq!(cli.network(&config), Network::Testnet);
        assert_eq!(cli.address_tag(&config), "p2wpkh");

        let cli = parse(&["--generate", "--type", "p2tr"]).unwrap();
        assert_eq!(cli.network(&KeygenConfig::default()), Network::Mainnet);
        assert_eq!(cli.address_tag(&config), "p2tr");
    }

    #[test]
    fn test_run_import_fixture() {
        let cli = parse(&[
            "-import",
            "cVt4o7BGAig1UXywgGSmARhxMdzP5qvQsxKkSsc1XEkw3tDTQFpy",
            "-testnet",
        ])
        .unwrap();
        let report = run(&cli, &KeygenConfig::default()).unwrap();
        assert_eq!(
            report.address.as_deref(),
            Some("mqwpxxvfv3QbM8PU8uBx2jaNt9btQqvQNx")
        );
    }

    #[test]
    fn test_run_network_mismatch_is_fatal() {
        let cli = parse(&[
            "-import",
            "cVt4o7BGAig1UXywgGSmARhxMdzP5qvQsxKkSsc1XEkw3tDTQFpy",
        ])
        .unwrap();
        let err = run(&cli, &KeygenConfig::default()).unwrap_err();
        assert!(matches!(err, KeygenError::NetworkMismatch { .. }));
        assert!(!err.is_recoverable());
    }
}
