#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `warden` - authenticate and authorize against configured realms.

mod config;
mod warden;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use realm_sdk::PasswordService;
use secrecy::SecretString;
use static_realm_plugin::SaltedSha256PasswordService;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingConfig, WardenConfig};
use crate::warden::Warden;

/// Warden - multi-realm authentication and authorization
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(version, about, long_about = None)]
struct Cli {
    /// YAML configuration file (overridable with `WARDEN__*` variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and print the merged account
    Authenticate {
        #[command(flatten)]
        login: Login,
    },

    /// Authenticate, then check permissions; exits non-zero if any is denied
    CheckPermission {
        #[command(flatten)]
        login: Login,

        /// Permission strings such as `ledger:read`
        #[arg(required = true)]
        permissions: Vec<String>,
    },

    /// Authenticate, then check roles; exits non-zero if any is missing
    CheckRole {
        #[command(flatten)]
        login: Login,

        #[arg(required = true)]
        roles: Vec<String>,
    },

    /// Print the stored hash for a password
    HashPassword {
        /// Take the salt from this configured realm
        #[arg(long, conflicts_with = "salt")]
        realm: Option<String>,

        /// Explicit salt
        #[arg(long)]
        salt: Option<String>,

        password: String,
    },
}

#[derive(clap::Args, Debug)]
struct Login {
    #[arg(short, long)]
    username: String,

    #[arg(short, long)]
    password: String,
}

impl Login {
    fn password(&self) -> SecretString {
        SecretString::from(self.password.clone())
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let cfg = WardenConfig::load(cli.config.as_deref())?;
    init_tracing(&cfg.logging, cli.verbose);

    match &cli.command {
        Command::Authenticate { login } => {
            let warden = Warden::from_config(&cfg);
            let subject = warden
                .login(&login.username, &login.password())
                .context("authentication failed")?;
            let account = subject.account.without_credentials();
            let out = serde_json::json!({
                "account_id": account.account_id(),
                "identifiers": subject.identifiers,
                "attributes": account.attributes(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckPermission { login, permissions } => {
            let warden = Warden::from_config(&cfg);
            let subject = warden
                .login(&login.username, &login.password())
                .context("authentication failed")?;
            let results = warden.permissions(&subject, permissions)?;
            Ok(report(&results))
        }
        Command::CheckRole { login, roles } => {
            let warden = Warden::from_config(&cfg);
            let subject = warden
                .login(&login.username, &login.password())
                .context("authentication failed")?;
            let results = warden.roles(&subject, roles)?;
            Ok(report(&results))
        }
        Command::HashPassword {
            realm,
            salt,
            password,
        } => {
            let salt = match (realm, salt) {
                (Some(name), _) => cfg
                    .realm(name)
                    .with_context(|| format!("unknown realm: {name}"))?
                    .private_salt
                    .clone(),
                (None, Some(salt)) => SecretString::from(salt.clone()),
                (None, None) => SecretString::from(String::new()),
            };
            let service = SaltedSha256PasswordService::new(salt);
            println!("{}", service.hash_password(&SecretString::from(password.clone())));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print one line per item and fail unless every item was granted.
fn report(results: &BTreeSet<(String, bool)>) -> ExitCode {
    for (item, granted) in results {
        let verdict = if *granted { "granted" } else { "denied" };
        println!("{verdict}\t{item}");
    }
    if results.iter().all(|(_, granted)| *granted) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// `RUST_LOG` wins over the configured level; `--verbose` wins over both.
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let layer = if logging.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).init();
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_permission() {
        let cli = Cli::try_parse_from([
            "warden",
            "--config",
            "warden.yaml",
            "check-permission",
            "-u",
            "jsmith",
            "-p",
            "letmein",
            "ledger:read",
            "report:export",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("warden.yaml")));
        let Command::CheckPermission { login, permissions } = cli.command else {
            panic!("expected check-permission");
        };
        assert_eq!(login.username, "jsmith");
        assert_eq!(permissions, ["ledger:read", "report:export"]);
    }

    #[test]
    fn check_role_requires_roles() {
        assert!(Cli::try_parse_from(["warden", "check-role", "-u", "a", "-p", "b"]).is_err());
    }

    #[test]
    fn hash_password_realm_and_salt_conflict() {
        let res = Cli::try_parse_from([
            "warden",
            "hash-password",
            "--realm",
            "corp",
            "--salt",
            "x",
            "secret",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn report_fails_on_any_denial() {
        let mixed: BTreeSet<(String, bool)> =
            [("a".to_owned(), true), ("b".to_owned(), false)].into_iter().collect();
        let all: BTreeSet<(String, bool)> = [("a".to_owned(), true)].into_iter().collect();

        assert_eq!(report(&mixed), ExitCode::FAILURE);
        assert_eq!(report(&all), ExitCode::SUCCESS);
    }
}
