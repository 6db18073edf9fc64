//! Command-line options and connection settings.
//!
//! ```bash
//! antolin-load [-d DATABASE] [-u USERNAME] [-p PASSWORD] antolin.csv
//! ```
//!
//! A password given neither with `-p` nor in `ANTOLIN_PASSWORD` is asked for
//! on the terminal without echo. `--url` (or `DATABASE_URL`) replaces the
//! discrete connection options entirely.

use std::fmt;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::error::{ConfigError, ConfigResult};
use crate::parser::EncodingChoice;
use crate::transform::pipeline::{ImportOptions, RowErrorPolicy, PROGRESS_INTERVAL};

pub const DEFAULT_DATABASE: &str = "spils";
pub const DEFAULT_USERNAME: &str = "gssb";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;

#[derive(Parser, Debug)]
#[command(name = "antolin-load")]
#[command(about = "Load an Antolin CSV export into the antolin table", long_about = None)]
pub struct Cli {
    /// The database to store the data in
    #[arg(short, long, default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// The username for the database
    #[arg(short, long, default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// The password for the database (prompted if omitted)
    #[arg(short, long, env = "ANTOLIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database server host
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Database server port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Full connection URL, overrides the options above
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub url: Option<String>,

    /// Text encoding of the export (utf-8, windows-1252, iso-8859-1, auto)
    #[arg(long, default_value = "utf-8")]
    pub encoding: EncodingChoice,

    /// What to do when a row cannot be inserted
    #[arg(long, value_enum, default_value_t = RowErrorPolicy::Abort)]
    pub on_error: RowErrorPolicy,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Semicolon-delimited Antolin export, first row is a header
    #[arg(value_name = "CSV_FILE")]
    pub input: PathBuf,
}

/// Where to connect.
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// A complete URL, used as given.
    Url(String),
    /// A MySQL server addressed by parts.
    MySql {
        host: String,
        port: u16,
        database: String,
        username: String,
        password: Option<String>,
    },
}

impl ConnectionTarget {
    /// True when a password still has to be asked for.
    pub fn needs_password(&self) -> bool {
        match self {
            ConnectionTarget::Url(_) => false,
            ConnectionTarget::MySql { password, .. } => {
                password.as_deref().map_or(true, str::is_empty)
            }
        }
    }

    /// Fill in a missing password from `prompt`.
    pub fn resolve_password<F>(&mut self, prompt: F) -> ConfigResult<()>
    where
        F: FnOnce() -> ConfigResult<String>,
    {
        if !self.needs_password() {
            return Ok(());
        }
        if let ConnectionTarget::MySql { password, .. } = self {
            *password = Some(prompt()?);
        }
        Ok(())
    }

    /// Connection URL. Credentials are percent-encoded.
    pub fn url(&self) -> String {
        match self {
            ConnectionTarget::Url(url) => url.clone(),
            ConnectionTarget::MySql {
                host,
                port,
                database,
                username,
                password,
            } => format!(
                "mysql://{}:{}@{}:{}/{}?charset=utf8mb4",
                urlencoding::encode(username),
                urlencoding::encode(password.as_deref().unwrap_or_default()),
                host,
                port,
                urlencoding::encode(database)
            ),
        }
    }
}

/// Never prints the password.
impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionTarget::Url(url) => match url.split_once("://") {
                Some((scheme, rest)) => match rest.rsplit_once('@') {
                    Some((_, host)) => write!(f, "{}://***@{}", scheme, host),
                    None => f.write_str(url),
                },
                None => f.write_str(url),
            },
            ConnectionTarget::MySql {
                host,
                port,
                database,
                username,
                ..
            } => write!(f, "mysql://{}@{}:{}/{}", username, host, port, database),
        }
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub target: ConnectionTarget,
    pub input: PathBuf,
    pub encoding: EncodingChoice,
    pub options: ImportOptions,
    /// Number of `-v` flags, passed to [`crate::logging::init_logging`].
    pub verbose: u8,
}

impl From<Cli> for ImportConfig {
    fn from(cli: Cli) -> Self {
        let target = match cli.url {
            Some(url) => ConnectionTarget::Url(url),
            None => ConnectionTarget::MySql {
                host: cli.host,
                port: cli.port,
                database: cli.database,
                username: cli.username,
                password: cli.password,
            },
        };

        Self {
            target,
            input: cli.input,
            encoding: cli.encoding,
            options: ImportOptions {
                on_error: cli.on_error,
                progress_interval: PROGRESS_INTERVAL,
            },
            verbose: cli.verbose,
        }
    }
}

/// Ask for the password on the terminal without echoing it.
pub fn prompt_password() -> ConfigResult<String> {
    inquire::Password::new("Password:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Hidden)
        .prompt()
        .map_err(|e| ConfigError::PasswordPrompt(e.to_string()))
}
