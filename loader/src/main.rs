//! antolin-load - import an Antolin CSV export
//!
//! ```bash
//! antolin-load books.csv                        # spils as gssb, password prompted
//! antolin-load -d test -u root -p secret books.csv
//! antolin-load --on-error skip --encoding windows-1252 books.csv
//! ```
//!
//! Prints one dot per 100 rows and a newline once the run is committed.

use std::io;

use antolin::{
    config::prompt_password, db, import_file, logging, Cli, ImportConfig, ImportError,
    ImportReport,
};
use clap::Parser;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let config = ImportConfig::from(Cli::parse());
    logging::init_logging(config.verbose);

    if let Err(e) = run(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(mut config: ImportConfig) -> Result<ImportReport, ImportError> {
    config.target.resolve_password(prompt_password)?;

    info!(database = %config.target, "Connecting");
    let mut conn = db::connect(&config.target.url())
        .await
        .map_err(ImportError::Connect)?;

    let report = import_file(
        &mut conn,
        &config.input,
        config.encoding,
        &config.options,
        &mut io::stdout().lock(),
    )
    .await?;

    if let Err(e) = sqlx::Connection::close(conn).await {
        warn!(error = %e, "Closing the connection failed");
    }

    Ok(report)
}
