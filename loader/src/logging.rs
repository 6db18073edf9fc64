//! Diagnostic logging.
//!
//! Standard output belongs to the progress dots, so log lines are written to
//! standard error. `RUST_LOG` wins over the `-v` count when it is set.
//!
//! ```bash
//! RUST_LOG=antolin=debug antolin-load books.csv
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level selected by the number of `-v` flags.
pub fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose).as_str().to_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), Level::INFO);
        assert_eq!(level_for(1), Level::DEBUG);
        assert_eq!(level_for(5), Level::TRACE);
    }

    #[test]
    fn test_init_twice() {
        init_logging(0);
        init_logging(2);
    }
}
