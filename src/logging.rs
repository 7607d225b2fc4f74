// src/logging.rs

//! Logging setup for the `depgraph` binary.
//!
//! The level applies to depgraph's own events; other crates stay at `warn`.
//! It comes from `--log-level`, else `DEPGRAPH_LOG`, else `info`.
//! `DEPGRAPH_LOG` may also hold full `EnvFilter` directives
//! (`depgraph::engine=trace,info`).
//!
//! Logs go to STDERR; STDOUT carries the run summary.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "DEPGRAPH_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let directives = filter_directives(cli_level, env.as_deref());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid {LOG_ENV} filter '{directives}'"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}

/// Filter directives for the given CLI level and `DEPGRAPH_LOG` value.
fn filter_directives(cli_level: Option<LogLevel>, env: Option<&str>) -> String {
    if let Some(lvl) = cli_level {
        return scoped(lvl.as_str());
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<tracing::Level>() {
            Ok(level) => scoped(&level.to_string().to_lowercase()),
            Err(_) => raw.to_string(),
        },
        None => scoped("info"),
    }
}

fn scoped(level: &str) -> String {
    format!("warn,depgraph={level}")
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
