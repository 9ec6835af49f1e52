use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comprel_catalog::DEFAULT_CATALOG_PATH;
use serde::{Deserialize, Serialize};

/// Process-wide settings read from the environment (and `.env`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reference catalog CSV (COMPREL_CATALOG)
    pub catalog_path: PathBuf,
    /// Emit JSON log lines (RUST_LOG_FORMAT=json)
    pub json_logging: bool,
    /// Worker threads for batch evaluation (COMPREL_THREADS); rayon default when unset
    pub threads: Option<usize>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            env::var("COMPREL_CATALOG").ok(),
            env::var("RUST_LOG_FORMAT").ok(),
            env::var("COMPREL_THREADS").ok(),
        )
    }

    fn from_vars(
        catalog: Option<String>,
        log_format: Option<String>,
        threads: Option<String>,
    ) -> Result<Self> {
        let threads = match threads.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => {
                let n: usize = raw
                    .parse()
                    .with_context(|| format!("COMPREL_THREADS must be a positive integer, got '{raw}'"))?;
                if n == 0 {
                    anyhow::bail!("COMPREL_THREADS must be at least 1");
                }
                Some(n)
            }
            None => None,
        };

        Ok(Self {
            catalog_path: catalog
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            json_logging: log_format
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            threads,
        })
    }
}
