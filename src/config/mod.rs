pub mod static_map;

use crate::adapters::geo::DEFAULT_CATALOG_URL;
use crate::utils::error::{ColetorError, Result};
use crate::utils::validation::{validate_path, validate_url, Validate};
use clap::{Parser, ValueEnum};

/// Which source variant drives the selector cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CascadeVariant {
    /// Region and city from the remote catalog, neighborhood typed freely.
    Remote,
    /// Region and city from the remote catalog, neighborhood picked from a
    /// local static table.
    Static,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "coletor")]
#[command(about = "Collects person records with cascading geography selection and exports them to a spreadsheet")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    #[arg(long, default_value = "./data", help = "Directory for the record snapshot and exported files")]
    pub data_dir: String,

    #[arg(long, value_enum, default_value = "remote")]
    pub cascade: CascadeVariant,

    #[arg(long, help = "TOML file mapping city names to neighborhood lists (static cascade only)")]
    pub neighborhoods: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("catalog_url", &self.catalog_url)?;
        validate_path("data_dir", &self.data_dir)?;

        if self.cascade == CascadeVariant::Static && self.neighborhoods.is_none() {
            return Err(ColetorError::Config {
                message: "--neighborhoods is required when --cascade static".to_string(),
            });
        }

        Ok(())
    }
}
